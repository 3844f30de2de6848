use std::ptr;

use depscan_core::DependencyScanningWorker;

use crate::handles::{DepscanService, DepscanServiceHandle, DepscanWorker, DepscanWorkerHandle};

/// Create a worker bound to `service` and the physical file system.
///
/// Returns null when `service` is null.
///
/// # Safety
///
/// `service` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn depscan_worker_create(
    service: DepscanServiceHandle,
) -> DepscanWorkerHandle {
    // SAFETY: forwarded from the caller.
    let Some(service) = (unsafe { DepscanService::from_handle(service) }) else {
        tracing::warn!("depscan_worker_create called without a service");
        return ptr::null_mut();
    };
    DepscanWorker {
        inner: DependencyScanningWorker::with_physical_fs(&service.inner),
    }
    .into_handle()
}

/// # Safety
///
/// `worker` must be null or a live handle; it is dangling afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn depscan_worker_dispose(worker: DepscanWorkerHandle) {
    if worker.is_null() {
        return;
    }
    // SAFETY: created by `depscan_worker_create` via `Box::into_raw`.
    drop(unsafe { Box::from_raw(worker) });
}
