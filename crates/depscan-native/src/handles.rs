//! Opaque service and worker handles.
//!
//! C callers only ever see pointers to these types. The service must outlive
//! every worker created from it; that order is the caller's responsibility.

use depscan_core::{DependencyScanningService, DependencyScanningWorker};

#[derive(Debug)]
pub struct DepscanService {
    pub(crate) inner: DependencyScanningService,
}

#[derive(Debug)]
pub struct DepscanWorker {
    pub(crate) inner: DependencyScanningWorker,
}

pub type DepscanServiceHandle = *mut DepscanService;
pub type DepscanWorkerHandle = *mut DepscanWorker;

impl DepscanService {
    pub(crate) fn into_handle(self) -> DepscanServiceHandle {
        Box::into_raw(Box::new(self))
    }

    /// Borrow a live service.
    ///
    /// # Safety
    ///
    /// `handle` must be null or a live handle from `depscan_service_create`.
    pub(crate) unsafe fn from_handle<'a>(handle: DepscanServiceHandle) -> Option<&'a Self> {
        // SAFETY: guaranteed by the caller.
        unsafe { handle.as_ref() }
    }
}

impl DepscanWorker {
    pub(crate) fn into_handle(self) -> DepscanWorkerHandle {
        Box::into_raw(Box::new(self))
    }

    /// # Safety
    ///
    /// `handle` must be null or a live handle from `depscan_worker_create`.
    pub(crate) unsafe fn from_handle<'a>(handle: DepscanWorkerHandle) -> Option<&'a Self> {
        // SAFETY: guaranteed by the caller.
        unsafe { handle.as_ref() }
    }
}
