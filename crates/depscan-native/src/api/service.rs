use depscan_core::{DependencyScanningService, LogLevel, ScanningMode, ServiceConfig};

use crate::engine::installed_engine;
use crate::handles::{DepscanService, DepscanServiceHandle};
use crate::types::DepscanDependencyMode;

/// Parse the configured `log_level`. Unknown names are ignored with a warning.
fn configured_log_level(config: &ServiceConfig) -> Option<LogLevel> {
    let name = config.log_level.as_deref()?;
    match name.parse::<LogLevel>() {
        Ok(level) => Some(level),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring configured log level");
            None
        }
    }
}

/// Create a scanning service with the given output format.
///
/// Configuration from `DEPSCAN_CONFIG` and `DEPSCAN_*` variables is applied
/// first; `format` and directive scanning always take precedence. A
/// configured `log_level` installs stderr logging unless logging was already
/// initialized.
#[unsafe(no_mangle)]
pub extern "C" fn depscan_service_create(format: DepscanDependencyMode) -> DepscanServiceHandle {
    let config = ServiceConfig::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring invalid depscan configuration");
        ServiceConfig::default()
    });
    if let Some(level) = configured_log_level(&config) {
        depscan_core::init_logging(level);
    }
    let config = config
        .with_output_format(format.into())
        .with_scanning_mode(ScanningMode::DependencyDirectivesScan);

    DepscanService {
        inner: DependencyScanningService::new(config, installed_engine()),
    }
    .into_handle()
}

/// Dispose a service. Every worker created from it must be disposed first.
///
/// # Safety
///
/// `service` must be null or a live handle; it is dangling afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn depscan_service_dispose(service: DepscanServiceHandle) {
    if service.is_null() {
        return;
    }
    // SAFETY: created by `depscan_service_create` via `Box::into_raw`.
    drop(unsafe { Box::from_raw(service) });
}
