//! Process-wide engine registry.
//!
//! The scanning engine is supplied by the embedding host. Services created
//! through the C ABI capture whatever engine is installed when they are
//! created.

use std::sync::Arc;

use depscan_core::{ScanEngine, UnavailableEngine};
use once_cell::sync::OnceCell;

static ENGINE: OnceCell<Arc<dyn ScanEngine>> = OnceCell::new();

/// Install the engine used by every service created afterwards.
///
/// Returns `false` if an engine was already installed; the first one stays.
pub fn install_engine(engine: Arc<dyn ScanEngine>) -> bool {
    let installed = ENGINE.set(engine).is_ok();
    if installed {
        tracing::debug!("dependency scanning engine installed");
    } else {
        tracing::warn!("dependency scanning engine already installed; ignoring replacement");
    }
    installed
}

/// The installed engine, or one that fails every scan.
pub fn installed_engine() -> Arc<dyn ScanEngine> {
    match ENGINE.get() {
        Some(engine) => Arc::clone(engine),
        None => Arc::new(UnavailableEngine),
    }
}

pub fn is_engine_installed() -> bool {
    ENGINE.get().is_some()
}
