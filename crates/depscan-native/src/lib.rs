//! C ABI for the depscan dependency scanner bridge.
//!
//! Hosts install a [`ScanEngine`](depscan_core::ScanEngine) with
//! [`install_engine`], then drive scans through the `depscan_*` functions
//! declared in `include/depscan.h`:
//!
//! 1. `depscan_service_create` / `depscan_worker_create`
//! 2. `depscan_worker_get_file_dependencies_v3` or `_v4` per compilation
//! 3. the matching `*_dispose` for every returned structure, then the
//!    worker, then the service
//!
//! Every string and array returned by this library is owned by the caller
//! and is never aliased between two returned structures.

pub mod api;
pub mod conversion;
pub mod engine;
pub mod error;
pub mod handles;
mod lookup;
pub mod string;
pub mod types;

pub use api::*;
pub use engine::{install_engine, installed_engine, is_engine_installed};
pub use handles::{DepscanService, DepscanServiceHandle, DepscanWorker, DepscanWorkerHandle};
pub use string::{
    DepscanString, DepscanStringSet, depscan_string_dispose, depscan_string_get_cstr,
    depscan_string_set_dispose,
};
pub use types::{
    DepscanDependencyMode, DepscanFileDependencies, DepscanFileDependenciesV4,
    DepscanModuleDependency, DepscanModuleDependencySet, DepscanOutputKind,
    DepscanTranslationUnitCommand, LookupModuleOutputCallback, ModuleDiscoveredCallback,
};
