//! `extern "C"` entry points.

mod dependencies;
mod dispose;
mod functions;
mod service;
mod worker;

pub use dependencies::{
    depscan_worker_get_file_dependencies_v3, depscan_worker_get_file_dependencies_v4,
};
pub use dispose::{
    depscan_file_dependencies_dispose, depscan_file_dependencies_v4_dispose,
    depscan_module_dependency_set_dispose,
};
pub use functions::{depscan_init_logging, depscan_init_logging_from_env, depscan_version};
pub use service::{depscan_service_create, depscan_service_dispose};
pub use worker::{depscan_worker_create, depscan_worker_dispose};
