//! # depscan-core
//!
//! Language-native side of the depscan dependency bridge.
//!
//! This crate owns everything that happens between "a caller handed us a
//! compilation command line" and "here is the dependency result, in Rust
//! types". The C ABI lives in `depscan-native`; nothing in here knows about
//! raw pointers or foreign string ownership.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   DependencyScanningService  │  mode + output format (read-only, shared)
//! └──────────────┬───────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────┐      ┌───────────────────────┐
//! │   DependencyScanningWorker   │─────▶│  ScanEngine (external)│
//! │   (file system, seen-set)    │      └───────────┬───────────┘
//! └──────────────┬───────────────┘                  │ events
//!                │                                  ▼
//!                │                     ┌────────────────────────┐
//!                │                     │ FullDependencyConsumer │
//!                │                     │  (dedup, extraction)   │
//!                │                     └───────────┬────────────┘
//!                │                                 │ lookups
//!                ▼                                 ▼
//!      FullDependenciesResult          ┌────────────────────────┐
//!                                      │      OutputLookup      │
//!                                      │ (cached module files)  │
//!                                      └────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use depscan_core::{
//!     CommandShape, DependencyScanningService, DependencyScanningWorker, OutputFormat,
//!     ServiceConfig,
//! };
//!
//! let config = ServiceConfig::default().with_output_format(OutputFormat::Full);
//! let service = DependencyScanningService::new(config, my_engine);
//! let worker = DependencyScanningWorker::with_physical_fs(&service);
//!
//! let argv = vec!["clang".to_string(), "-c".to_string(), "a.cpp".to_string()];
//! let result = worker.get_full_dependencies(
//!     &argv,
//!     "/proj",
//!     None,
//!     &mut my_lookup,
//!     CommandShape::MultiCommand,
//! )?;
//! ```

pub mod config;
pub mod consumer;
pub mod deps;
pub mod engine;
pub mod fs;
pub mod lookup;
pub mod module_id;
pub mod service;
pub mod worker;

#[cfg(feature = "logging")]
pub mod logging;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{CasOptions, ServiceConfig};
pub use consumer::{FullDependencyConsumer, SeenModules};
pub use deps::{
    Command, FullDependencies, FullDependenciesResult, ModuleDeps, PrebuiltModuleDep,
};
pub use engine::{
    DependencyConsumer, OutputFormat, ScanEngine, ScanError, ScanningMode, UnavailableEngine,
};
pub use fs::{FileSystem, PhysicalFileSystem};
pub use lookup::{
    INITIAL_LOOKUP_CAPACITY, ModuleOutputCallback, OutputLookup, lookup_module_output,
};
pub use module_id::{ModuleId, ModuleOutputKind};
pub use service::DependencyScanningService;
pub use worker::{CommandShape, DependencyScanningWorker};

#[cfg(feature = "logging")]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

/// Error types for depscan operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A query was issued without a worker.
    #[error("missing dependency scanner worker")]
    MissingWorker,

    /// The command line was absent or too short to describe a compilation.
    #[error("invalid argc or argv")]
    InvalidArguments,

    /// The worker's output format cannot serve this query.
    #[error("unsupported dependency mode for this API")]
    UnsupportedMode,

    /// The scanning engine reported a failure.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The output lookup callback answered with bytes that are not UTF-8.
    #[error("output path for module {module} ({kind}) is not valid UTF-8: {path}")]
    NonUtf8OutputPath {
        module: ModuleId,
        kind: ModuleOutputKind,
        /// Lossy rendering, for the message only.
        path: String,
    },

    /// A caller-supplied string is not UTF-8.
    #[error("{0} is not valid UTF-8")]
    NonUtf8Input(&'static str),

    /// Configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for depscan operations.
pub type Result<T> = std::result::Result<T, Error>;
