//! Contract with the dependency scanning engine.
//!
//! The engine itself lives outside this crate. It is handed a working
//! directory and a command line, discovers what the compilation depends on,
//! and streams what it finds into a [`DependencyConsumer`]. Platform hosts
//! implement [`ScanEngine`] to plug a concrete scanner in.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::deps::{Command, ModuleDeps, PrebuiltModuleDep};
use crate::fs::FileSystem;
use crate::module_id::{ModuleId, ModuleOutputKind};

/// How the engine reads sources while scanning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanningMode {
    /// Run the full preprocessor.
    CanonicalPreprocessing,
    /// Scan only the directives that affect dependencies.
    #[default]
    DependencyDirectivesScan,
}

/// Shape of the result the engine is asked to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Make-style flat dependency list. Not served by the full-dependency queries.
    Make,
    /// Structured result with module graph and build commands.
    #[default]
    Full,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Make => f.write_str("make"),
            OutputFormat::Full => f.write_str("full"),
        }
    }
}

/// Errors reported by the scanning engine.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The command line could not be interpreted as a compilation.
    #[error("invalid command line: {0}")]
    InvalidCommandLine(String),

    /// A file the compilation needs does not exist.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// The file system failed underneath the engine.
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine hit an internal fault.
    #[error("dependency scan failed: {0}")]
    Internal(String),

    /// No engine was supplied by the host.
    #[error("no dependency scanning engine installed")]
    EngineUnavailable,
}

/// Receives engine events for one scan.
///
/// Events may arrive in any order. `lookup_module_output` may be called at
/// any point while the engine assembles module command lines.
pub trait DependencyConsumer {
    /// A file the translation unit reads.
    fn handle_file_dependency(&mut self, file: &str);

    /// A prebuilt module consumed without rebuilding.
    fn handle_prebuilt_module_dependency(&mut self, dep: PrebuiltModuleDep);

    /// A module the compilation needs built. May repeat for the same module.
    fn handle_module_dependency(&mut self, deps: ModuleDeps);

    /// A module the main file imports directly.
    fn handle_direct_module_dependency(&mut self, id: ModuleId);

    /// Context hash of the translation unit.
    fn handle_context_hash(&mut self, hash: String);

    /// One driver invocation needed to realize the translation unit.
    fn handle_build_command(&mut self, command: Command);

    /// Resolve where an output of `id` should be written.
    fn lookup_module_output(&mut self, id: &ModuleId, kind: ModuleOutputKind) -> String;
}

/// A dependency scanning engine.
///
/// Implementations must be shareable across workers; per-scan state belongs
/// in the consumer, not the engine.
pub trait ScanEngine: Send + Sync + fmt::Debug {
    /// Scan one compilation and stream its dependencies into `consumer`.
    ///
    /// When `module_name` is set the engine scans that module by name
    /// instead of the translation unit in `command_line`.
    fn compute_dependencies(
        &self,
        fs: &dyn FileSystem,
        working_directory: &str,
        command_line: &[String],
        consumer: &mut dyn DependencyConsumer,
        module_name: Option<&str>,
    ) -> Result<(), ScanError>;
}

/// Engine used when the host never supplied one. Every scan fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEngine;

impl ScanEngine for UnavailableEngine {
    fn compute_dependencies(
        &self,
        _fs: &dyn FileSystem,
        _working_directory: &str,
        _command_line: &[String],
        _consumer: &mut dyn DependencyConsumer,
        _module_name: Option<&str>,
    ) -> Result<(), ScanError> {
        Err(ScanError::EngineUnavailable)
    }
}
