//! Dependency result model.
//!
//! These are the language-native shapes a scan produces. They are plain owned
//! data; the native crate copies out of them into the foreign structures.

use serde::{Deserialize, Serialize};

use crate::module_id::ModuleId;

/// A module that was already built ahead of time and is consumed as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrebuiltModuleDep {
    pub module_name: String,
    pub pcm_file: String,
    pub module_map_file: String,
}

/// Everything needed to build one discovered module standalone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeps {
    pub id: ModuleId,
    /// Module map that defines this module. Empty when unknown.
    pub module_map_file: String,
    /// Files the module's build reads.
    pub file_deps: Vec<String>,
    /// Other discovered modules this module imports.
    pub module_deps: Vec<ModuleId>,
    /// Prebuilt modules this module's build consumes.
    pub prebuilt_module_deps: Vec<PrebuiltModuleDep>,
    /// Whether the scanned translation unit imports this module directly.
    pub imported_by_main_file: bool,
    /// Arguments to rebuild the module, as produced by the engine.
    pub build_arguments: Vec<String>,
}

impl ModuleDeps {
    pub fn new(id: ModuleId) -> Self {
        Self {
            id,
            module_map_file: String::new(),
            file_deps: Vec::new(),
            module_deps: Vec::new(),
            prebuilt_module_deps: Vec::new(),
            imported_by_main_file: false,
            build_arguments: Vec::new(),
        }
    }

    /// Command line to build this module with no implicit module lookups.
    pub fn canonical_command_line(&self) -> Vec<String> {
        self.build_arguments.clone()
    }
}

/// One full invocation of the compiler tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub executable: String,
    pub arguments: Vec<String>,
}

impl Command {
    pub fn new(executable: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            arguments,
        }
    }
}

/// Dependencies of the translation unit under scan.
///
/// Exactly one of `driver_command_line` (legacy flattened form) and
/// `commands` (one entry per driver invocation) is meaningful, depending on
/// how the result was extracted from the consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullDependencies {
    /// Context hash of the translation unit itself.
    pub context_hash: String,
    /// Files the translation unit reads.
    pub file_deps: Vec<String>,
    /// Modules the translation unit imports directly.
    pub module_deps: Vec<ModuleId>,
    pub prebuilt_module_deps: Vec<PrebuiltModuleDep>,
    /// Single flattened command line (legacy extraction only).
    pub driver_command_line: Vec<String>,
    /// Driver commands (multi-command extraction only).
    pub commands: Vec<Command>,
}

impl FullDependencies {
    /// Module dependencies rendered as `name:contexthash`.
    pub fn module_dep_strings(&self) -> Vec<String> {
        self.module_deps.iter().map(ToString::to_string).collect()
    }
}

/// Outcome of one scan: the translation unit's dependencies plus every module
/// that was discovered for the first time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullDependenciesResult {
    pub full_deps: FullDependencies,
    pub discovered_modules: Vec<ModuleDeps>,
}

impl FullDependenciesResult {
    /// JSON rendering used for trace logging and debugging tools.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| "{\"error\":\"failed to serialize dependencies\"}".to_string())
    }
}
