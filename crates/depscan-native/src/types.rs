//! `#[repr(C)]` structures and callback signatures of the public ABI.
//!
//! Layouts here are mirrored by `include/depscan.h` and must not change
//! without bumping the entry point generation.

use std::ffi::{c_char, c_int, c_void};

use depscan_core::{ModuleOutputKind, OutputFormat};

use crate::string::{DepscanString, DepscanStringSet};

/// Output format a service is created with.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepscanDependencyMode {
    /// Make-style flat list. Not served by the file dependency queries.
    Flat = 0,
    /// Full module graph and build commands.
    Full = 1,
}

impl From<DepscanDependencyMode> for OutputFormat {
    fn from(mode: DepscanDependencyMode) -> Self {
        match mode {
            DepscanDependencyMode::Flat => OutputFormat::Make,
            DepscanDependencyMode::Full => OutputFormat::Full,
        }
    }
}

/// Kind of module output the lookup callback is asked to place.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepscanOutputKind {
    ModuleFile = 0,
    Dependencies = 1,
    DependenciesTarget = 2,
    SerializedDiagnostics = 3,
}

impl From<ModuleOutputKind> for DepscanOutputKind {
    fn from(kind: ModuleOutputKind) -> Self {
        match kind {
            ModuleOutputKind::ModuleFile => DepscanOutputKind::ModuleFile,
            ModuleOutputKind::DependencyFile => DepscanOutputKind::Dependencies,
            ModuleOutputKind::DependencyTargets => DepscanOutputKind::DependenciesTarget,
            ModuleOutputKind::DiagnosticSerializationFile => {
                DepscanOutputKind::SerializedDiagnostics
            }
        }
    }
}

/// One discovered module.
#[repr(C)]
#[derive(Debug)]
pub struct DepscanModuleDependency {
    pub name: DepscanString,
    pub context_hash: DepscanString,
    pub module_map_path: DepscanString,
    pub file_deps: *mut DepscanStringSet,
    /// Each entry is `"name:context-hash"`.
    pub module_deps: *mut DepscanStringSet,
    pub build_arguments: *mut DepscanStringSet,
}

#[repr(C)]
#[derive(Debug)]
pub struct DepscanModuleDependencySet {
    pub count: c_int,
    pub modules: *mut DepscanModuleDependency,
}

/// Legacy result: one flattened driver command line per translation unit.
#[repr(C)]
#[derive(Debug)]
pub struct DepscanFileDependencies {
    pub context_hash: DepscanString,
    pub file_deps: *mut DepscanStringSet,
    pub module_deps: *mut DepscanStringSet,
    pub build_arguments: *mut DepscanStringSet,
}

/// One driver invocation of a translation unit.
#[repr(C)]
#[derive(Debug)]
pub struct DepscanTranslationUnitCommand {
    pub context_hash: DepscanString,
    pub file_deps: *mut DepscanStringSet,
    pub module_deps: *mut DepscanStringSet,
    pub executable: DepscanString,
    pub build_arguments: *mut DepscanStringSet,
    /// Always zero.
    pub reserved: [usize; 4],
}

#[repr(C)]
#[derive(Debug)]
pub struct DepscanFileDependenciesV4 {
    pub num_commands: usize,
    pub commands: *mut DepscanTranslationUnitCommand,
}

/// Receives the modules discovered by one query. The receiver owns `set`
/// and releases it with `depscan_module_dependency_set_dispose`.
pub type ModuleDiscoveredCallback =
    Option<unsafe extern "C" fn(context: *mut c_void, set: *mut DepscanModuleDependencySet)>;

/// Writes the output path for a module into `output` (at most `max_len`
/// bytes, no terminator required) and returns the full path length.
pub type LookupModuleOutputCallback = Option<
    unsafe extern "C" fn(
        context: *mut c_void,
        module_name: *const c_char,
        context_hash: *const c_char,
        kind: DepscanOutputKind,
        output: *mut c_char,
        max_len: usize,
    ) -> usize,
>;
