use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a discovered module.
///
/// Two modules with the same name but different context hashes are distinct:
/// the hash encodes the build configuration (flags, dependencies) the module
/// was discovered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId {
    /// Module name as spelled in the module map (e.g. `std.core`).
    pub module_name: String,
    /// Hash of the compilation context the module was built under.
    pub context_hash: String,
}

impl ModuleId {
    pub fn new(module_name: impl Into<String>, context_hash: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            context_hash: context_hash.into(),
        }
    }
}

/// Renders as `name:contexthash`, the form module dependencies take on the wire.
impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module_name, self.context_hash)
    }
}

/// Kind of build artifact whose path is being resolved for a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleOutputKind {
    /// The compiled module file (PCM).
    ModuleFile,
    /// Make-style dependency file.
    DependencyFile,
    /// Target name(s) written into the dependency file.
    DependencyTargets,
    /// Serialized diagnostics file.
    DiagnosticSerializationFile,
}

impl ModuleOutputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleOutputKind::ModuleFile => "module-file",
            ModuleOutputKind::DependencyFile => "dependency-file",
            ModuleOutputKind::DependencyTargets => "dependency-targets",
            ModuleOutputKind::DiagnosticSerializationFile => "serialized-diagnostics",
        }
    }
}

impl fmt::Display for ModuleOutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
