//! Scripted engine for tests.
//!
//! `ScriptedEngine` plays back engine events registered per input file (the
//! last command-line argument) or per module name. Inputs without a script
//! report the resolved input file as their only dependency.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::deps::{Command, ModuleDeps, PrebuiltModuleDep};
use crate::engine::{DependencyConsumer, ScanEngine, ScanError};
use crate::fs::FileSystem;
use crate::module_id::{ModuleId, ModuleOutputKind};

/// Events the engine reports for one scripted input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedScan {
    pub context_hash: String,
    pub file_deps: Vec<String>,
    pub modules: Vec<ModuleDeps>,
    pub direct_modules: Vec<ModuleId>,
    pub prebuilt: Vec<PrebuiltModuleDep>,
    pub commands: Vec<Command>,
    /// Ask the consumer for module output paths while building module
    /// command lines, the way a real engine does.
    pub resolve_outputs: bool,
    /// Fail the scan with this message.
    pub error: Option<String>,
}

impl ScriptedScan {
    pub fn new(context_hash: impl Into<String>) -> Self {
        Self {
            context_hash: context_hash.into(),
            ..Default::default()
        }
    }

    pub fn file(mut self, path: impl Into<String>) -> Self {
        self.file_deps.push(path.into());
        self
    }

    pub fn module(mut self, deps: ModuleDeps) -> Self {
        self.modules.push(deps);
        self
    }

    pub fn command(mut self, executable: &str, args: &[&str]) -> Self {
        self.commands.push(Command::new(
            executable,
            args.iter().map(|a| a.to_string()).collect(),
        ));
        self
    }

    pub fn resolving_outputs(mut self) -> Self {
        self.resolve_outputs = true;
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

/// Build a module that the main file imports directly.
pub fn direct_module(name: &str, hash: &str) -> ModuleDeps {
    let mut deps = ModuleDeps::new(ModuleId::new(name, hash));
    deps.module_map_file = format!("/proj/{name}/module.modulemap");
    deps.file_deps = vec![
        deps.module_map_file.clone(),
        format!("/proj/{name}/{name}.h"),
    ];
    deps.imported_by_main_file = true;
    deps.build_arguments = vec![
        "-cc1".to_string(),
        "-emit-module".to_string(),
        format!("-fmodule-name={name}"),
    ];
    deps
}

#[derive(Debug, Default)]
pub struct ScriptedEngine {
    scans: Mutex<FxHashMap<String, ScriptedScan>>,
    calls: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register events for the input file `input`.
    pub fn with_scan(self, input: &str, scan: ScriptedScan) -> Self {
        self.scans.lock().insert(input.to_string(), scan);
        self
    }

    /// Register events for a by-name module scan.
    pub fn with_module_scan(self, module_name: &str, scan: ScriptedScan) -> Self {
        self.scans.lock().insert(format!("module:{module_name}"), scan);
        self
    }

    /// Number of scans run so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ScanEngine for ScriptedEngine {
    fn compute_dependencies(
        &self,
        fs: &dyn FileSystem,
        working_directory: &str,
        command_line: &[String],
        consumer: &mut dyn DependencyConsumer,
        module_name: Option<&str>,
    ) -> Result<(), ScanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let key = match module_name {
            Some(name) => format!("module:{name}"),
            None => command_line
                .last()
                .cloned()
                .ok_or_else(|| ScanError::InvalidCommandLine("empty command line".into()))?,
        };

        let scan = match self.scans.lock().get(&key).cloned() {
            Some(scan) => scan,
            None => {
                let resolved = fs.resolve(Path::new(working_directory), Path::new(&key));
                ScriptedScan::new("default").file(resolved.to_string_lossy())
            }
        };

        if let Some(message) = scan.error {
            return Err(ScanError::Internal(message));
        }

        consumer.handle_context_hash(scan.context_hash);
        for file in &scan.file_deps {
            consumer.handle_file_dependency(file);
        }
        for prebuilt in scan.prebuilt {
            consumer.handle_prebuilt_module_dependency(prebuilt);
        }
        for mut module in scan.modules {
            if scan.resolve_outputs {
                let pcm = consumer.lookup_module_output(&module.id, ModuleOutputKind::ModuleFile);
                module.build_arguments.push("-o".to_string());
                module.build_arguments.push(pcm);
                for dep in &module.module_deps {
                    let dep_pcm = consumer.lookup_module_output(dep, ModuleOutputKind::ModuleFile);
                    module
                        .build_arguments
                        .push(format!("-fmodule-file={}={}", dep.module_name, dep_pcm));
                }
                let depfile =
                    consumer.lookup_module_output(&module.id, ModuleOutputKind::DependencyFile);
                module.build_arguments.push("-dependency-file".to_string());
                module.build_arguments.push(depfile);
            }
            consumer.handle_module_dependency(module);
        }
        for id in scan.direct_modules {
            consumer.handle_direct_module_dependency(id);
        }
        for command in scan.commands {
            consumer.handle_build_command(command);
        }
        Ok(())
    }
}
