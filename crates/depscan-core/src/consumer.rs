//! Collects engine events for one scan and extracts the dependency result.
//!
//! The consumer deduplicates discovered modules against a [`SeenModules`]
//! set that outlives the scan: a module reported once is never reported
//! again through the same set, although dependents keep referencing it by
//! id.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;

use crate::deps::{
    Command, FullDependencies, FullDependenciesResult, ModuleDeps, PrebuiltModuleDep,
};
use crate::engine::DependencyConsumer;
use crate::lookup::OutputLookup;
use crate::module_id::{ModuleId, ModuleOutputKind};
use crate::Result;

/// Modules already handed to the caller as discovered.
#[derive(Debug, Default, Clone)]
pub struct SeenModules {
    ids: FxHashSet<ModuleId>,
}

impl SeenModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.ids.contains(id)
    }

    /// Record `id`. Returns `false` if it was already present.
    pub fn insert(&mut self, id: ModuleId) -> bool {
        self.ids.insert(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Dependency consumer that produces a [`FullDependenciesResult`].
pub struct FullDependencyConsumer<'a> {
    already_seen: &'a mut SeenModules,
    lookup: OutputLookup<'a>,
    file_deps: IndexSet<String>,
    prebuilt_module_deps: Vec<PrebuiltModuleDep>,
    module_deps: IndexMap<ModuleId, ModuleDeps>,
    direct_module_deps: IndexSet<ModuleId>,
    context_hash: String,
    commands: Vec<Command>,
}

impl<'a> FullDependencyConsumer<'a> {
    pub fn new(already_seen: &'a mut SeenModules, lookup: OutputLookup<'a>) -> Self {
        Self {
            already_seen,
            lookup,
            file_deps: IndexSet::new(),
            prebuilt_module_deps: Vec::new(),
            module_deps: IndexMap::new(),
            direct_module_deps: IndexSet::new(),
            context_hash: String::new(),
            commands: Vec::new(),
        }
    }

    /// Extract the multi-command shape: every driver command the engine
    /// produced, no flattened command line.
    ///
    /// Fails if any output lookup during the scan failed; nothing is marked
    /// as seen in that case.
    pub fn take_full_dependencies(mut self) -> Result<FullDependenciesResult> {
        self.check_lookups()?;
        let module_deps = self.direct_module_ids();
        let discovered_modules = self.take_discovered();

        Ok(FullDependenciesResult {
            full_deps: FullDependencies {
                context_hash: self.context_hash,
                file_deps: self.file_deps.into_iter().collect(),
                module_deps,
                prebuilt_module_deps: self.prebuilt_module_deps,
                driver_command_line: Vec::new(),
                commands: self.commands,
            },
            discovered_modules,
        })
    }

    /// Extract the legacy shape: one flattened driver command line.
    ///
    /// # Panics
    ///
    /// Panics if the engine produced more than one driver command. Such a
    /// result cannot be represented in the legacy shape.
    pub fn full_dependencies_legacy_driver_command(
        mut self,
        original_command_line: &[String],
    ) -> Result<FullDependenciesResult> {
        assert!(
            self.commands.len() <= 1,
            "legacy driver command requested but the scan produced {} driver commands",
            self.commands.len()
        );

        let module_deps = self.direct_module_ids();
        let driver_command_line = match self.commands.pop() {
            Some(command) => command.arguments,
            None => self.synthesize_driver_command_line(original_command_line, &module_deps),
        };
        self.check_lookups()?;
        let discovered_modules = self.take_discovered();

        Ok(FullDependenciesResult {
            full_deps: FullDependencies {
                context_hash: self.context_hash,
                file_deps: self.file_deps.into_iter().collect(),
                module_deps,
                prebuilt_module_deps: self.prebuilt_module_deps,
                driver_command_line,
                commands: Vec::new(),
            },
            discovered_modules,
        })
    }

    /// Original arguments without the executable, plus explicit module flags.
    fn synthesize_driver_command_line(
        &mut self,
        original_command_line: &[String],
        direct: &[ModuleId],
    ) -> Vec<String> {
        let mut args: Vec<String> = original_command_line.iter().skip(1).cloned().collect();
        args.push("-fno-implicit-modules".to_string());
        args.push("-fno-implicit-module-maps".to_string());
        for prebuilt in &self.prebuilt_module_deps {
            args.push(format!("-fmodule-file={}", prebuilt.pcm_file));
        }
        for id in direct {
            let pcm = self.lookup.lookup_module_output(id, ModuleOutputKind::ModuleFile);
            args.push(format!("-fmodule-file={pcm}"));
            let map = self.module_deps.get(id).map(|deps| deps.module_map_file.as_str());
            if let Some(map) = map.filter(|m| !m.is_empty()) {
                args.push(format!("-fmodule-map-file={map}"));
            }
        }
        args
    }

    fn check_lookups(&mut self) -> Result<()> {
        match self.lookup.take_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Explicit direct dependencies plus modules the main file imports.
    fn direct_module_ids(&self) -> Vec<ModuleId> {
        let mut direct = self.direct_module_deps.clone();
        direct.extend(
            self.module_deps
                .values()
                .filter(|deps| deps.imported_by_main_file)
                .map(|deps| deps.id.clone()),
        );
        direct.into_iter().collect()
    }

    /// Modules reported for the first time, now marked as seen.
    fn take_discovered(&mut self) -> Vec<ModuleDeps> {
        let mut discovered = Vec::new();
        for (id, deps) in std::mem::take(&mut self.module_deps) {
            if self.already_seen.insert(id) {
                discovered.push(deps);
            }
        }

        tracing::debug!(
            discovered = discovered.len(),
            seen = self.already_seen.len(),
            "extracted module dependencies"
        );
        discovered
    }
}

impl DependencyConsumer for FullDependencyConsumer<'_> {
    fn handle_file_dependency(&mut self, file: &str) {
        self.file_deps.insert(file.to_string());
    }

    fn handle_prebuilt_module_dependency(&mut self, dep: PrebuiltModuleDep) {
        self.prebuilt_module_deps.push(dep);
    }

    fn handle_module_dependency(&mut self, deps: ModuleDeps) {
        self.module_deps.insert(deps.id.clone(), deps);
    }

    fn handle_direct_module_dependency(&mut self, id: ModuleId) {
        self.direct_module_deps.insert(id);
    }

    fn handle_context_hash(&mut self, hash: String) {
        self.context_hash = hash;
    }

    fn handle_build_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    fn lookup_module_output(&mut self, id: &ModuleId, kind: ModuleOutputKind) -> String {
        self.lookup.lookup_module_output(id, kind)
    }
}
