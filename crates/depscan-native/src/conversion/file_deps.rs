//! Translation unit dependencies to the two public result generations.

use std::ptr;

use depscan_core::FullDependencies;

use crate::string::{DepscanString, DepscanStringSet};
use crate::types::{
    DepscanFileDependencies, DepscanFileDependenciesV4, DepscanTranslationUnitCommand,
};

/// Build the legacy single-command result.
pub fn file_dependencies_to_c(deps: &FullDependencies) -> *mut DepscanFileDependencies {
    Box::into_raw(Box::new(DepscanFileDependencies {
        context_hash: DepscanString::dup(&deps.context_hash),
        file_deps: DepscanStringSet::create(&deps.file_deps),
        module_deps: DepscanStringSet::create(&deps.module_dep_strings()),
        build_arguments: DepscanStringSet::create(&deps.driver_command_line),
    }))
}

/// Build the multi-command result.
///
/// Dependencies are scan-wide: every command gets its own copy of the
/// context hash and both dependency sets.
///
/// # Panics
///
/// Panics if `deps` carries a flattened driver command line.
pub fn file_dependencies_v4_to_c(deps: &FullDependencies) -> *mut DepscanFileDependenciesV4 {
    assert!(
        deps.driver_command_line.is_empty(),
        "multi-command result requested for a flattened driver command line"
    );

    let module_deps = deps.module_dep_strings();
    let commands: Box<[DepscanTranslationUnitCommand]> = deps
        .commands
        .iter()
        .map(|command| DepscanTranslationUnitCommand {
            context_hash: DepscanString::dup(&deps.context_hash),
            file_deps: DepscanStringSet::create(&deps.file_deps),
            module_deps: DepscanStringSet::create(&module_deps),
            executable: DepscanString::dup(&command.executable),
            build_arguments: DepscanStringSet::create(&command.arguments),
            reserved: [0; 4],
        })
        .collect();

    let num_commands = commands.len();
    Box::into_raw(Box::new(DepscanFileDependenciesV4 {
        num_commands,
        commands: Box::into_raw(commands) as *mut DepscanTranslationUnitCommand,
    }))
}

/// # Safety
///
/// `deps` must be null or a live result from [`file_dependencies_to_c`].
pub unsafe fn dispose_file_dependencies(deps: *mut DepscanFileDependencies) {
    if deps.is_null() {
        return;
    }
    // SAFETY: allocated by `file_dependencies_to_c`.
    let deps = unsafe { Box::from_raw(deps) };
    // SAFETY: each handle is owned by the result and freed once.
    unsafe {
        deps.context_hash.dispose();
        DepscanStringSet::dispose(deps.file_deps);
        DepscanStringSet::dispose(deps.module_deps);
        DepscanStringSet::dispose(deps.build_arguments);
    }
}

/// # Safety
///
/// `deps` must be null or a live result from [`file_dependencies_v4_to_c`].
pub unsafe fn dispose_file_dependencies_v4(deps: *mut DepscanFileDependenciesV4) {
    if deps.is_null() {
        return;
    }
    // SAFETY: allocated by `file_dependencies_v4_to_c`.
    let deps = unsafe { Box::from_raw(deps) };
    let slice = ptr::slice_from_raw_parts_mut(deps.commands, deps.num_commands);
    // SAFETY: the array was a boxed slice of exactly `num_commands` entries.
    let commands = unsafe { Box::from_raw(slice) };
    for command in commands.into_vec() {
        // SAFETY: each handle is owned by its command and freed once.
        unsafe {
            command.context_hash.dispose();
            DepscanStringSet::dispose(command.file_deps);
            DepscanStringSet::dispose(command.module_deps);
            command.executable.dispose();
            DepscanStringSet::dispose(command.build_arguments);
        }
    }
}
