//! Discovered modules to [`DepscanModuleDependencySet`].

use std::ffi::c_int;
use std::ptr;

use depscan_core::ModuleDeps;

use crate::string::{DepscanString, DepscanStringSet};
use crate::types::{DepscanModuleDependency, DepscanModuleDependencySet};

fn module_dependency_to_c(deps: &ModuleDeps) -> DepscanModuleDependency {
    let module_deps: Vec<String> = deps.module_deps.iter().map(|id| id.to_string()).collect();
    DepscanModuleDependency {
        name: DepscanString::dup(&deps.id.module_name),
        context_hash: DepscanString::dup(&deps.id.context_hash),
        module_map_path: DepscanString::dup(&deps.module_map_file),
        file_deps: DepscanStringSet::create(&deps.file_deps),
        module_deps: DepscanStringSet::create(&module_deps),
        build_arguments: DepscanStringSet::create(&deps.canonical_command_line()),
    }
}

/// Allocate a set holding exactly `modules`.
pub fn module_set_to_c(modules: &[ModuleDeps]) -> *mut DepscanModuleDependencySet {
    let entries: Box<[DepscanModuleDependency]> =
        modules.iter().map(module_dependency_to_c).collect();
    let count = entries.len() as c_int;
    Box::into_raw(Box::new(DepscanModuleDependencySet {
        count,
        modules: Box::into_raw(entries) as *mut DepscanModuleDependency,
    }))
}

/// Free every module entry, then the array and the set.
///
/// # Safety
///
/// `set` must be null or a live set from [`module_set_to_c`].
pub unsafe fn dispose_module_dependency_set(set: *mut DepscanModuleDependencySet) {
    if set.is_null() {
        return;
    }
    // SAFETY: allocated by `module_set_to_c`.
    let set = unsafe { Box::from_raw(set) };
    let slice = ptr::slice_from_raw_parts_mut(set.modules, set.count as usize);
    // SAFETY: the array was a boxed slice of exactly `count` entries.
    let modules = unsafe { Box::from_raw(slice) };
    for module in modules.into_vec() {
        // SAFETY: every handle in the entry is owned by it and freed once.
        unsafe {
            module.name.dispose();
            module.context_hash.dispose();
            module.module_map_path.dispose();
            DepscanStringSet::dispose(module.file_deps);
            DepscanStringSet::dispose(module.module_deps);
            DepscanStringSet::dispose(module.build_arguments);
        }
    }
}
