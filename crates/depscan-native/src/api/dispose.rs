use crate::conversion::{
    dispose_file_dependencies, dispose_file_dependencies_v4, dispose_module_dependency_set,
};
use crate::types::{
    DepscanFileDependencies, DepscanFileDependenciesV4, DepscanModuleDependencySet,
};

/// Release a set handed to the module-discovered callback.
///
/// # Safety
///
/// `set` must be null or a live set; it is dangling afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn depscan_module_dependency_set_dispose(
    set: *mut DepscanModuleDependencySet,
) {
    // SAFETY: forwarded from the caller.
    unsafe { dispose_module_dependency_set(set) }
}

/// # Safety
///
/// `deps` must be null or a live result of
/// `depscan_worker_get_file_dependencies_v3`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn depscan_file_dependencies_dispose(deps: *mut DepscanFileDependencies) {
    // SAFETY: forwarded from the caller.
    unsafe { dispose_file_dependencies(deps) }
}

/// # Safety
///
/// `deps` must be null or a live result of
/// `depscan_worker_get_file_dependencies_v4`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn depscan_file_dependencies_v4_dispose(
    deps: *mut DepscanFileDependenciesV4,
) {
    // SAFETY: forwarded from the caller.
    unsafe { dispose_file_dependencies_v4(deps) }
}
