//! Translation from core results to the public structures, and the matching
//! release routines.

pub mod file_deps;
pub mod module_set;

pub use file_deps::{
    dispose_file_dependencies, dispose_file_dependencies_v4, file_dependencies_to_c,
    file_dependencies_v4_to_c,
};
pub use module_set::{dispose_module_dependency_set, module_set_to_c};
