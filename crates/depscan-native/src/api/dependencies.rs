//! The file dependency queries.
//!
//! Both generations share one scan path and differ only in how the result
//! is extracted and translated.

use std::ffi::{CStr, c_char, c_int, c_uint, c_void};
use std::ptr;

use depscan_core::{CommandShape, Error, FullDependenciesResult};

use crate::conversion::{file_dependencies_to_c, file_dependencies_v4_to_c, module_set_to_c};
use crate::error::{clear_error, write_error};
use crate::handles::{DepscanWorker, DepscanWorkerHandle};
use crate::lookup::CallbackLookup;
use crate::string::DepscanString;
use crate::types::{
    DepscanFileDependencies, DepscanFileDependenciesV4, LookupModuleOutputCallback,
    ModuleDiscoveredCallback,
};

/// Borrowed arguments of one query.
struct Query {
    worker: DepscanWorkerHandle,
    argc: c_int,
    argv: *const *const c_char,
    module_name: *const c_char,
    working_directory: *const c_char,
    mdc_context: *mut c_void,
    mdc: ModuleDiscoveredCallback,
    mlo_context: *mut c_void,
    mlo: LookupModuleOutputCallback,
}

/// Collect `argv` into owned strings.
///
/// # Safety
///
/// `argv` must be null or point at `argc` entries, each null or a
/// NUL-terminated string.
unsafe fn collect_args(argc: c_int, argv: *const *const c_char) -> Result<Vec<String>, Error> {
    if argv.is_null() || argc < 2 {
        return Err(Error::InvalidArguments);
    }
    // SAFETY: guaranteed by the caller.
    let entries = unsafe { std::slice::from_raw_parts(argv, argc as usize) };
    entries
        .iter()
        .map(|&arg| {
            // SAFETY: guaranteed by the caller.
            unsafe { opt_str(arg, "argv") }?.ok_or(Error::InvalidArguments)
        })
        .collect()
}

/// Copy an optional caller string. Non-UTF-8 input fails the query, naming
/// the offending argument.
///
/// # Safety
///
/// `s` must be null or a NUL-terminated string.
unsafe fn opt_str(s: *const c_char, what: &'static str) -> Result<Option<String>, Error> {
    if s.is_null() {
        return Ok(None);
    }
    // SAFETY: guaranteed by the caller.
    let s = unsafe { CStr::from_ptr(s) };
    s.to_str().map(|s| Some(s.to_owned())).map_err(|_| Error::NonUtf8Input(what))
}

/// Run the scan and hand discovered modules to the caller.
///
/// # Safety
///
/// Every pointer in `query` must satisfy the entry point contracts.
unsafe fn run_query(
    query: &Query,
    shape: CommandShape,
) -> Result<FullDependenciesResult, Error> {
    // SAFETY: forwarded from the caller.
    let worker = unsafe { DepscanWorker::from_handle(query.worker) }.ok_or(Error::MissingWorker)?;
    // SAFETY: forwarded from the caller.
    let args = unsafe { collect_args(query.argc, query.argv) }?;
    // SAFETY: forwarded from the caller.
    let working_directory = unsafe { opt_str(query.working_directory, "working directory") }?
        .unwrap_or_else(|| ".".to_string());
    // SAFETY: forwarded from the caller.
    let module_name = unsafe { opt_str(query.module_name, "module name") }?;

    let mut lookup = CallbackLookup::new(query.mlo_context, query.mlo);
    let result = worker.inner.get_full_dependencies(
        &args,
        &working_directory,
        module_name.as_deref(),
        &mut lookup,
        shape,
    )?;

    if !result.discovered_modules.is_empty() {
        match query.mdc {
            Some(callback) => {
                tracing::debug!(
                    count = result.discovered_modules.len(),
                    "reporting discovered modules"
                );
                let set = module_set_to_c(&result.discovered_modules);
                // SAFETY: the callback takes ownership of `set`.
                unsafe { callback(query.mdc_context, set) };
            }
            None => tracing::warn!(
                count = result.discovered_modules.len(),
                "no module-discovered callback; dropping discovered modules"
            ),
        }
    }

    Ok(result)
}

/// Compute the dependencies of one compilation, legacy single-command form.
///
/// `argv` must hold at least two entries. `module_name`, when non-null,
/// scans that module instead of the translation unit. Newly discovered
/// modules are passed to `mdc` at most once. `options` is reserved.
///
/// Returns null on failure; `error`, when non-null, receives a message on
/// failure and an empty string on success. Both are owned by the caller.
///
/// Aborts if the scan produced more than one driver command.
///
/// # Safety
///
/// All pointers must be null or valid per their documented contracts. The
/// callbacks must not call back into the same worker.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn depscan_worker_get_file_dependencies_v3(
    worker: DepscanWorkerHandle,
    argc: c_int,
    argv: *const *const c_char,
    module_name: *const c_char,
    working_directory: *const c_char,
    mdc_context: *mut c_void,
    mdc: ModuleDiscoveredCallback,
    mlo_context: *mut c_void,
    mlo: LookupModuleOutputCallback,
    _options: c_uint,
    error: *mut DepscanString,
) -> *mut DepscanFileDependencies {
    let query = Query {
        worker,
        argc,
        argv,
        module_name,
        working_directory,
        mdc_context,
        mdc,
        mlo_context,
        mlo,
    };
    // SAFETY: forwarded from the caller.
    match unsafe { run_query(&query, CommandShape::LegacyDriverCommand) } {
        Ok(result) => {
            // SAFETY: forwarded from the caller.
            unsafe { clear_error(error) };
            file_dependencies_to_c(&result.full_deps)
        }
        Err(err) => {
            // SAFETY: forwarded from the caller.
            unsafe { write_error(error, &err) };
            ptr::null_mut()
        }
    }
}

/// Compute the dependencies of one compilation, one entry per driver
/// command. Arguments and ownership are as for
/// [`depscan_worker_get_file_dependencies_v3`].
///
/// # Safety
///
/// Same as [`depscan_worker_get_file_dependencies_v3`].
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn depscan_worker_get_file_dependencies_v4(
    worker: DepscanWorkerHandle,
    argc: c_int,
    argv: *const *const c_char,
    module_name: *const c_char,
    working_directory: *const c_char,
    mdc_context: *mut c_void,
    mdc: ModuleDiscoveredCallback,
    mlo_context: *mut c_void,
    mlo: LookupModuleOutputCallback,
    _options: c_uint,
    error: *mut DepscanString,
) -> *mut DepscanFileDependenciesV4 {
    let query = Query {
        worker,
        argc,
        argv,
        module_name,
        working_directory,
        mdc_context,
        mdc,
        mlo_context,
        mlo,
    };
    // SAFETY: forwarded from the caller.
    match unsafe { run_query(&query, CommandShape::MultiCommand) } {
        Ok(result) => {
            // SAFETY: forwarded from the caller.
            unsafe { clear_error(error) };
            file_dependencies_v4_to_c(&result.full_deps)
        }
        Err(err) => {
            // SAFETY: forwarded from the caller.
            unsafe { write_error(error, &err) };
            ptr::null_mut()
        }
    }
}
