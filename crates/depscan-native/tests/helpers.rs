//! Shared helpers for driving the C ABI from tests.

#![allow(dead_code)]

use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::ptr;

use depscan_native::{
    DepscanFileDependencies, DepscanFileDependenciesV4, DepscanModuleDependencySet,
    DepscanOutputKind, DepscanString, DepscanStringSet, DepscanWorkerHandle,
    depscan_module_dependency_set_dispose, depscan_string_dispose,
    depscan_worker_get_file_dependencies_v3, depscan_worker_get_file_dependencies_v4,
};

/// A discovered module as seen by the callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    pub name: String,
    pub context_hash: String,
    pub module_map_path: String,
    pub file_deps: Vec<String>,
    pub module_deps: Vec<String>,
    pub build_arguments: Vec<String>,
}

/// Records every callback invocation of a query.
#[derive(Debug, Default)]
pub struct Recorder {
    pub discovered_calls: Vec<Vec<Discovered>>,
    pub lookups: Vec<(String, String, DepscanOutputKind, usize)>,
}

pub fn read(s: &DepscanString) -> String {
    unsafe { s.to_str_lossy() }
        .map(|s| s.into_owned())
        .unwrap_or_default()
}

pub fn read_set(set: *const DepscanStringSet) -> Vec<String> {
    unsafe { DepscanStringSet::as_slice(set) }.iter().map(read).collect()
}

pub unsafe extern "C" fn on_module_discovered(
    context: *mut c_void,
    set: *mut DepscanModuleDependencySet,
) {
    let recorder = unsafe { &mut *(context as *mut Recorder) };
    let set_ref = unsafe { &*set };
    let modules = unsafe { std::slice::from_raw_parts(set_ref.modules, set_ref.count as usize) };
    let entries = modules
        .iter()
        .map(|m| Discovered {
            name: read(&m.name),
            context_hash: read(&m.context_hash),
            module_map_path: read(&m.module_map_path),
            file_deps: read_set(m.file_deps),
            module_deps: read_set(m.module_deps),
            build_arguments: read_set(m.build_arguments),
        })
        .collect();
    recorder.discovered_calls.push(entries);
    unsafe { depscan_module_dependency_set_dispose(set) };
}

fn kind_suffix(kind: DepscanOutputKind) -> &'static str {
    match kind {
        DepscanOutputKind::ModuleFile => "pcm",
        DepscanOutputKind::Dependencies => "d",
        DepscanOutputKind::DependenciesTarget => "target",
        DepscanOutputKind::SerializedDiagnostics => "dia",
    }
}

pub unsafe extern "C" fn lookup_module_output(
    context: *mut c_void,
    module_name: *const c_char,
    context_hash: *const c_char,
    kind: DepscanOutputKind,
    output: *mut c_char,
    max_len: usize,
) -> usize {
    let recorder = unsafe { &mut *(context as *mut Recorder) };
    let name = unsafe { CStr::from_ptr(module_name) }.to_string_lossy().into_owned();
    let hash = unsafe { CStr::from_ptr(context_hash) }.to_string_lossy().into_owned();
    let path = format!("/cache/{hash}/{name}.{}", kind_suffix(kind));
    recorder.lookups.push((name, hash, kind, max_len));

    let n = path.len().min(max_len);
    unsafe { ptr::copy_nonoverlapping(path.as_ptr() as *const c_char, output, n) };
    path.len()
}

/// Owned C arguments for one query.
pub struct Args {
    argv: Vec<CString>,
    ptrs: Vec<*const c_char>,
    module_name: Option<CString>,
    working_directory: CString,
}

impl Args {
    pub fn new(argv: &[&str]) -> Self {
        let argv: Vec<CString> = argv.iter().map(|a| CString::new(*a).unwrap()).collect();
        let ptrs = argv.iter().map(|a| a.as_ptr()).collect();
        Self {
            argv,
            ptrs,
            module_name: None,
            working_directory: CString::new("/proj").unwrap(),
        }
    }

    pub fn module(mut self, name: &str) -> Self {
        self.module_name = Some(CString::new(name).unwrap());
        self
    }

    fn argc(&self) -> c_int {
        self.argv.len() as c_int
    }

    fn module_name_ptr(&self) -> *const c_char {
        self.module_name.as_ref().map_or(ptr::null(), |m| m.as_ptr())
    }
}

fn take_error(error: DepscanString) -> String {
    let message = read(&error);
    unsafe { depscan_string_dispose(error) };
    message
}

pub fn query_v3(
    worker: DepscanWorkerHandle,
    args: &Args,
    recorder: &mut Recorder,
) -> (*mut DepscanFileDependencies, String) {
    let context = recorder as *mut Recorder as *mut c_void;
    let mut error = DepscanString::empty();
    let result = unsafe {
        depscan_worker_get_file_dependencies_v3(
            worker,
            args.argc(),
            args.ptrs.as_ptr(),
            args.module_name_ptr(),
            args.working_directory.as_ptr(),
            context,
            Some(on_module_discovered),
            context,
            Some(lookup_module_output),
            0,
            &mut error,
        )
    };
    (result, take_error(error))
}

pub fn query_v4(
    worker: DepscanWorkerHandle,
    args: &Args,
    recorder: &mut Recorder,
) -> (*mut DepscanFileDependenciesV4, String) {
    let context = recorder as *mut Recorder as *mut c_void;
    let mut error = DepscanString::empty();
    let result = unsafe {
        depscan_worker_get_file_dependencies_v4(
            worker,
            args.argc(),
            args.ptrs.as_ptr(),
            args.module_name_ptr(),
            args.working_directory.as_ptr(),
            context,
            Some(on_module_discovered),
            context,
            Some(lookup_module_output),
            0,
            &mut error,
        )
    };
    (result, take_error(error))
}
