//! End-to-end scans through the worker API.
//!
//! These tests drive a scripted engine through service and worker the way a
//! build system would: several translation units on one worker, with a
//! lookup policy that records what it was asked.

use std::sync::Arc;

use depscan_core::test_utils::{ScriptedEngine, ScriptedScan, direct_module};
use depscan_core::{
    CommandShape, DependencyScanningService, DependencyScanningWorker, ModuleId,
    ModuleOutputKind, OutputFormat, PhysicalFileSystem, PrebuiltModuleDep, ServiceConfig,
};
use tempfile::TempDir;

fn argv(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn service(engine: ScriptedEngine) -> DependencyScanningService {
    let config = ServiceConfig::default().with_output_format(OutputFormat::Full);
    DependencyScanningService::new(config, Arc::new(engine))
}

/// Lookup policy that places every output under `/cache` and counts calls.
fn cache_lookup(
    calls: &mut usize,
) -> impl FnMut(&str, &str, ModuleOutputKind, &mut [u8]) -> usize + '_ {
    move |name, hash, kind, buf| {
        *calls += 1;
        let path = format!("/cache/{name}-{hash}.{kind}");
        let n = path.len().min(buf.len());
        buf[..n].copy_from_slice(&path.as_bytes()[..n]);
        path.len()
    }
}

#[test]
fn test_translation_unit_without_modules() {
    let engine = ScriptedEngine::new().with_scan(
        "a.cpp",
        ScriptedScan::new("X")
            .file("/proj/a.cpp")
            .file("/proj/a.h")
            .command("clang", &["-c", "a.cpp"]),
    );
    let service = service(engine);
    let worker = DependencyScanningWorker::with_physical_fs(&service);

    let mut calls = 0;
    let mut lookup = cache_lookup(&mut calls);
    let result = worker
        .get_full_dependencies(
            &argv(&["clang", "-c", "a.cpp"]),
            "/proj",
            None,
            &mut lookup,
            CommandShape::MultiCommand,
        )
        .unwrap();
    drop(lookup);

    assert_eq!(result.full_deps.context_hash, "X");
    assert_eq!(result.full_deps.file_deps, argv(&["/proj/a.cpp", "/proj/a.h"]));
    assert!(result.full_deps.module_deps.is_empty());
    assert!(result.discovered_modules.is_empty());
    assert_eq!(result.full_deps.commands.len(), 1);
    assert_eq!(result.full_deps.commands[0].executable, "clang");
    assert_eq!(result.full_deps.commands[0].arguments, argv(&["-c", "a.cpp"]));
    assert_eq!(calls, 0);
}

#[test]
fn test_module_discovered_once_per_worker() {
    let engine = ScriptedEngine::new()
        .with_scan(
            "a.cpp",
            ScriptedScan::new("A").file("/proj/a.cpp").module(direct_module("M", "H1")),
        )
        .with_scan(
            "b.cpp",
            ScriptedScan::new("B").file("/proj/b.cpp").module(direct_module("M", "H1")),
        );
    let service = service(engine);
    let worker = DependencyScanningWorker::with_physical_fs(&service);

    let mut calls = 0;
    let mut lookup = cache_lookup(&mut calls);
    let first = worker
        .get_full_dependencies(
            &argv(&["clang", "-c", "a.cpp"]),
            "/proj",
            None,
            &mut lookup,
            CommandShape::MultiCommand,
        )
        .unwrap();
    let second = worker
        .get_full_dependencies(
            &argv(&["clang", "-c", "b.cpp"]),
            "/proj",
            None,
            &mut lookup,
            CommandShape::MultiCommand,
        )
        .unwrap();

    let m = ModuleId::new("M", "H1");
    assert_eq!(first.full_deps.module_deps, vec![m.clone()]);
    assert_eq!(first.discovered_modules.len(), 1);
    assert_eq!(first.discovered_modules[0].id, m);
    assert_eq!(first.discovered_modules[0].module_map_file, "/proj/M/module.modulemap");

    assert_eq!(second.full_deps.module_deps, vec![m]);
    assert!(second.discovered_modules.is_empty());
}

#[test]
fn test_separate_workers_do_not_share_seen_modules() {
    let engine = ScriptedEngine::new()
        .with_scan("a.cpp", ScriptedScan::new("A").module(direct_module("M", "H1")));
    let service = service(engine);
    let first_worker = DependencyScanningWorker::with_physical_fs(&service);
    let second_worker = DependencyScanningWorker::with_physical_fs(&service);

    let mut calls = 0;
    let mut lookup = cache_lookup(&mut calls);
    for worker in [&first_worker, &second_worker] {
        let result = worker
            .get_full_dependencies(
                &argv(&["clang", "-c", "a.cpp"]),
                "/proj",
                None,
                &mut lookup,
                CommandShape::MultiCommand,
            )
            .unwrap();
        assert_eq!(result.discovered_modules.len(), 1);
    }
}

#[test]
fn test_legacy_command_line_for_implicit_driver() {
    let mut scan = ScriptedScan::new("L").file("/proj/a.cpp").module(direct_module("M", "H1"));
    scan.prebuilt.push(PrebuiltModuleDep {
        module_name: "Std".to_string(),
        pcm_file: "/sdk/Std.pcm".to_string(),
        module_map_file: "/sdk/module.modulemap".to_string(),
    });
    let engine = ScriptedEngine::new().with_scan("a.cpp", scan);
    let service = service(engine);
    let worker = DependencyScanningWorker::with_physical_fs(&service);

    let mut calls = 0;
    let mut lookup = cache_lookup(&mut calls);
    let result = worker
        .get_full_dependencies(
            &argv(&["clang", "-c", "a.cpp"]),
            "/proj",
            None,
            &mut lookup,
            CommandShape::LegacyDriverCommand,
        )
        .unwrap();
    drop(lookup);

    assert_eq!(
        result.full_deps.driver_command_line,
        argv(&[
            "-c",
            "a.cpp",
            "-fno-implicit-modules",
            "-fno-implicit-module-maps",
            "-fmodule-file=/sdk/Std.pcm",
            "-fmodule-file=/cache/M-H1.module-file",
            "-fmodule-map-file=/proj/M/module.modulemap",
        ])
    );
    assert!(result.full_deps.commands.is_empty());
    assert_eq!(calls, 1);
}

#[test]
fn test_unscripted_input_resolves_against_working_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("main.c"), "int main(void) { return 0; }").unwrap();
    let wd = dir.path().to_string_lossy().into_owned();

    let service = service(ScriptedEngine::new());
    let worker = DependencyScanningWorker::new(&service, Arc::new(PhysicalFileSystem::new()));

    let mut calls = 0;
    let mut lookup = cache_lookup(&mut calls);
    let result = worker
        .get_full_dependencies(
            &argv(&["cc", "-c", "./main.c"]),
            &wd,
            None,
            &mut lookup,
            CommandShape::MultiCommand,
        )
        .unwrap();

    let expected = dir.path().join("main.c").to_string_lossy().into_owned();
    assert_eq!(result.full_deps.context_hash, "default");
    assert_eq!(result.full_deps.file_deps, vec![expected]);
}

#[test]
fn test_result_serializes_to_json() {
    let engine = ScriptedEngine::new().with_scan(
        "a.cpp",
        ScriptedScan::new("J").file("/proj/a.cpp").module(direct_module("M", "H1")),
    );
    let service = service(engine);
    let worker = DependencyScanningWorker::with_physical_fs(&service);

    let mut calls = 0;
    let mut lookup = cache_lookup(&mut calls);
    let result = worker
        .get_full_dependencies(
            &argv(&["clang", "-c", "a.cpp"]),
            "/proj",
            None,
            &mut lookup,
            CommandShape::MultiCommand,
        )
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&result.to_json_string()).unwrap();
    assert_eq!(json["full_deps"]["context_hash"], "J");
    assert_eq!(json["discovered_modules"][0]["id"]["module_name"], "M");
}
