//! Compiler-level properties driven through the scripted engine.

mod helpers;

use duo_bundler::{
    Chunk, EngineOutput, Error, LegacyCompiler, ModernCompiler, ModuleRecord, PRELOAD_MAP_FILE,
    PipelineContext,
};
use helpers::{ScriptedCache, ScriptedEngine, Step, chunk, static_files, two_entry_config};
use tempfile::TempDir;

#[tokio::test]
async fn test_duplicate_chunk_name_fails_before_write() {
    let temp = TempDir::new().unwrap();
    let config = two_entry_config(temp.path());
    let engine = ScriptedEngine::new();

    let mut clash = chunk("admin", ".mjs", false, &[]);
    clash.name = "main".into();
    engine.push(Step::Output(EngineOutput {
        chunks: vec![chunk("main", ".mjs", true, &[]), clash],
        ..Default::default()
    }));

    let mut context = PipelineContext::<ScriptedCache>::default();
    let err = ModernCompiler::new(&config)
        .compile(&engine, &mut context)
        .await
        .unwrap_err();

    match err {
        Error::DuplicateChunk { name, .. } => assert_eq!(name, "main"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(static_files(temp.path()).is_empty());
    assert!(!temp.path().join("dist").join(PRELOAD_MAP_FILE).exists());
    assert!(context.manifest.is_empty());
    assert!(context.preload_map.is_empty());
}

#[tokio::test]
async fn test_preload_map_covers_dynamic_entries() {
    let temp = TempDir::new().unwrap();
    let config = two_entry_config(temp.path());
    let engine = ScriptedEngine::new();

    let vendor = chunk("lib", ".mjs", false, &[]);
    let lazy = Chunk {
        is_dynamic_entry: true,
        ..chunk("settings", ".mjs", false, &[&vendor.file_name])
    };
    let main = chunk("main", ".mjs", true, &[&vendor.file_name]);
    let admin = chunk("admin", ".mjs", true, &[]);
    engine.push(Step::Output(EngineOutput {
        chunks: vec![main.clone(), admin.clone(), lazy.clone(), vendor.clone()],
        ..Default::default()
    }));

    let mut context = PipelineContext::<ScriptedCache>::default();
    let summary = ModernCompiler::new(&config)
        .compile(&engine, &mut context)
        .await
        .unwrap();
    assert_eq!(summary.chunks, 4);

    let map = &context.preload_map;
    assert_eq!(map.len(), 3);
    assert_eq!(
        map.get("main").unwrap(),
        &[main.file_name.clone(), vendor.file_name.clone()]
    );
    assert_eq!(map.get("admin").unwrap(), &[admin.file_name.clone()]);
    assert_eq!(map.get("settings").unwrap()[0], lazy.file_name);
    assert!(map.get("lib").is_none());

    assert_eq!(context.manifest.get("lib.mjs"), Some(vendor.file_name.as_str()));
    assert_eq!(static_files(temp.path()).len(), 4);
}

#[tokio::test]
async fn test_manifest_entry_is_overwritten() {
    let temp = TempDir::new().unwrap();
    let config = two_entry_config(temp.path());
    let engine = ScriptedEngine::new();

    let mut context = PipelineContext::<ScriptedCache>::default();
    context.manifest.upsert("main.mjs", "main-stale.mjs");

    ModernCompiler::new(&config)
        .compile(&engine, &mut context)
        .await
        .unwrap();

    let current = context.manifest.lookup("main", ".mjs").unwrap();
    assert_ne!(current, "main-stale.mjs");
    assert!(current.starts_with("main-"));
}

#[tokio::test]
async fn test_modern_pass_reports_duplicate_packages() {
    let temp = TempDir::new().unwrap();
    let config = two_entry_config(temp.path());
    let engine = ScriptedEngine::new();
    engine.push(Step::Output(EngineOutput {
        chunks: vec![chunk("main", ".mjs", true, &[]), chunk("admin", ".mjs", true, &[])],
        assets: Vec::new(),
        modules: vec![
            ModuleRecord::new("/app/src/main.js"),
            ModuleRecord::new("/app/node_modules/lib/index.js"),
            ModuleRecord::new("/app/node_modules/widget/node_modules/lib/index.js"),
            ModuleRecord::new("/app/node_modules/widget/index.js"),
        ],
    }));

    let mut context = PipelineContext::<ScriptedCache>::default();
    let summary = ModernCompiler::new(&config)
        .compile(&engine, &mut context)
        .await
        .unwrap();

    assert_eq!(summary.duplicates.len(), 1);
    assert_eq!(summary.duplicates[0].name, "lib");
    assert_eq!(summary.duplicates[0].roots.len(), 2);
}

#[tokio::test]
async fn test_legacy_one_file_per_selected_entry() {
    let temp = TempDir::new().unwrap();
    let config = two_entry_config(temp.path()).legacy_entries(["admin"]);
    let engine = ScriptedEngine::new();

    let mut compiler = LegacyCompiler::new(&config);
    assert_eq!(compiler.entries().len(), 1);

    let mut context = PipelineContext::<ScriptedCache>::default();
    let summaries = compiler.compile(&engine, &mut context).await.unwrap();

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].entries, vec!["admin".to_string()]);
    assert_eq!(summaries[0].files.len(), 1);
    assert!(context.manifest.lookup("admin", ".js").is_some());
    assert!(context.manifest.lookup("main", ".js").is_none());
    assert!(context.preload_map.is_empty());

    let request = &engine.requests()[0];
    let legacy = request.legacy.as_ref().unwrap();
    assert_eq!(legacy.target, "es2015");
    assert!(legacy.polyfills);
    assert!(!request.vendor_chunks);
}
