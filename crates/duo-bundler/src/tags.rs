//! HTML tag rendering for the serving layer.

use crate::compiler::{LEGACY_EXTENSION, MODERN_EXTENSION};
use crate::manifest::AssetManifest;
use crate::preload::PreloadMap;

/// Render the tags that load `entry`: modulepreload hints for its static
/// dependencies, the module script, and the `nomodule` legacy fallback when
/// a legacy bundle was emitted.
///
/// Pass the dynamic-import `loader` name when the modern pass rewrote
/// `import()` through it (every mode except development). A module script
/// defining it is emitted first; it resolves chunk-relative specifiers
/// against `public_path`, where all chunks live.
///
/// Returns `None` when the manifest has no modern file for `entry`.
pub fn render_entry_tags(
    manifest: &AssetManifest,
    preload_map: &PreloadMap,
    entry: &str,
    public_path: &str,
    loader: Option<&str>,
) -> Option<String> {
    let modern = manifest.lookup(entry, MODERN_EXTENSION)?;
    let base = public_path.trim_end_matches('/');
    let mut html = String::new();

    if let Some(loader) = loader {
        html.push_str(&loader_script(loader, base));
    }

    if let Some(files) = preload_map.get(entry) {
        for file in files.iter().skip(1) {
            html.push_str(&format!(
                "<link rel=\"modulepreload\" href=\"{base}/{file}\">\n"
            ));
        }
    }

    html.push_str(&format!(
        "<script type=\"module\" src=\"{base}/{modern}\"></script>\n"
    ));

    if let Some(legacy) = manifest.lookup(entry, LEGACY_EXTENSION) {
        html.push_str(&format!(
            "<script nomodule defer src=\"{base}/{legacy}\"></script>\n"
        ));
    }

    Some(html)
}

fn loader_script(loader: &str, base: &str) -> String {
    format!(
        "<script type=\"module\">const b=new URL(\"{base}/\",location.href);\
         window.{loader}=u=>import(new URL(u,b).href)</script>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use crate::preload::build_preload_map;

    fn setup() -> (AssetManifest, PreloadMap) {
        let mut manifest = AssetManifest::new();
        manifest.upsert("main.mjs", "main-1.mjs");
        manifest.upsert("main.js", "main-2.js");
        let map = build_preload_map(&[Chunk {
            name: "main".into(),
            file_name: "main-1.mjs".into(),
            is_entry: true,
            is_dynamic_entry: false,
            imports: vec!["lib-3.mjs".into()],
            code: String::new(),
        }]);
        (manifest, map)
    }

    #[test]
    fn test_renders_preload_module_and_legacy() {
        let (manifest, map) = setup();
        let html = render_entry_tags(&manifest, &map, "main", "/static/", None).unwrap();
        assert_eq!(
            html,
            "<link rel=\"modulepreload\" href=\"/static/lib-3.mjs\">\n\
             <script type=\"module\" src=\"/static/main-1.mjs\"></script>\n\
             <script nomodule defer src=\"/static/main-2.js\"></script>\n"
        );
    }

    #[test]
    fn test_no_legacy_script_without_legacy_bundle() {
        let (mut manifest, map) = setup();
        manifest = manifest
            .iter()
            .filter(|(k, _)| k.ends_with(".mjs"))
            .fold(AssetManifest::new(), |mut m, (k, v)| {
                m.upsert(k, v);
                m
            });
        let html = render_entry_tags(&manifest, &map, "main", "/static", None).unwrap();
        assert!(!html.contains("nomodule"));
    }

    #[test]
    fn test_loader_is_defined_before_module_script() {
        let (manifest, map) = setup();
        let html = render_entry_tags(&manifest, &map, "main", "/static", Some("__import__")).unwrap();

        let loader = html
            .find("window.__import__=u=>import(new URL(u,b).href)")
            .unwrap();
        let module = html.find("<script type=\"module\" src=").unwrap();
        assert!(loader < module);
        assert!(html.contains("new URL(\"/static/\",location.href)"));
        assert!(html.starts_with("<script type=\"module\">"));
    }

    #[test]
    fn test_no_loader_script_in_development() {
        let (manifest, map) = setup();
        let html = render_entry_tags(&manifest, &map, "main", "/static", None).unwrap();
        assert!(!html.contains("window."));
    }

    #[test]
    fn test_unknown_entry() {
        let (manifest, map) = setup();
        assert!(render_entry_tags(&manifest, &map, "admin", "/static", None).is_none());
    }
}
