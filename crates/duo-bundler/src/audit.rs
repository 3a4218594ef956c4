//! Module-duplicate auditing.
//!
//! A third-party package should resolve to one copy per build. When nested
//! installs of mismatched versions leave two copies on disk and both end up
//! in the graph, every module of the package is bundled twice and any
//! module-level state is split.
//!
//! Package identity is the package name following the *last* `node_modules/`
//! segment of a resolved path (`@scope/name` for scoped packages). The
//! package root is the path up to and including that name. A finding is a
//! package name with two or more distinct roots.

use std::collections::{BTreeMap, BTreeSet};

use crate::chunk::ModuleRecord;

const NODE_MODULES: &str = "node_modules/";

/// One package resolved from more than one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePackage {
    pub name: String,
    /// Distinct package roots, sorted.
    pub roots: Vec<String>,
}

/// Package name and package root of a resolved module path, if it lives
/// inside a `node_modules` directory.
pub fn package_identity(module_id: &str) -> Option<(String, String)> {
    // Virtual modules carry a NUL prefix and never live on disk.
    if module_id.starts_with('\0') {
        return None;
    }

    let normalized = module_id.replace('\\', "/");
    let start = normalized.rfind(NODE_MODULES)? + NODE_MODULES.len();
    let name = extract_package_name(&normalized[start..]);
    if name.is_empty() || name.starts_with('.') {
        return None;
    }

    let root = normalized[..start + name.len()].to_string();
    Some((name.to_string(), root))
}

/// Leading package name of a bare specifier or a path below `node_modules`.
fn extract_package_name(specifier: &str) -> &str {
    if specifier.is_empty() {
        return specifier;
    }

    if specifier.starts_with('@') {
        if let Some(first_slash) = specifier.find('/') {
            if let Some(second_slash) = specifier[first_slash + 1..].find('/') {
                return &specifier[..first_slash + 1 + second_slash];
            }
        }
        return specifier;
    }

    match specifier.find('/') {
        Some(slash_idx) => &specifier[..slash_idx],
        None => specifier,
    }
}

/// Group visited modules by package identity and return every package that
/// resolved to two or more distinct roots, sorted by name.
pub fn find_duplicate_packages(modules: &[ModuleRecord]) -> Vec<DuplicatePackage> {
    let mut roots_by_name: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for module in modules {
        if let Some((name, root)) = package_identity(&module.id) {
            roots_by_name.entry(name).or_default().insert(root);
        }
    }

    roots_by_name
        .into_iter()
        .filter(|(_, roots)| roots.len() >= 2)
        .map(|(name, roots)| DuplicatePackage {
            name,
            roots: roots.into_iter().collect(),
        })
        .collect()
}

/// Run the audit and emit one warning per finding. Never fails the build.
pub fn audit_modules(modules: &[ModuleRecord]) -> Vec<DuplicatePackage> {
    let findings = find_duplicate_packages(modules);
    for finding in &findings {
        tracing::warn!(
            package = %finding.name,
            copies = finding.roots.len(),
            "Package resolved to multiple locations: {}",
            finding.roots.join(", ")
        );
    }
    if findings.is_empty() {
        tracing::debug!(modules = modules.len(), "No duplicate packages found");
    }
    findings
}
