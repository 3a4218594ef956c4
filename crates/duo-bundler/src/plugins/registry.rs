//! Plugin registry with execution phases.

use super::{BundlePlugin, PassInfo, StagedOutput};
use crate::Result;
use crate::chunk::Chunk;

/// Plugin execution phases, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PluginPhase {
    /// Invariant checks. A violation must short-circuit before anything
    /// else looks at the chunk set.
    Guard = 0,

    /// Derived graphs (module preload map).
    Graph = 10,

    /// Reporting only.
    Report = 20,

    /// Asset manifest registration.
    Manifest = 30,
}

/// Ordered set of plugins for one compiler.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<(PluginPhase, Box<dyn BundlePlugin>)>,
    sorted: bool,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin at its own phase.
    pub fn add<P: BundlePlugin + 'static>(&mut self, plugin: P) {
        let phase = plugin.phase();
        self.add_with_phase(Box::new(plugin), phase);
    }

    /// Add a plugin, overriding its phase.
    pub fn add_with_phase(&mut self, plugin: Box<dyn BundlePlugin>, phase: PluginPhase) {
        self.plugins.push((phase, plugin));
        self.sorted = false;
    }

    /// Builder-style [`add`](Self::add).
    pub fn with<P: BundlePlugin + 'static>(mut self, plugin: P) -> Self {
        self.add(plugin);
        self
    }

    // Stable sort: registration order holds within a phase.
    fn ensure_sorted(&mut self) {
        if !self.sorted {
            self.plugins.sort_by_key(|(phase, _)| *phase);
            self.sorted = true;
        }
    }

    /// Plugin names in execution order.
    pub fn names(&mut self) -> Vec<&'static str> {
        self.ensure_sorted();
        self.plugins.iter().map(|(_, p)| p.name()).collect()
    }

    pub fn build_start(&mut self, pass: &PassInfo) -> Result<()> {
        self.ensure_sorted();
        for (_, plugin) in &self.plugins {
            plugin.on_build_start(pass)?;
        }
        Ok(())
    }

    /// Run every plugin over the chunk set; stops at the first error.
    pub fn bundle_generated(&mut self, pass: &PassInfo, chunks: &[Chunk]) -> Result<StagedOutput> {
        self.ensure_sorted();
        let mut staged = StagedOutput::default();
        for (_, plugin) in &self.plugins {
            tracing::trace!(plugin = plugin.name(), pass = %pass.target, "Running plugin");
            plugin.on_bundle_generated(pass, chunks, &mut staged)?;
        }
        Ok(staged)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::Error;
    use crate::engine::FileNameTemplate;
    use crate::plugins::PassTarget;

    struct Recorder {
        name: &'static str,
        phase: PluginPhase,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    impl BundlePlugin for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn phase(&self) -> PluginPhase {
            self.phase
        }

        fn on_bundle_generated(
            &self,
            _pass: &PassInfo,
            _chunks: &[Chunk],
            _staged: &mut StagedOutput,
        ) -> Result<()> {
            self.log.lock().push(self.name);
            if self.fail {
                return Err(Error::InvalidConfig(self.name.to_string()));
            }
            Ok(())
        }
    }

    fn pass() -> PassInfo {
        PassInfo {
            target: PassTarget::Modern,
            entry_names: vec!["main".into()],
            file_names: FileNameTemplate::new("[name]-[hash].mjs"),
        }
    }

    fn recorder(
        name: &'static str,
        phase: PluginPhase,
        log: &Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    ) -> Recorder {
        Recorder {
            name,
            phase,
            log: Arc::clone(log),
            fail,
        }
    }

    #[test]
    fn test_runs_in_phase_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PluginRegistry::new()
            .with(recorder("manifest", PluginPhase::Manifest, &log, false))
            .with(recorder("size", PluginPhase::Report, &log, false))
            .with(recorder("guard", PluginPhase::Guard, &log, false))
            .with(recorder("preload", PluginPhase::Graph, &log, false));

        assert_eq!(registry.names(), ["guard", "preload", "size", "manifest"]);
        registry.bundle_generated(&pass(), &[]).unwrap();
        assert_eq!(*log.lock(), ["guard", "preload", "size", "manifest"]);
    }

    #[test]
    fn test_first_error_stops_later_plugins() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PluginRegistry::new()
            .with(recorder("manifest", PluginPhase::Manifest, &log, false))
            .with(recorder("guard", PluginPhase::Guard, &log, true));

        assert!(registry.bundle_generated(&pass(), &[]).is_err());
        assert_eq!(*log.lock(), ["guard"]);
    }

    #[test]
    fn test_registration_order_within_phase() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PluginRegistry::new()
            .with(recorder("first", PluginPhase::Report, &log, false))
            .with(recorder("second", PluginPhase::Report, &log, false));
        assert_eq!(registry.names(), ["first", "second"]);
        assert_eq!(registry.len(), 2);
    }
}
