use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{GitIncrementError, Result};
use crate::plugin::{
    plugin_short_name, CargoPlugin, DefaultPlugin, Dispatcher, Plugin, ScriptPlugin,
};

/// The set of plugins discovered for one run.
///
/// Populated once at startup: built-in plugins plus the script plugins
/// declared in the config file. Keyed by short name, so listings come out
/// sorted.
pub struct PluginRegistry {
    entries: BTreeMap<String, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    /// An empty registry; useful for assembling custom sets in tests.
    pub fn empty() -> Self {
        PluginRegistry {
            entries: BTreeMap::new(),
        }
    }

    /// One discovery pass over all known plugin implementations.
    pub fn discover(config: &Config) -> Self {
        let mut registry = PluginRegistry::empty();

        registry.register(Arc::new(DefaultPlugin::new()));
        registry.register(Arc::new(CargoPlugin::new()));

        for (name, commands) in &config.plugins {
            registry.register(Arc::new(ScriptPlugin::new(name, commands.clone())));
        }

        registry
    }

    /// Register a plugin under its short name.
    ///
    /// A later registration with the same short name replaces the earlier
    /// one.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        let name = plugin_short_name(plugin.qualified_name()).to_string();
        self.entries.insert(name, plugin);
    }

    /// Short names of all discovered plugins, sorted.
    pub fn available(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Resolve a plugin by its short name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Plugin>> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| GitIncrementError::UnknownPlugin {
                attempted: name.to_string(),
                available: self.available(),
            })
    }

    /// Build the dispatcher for the picked plugin, with method-level
    /// fallback to `default`.
    ///
    /// A registry without a `default` plugin is a broken installation, so
    /// that case is a configuration error rather than an unknown plugin.
    pub fn dispatcher(&self, plugin_name: &str) -> Result<Dispatcher> {
        let default = self.resolve("default").map_err(|_| {
            GitIncrementError::config("the 'default' plugin is missing from the registry")
        })?;
        let picked = self.resolve(plugin_name)?;
        Ok(Dispatcher::new(picked, default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::Capability;

    #[test]
    fn test_discover_includes_builtins() {
        let registry = PluginRegistry::discover(&Config::default());
        let available = registry.available();
        assert!(available.contains(&"default".to_string()));
        assert!(available.contains(&"cargo".to_string()));
    }

    #[test]
    fn test_discover_includes_config_script_plugins() {
        let mut config = Config::default();
        config.plugins.insert(
            "deb".to_string(),
            crate::config::ScriptPluginConfig {
                build_package: Some("./build-deb.sh".to_string()),
                ..Default::default()
            },
        );

        let registry = PluginRegistry::discover(&config);
        let plugin = registry.resolve("deb").unwrap();
        assert_eq!(plugin.qualified_name(), "gitincrement.plugins.deb");
        assert_eq!(plugin.capabilities(), vec![Capability::BuildPackage]);
    }

    #[test]
    fn test_resolve_unknown_carries_sorted_names() {
        let registry = PluginRegistry::discover(&Config::default());
        let err = registry.resolve("nonexistent").unwrap_err();

        match err {
            GitIncrementError::UnknownPlugin {
                attempted,
                available,
            } => {
                assert_eq!(attempted, "nonexistent");
                let mut sorted = available.clone();
                sorted.sort();
                assert_eq!(available, sorted);
                assert!(available.contains(&"default".to_string()));
            }
            other => panic!("expected UnknownPlugin, got {:?}", other),
        }
    }

    #[test]
    fn test_dispatcher_without_default_is_config_error() {
        let registry = PluginRegistry::empty();
        let err = registry.dispatcher("default").unwrap_err();
        assert!(matches!(err, GitIncrementError::Config(_)));
    }
}
