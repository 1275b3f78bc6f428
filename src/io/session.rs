use std::path::{Path, PathBuf};

use crate::io::config_io::{self, ConfigError};
use crate::io::enabled_source::{EnabledModulesSource, EnablementFetch, source_from_config};
use crate::io::prefs::FilePreferenceStore;
use crate::model::config::NavConfig;
use crate::model::menu::MenuRegistry;
use crate::ops::enablement::EnabledModules;

/// Everything loaded from disk that a session (TUI or CLI command) needs.
pub struct SessionContext {
    pub config_dir: PathBuf,
    pub config: NavConfig,
    pub registry: MenuRegistry,
    pub store: FilePreferenceStore,
}

impl SessionContext {
    pub fn open(config_dir: Option<&Path>, menu: Option<&Path>) -> Result<Self, ConfigError> {
        let config_dir = config_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(config_io::config_dir);
        let config = config_io::read_config(&config_dir)?;
        let registry = config_io::read_registry(&config_dir, menu)?;
        let store = FilePreferenceStore::new(config_io::prefs_dir(&config_dir));
        log::debug!(
            "session: config dir {}, {} module(s) in registry",
            config_dir.display(),
            registry.modules.len()
        );
        Ok(SessionContext {
            config_dir,
            config,
            registry,
            store,
        })
    }

    /// The configured fallback set, with unknown keys logged and kept (a
    /// later registry may know them).
    pub fn fallback(&self) -> EnabledModules {
        for key in &self.config.enablement.fallback {
            if self.registry.module(key).is_none() {
                log::warn!("fallback module {} is not in the registry", key);
            }
        }
        EnabledModules::fallback(self.config.enablement.fallback.iter().cloned())
    }

    pub fn source(&self) -> Option<Box<dyn EnabledModulesSource>> {
        source_from_config(self.config.enablement.source.as_ref(), &self.config_dir)
    }

    /// Start the one-per-session enabled-modules fetch, if a source is configured.
    pub fn spawn_fetch(&self) -> Option<EnablementFetch> {
        self.source().map(EnablementFetch::spawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn opens_with_defaults() {
        let tmp = TempDir::new().unwrap();
        let ctx = SessionContext::open(Some(tmp.path()), None).unwrap();
        assert_eq!(ctx.store.dir(), tmp.path().join("prefs"));
        assert!(ctx.source().is_none());
        assert!(ctx.spawn_fetch().is_none());
        assert!(ctx.fallback().contains("crm"));
    }

    #[test]
    fn file_source_is_built_from_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[enablement.source]\nkind = \"file\"\npath = \"tenant.json\"\n",
        )
        .unwrap();
        fs::write(tmp.path().join("tenant.json"), r#"["erp"]"#).unwrap();
        let ctx = SessionContext::open(Some(tmp.path()), None).unwrap();
        let keys = ctx.source().unwrap().fetch().unwrap();
        assert!(keys.contains("erp"));
    }
}
