use std::collections::HashSet;

use crate::model::menu::ModuleConfig;

/// Modules whose key is in `enabled`, in the order given.
pub fn visible_modules<'a>(
    modules: &'a [ModuleConfig],
    enabled: &HashSet<String>,
) -> Vec<&'a ModuleConfig> {
    modules.iter().filter(|m| enabled.contains(&m.key)).collect()
}

/// Where the current enabled set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnablementOrigin {
    /// Built-in fallback: the source has not answered, or failed
    Fallback,
    /// The tenant's enabled-modules source
    Source,
}

impl EnablementOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnablementOrigin::Fallback => "fallback",
            EnablementOrigin::Source => "source",
        }
    }
}

/// The tenant's enabled module set for this session. Held in memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnabledModules {
    pub keys: HashSet<String>,
    pub origin: EnablementOrigin,
}

impl EnabledModules {
    pub fn fallback<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnabledModules {
            keys: keys.into_iter().map(Into::into).collect(),
            origin: EnablementOrigin::Fallback,
        }
    }

    /// Apply the source's answer. Any error leaves the current set in place;
    /// there is no retry.
    pub fn resolve<E: std::fmt::Display>(&mut self, result: Result<HashSet<String>, E>) {
        match result {
            Ok(keys) => {
                log::info!("enabled modules resolved: {} module(s)", keys.len());
                self.keys = keys;
                self.origin = EnablementOrigin::Source;
            }
            Err(e) => {
                log::warn!("enabled-modules fetch failed, keeping fallback set: {}", e);
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::menu::MenuRegistry;

    fn set(keys: &[&str]) -> HashSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn filter_keeps_registry_order() {
        let registry = MenuRegistry::builtin().unwrap();
        let visible = visible_modules(&registry.modules, &set(&["erp", "crm", "nope"]));
        let keys: Vec<&str> = visible.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["crm", "erp"]);
    }

    #[test]
    fn empty_enabled_set_hides_everything() {
        let registry = MenuRegistry::builtin().unwrap();
        assert!(visible_modules(&registry.modules, &HashSet::new()).is_empty());
    }

    #[test]
    fn failed_fetch_keeps_fallback() {
        let registry = MenuRegistry::builtin().unwrap();
        let mut enabled = EnabledModules::fallback(["crm", "hrm"]);
        enabled.resolve::<String>(Err("connection refused".into()));

        assert_eq!(enabled.origin, EnablementOrigin::Fallback);
        let visible = visible_modules(&registry.modules, &enabled.keys);
        let keys: Vec<&str> = visible.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["crm", "hrm"]);
        assert!(visible.len() < registry.modules.len());
    }

    #[test]
    fn successful_fetch_replaces_fallback() {
        let mut enabled = EnabledModules::fallback(["crm", "hrm"]);
        enabled.resolve::<String>(Ok(set(&["erp"])));
        assert_eq!(enabled.origin, EnablementOrigin::Source);
        assert!(enabled.contains("erp"));
        assert!(!enabled.contains("crm"));
    }
}
