use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A single navigable destination. Identity is the `href`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub href: String,
    /// Symbolic icon name, resolved to a glyph by the renderer
    #[serde(default)]
    pub icon: String,
}

/// A labeled cluster of leaves inside a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuGroup {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A top-level navigational domain (CRM, HRM, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub dashboard: Vec<MenuItem>,
    #[serde(default)]
    pub groups: Vec<MenuGroup>,
}

impl ModuleConfig {
    /// Every leaf of this module: dashboard entries first, then group items.
    pub fn leaves(&self) -> impl Iterator<Item = &MenuItem> {
        self.dashboard
            .iter()
            .chain(self.groups.iter().flat_map(|g| g.items.iter()))
    }
}

/// Error type for registry loading and validation
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("could not parse menu registry: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("duplicate module key: {0}")]
    DuplicateModule(String),
    #[error("duplicate group key: {0}")]
    DuplicateGroup(String),
    #[error("duplicate href: {0}")]
    DuplicateHref(String),
    #[error("href must start with '/': {0}")]
    RelativeHref(String),
    #[error("registry has no modules")]
    Empty,
}

/// The canonical, read-only menu hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRegistry {
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleConfig>,
}

const BUILTIN_MENU: &str = include_str!("../templates/menu.toml");

impl MenuRegistry {
    /// Parse a registry from TOML text and validate it.
    pub fn from_toml(text: &str) -> Result<Self, RegistryError> {
        let registry: MenuRegistry = toml::from_str(text)?;
        registry.validate()?;
        Ok(registry)
    }

    /// The registry bundled with the binary.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_toml(BUILTIN_MENU)
    }

    /// Check identity invariants: unique module keys, unique group keys and
    /// unique absolute hrefs across the whole registry.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.modules.is_empty() {
            return Err(RegistryError::Empty);
        }
        let mut module_keys = HashSet::new();
        let mut group_keys = HashSet::new();
        let mut hrefs = HashSet::new();

        for module in &self.modules {
            if !module_keys.insert(module.key.as_str()) {
                return Err(RegistryError::DuplicateModule(module.key.clone()));
            }
            for group in &module.groups {
                if !group_keys.insert(group.key.as_str()) {
                    return Err(RegistryError::DuplicateGroup(group.key.clone()));
                }
            }
            for item in module.leaves() {
                if !item.href.starts_with('/') {
                    return Err(RegistryError::RelativeHref(item.href.clone()));
                }
                if !hrefs.insert(item.href.as_str()) {
                    return Err(RegistryError::DuplicateHref(item.href.clone()));
                }
            }
        }
        Ok(())
    }

    /// Module keys in canonical order
    pub fn module_keys(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.key.clone()).collect()
    }

    pub fn module(&self, key: &str) -> Option<&ModuleConfig> {
        self.modules.iter().find(|m| m.key == key)
    }

    pub fn group(&self, key: &str) -> Option<&MenuGroup> {
        self.modules
            .iter()
            .flat_map(|m| m.groups.iter())
            .find(|g| g.key == key)
    }

    /// Every leaf in canonical order (module by module, dashboards before groups).
    pub fn leaves(&self) -> impl Iterator<Item = &MenuItem> {
        self.modules.iter().flat_map(|m| m.leaves())
    }

    pub fn find_leaf(&self, href: &str) -> Option<&MenuItem> {
        self.leaves().find(|item| item.href == href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
[[module]]
key = "crm"
label = "CRM"
icon = "briefcase"

[[module.dashboard]]
label = "Overview"
href = "/crm"

[[module.groups]]
key = "crm-sales"
label = "Sales"

[[module.groups.items]]
label = "Quotes"
href = "/crm/quotes"
icon = "file"

[[module.groups.items]]
label = "Opportunities"
href = "/crm/opportunities"

[[module]]
key = "hrm"
label = "HRM"
"#;

    #[test]
    fn parses_nested_registry() {
        let reg = MenuRegistry::from_toml(SMALL).unwrap();
        assert_eq!(reg.module_keys(), vec!["crm", "hrm"]);
        let crm = reg.module("crm").unwrap();
        assert_eq!(crm.dashboard.len(), 1);
        assert_eq!(crm.groups[0].items[0].icon, "file");
        assert_eq!(crm.groups[0].items[1].icon, "");
        assert!(reg.module("hrm").unwrap().groups.is_empty());
    }

    #[test]
    fn leaves_are_in_canonical_order() {
        let reg = MenuRegistry::from_toml(SMALL).unwrap();
        let hrefs: Vec<&str> = reg.leaves().map(|i| i.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/crm", "/crm/quotes", "/crm/opportunities"]);
        assert_eq!(reg.find_leaf("/crm/quotes").unwrap().label, "Quotes");
        assert!(reg.find_leaf("/crm/missing").is_none());
    }

    #[test]
    fn rejects_duplicate_href() {
        let text = format!(
            "{}\n[[module]]\nkey = \"erp\"\nlabel = \"ERP\"\n[[module.dashboard]]\nlabel = \"Dup\"\nhref = \"/crm/quotes\"\n",
            SMALL
        );
        match MenuRegistry::from_toml(&text) {
            Err(RegistryError::DuplicateHref(h)) => assert_eq!(h, "/crm/quotes"),
            other => panic!("expected duplicate href, got {:?}", other),
        }
    }

    #[test]
    fn rejects_duplicate_module_and_relative_href() {
        let dup = "[[module]]\nkey = \"a\"\nlabel = \"A\"\n[[module]]\nkey = \"a\"\nlabel = \"A2\"\n";
        assert!(matches!(
            MenuRegistry::from_toml(dup),
            Err(RegistryError::DuplicateModule(_))
        ));

        let rel = "[[module]]\nkey = \"a\"\nlabel = \"A\"\n[[module.dashboard]]\nlabel = \"X\"\nhref = \"x\"\n";
        assert!(matches!(
            MenuRegistry::from_toml(rel),
            Err(RegistryError::RelativeHref(_))
        ));
    }

    #[test]
    fn rejects_empty_registry() {
        assert!(matches!(
            MenuRegistry::from_toml(""),
            Err(RegistryError::Empty)
        ));
    }

    #[test]
    fn builtin_registry_is_valid() {
        let reg = MenuRegistry::builtin().unwrap();
        assert!(reg.module("crm").is_some());
        assert!(reg.module("hrm").is_some());
        assert!(reg.find_leaf("/hrm/employees").is_some());
        assert!(reg.find_leaf("/crm/quotes").is_some());
    }
}
