use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub enablement: EnablementConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnablementConfig {
    /// Modules shown until the enabled-modules source answers (and forever,
    /// if it never does).
    #[serde(default = "default_fallback_modules")]
    pub fallback: Vec<String>,
    #[serde(default)]
    pub source: Option<SourceConfig>,
}

impl Default for EnablementConfig {
    fn default() -> Self {
        EnablementConfig {
            fallback: default_fallback_modules(),
            source: None,
        }
    }
}

/// Where the tenant's enabled module keys come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Http {
        url: String,
        /// Environment variable holding the bearer token
        #[serde(default = "default_token_env")]
        token_env: String,
    },
    File {
        path: String,
    },
}

fn default_fallback_modules() -> Vec<String> {
    vec!["crm".to_string(), "hrm".to_string()]
}

fn default_token_env() -> String {
    "NAVTREE_TOKEN".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_start_path")]
    pub start_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            start_path: default_start_path(),
        }
    }
}

fn default_start_path() -> String {
    "/".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Sidebar width in columns (absent = 34)
    #[serde(default)]
    pub sidebar_width: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: NavConfig = toml::from_str("").unwrap();
        assert_eq!(config.enablement.fallback, vec!["crm", "hrm"]);
        assert!(config.enablement.source.is_none());
        assert_eq!(config.session.start_path, "/");
        assert!(config.ui.sidebar_width.is_none());
    }

    #[test]
    fn parses_http_source() {
        let text = r#"
[enablement]
fallback = ["crm"]

[enablement.source]
kind = "http"
url = "https://api.example.test/tenant/modules"
"#;
        let config: NavConfig = toml::from_str(text).unwrap();
        assert_eq!(config.enablement.fallback, vec!["crm"]);
        assert_eq!(
            config.enablement.source,
            Some(SourceConfig::Http {
                url: "https://api.example.test/tenant/modules".into(),
                token_env: "NAVTREE_TOKEN".into(),
            })
        );
    }

    #[test]
    fn parses_file_source() {
        let text = "[enablement.source]\nkind = \"file\"\npath = \"modules.json\"\n";
        let config: NavConfig = toml::from_str(text).unwrap();
        assert_eq!(
            config.enablement.source,
            Some(SourceConfig::File {
                path: "modules.json".into()
            })
        );
        assert_eq!(config.enablement.fallback, vec!["crm", "hrm"]);
    }
}
