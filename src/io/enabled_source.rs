use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde::Deserialize;

use crate::model::config::SourceConfig;

/// Error type for enabled-module lookups
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed module list: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the set of module keys enabled for the current tenant.
pub trait EnabledModulesSource: Send {
    fn fetch(&self) -> Result<HashSet<String>, SourceError>;
}

/// Accepted response shapes: `["crm", ...]` or `{"modules": ["crm", ...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum ModulesBody {
    List(Vec<String>),
    Wrapped { modules: Vec<String> },
}

/// Parse a module list body in either accepted shape
pub fn parse_modules_body(body: &str) -> Result<HashSet<String>, SourceError> {
    let parsed: ModulesBody = serde_json::from_str(body)?;
    let keys = match parsed {
        ModulesBody::List(keys) => keys,
        ModulesBody::Wrapped { modules } => modules,
    };
    Ok(keys.into_iter().collect())
}

/// Authenticated GET against the tenant API
pub struct HttpSource {
    pub url: String,
    /// Environment variable holding the bearer token
    pub token_env: String,
}

impl EnabledModulesSource for HttpSource {
    fn fetch(&self) -> Result<HashSet<String>, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("navtree/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut request = client.get(&self.url);
        match std::env::var(&self.token_env) {
            Ok(token) => request = request.bearer_auth(token),
            Err(_) => log::debug!("{} not set, requesting without a token", self.token_env),
        }

        let body = request.send()?.error_for_status()?.text()?;
        parse_modules_body(&body)
    }
}

/// JSON module list read from disk
pub struct FileSource {
    pub path: PathBuf,
}

impl EnabledModulesSource for FileSource {
    fn fetch(&self) -> Result<HashSet<String>, SourceError> {
        let body = fs::read_to_string(&self.path).map_err(|e| SourceError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        parse_modules_body(&body)
    }
}

/// Fixed answer
#[cfg(test)]
pub struct StaticSource(pub HashSet<String>);

#[cfg(test)]
impl EnabledModulesSource for StaticSource {
    fn fetch(&self) -> Result<HashSet<String>, SourceError> {
        Ok(self.0.clone())
    }
}

/// Always fails with the given reason
#[cfg(test)]
pub struct FailingSource(pub String);

#[cfg(test)]
impl EnabledModulesSource for FailingSource {
    fn fetch(&self) -> Result<HashSet<String>, SourceError> {
        Err(SourceError::Unavailable(self.0.clone()))
    }
}

/// Build the configured source. Relative file paths resolve against
/// `config_dir`. `None` when no source is configured.
pub fn source_from_config(
    config: Option<&SourceConfig>,
    config_dir: &Path,
) -> Option<Box<dyn EnabledModulesSource>> {
    match config? {
        SourceConfig::Http { url, token_env } => Some(Box::new(HttpSource {
            url: url.clone(),
            token_env: token_env.clone(),
        })),
        SourceConfig::File { path } => Some(Box::new(FileSource {
            path: config_dir.join(path),
        })),
    }
}

/// A single in-flight fetch on a background thread.
///
/// The result is delivered over a channel and picked up by `poll()` from the
/// event loop. Dropping the handle discards a late result.
pub struct EnablementFetch {
    rx: mpsc::Receiver<Result<HashSet<String>, SourceError>>,
    done: bool,
}

impl EnablementFetch {
    pub fn spawn(source: Box<dyn EnabledModulesSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = source.fetch();
            let _ = tx.send(result);
        });
        EnablementFetch { rx, done: false }
    }

    /// Non-blocking poll. Returns the result once; later calls return `None`.
    pub fn poll(&mut self) -> Option<Result<HashSet<String>, SourceError>> {
        if self.done {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.done = true;
                Some(result)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.done = true;
                Some(Err(SourceError::Unavailable(
                    "fetch thread exited without a result".into(),
                )))
            }
        }
    }

    /// Block until the result arrives (CLI commands have no event loop).
    pub fn wait(mut self, timeout: Duration) -> Result<HashSet<String>, SourceError> {
        if let Some(result) = self.poll() {
            return result;
        }
        self.rx
            .recv_timeout(timeout)
            .map_err(|_| SourceError::Unavailable("timed out waiting for module list".into()))?
    }
}
