//! Configuration manager for realmtester.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::FromRef;
use serde::{Deserialize, Serialize};

use crate::AppState;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nesting levels built before replies are hidden behind a marker.
pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Instance name.
    pub name: String,
    /// Listening address.
    pub address: String,
    pub port: u16,
    /// Post snapshot, YAML unless the extension is `.json`.
    pub data: PathBuf,
    /// Static page template.
    pub template: PathBuf,
    /// SVG served on `/favicon.ico` and `/favicond.svg`.
    pub favicon: PathBuf,
    /// Maximum comment nesting rendered.
    pub max_depth: usize,
    /// Expose Prometheus metrics on `/metrics`.
    pub metrics: bool,
    #[serde(skip)]
    version: String,
    #[serde(skip)]
    path: PathBuf,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            name: env!("CARGO_CRATE_NAME").to_owned(),
            address: "0.0.0.0".to_owned(),
            port: 8080,
            data: PathBuf::from("comments.yaml"),
            template: PathBuf::from("src.html"),
            favicon: PathBuf::from("favicond.svg"),
            max_depth: DEFAULT_MAX_DEPTH,
            metrics: false,
            version: VERSION.to_owned(),
            path: PathBuf::default(),
        }
    }
}

impl FromRef<AppState> for Arc<Configuration> {
    fn from_ref(state: &AppState) -> Arc<Configuration> {
        Arc::clone(&state.config)
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Running crate version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location, then applies `PORT`.
    ///
    /// A missing or malformed file is not fatal: defaults are used.
    pub fn read(self) -> Arc<Self> {
        let port = std::env::var("PORT").ok();
        Arc::new(self.read_file().with_port(port.as_deref()))
    }

    fn read_file(self) -> Self {
        let file_path = if self.path.is_file() {
            self.path.clone()
        } else {
            Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        let file = match File::open(&file_path) {
            Ok(file) => file,
            Err(err) => return self.error(err),
        };

        match serde_yaml::from_reader::<_, Configuration>(file) {
            Ok(mut config) => {
                config.version = VERSION.to_owned();
                config.path = file_path;
                config
            },
            Err(err) => self.error(err),
        }
    }

    /// `PORT` wins over the file and the defaults; unparsable values are
    /// ignored.
    fn with_port(mut self, port: Option<&str>) -> Self {
        match port.map(str::parse::<u16>) {
            Some(Ok(port)) => self.port = port,
            Some(Err(err)) => tracing::warn!(error = %err, "`PORT` ignored"),
            None => {},
        }
        self
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, path = %self.path.display(), "`config.yaml` not usable, using defaults");
        Self {
            path: self.path.clone(),
            ..Default::default()
        }
    }
}
