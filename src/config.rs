//! Build configuration from environment variables with CLI overrides.

use std::path::PathBuf;

/// Where the site's input data lives. The hosted layout and a local
/// checkout expose the same relative structure (`content.json`,
/// `models.json`, run directories), so only the root differs.
#[derive(Debug, Clone)]
pub enum DataRoot {
    Url(String),
    Dir(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data: DataRoot,
    pub out_dir: PathBuf,
    pub content_file: String,
    pub manifest_file: String,
}

impl Config {
    pub fn from_env() -> Self {
        let data = match std::env::var("DATA_URL") {
            Ok(url) if !url.is_empty() => DataRoot::Url(url),
            _ => DataRoot::Dir(PathBuf::from(
                std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            )),
        };
        Self {
            data,
            out_dir: PathBuf::from(std::env::var("OUT_DIR").unwrap_or_else(|_| "site".to_string())),
            content_file: std::env::var("CONTENT_FILE").unwrap_or_else(|_| "content.json".to_string()),
            manifest_file: std::env::var("MANIFEST_FILE").unwrap_or_else(|_| "models.json".to_string()),
        }
    }

    /// Apply `--key=value` style CLI overrides on top of the environment.
    pub fn apply_args<'a, I: IntoIterator<Item = &'a str>>(&mut self, args: I) {
        for arg in args {
            if let Some(v) = arg.strip_prefix("--data-url=") {
                self.data = DataRoot::Url(v.to_string());
            } else if let Some(v) = arg.strip_prefix("--data-dir=") {
                self.data = DataRoot::Dir(PathBuf::from(v));
            } else if let Some(v) = arg.strip_prefix("--out=") {
                self.out_dir = PathBuf::from(v);
            } else if let Some(v) = arg.strip_prefix("--manifest=") {
                self.manifest_file = v.to_string();
            } else if let Some(v) = arg.strip_prefix("--content=") {
                self.content_file = v.to_string();
            }
        }
    }
}
