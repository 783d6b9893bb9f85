use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Immutable run configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Fully-qualified target URL (scheme guaranteed present).
    pub site_url: String,
}

/// Errors raised while loading the configuration file.
///
/// All of these are fatal: the run aborts before any browser resource is
/// acquired and no output file is produced.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no {0} file found; create one with SITE_URL=<your_site_url>")]
    MissingFile(PathBuf),

    #[error("SITE_URL not set in {0}")]
    MissingKey(PathBuf),

    #[error("invalid SITE_URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScraperConfig {
    /// Load from `.env` in the working directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env_file(Path::new(".env"))
    }

    /// Load from a `.env`-style key-value file.
    ///
    /// Lines are `KEY=VALUE`; blank lines and `#` comments are skipped, and
    /// values may themselves contain `=`. The only recognized key is
    /// `SITE_URL`. A scheme-less URL gets `https://` prepended before use.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut site_url: Option<String> = None;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                if key.trim() == "SITE_URL" {
                    let value = value.trim();
                    if !value.is_empty() {
                        site_url = Some(value.to_string());
                    }
                    break;
                }
            }
        }

        let mut site_url = site_url.ok_or_else(|| ConfigError::MissingKey(path.to_path_buf()))?;

        if !site_url.starts_with("http://") && !site_url.starts_with("https://") {
            site_url = format!("https://{}", site_url);
            log::info!("Added https:// protocol to URL");
        }

        Url::parse(&site_url).map_err(|source| ConfigError::InvalidUrl {
            url: site_url.clone(),
            source,
        })?;

        log::info!("Loaded site URL: {}", site_url);
        Ok(Self { site_url })
    }
}
