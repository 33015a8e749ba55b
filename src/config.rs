//! Runtime configuration loaded from the environment (and `.env`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_RETENTION_SECS: u64 = 60;
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Values the renderer prints but the form does not carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Branding {
    pub currency: String,
    pub website: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            currency: "PKR".to_string(),
            website: "www.lancerstech.com".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub file_retention: Duration,
    pub cleanup_interval: Duration,
    pub branding: Branding,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("output"),
            static_dir: PathBuf::from("static"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            file_retention: Duration::from_secs(DEFAULT_RETENTION_SECS),
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            branding: Branding::default(),
            allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source so tests do not
    /// have to mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(v) => parse_number("PORT", &v)?,
            None => defaults.port,
        };
        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(v) => parse_number("MAX_UPLOAD_BYTES", &v)?,
            None => defaults.max_upload_bytes,
        };
        let file_retention = match var("FILE_RETENTION_SECS") {
            Some(v) => Duration::from_secs(parse_number("FILE_RETENTION_SECS", &v)?),
            None => defaults.file_retention,
        };
        let cleanup_interval = match var("CLEANUP_INTERVAL_SECS") {
            Some(v) => {
                let secs: u64 = parse_number("CLEANUP_INTERVAL_SECS", &v)?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        name: "CLEANUP_INTERVAL_SECS",
                        value: v,
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.cleanup_interval,
        };

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            upload_dir: var("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            output_dir: var("OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.output_dir),
            static_dir: var("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            max_upload_bytes,
            file_retention,
            cleanup_interval,
            branding: Branding {
                currency: var("CURRENCY").unwrap_or(defaults.branding.currency),
                website: var("COMPANY_WEBSITE").unwrap_or(defaults.branding.website),
            },
            allowed_origins,
        })
    }

    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        for dir in [&self.upload_dir, &self.output_dir] {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    /// Directories the janitor sweeps.
    pub fn scratch_dirs(&self) -> Vec<PathBuf> {
        vec![self.output_dir.clone(), self.upload_dir.clone()]
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}
