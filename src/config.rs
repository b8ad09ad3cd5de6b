use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::ObjectStore;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("cannot prepare storage directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("object store: {0}")]
    Storage(#[from] object_store::Error),
}

/// Where profile pictures go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Local { dir: PathBuf },
    S3 { bucket: String },
}

impl StorageBackend {
    /// S3 credentials and region come from the standard `AWS_*` variables.
    pub fn build(&self) -> Result<Arc<dyn ObjectStore>, ConfigError> {
        match self {
            StorageBackend::Local { dir } => {
                std::fs::create_dir_all(dir)?;
                Ok(Arc::new(LocalFileSystem::new_with_prefix(dir)?))
            }
            StorageBackend::S3 { bucket } => Ok(Arc::new(
                AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .build()?,
            )),
        }
    }

    fn default_public_url(&self) -> String {
        match self {
            StorageBackend::Local { dir } => format!("file://{}", dir.display()),
            StorageBackend::S3 { bucket } => format!("https://{bucket}.s3.amazonaws.com"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub profile_image_prefix: String,
    pub profile_image_size: u32,
    pub storage: StorageBackend,
    pub storage_public_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("PORT", lookup("PORT"), 8080u16)?;
        let profile_image_prefix =
            lookup("PROFILE_IMAGE_PREFIX").unwrap_or_else(|| "cp".to_string());
        let profile_image_size = parse_or("PROFILE_IMAGE_SIZE", lookup("PROFILE_IMAGE_SIZE"), 200u32)?;
        if profile_image_size == 0 {
            return Err(ConfigError::Invalid {
                name: "PROFILE_IMAGE_SIZE",
                value: "0".to_string(),
            });
        }

        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "local".to_string());
        let storage = match backend.to_ascii_lowercase().as_str() {
            "local" => StorageBackend::Local {
                dir: lookup("STORAGE_LOCAL_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("./uploads")),
            },
            "s3" => StorageBackend::S3 {
                bucket: lookup("STORAGE_S3_BUCKET").ok_or(ConfigError::Missing("STORAGE_S3_BUCKET"))?,
            },
            _ => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE_BACKEND",
                    value: backend,
                })
            }
        };
        let storage_public_url = lookup("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|| storage.default_public_url());

        Ok(Self {
            database_url,
            host,
            port,
            profile_image_prefix,
            profile_image_size,
            storage,
            storage_public_url,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
