use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use wagonwise_core::{DataLoader, Topology};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to build default {name} config: {source}")]
    Default {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads JSON documents from disk, falling back to the built-in data when a
/// path is not given.
#[derive(Debug, Clone, Default)]
pub struct FsDataLoader {
    config_path: Option<PathBuf>,
    topology_path: Option<PathBuf>,
}

impl FsDataLoader {
    pub const fn new(config_path: Option<PathBuf>, topology_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            topology_path,
        }
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoaderError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| LoaderError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DataLoader for FsDataLoader {
    type Error = LoaderError;

    fn load_topology(&self) -> Result<Topology, Self::Error> {
        match &self.topology_path {
            Some(path) => {
                log::debug!("loading topology from {}", path.display());
                Self::read_json(path)
            }
            None => Ok(Topology::frontier()),
        }
    }

    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: DeserializeOwned,
    {
        match &self.config_path {
            Some(path) => {
                log::debug!("loading {config_name} config from {}", path.display());
                Self::read_json(path)
            }
            None => serde_json::from_value(Value::Object(Map::new())).map_err(|source| {
                LoaderError::Default {
                    name: config_name.to_string(),
                    source,
                }
            }),
        }
    }
}

/// Read an arbitrary JSON record (player profiles).
pub fn read_record(path: &Path) -> Result<Value, LoaderError> {
    FsDataLoader::read_json(path)
}
