use std::{
    env,
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::errors::{
    Error::{NotFound, Other},
    Result,
};

pub const VERSION: usize = 1;

/// Name of the state file, placed next to the executable.
pub const DEFAULT_FILE_NAME: &str = ".instances";

/// Represents the outstanding batch of provisioned instances.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
#[serde(rename_all = "snake_case")]
pub struct Batch {
    pub version: usize,
    /// Instance IDs in creation order.
    #[serde(default)]
    pub instance_ids: Vec<String>,
}

impl Default for Batch {
    fn default() -> Self {
        Self::default()
    }
}

impl Batch {
    pub fn default() -> Self {
        Self::new(Vec::new())
    }

    pub fn new(instance_ids: Vec<String>) -> Self {
        Self {
            version: VERSION,
            instance_ids,
        }
    }

    pub fn encode_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Other {
            message: format!("failed to serialize Batch to YAML {}", e),
            is_retryable: false,
        })
    }
}

/// Resolves the state file path next to the running executable,
/// so the result does not depend on the working directory.
pub fn default_file_path() -> Result<PathBuf> {
    let exe = env::current_exe()?;
    let dir = exe.parent().ok_or_else(|| Other {
        message: format!("executable {} has no parent directory", exe.display()),
        is_retryable: false,
    })?;
    Ok(dir.join(DEFAULT_FILE_NAME))
}

/// Single-slot state file. Not safe for concurrent invocations.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Saves the batch to disk and overwrites the file.
    pub fn save(&self, batch: &Batch) -> Result<()> {
        log::info!("syncing Batch to '{}'", self.path.display());

        if let Some(parent_dir) = self.path.parent() {
            if !parent_dir.as_os_str().is_empty() {
                fs::create_dir_all(parent_dir)?;
            }
        }

        let d = batch.encode_yaml()?;
        let mut f = File::create(&self.path)?;
        f.write_all(d.as_bytes())?;
        Ok(())
    }

    /// Fails unless a new state file can be created at the path.
    /// Leaves nothing behind on success.
    pub fn ensure_writable(&self) -> Result<()> {
        if self.path.exists() {
            return Err(Other {
                message: format!(
                    "state path {} already exists and is not a writable state file",
                    self.path.display()
                ),
                is_retryable: false,
            });
        }

        if let Some(parent_dir) = self.path.parent() {
            if !parent_dir.as_os_str().is_empty() {
                fs::create_dir_all(parent_dir)?;
            }
        }
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)?;
        fs::remove_file(&self.path)?;
        Ok(())
    }

    pub fn load(&self) -> Result<Batch> {
        log::info!("loading Batch from {}", self.path.display());

        if !self.exists() {
            return Err(NotFound {
                message: format!("file {} does not exist", self.path.display()),
            });
        }

        let f = File::open(&self.path)?;
        let batch: Batch = serde_yaml::from_reader(f).map_err(|e| Other {
            message: format!("invalid YAML in {}: {}", self.path.display(), e),
            is_retryable: false,
        })?;
        if batch.version != VERSION {
            return Err(Other {
                message: format!(
                    "version unexpected {}, expected {}",
                    batch.version, VERSION
                ),
                is_retryable: false,
            });
        }
        Ok(batch)
    }

    pub fn delete(&self) -> Result<()> {
        log::info!("removing {}", self.path.display());
        fs::remove_file(&self.path)?;
        Ok(())
    }
}
