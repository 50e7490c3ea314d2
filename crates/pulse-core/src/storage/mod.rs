mod config;
pub mod database;
mod memory;

pub use config::{BreathingConfig, Config, FlowConfig, RoutinesConfig, SoundsConfig};
pub use database::Database;
pub use memory::MemoryKv;

use std::path::PathBuf;

use crate::error::{DatabaseError, Result};

/// Returns `~/.config/pulse[-dev]/` based on PULSE_ENV.
///
/// Set PULSE_ENV=dev to use the development data directory, or
/// PULSE_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("PULSE_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PULSE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pulse-dev")
            } else {
                base_dir.join("pulse")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| DatabaseError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// String key/value persistence.
///
/// Values are opaque strings; callers own their encoding.
pub trait KvStore {
    /// # Errors
    /// Returns an error if the backing store cannot be read.
    fn kv_get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace `key`.
    ///
    /// # Errors
    /// Returns an error if the write does not reach the backing store.
    fn kv_set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn kv_get(&self, key: &str) -> Result<Option<String>> {
        (**self).kv_get(key)
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        (**self).kv_set(key, value)
    }
}
