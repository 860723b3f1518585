//! Shared test utilities for modelscope-mcp crates.
//!
//! Provides environment-variable fixtures used across the workspace: a
//! process-global mutex for serializing env-mutating tests, an RAII guard
//! that restores the previous value on drop, and a config-file fixture.

use std::path::PathBuf;
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original
/// on drop. Passing `None` unsets the variable for the guard's lifetime.
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// Temporary home directory holding a `.modelscope-mcp` config directory.
///
/// Point `HOME` at [`ConfigFixture::home`] (via [`set_env_var`]) to exercise
/// config-file loading against a throwaway directory. The tempdir is removed
/// when the fixture is dropped.
pub struct ConfigFixture {
    pub tempdir: tempfile::TempDir,
    /// Path to `$HOME/.modelscope-mcp` in the temp environment.
    pub config_dir: PathBuf,
}

impl ConfigFixture {
    pub fn new() -> std::io::Result<Self> {
        let tempdir = tempfile::tempdir()?;
        let config_dir = tempdir.path().join(".modelscope-mcp");
        std::fs::create_dir_all(&config_dir)?;
        Ok(Self { tempdir, config_dir })
    }

    /// The directory to use as `HOME` for the duration of a test.
    pub fn home(&self) -> &std::path::Path {
        self.tempdir.path()
    }

    /// Write `config.toml` with the given contents.
    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.config_dir.join("config.toml");
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}
