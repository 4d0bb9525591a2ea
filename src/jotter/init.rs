use crate::api::JotApi;
use crate::config::JotPaths;
use crate::error::{JotError, Result};
use crate::store::fs::FsBackend;
use directories::ProjectDirs;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use tracing::debug;

/// Overrides the data directory, mainly for tests and scripted use.
pub const HOME_ENV: &str = "JOTTER_HOME";

/// Everything a CLI invocation needs. The lock is held for as long as the
/// context lives, so two processes never migrate or write concurrently.
pub struct JotContext {
    pub api: JotApi<FsBackend>,
    pub paths: JotPaths,
    _lock: File,
}

/// `explicit` wins, then `$JOTTER_HOME`, then the platform data directory.
pub fn resolve_home(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(home) = explicit {
        return Ok(home);
    }
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "jotter", "jotter")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| JotError::Api("Could not determine data directory".into()))
}

pub fn initialize(home: PathBuf) -> Result<JotContext> {
    fs::create_dir_all(&home)?;
    let paths = JotPaths::new(home);

    let lock = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(paths.lock_file())?;
    lock.try_lock_exclusive()
        .map_err(|_| JotError::Locked(paths.home().display().to_string()))?;
    debug!(home = %paths.home().display(), "acquired data directory lock");

    let api = JotApi::new(FsBackend::new(paths.clone()))?;
    Ok(JotContext {
        api,
        paths,
        _lock: lock,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_home_wins() {
        let home = resolve_home(Some(PathBuf::from("/tmp/somewhere"))).unwrap();
        assert_eq!(home, PathBuf::from("/tmp/somewhere"));
    }

    #[test]
    fn initialize_creates_home_and_lock() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("data");
        let ctx = initialize(home.clone()).unwrap();
        assert!(home.is_dir());
        assert!(ctx.paths.lock_file().exists());
    }

    #[test]
    fn second_context_is_locked_out() {
        let temp = TempDir::new().unwrap();
        let _held = initialize(temp.path().to_path_buf()).unwrap();
        let err = initialize(temp.path().to_path_buf()).err().unwrap();
        assert!(matches!(err, JotError::Locked(_)));
    }

    #[test]
    fn lock_is_released_on_drop() {
        let temp = TempDir::new().unwrap();
        drop(initialize(temp.path().to_path_buf()).unwrap());
        assert!(initialize(temp.path().to_path_buf()).is_ok());
    }
}
