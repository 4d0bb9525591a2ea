use super::{BatchOp, DataFile, StorageBackend, WriteBatch};
use crate::config::JotPaths;
use crate::error::{JotError, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FsBackend {
    paths: JotPaths,
}

impl FsBackend {
    pub fn new(paths: JotPaths) -> Self {
        Self { paths }
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(JotError::Io)?;
        }
        Ok(())
    }

    fn tmp_path(&self, file: DataFile) -> PathBuf {
        self.paths
            .home()
            .join(format!(".{}-{}.tmp", file.file_name(), Uuid::new_v4()))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut handle = fs::File::create(path).map_err(JotError::Io)?;
    handle.write_all(bytes).map_err(JotError::Io)?;
    handle.sync_all().map_err(JotError::Io)?;
    Ok(())
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, file: DataFile) -> Result<Option<Vec<u8>>> {
        match fs::read(self.paths.file(file)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(JotError::Io(e)),
        }
    }

    fn modified(&self, file: DataFile) -> Result<Option<i64>> {
        let meta = match fs::metadata(self.paths.file(file)) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(JotError::Io(e)),
        };
        let mtime: DateTime<Utc> = meta.modified().map_err(JotError::Io)?.into();
        Ok(Some(mtime.timestamp()))
    }

    fn exists(&self, file: DataFile) -> Result<bool> {
        Ok(self.paths.file(file).exists())
    }

    fn commit(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.ensure_dir(self.paths.home())?;

        // 1. Stage every write next to its target
        let ops = batch.into_ops();
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::new();
        for op in &ops {
            if let BatchOp::Write(file, bytes) = op {
                let tmp = self.tmp_path(*file);
                if let Err(e) = write_synced(&tmp, bytes) {
                    let _ = fs::remove_file(&tmp);
                    discard(&staged);
                    return Err(e);
                }
                staged.push((tmp, self.paths.file(*file)));
            }
        }

        // 2. Make them visible in order
        let mut pending = staged.iter();
        for op in &ops {
            match op {
                BatchOp::Write(..) => {
                    if let Some((tmp, dest)) = pending.next() {
                        if let Err(e) = fs::rename(tmp, dest) {
                            let _ = fs::remove_file(tmp);
                            discard(pending.as_slice());
                            return Err(JotError::Io(e));
                        }
                    }
                }
                BatchOp::Remove(file) => match fs::remove_file(self.paths.file(*file)) {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => {
                        discard(pending.as_slice());
                        return Err(JotError::Io(e));
                    }
                },
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FsBackend) {
        let dir = TempDir::new().unwrap();
        let backend = FsBackend::new(JotPaths::new(dir.path().to_path_buf()));
        (dir, backend)
    }

    #[test]
    fn missing_files_read_as_none() {
        let (_dir, backend) = setup();
        assert_eq!(backend.read(DataFile::Archive).unwrap(), None);
        assert_eq!(backend.modified(DataFile::Archive).unwrap(), None);
        assert!(!backend.exists(DataFile::Archive).unwrap());
    }

    #[test]
    fn commit_writes_and_removes_in_order() {
        let (dir, backend) = setup();
        fs::write(dir.path().join("jotrc"), "book: js\n").unwrap();

        let mut batch = WriteBatch::new();
        batch.write(DataFile::Archive, b"{}".to_vec());
        batch.write(DataFile::Schema, br#"{"current_version":1}"#.to_vec());
        batch.remove(DataFile::LegacyRc);
        backend.commit(batch).unwrap();

        assert_eq!(backend.read(DataFile::Archive).unwrap(), Some(b"{}".to_vec()));
        assert!(backend.exists(DataFile::Schema).unwrap());
        assert!(!dir.path().join("jotrc").exists());
        assert!(backend.modified(DataFile::Archive).unwrap().unwrap() > 0);
    }

    #[test]
    fn commit_leaves_no_tmp_files_behind() {
        let (dir, backend) = setup();
        let mut batch = WriteBatch::new();
        batch.write(DataFile::Actions, b"[]".to_vec());
        backend.commit(batch).unwrap();

        for entry in fs::read_dir(dir.path()).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_str().unwrap().to_string();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }

    #[test]
    fn removing_an_absent_file_is_fine() {
        let (_dir, backend) = setup();
        let mut batch = WriteBatch::new();
        batch.remove(DataFile::LegacyYamlArchive);
        backend.commit(batch).unwrap();
    }

    #[test]
    fn creates_the_home_directory_on_first_write() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("nested").join("home");
        let backend = FsBackend::new(JotPaths::new(home.clone()));

        let mut batch = WriteBatch::new();
        batch.write(DataFile::Schema, br#"{"current_version":0}"#.to_vec());
        backend.commit(batch).unwrap();
        assert!(home.join("schema").exists());
    }
}
