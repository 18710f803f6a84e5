//! JSONL (JSON Lines) storage.
//!
//! Each table lives in its own file, one JSON object per line.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::StorageError;

/// Tables persisted by the file-backed store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Players,
    Matches,
}

impl Table {
    /// Get the filename for this table.
    pub fn filename(&self) -> &'static str {
        match self {
            Table::Players => "players.jsonl",
            Table::Matches => "matches.jsonl",
        }
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single entity to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended entity to {:?}", self.path);
        Ok(())
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;
        let count = write_lines(&self.path, entities)?;
        debug!("Wrote {} entities to {:?}", count, self.path);
        Ok(count)
    }

    /// Write entities to a sibling temp file without touching the live file.
    /// The content replaces the live file only when the returned
    /// [`StagedFile`] is committed.
    pub fn stage(&self, entities: &[T]) -> Result<StagedFile, StorageError> {
        self.ensure_dir()?;
        let staged = StagedFile::new(self.path.clone());
        write_lines(&staged.tmp, entities)?;
        debug!("Staged {} entities for {:?}", entities.len(), self.path);
        Ok(staged)
    }
}

fn write_lines<T: Serialize>(path: &Path, entities: &[T]) -> Result<usize, StorageError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut count = 0;

    for entity in entities {
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        count += 1;
    }

    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(count)
}

/// A fully written replacement for a JSONL file, waiting to be swapped in.
///
/// Dropping an uncommitted stage removes the temp file and leaves the live
/// file as it was.
#[derive(Debug)]
pub struct StagedFile {
    target: PathBuf,
    tmp: PathBuf,
    committed: bool,
}

impl StagedFile {
    fn new(target: PathBuf) -> Self {
        let mut tmp = target.clone().into_os_string();
        tmp.push(".tmp");
        Self {
            target,
            tmp: PathBuf::from(tmp),
            committed: false,
        }
    }

    pub fn tmp_path(&self) -> &Path {
        &self.tmp
    }

    /// Atomically replace the live file with the staged content.
    pub fn commit(mut self) -> Result<(), StorageError> {
        fs::rename(&self.tmp, &self.target)?;
        self.committed = true;
        debug!("Committed {:?}", self.target);
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = fs::remove_file(&self.tmp) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to remove staged file {:?}: {}", self.tmp, e);
                }
            }
        }
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities from the file. A missing file reads as empty.
    ///
    /// A line that does not parse fails the whole read: rewriting a table
    /// from a partial read would silently drop rows.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    return Err(StorageError::Corrupt(format!(
                        "line {} of {:?}: {}",
                        idx + 1,
                        self.path,
                        e
                    )));
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestEntity {
        id: u32,
        name: String,
    }

    fn entity(id: u32, name: &str) -> TestEntity {
        TestEntity {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_jsonl_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.jsonl");

        let entities = vec![entity(1, "First"), entity(2, "Second")];

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        assert_eq!(writer.write_all(&entities).unwrap(), 2);

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), entities);
    }

    #[test]
    fn test_jsonl_append() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("append.jsonl");

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);

        writer.append(&entity(1, "First")).unwrap();
        writer.append(&entity(2, "Second")).unwrap();

        assert_eq!(reader.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_jsonl_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<TestEntity> =
            JsonlReader::new(temp_dir.path().join("nonexistent.jsonl"));

        assert!(!reader.exists());
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_all_skips_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.jsonl");
        fs::write(&path, "{\"id\":1,\"name\":\"A\"}\n\n{\"id\":2,\"name\":\"B\"}\n").unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_read_all_rejects_bad_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad_lines.jsonl");

        fs::write(
            &path,
            r#"{"id":1,"name":"Good"}
{"id":2,"na
{"id":3,"name":"Also Good"}
"#,
        )
        .unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        let err = reader.read_all().unwrap_err();
        match err {
            StorageError::Corrupt(msg) => assert!(msg.starts_with("line 2 of")),
            other => panic!("expected Corrupt, got {:?}", other),
        }
    }

    #[test]
    fn test_write_all_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("x.jsonl");

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        writer.write_all(&[entity(1, "A")]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_staged_file_commit_replaces_live_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("staged.jsonl");

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        writer.write_all(&[entity(1, "Old")]).unwrap();

        let staged = writer.stage(&[entity(2, "New")]).unwrap();
        assert_eq!(reader.read_all().unwrap()[0].name, "Old");

        let tmp = staged.tmp_path().to_path_buf();
        staged.commit().unwrap();

        assert_eq!(reader.read_all().unwrap(), vec![entity(2, "New")]);
        assert!(!tmp.exists());
    }

    #[test]
    fn test_staged_file_dropped_without_commit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("abandoned.jsonl");

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        writer.write_all(&[entity(1, "Kept")]).unwrap();

        let staged = writer.stage(&[entity(2, "Discarded")]).unwrap();
        let tmp = staged.tmp_path().to_path_buf();
        assert!(tmp.exists());
        drop(staged);

        assert!(!tmp.exists());
        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), vec![entity(1, "Kept")]);
    }

    #[test]
    fn test_table_filenames() {
        assert_eq!(Table::Players.filename(), "players.jsonl");
        assert_eq!(Table::Matches.filename(), "matches.jsonl");
    }
}
