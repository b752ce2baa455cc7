//! Result artifact storage.
//!
//! Each finished job is written verbatim as pretty JSON to
//! `<results_dir>/<basename>_<YYYYmmdd_HHMMSS>_result.json`. Files are opened
//! with create-new semantics; if two sources with the same basename finish in
//! the same second, later ones get a `_1`, `_2`, ... suffix instead of
//! overwriting the first.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const MAX_SUFFIX: u32 = 10_000;

/// Writes JSON artifacts into a results directory
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the results directory if it does not exist yet
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create results directory {}", self.dir.display()))
    }

    /// Save `results` for `source`, stamped with the current local time
    pub fn save(&self, source: &Path, results: &Value) -> Result<PathBuf> {
        self.save_at(source, results, Local::now())
    }

    /// Save `results` for `source`, stamped with `timestamp`
    pub fn save_at(
        &self,
        source: &Path,
        results: &Value,
        timestamp: DateTime<Local>,
    ) -> Result<PathBuf> {
        self.ensure_dir()?;

        let base_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", source.display()))?;
        let stem = format!("{}_{}", base_name, timestamp.format(TIMESTAMP_FORMAT));

        let json = serde_json::to_string_pretty(results).context("Failed to serialize results")?;

        for attempt in 0..MAX_SUFFIX {
            let file_name = if attempt == 0 {
                format!("{stem}_result.json")
            } else {
                format!("{stem}_{attempt}_result.json")
            };
            let path = self.dir.join(file_name);

            let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to create {}", path.display()));
                }
            };

            write_or_discard(&path, file, json.as_bytes())?;

            crate::verbose!("Wrote {} bytes to {}", json.len(), path.display());
            return Ok(path);
        }

        anyhow::bail!(
            "Too many result files for {} at {}",
            base_name,
            timestamp.format(TIMESTAMP_FORMAT)
        )
    }
}

/// Write `bytes` into the freshly created `path`, removing it again on failure
/// so a partial artifact never claims the name.
fn write_or_discard(path: &Path, mut out: impl Write, bytes: &[u8]) -> Result<()> {
    if let Err(e) = out.write_all(bytes).and_then(|()| out.flush()) {
        drop(out);
        if let Err(remove_err) = fs::remove_file(path) {
            crate::verbose!("Could not remove partial {}: {}", path.display(), remove_err);
        }
        return Err(e).with_context(|| format!("Failed to write {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_artifact_name_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("results"));
        let payload = json!({"image": {"score": 0.42, "generator": "sdxl"}});

        let path = store
            .save_at(Path::new("/media/in/photo.png"), &payload, fixed_time())
            .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "photo.png_20240309_140507_result.json"
        );
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, serde_json::to_string_pretty(&payload).unwrap());
        assert_eq!(serde_json::from_str::<Value>(&written).unwrap(), payload);
    }

    #[test]
    fn test_same_second_collision_gets_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());

        let first = store
            .save_at(Path::new("a/clip.mp4"), &json!({"n": 1}), fixed_time())
            .unwrap();
        let second = store
            .save_at(Path::new("b/clip.mp4"), &json!({"n": 2}), fixed_time())
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(
            second.file_name().unwrap().to_str().unwrap(),
            "clip.mp4_20240309_140507_1_result.json"
        );
        let first_back: Value = serde_json::from_str(&fs::read_to_string(&first).unwrap()).unwrap();
        assert_eq!(first_back, json!({"n": 1}));
    }

    struct DiskFull;

    impl Write for DiskFull {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("No space left on device"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_leaves_no_partial_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4_20240309_140507_result.json");
        fs::write(&path, b"{\"trunc").unwrap();

        let err = write_or_discard(&path, DiskFull, b"{}").unwrap_err();
        assert!(format!("{err:#}").contains("No space left on device"));
        assert!(!path.exists());

        // the name is free again for the next save
        let store = ResultStore::new(dir.path());
        let saved = store
            .save_at(Path::new("clip.mp4"), &json!({"ok": true}), fixed_time())
            .unwrap();
        assert_eq!(saved, path);
    }

    #[test]
    fn test_source_without_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        assert!(store.save_at(Path::new("/"), &json!({}), fixed_time()).is_err());
    }
}
