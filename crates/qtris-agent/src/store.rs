use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use qtris_learning::Weights;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum WeightStoreError {
    #[display("weight file I/O failed: {_0}")]
    Io(#[error(source)] io::Error),
    #[display("weight file is not a valid JSON object of numbers: {_0}")]
    Json(#[error(source)] serde_json::Error),
}

/// Weight persistence as a flat, pretty-printed JSON object.
///
/// There is no versioning: the whole mapping is read at start and rewritten at the end of
/// every episode.
#[derive(Debug, Clone)]
pub struct WeightStore {
    path: PathBuf,
}

impl WeightStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_load(&self) -> Result<Weights, WeightStoreError> {
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads the stored weights, falling back to empty weights when there are none yet or
    /// the file cannot be read.
    #[must_use]
    pub fn load(&self) -> Weights {
        match self.try_load() {
            Ok(weights) => {
                tracing::info!(path = %self.path.display(), count = weights.len(), "loaded weights");
                weights
            }
            Err(WeightStoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no stored weights, starting from scratch");
                Weights::new()
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable weights");
                Weights::new()
            }
        }
    }

    pub fn save(&self, weights: &Weights) -> Result<(), WeightStoreError> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, weights)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "qtris-store-{}-{n}-{name}.json",
            std::process::id()
        ))
    }

    #[test]
    fn test_save_and_load() {
        let store = WeightStore::new(temp_path("roundtrip"));
        let weights: Weights = [("bias", -0.25), ("position", 3.5)].into_iter().collect();

        store.save(&weights).unwrap();
        assert_eq!(store.try_load().unwrap(), weights);
        assert_eq!(store.load(), weights);

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("{\n"));
        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let store = WeightStore::new(temp_path("missing"));
        assert!(matches!(store.try_load(), Err(WeightStoreError::Io(_))));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let store = WeightStore::new(temp_path("malformed"));
        fs::write(store.path(), "[1, 2, 3]").unwrap();

        assert!(matches!(store.try_load(), Err(WeightStoreError::Json(_))));
        assert!(store.load().is_empty());
        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let store = WeightStore::new(temp_path("dir").join("weights.json"));
        let err = store.save(&Weights::new()).unwrap_err();
        assert!(err.to_string().starts_with("weight file I/O failed"));
    }
}
