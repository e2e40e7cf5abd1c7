use anyhow::{Context, Result};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::parser::parse_documents;
use crate::store::DocumentStore;

/// Reads collection exports from a directory.
///
/// A collection named `ratings` is read from `ratings.json`, or from
/// `ratings.json.gz` when the plain file is missing.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn export_path(&self, collection: &str) -> Option<PathBuf> {
        let plain = self.dir.join(format!("{collection}.json"));
        if plain.exists() {
            return Some(plain);
        }
        let gz = self.dir.join(format!("{collection}.json.gz"));
        gz.exists().then_some(gz)
    }
}

/// Reads a file, gunzipping it when the name ends in `.gz`.
pub fn read_export(path: &Path) -> Result<Vec<u8>> {
    let raw = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    if path.extension().and_then(|e| e.to_str()) != Some("gz") {
        return Ok(raw);
    }

    let mut bytes = Vec::new();
    GzDecoder::new(raw.as_slice())
        .read_to_end(&mut bytes)
        .with_context(|| format!("failed to decompress {}", path.display()))?;
    Ok(bytes)
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn list(&self, collection: &str) -> Result<Vec<Value>> {
        let path = self.export_path(collection).with_context(|| {
            format!(
                "no export for collection '{collection}' in {}",
                self.dir.display()
            )
        })?;
        debug!(path = %path.display(), "Reading export");

        let bytes = read_export(&path)?;
        parse_documents(&bytes).with_context(|| format!("failed to parse {}", path.display()))
    }
}
