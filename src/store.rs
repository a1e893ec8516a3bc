use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::models::GrowthRecord;

/// Key-value sink for assessment records and image blobs.
///
/// Keys are slash-separated paths in a tree; blobs are stored base64-encoded
/// to match the wire shape existing consumers of the tree read.
pub trait RecordStore {
    fn put_record(&self, key: &str, record: &GrowthRecord) -> Result<()>;
    fn put_blob(&self, key: &str, bytes: &[u8]) -> Result<()>;
    fn get_blob(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// Store rooted in a local directory, one file per key.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file_for(&self, key: &str) -> Result<PathBuf> {
        // Keys come from the appliance's own timestamp scheme; reject anything
        // that would escape the root.
        if key.is_empty()
            || key
                .split('/')
                .any(|part| part.is_empty() || part == "." || part == "..")
        {
            anyhow::bail!("invalid store key {key:?}");
        }
        Ok(self.root.join(key))
    }

    fn write_key(&self, key: &str, contents: &str) -> Result<()> {
        let path = self.file_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))
    }
}

impl RecordStore for DirStore {
    fn put_record(&self, key: &str, record: &GrowthRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        self.write_key(key, &json)
    }

    fn put_blob(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.write_key(key, &BASE64.encode(bytes))
    }

    fn get_blob(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.file_for(key)?;
        let encoded = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        let bytes = BASE64
            .decode(encoded.trim())
            .with_context(|| format!("blob at {} is not valid base64", path.display()))?;
        Ok(Some(bytes))
    }
}
