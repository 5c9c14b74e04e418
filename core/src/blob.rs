// storefront/src/blob.rs

//! Blob storage for store logos, banners, product images and videos.
//!
//! Clients send new assets inline as `data:` URLs. Those are decoded and
//! uploaded, and the stored document keeps only the resulting URL. Values
//! that are already hosted URLs pass through untouched.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use parking_lot::RwLock;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{StorefrontError, StorefrontResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetFolder {
  Logos,
  Banners,
  Products,
  Videos,
}

impl AssetFolder {
  pub fn as_str(self) -> &'static str {
    match self {
      AssetFolder::Logos => "logos",
      AssetFolder::Banners => "banners",
      AssetFolder::Products => "products",
      AssetFolder::Videos => "videos",
    }
  }

  pub fn parse(s: &str) -> StorefrontResult<Self> {
    match s {
      "logos" => Ok(AssetFolder::Logos),
      "banners" => Ok(AssetFolder::Banners),
      "products" => Ok(AssetFolder::Products),
      "videos" => Ok(AssetFolder::Videos),
      other => Err(StorefrontError::validation(format!("unknown asset folder '{other}'"))),
    }
  }
}

/// A decoded `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
  pub mime: String,
  pub bytes: Vec<u8>,
}

impl DataUrl {
  pub fn is_data_url(value: &str) -> bool {
    value.starts_with("data:")
  }

  pub fn parse(value: &str) -> StorefrontResult<Self> {
    let rest = value
      .strip_prefix("data:")
      .ok_or_else(|| StorefrontError::validation("not a data URL"))?;
    let (meta, payload) = rest
      .split_once(',')
      .ok_or_else(|| StorefrontError::validation("data URL has no payload"))?;
    let mime = meta
      .strip_suffix(";base64")
      .ok_or_else(|| StorefrontError::validation("only base64 data URLs are supported"))?;
    let bytes = STANDARD
      .decode(payload.trim())
      .map_err(|e| StorefrontError::validation(format!("invalid base64 payload: {e}")))?;
    Ok(DataUrl {
      mime: if mime.is_empty() { "application/octet-stream".into() } else { mime.to_string() },
      bytes,
    })
  }

  /// File extension derived from the MIME subtype (`image/svg+xml` → `svg`).
  pub fn extension(&self) -> &str {
    self
      .mime
      .split('/')
      .nth(1)
      .and_then(|sub| sub.split(['+', ';']).next())
      .filter(|ext| !ext.is_empty())
      .unwrap_or("bin")
  }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
  /// Stores the asset and returns its public URL.
  async fn put(&self, folder: AssetFolder, asset: DataUrl) -> StorefrontResult<String>;
}

/// Uploads `value` when it is a `data:` URL; returns hosted URLs as-is.
pub async fn resolve_asset(blobs: &dyn BlobStore, folder: AssetFolder, value: String) -> StorefrontResult<String> {
  if !DataUrl::is_data_url(&value) {
    return Ok(value);
  }
  let asset = DataUrl::parse(&value)?;
  blobs.put(folder, asset).await
}

pub async fn resolve_optional_asset(
  blobs: &dyn BlobStore,
  folder: AssetFolder,
  value: Option<String>,
) -> StorefrontResult<Option<String>> {
  match value {
    Some(v) => Ok(Some(resolve_asset(blobs, folder, v).await?)),
    None => Ok(None),
  }
}

/// Writes assets under `root/<folder>/<uuid>.<ext>` and serves them from `base_url`.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
  root: PathBuf,
  base_url: String,
}

impl FsBlobStore {
  pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
    Self {
      root: root.into(),
      base_url: base_url.into().trim_end_matches('/').to_string(),
    }
  }
}

#[async_trait]
impl BlobStore for FsBlobStore {
  #[instrument(skip(self, asset), fields(folder = folder.as_str(), size = asset.bytes.len()))]
  async fn put(&self, folder: AssetFolder, asset: DataUrl) -> StorefrontResult<String> {
    let dir = self.root.join(folder.as_str());
    tokio::fs::create_dir_all(&dir)
      .await
      .map_err(|e| StorefrontError::Blob(format!("cannot create {}: {e}", dir.display())))?;

    let file_name = format!("{}.{}", Uuid::new_v4(), asset.extension());
    let path = dir.join(&file_name);
    let mut file = tokio::fs::File::create(&path)
      .await
      .map_err(|e| StorefrontError::Blob(format!("cannot create {}: {e}", path.display())))?;
    file
      .write_all(&asset.bytes)
      .await
      .map_err(|e| StorefrontError::Blob(format!("cannot write {}: {e}", path.display())))?;
    file
      .flush()
      .await
      .map_err(|e| StorefrontError::Blob(format!("cannot write {}: {e}", path.display())))?;

    let url = format!("{}/{}/{}", self.base_url, folder.as_str(), file_name);
    debug!(%url, "Asset stored.");
    Ok(url)
  }
}

/// Keeps assets in process memory. Used by tests and by the server when no
/// upload directory is configured.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
  objects: RwLock<HashMap<String, DataUrl>>,
}

impl MemoryBlobStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, url: &str) -> Option<DataUrl> {
    self.objects.read().get(url).cloned()
  }

  pub fn len(&self) -> usize {
    self.objects.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.objects.read().is_empty()
  }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
  async fn put(&self, folder: AssetFolder, asset: DataUrl) -> StorefrontResult<String> {
    let url = format!("memory://{}/{}.{}", folder.as_str(), Uuid::new_v4(), asset.extension());
    self.objects.write().insert(url.clone(), asset);
    Ok(url)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const PNG_URL: &str = "data:image/png;base64,iVBORw0KGgo=";

  #[test]
  fn parses_base64_data_url() {
    let asset = DataUrl::parse(PNG_URL).unwrap();
    assert_eq!(asset.mime, "image/png");
    assert_eq!(asset.extension(), "png");
    assert_eq!(&asset.bytes[1..4], b"PNG");
  }

  #[test]
  fn rejects_malformed_data_urls() {
    assert!(DataUrl::parse("https://cdn.example/logo.png").is_err());
    assert!(DataUrl::parse("data:image/png;base64").is_err());
    assert!(DataUrl::parse("data:text/plain,hello").is_err());
    assert!(DataUrl::parse("data:image/png;base64,@@@").is_err());
  }

  #[tokio::test]
  async fn bad_inline_asset_is_a_validation_error() {
    let blobs = MemoryBlobStore::new();
    let err = resolve_asset(&blobs, AssetFolder::Logos, "data:image/png;base64,@@@not-base64@@@".into())
      .await
      .unwrap_err();
    assert!(matches!(err, StorefrontError::Validation(_)));
    assert!(err.is_user_facing());
    assert!(blobs.is_empty());
  }

  #[test]
  fn extension_strips_structured_suffix() {
    let asset = DataUrl { mime: "image/svg+xml".into(), bytes: vec![] };
    assert_eq!(asset.extension(), "svg");
    let odd = DataUrl { mime: "application/octet-stream".into(), bytes: vec![] };
    assert_eq!(odd.extension(), "octet-stream");
  }

  #[tokio::test]
  async fn hosted_urls_pass_through_and_data_urls_upload() {
    let blobs = MemoryBlobStore::new();
    let hosted = resolve_asset(&blobs, AssetFolder::Logos, "https://cdn.example/a.png".into())
      .await
      .unwrap();
    assert_eq!(hosted, "https://cdn.example/a.png");
    assert!(blobs.is_empty());

    let uploaded = resolve_asset(&blobs, AssetFolder::Products, PNG_URL.into()).await.unwrap();
    assert!(uploaded.starts_with("memory://products/"));
    assert!(uploaded.ends_with(".png"));
    assert_eq!(blobs.get(&uploaded).unwrap().mime, "image/png");
  }

  #[tokio::test]
  async fn fs_store_writes_under_folder() {
    let dir = tempfile::tempdir().unwrap();
    let blobs = FsBlobStore::new(dir.path(), "http://localhost:8080/assets/");
    let url = resolve_asset(&blobs, AssetFolder::Videos, "data:video/mp4;base64,AAAA".into())
      .await
      .unwrap();
    assert!(url.starts_with("http://localhost:8080/assets/videos/"));

    let file_name = url.rsplit('/').next().unwrap();
    let written = std::fs::read(dir.path().join("videos").join(file_name)).unwrap();
    assert_eq!(written, vec![0u8, 0, 0]);
  }
}
