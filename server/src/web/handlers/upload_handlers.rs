// storefront_server/src/web/handlers/upload_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront::{AssetFolder, DataUrl, Route, StorefrontError};
use tracing::{debug, info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequestPayload {
  /// `logos`, `banners`, `products` or `videos`.
  pub folder: String,
  pub data_url: String,
}

#[instrument(
  name = "handler::upload_asset",
  skip(app_state, auth_user, req_payload),
  fields(user_id = %auth_user.user.id, folder = %req_payload.folder)
)]
pub async fn upload_asset_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<UploadRequestPayload>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::CreateStore)?;
  let folder = AssetFolder::parse(&req_payload.folder)?;
  let asset = DataUrl::parse(&req_payload.data_url)?;
  let size = asset.bytes.len();
  let url = app_state.catalog.blobs().put(folder, asset).await?;
  info!(%url, size, "Asset uploaded.");
  Ok(HttpResponse::Created().json(json!({ "url": url })))
}

fn content_type_for(file_name: &str) -> &'static str {
  let ext = file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()).unwrap_or_default();
  match ext.as_str() {
    "png" => "image/png",
    "jpg" | "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "svg" => "image/svg+xml",
    "mp4" => "video/mp4",
    "webm" => "video/webm",
    _ => "application/octet-stream",
  }
}

/// Serves files written by the filesystem blob store.
#[instrument(name = "handler::serve_asset", skip(app_state))]
pub async fn serve_asset_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
  let (folder, file_name) = path.into_inner();
  let folder = AssetFolder::parse(&folder)?;
  if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.contains("..") {
    return Err(StorefrontError::validation("invalid asset name").into());
  }

  let full_path = app_state.config.upload_dir.join(folder.as_str()).join(&file_name);
  match tokio::fs::read(&full_path).await {
    Ok(bytes) => Ok(HttpResponse::Ok().content_type(content_type_for(&file_name)).body(bytes)),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      debug!(path = %full_path.display(), "Asset not found.");
      Ok(HttpResponse::NotFound().json(json!({ "error": "Asset not found." })))
    }
    Err(e) => Err(AppError::Internal(format!("cannot read asset {}: {e}", full_path.display()))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn content_type_follows_extension() {
    assert_eq!(content_type_for("a.PNG"), "image/png");
    assert_eq!(content_type_for("clip.webm"), "video/webm");
    assert_eq!(content_type_for("noext"), "application/octet-stream");
  }
}
