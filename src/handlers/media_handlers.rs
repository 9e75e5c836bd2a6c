//! HTTP handlers for media upload and delivery.
//!
//! Delivery streams file bodies and never buffers a whole object in memory;
//! range requests are answered with 206/416 per RFC 9110 semantics. Upload
//! accepts one multipart file per call and delegates persistence to
//! `MediaStore`.

use crate::{
    errors::AppError,
    services::{
        media_store::{MediaKind, MediaStore},
        media_type,
        range::{is_satisfiable, parse_range_header, range_reader},
    },
};
use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use serde::Serialize;
use std::io;
use tokio_util::io::ReaderStream;
use tracing::warn;

/// Payload returned by the upload endpoints: the new object's token.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET `/files/video/{token}` — full or partial video content.
///
/// With no `Range` header the whole file is streamed as 200. A parseable,
/// satisfiable range yields 206 with a body bounded to exactly the requested
/// slice; an out-of-bounds range yields 416; a malformed header yields 400.
/// Everything else on this path, including I/O faults, degrades to 404 so no
/// raw error ever reaches the transport layer.
pub async fn serve_video(
    State(store): State<MediaStore>,
    Path(token): Path<String>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    let path = store
        .resolve(MediaKind::Video, &token)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    let filename = stored_name(&path);
    let content_type = media_type::video_content_type(Some(filename.as_str()));
    let file_len = store
        .file_len(&path)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    let range = headers
        .get(header::RANGE)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty());

    let Some(raw_range) = range else {
        return full_response(&path, content_type, &filename, file_len).await;
    };

    let (start, end) = parse_range_header(raw_range, file_len).map_err(|err| {
        warn!("rejecting range request: {err}");
        StatusCode::BAD_REQUEST
    })?;

    if !is_satisfiable(start, end, file_len) {
        return Response::builder()
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(header::CONTENT_RANGE, format!("bytes */{}", file_len))
            .body(Body::empty())
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR);
    }

    let content_length = end - start + 1;
    let stream = range_reader(&path, start, content_length)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", filename),
        )
        .header(header::ACCEPT_RANGES, "bytes")
        .header(
            header::CONTENT_RANGE,
            format!("bytes {}-{}/{}", start, end, file_len),
        )
        .header(header::CONTENT_LENGTH, content_length.to_string())
        .body(Body::from_stream(stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// GET `/files/image/{token}` — full image content. Ranges are never
/// honored for images; the header is simply ignored.
pub async fn serve_image(
    State(store): State<MediaStore>,
    Path(token): Path<String>,
) -> Result<Response, StatusCode> {
    let path = store
        .resolve(MediaKind::Image, &token)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    let filename = stored_name(&path);
    let content_type = media_type::image_content_type(Some(filename.as_str()));
    let file_len = store
        .file_len(&path)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    full_response(&path, content_type, &filename, file_len).await
}

/// POST `/files/video` — multipart video upload, returns the new token.
pub async fn upload_video(
    State(store): State<MediaStore>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    upload(store, MediaKind::Video, multipart).await
}

/// POST `/files/image` — multipart image upload, returns the new token.
pub async fn upload_image(
    State(store): State<MediaStore>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    upload(store, MediaKind::Image, multipart).await
}

/// Store the first multipart field that carries a file name.
async fn upload(
    store: MediaStore,
    kind: MediaKind,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::new(StatusCode::BAD_REQUEST, err.to_string()))?
    {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let stream = field.map(|chunk| chunk.map_err(io::Error::other));
        let token = store.store_stream(kind, &original_name, stream).await?;

        return Ok(Json(MessageResponse {
            message: token.to_string(),
        }));
    }

    Err(AppError::new(
        StatusCode::BAD_REQUEST,
        "multipart request contains no file field",
    ))
}

/// Build the full-content (200) form shared by videos without a range and
/// all images.
async fn full_response(
    path: &std::path::Path,
    content_type: &'static str,
    filename: &str,
    file_len: u64,
) -> Result<Response, StatusCode> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", filename),
        )
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_LENGTH, file_len.to_string())
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// On-disk name of a resolved object (`<token>.<ext>`), used for the
/// Content-Disposition header and content-type sniffing.
fn stored_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
