//! Defines routes for the media delivery endpoints.
//!
//! ## Structure
//! - **Video endpoints**
//!   - `POST /files/video`         — multipart upload, returns the token
//!   - `GET  /files/video/{token}` — full or partial content (`Range` aware)
//!
//! - **Image endpoints**
//!   - `POST /files/image`         — multipart upload, returns the token
//!   - `GET  /files/image/{token}` — full content only
//!
//! Authorization happens upstream of these handlers; the `?token=` auth
//! query parameter some clients append is validated by the transport layer
//! and ignored here.

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        media_handlers::{serve_image, serve_video, upload_image, upload_video},
    },
    services::media_store::MediaStore,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build and return the router for all media routes.
///
/// The router carries shared state (`MediaStore`) to all handlers.
pub fn routes() -> Router<MediaStore> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Video endpoints
        .route("/files/video", post(upload_video))
        .route("/files/video/{token}", get(serve_video))
        // Image endpoints
        .route("/files/image", post(upload_image))
        .route("/files/image/{token}", get(serve_image))
}
