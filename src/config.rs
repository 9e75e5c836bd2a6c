use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub video_dir: String,
    pub image_dir: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Media delivery API for the movie-streaming backend")]
pub struct Args {
    /// Host to bind to (overrides MEDIA_STORE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides MEDIA_STORE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where video objects are stored (overrides MEDIA_STORE_VIDEO_DIR)
    #[arg(long)]
    pub video_dir: Option<String>,

    /// Directory where image objects are stored (overrides MEDIA_STORE_IMAGE_DIR)
    #[arg(long)]
    pub image_dir: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("MEDIA_STORE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("MEDIA_STORE_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing MEDIA_STORE_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading MEDIA_STORE_PORT"),
        };
        let env_video_dir =
            env::var("MEDIA_STORE_VIDEO_DIR").unwrap_or_else(|_| "uploads/videos".into());
        let env_image_dir =
            env::var("MEDIA_STORE_IMAGE_DIR").unwrap_or_else(|_| "uploads/images".into());

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            video_dir: args.video_dir.unwrap_or(env_video_dir),
            image_dir: args.image_dir.unwrap_or(env_image_dir),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
