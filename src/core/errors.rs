use std::path::PathBuf;

use thiserror::Error;

/// Transient screen capture failure. Monitors log it and retry after a backoff.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no monitor available for capture")]
    NoMonitor,

    #[error("screen capture backend failed: {0}")]
    Backend(String),

    #[error("capture region must have a non-zero size, got {width}x{height}")]
    EmptyRegion { width: u32, height: u32 },

    #[error(
        "region {width}x{height} at ({x}, {y}) lies outside the {screen_width}x{screen_height} screen"
    )]
    RegionOutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        screen_width: u32,
        screen_height: u32,
    },
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error(
        "template {template_width}x{template_height} does not fit inside screen {screen_width}x{screen_height}"
    )]
    InvalidTemplate {
        template_width: u32,
        template_height: u32,
        screen_width: u32,
        screen_height: u32,
    },

    #[error("match was cancelled")]
    Cancelled,
}

/// Reference image missing or undecodable when a monitor is prepared.
#[derive(Debug, Error)]
#[error("reference image {} could not be loaded", path.display())]
pub struct ResourceError {
    pub path: PathBuf,
    #[source]
    pub source: image::ImageError,
}

#[derive(Debug, Error)]
pub enum TriggerSetupError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    InvalidTemplate(#[from] MatchError),
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("scenario '{0}' has no triggers to monitor")]
    EmptyScenario(String),

    #[error("trigger #{} ({image}) failed to start", .index + 1)]
    TriggerSetup {
        index: usize,
        image: String,
        #[source]
        source: TriggerSetupError,
    },

    #[error("failed to spawn a trigger monitor worker")]
    WorkerSpawn(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid scenario name '{0}'")]
    InvalidName(String),

    #[error("scenario '{0}' not found")]
    NotFound(String),

    #[error("i/o error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scenario file {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write reference image {}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
