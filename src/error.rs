use std::path::PathBuf;

use x11rb::errors::{ConnectError, ConnectionError, ReplyError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Malformed layout file {}: {source}", .path.display())]
    MalformedLayouts {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to show notification: {0}")]
    Notification(#[from] notify_rust::error::Error),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[from] nix::errno::Errno),

    #[error("X screen {0} not found")]
    ScreenNotFound(usize),

    #[error(transparent)]
    X11rbConnect(#[from] ConnectError),

    #[error(transparent)]
    X11rbConnection(#[from] ConnectionError),

    #[error(transparent)]
    X11rbReplyError(#[from] ReplyError),
}

pub type Result<T> = std::result::Result<T, Error>;
