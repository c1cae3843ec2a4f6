use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("a carousel needs at least one slide")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read site file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid site file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Playlist(#[from] PlaylistError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt record in {path:?} at line {line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid collection name {0:?}")]
    InvalidCollection(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum RsvpError {
    #[error("your name is required")]
    MissingName,
    #[error("a valid email address is required")]
    InvalidEmail,
    #[error("party size must be between 1 and 6, got {0}")]
    PartySize(u8),
    #[error("the RSVP deadline ({}) has passed", .0.format("%-d %B %Y"))]
    DeadlinePassed(NaiveDate),
    #[error(transparent)]
    Store(#[from] StoreError),
}
