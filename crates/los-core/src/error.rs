use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LosError {
    #[error("corrupt checkpoint {}: expected a step number >= 1, found {content:?}", .path.display())]
    CorruptCheckpoint { path: PathBuf, content: String },

    #[error("command failed: {command} ({status}){}", stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("failed to start {command}: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error("word list {0} has no words of the requested length")]
    EmptyWordList(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Os(#[from] nix::errno::Errno),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

pub type Result<T> = std::result::Result<T, LosError>;
