use std::{error::Error, fmt, io};

use machine_learning::MlErr;

/// The server module's result type.
pub type Result<T> = std::result::Result<T, ServerErr>;

/// Prediction node failures.
#[derive(Debug)]
pub enum ServerErr {
    Io(io::Error),
    Bind { addr: String, source: io::Error },
    Listener(io::Error),
    AlreadyPublished,
    Training(MlErr),
    TrainingAborted(String),
    InvalidConfig { key: &'static str, value: String },
}

impl fmt::Display for ServerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerErr::Io(e) => write!(f, "io error: {e}"),
            ServerErr::Bind { addr, source } => write!(f, "failed to bind {addr}: {source}"),
            ServerErr::Listener(e) => write!(f, "listener failed: {e}"),
            ServerErr::AlreadyPublished => f.write_str("a trained model was already published"),
            ServerErr::Training(e) => write!(f, "training failed: {e}"),
            ServerErr::TrainingAborted(detail) => write!(f, "training task aborted: {detail}"),
            ServerErr::InvalidConfig { key, value } => {
                write!(f, "invalid value for {key}: {value:?}")
            }
        }
    }
}

impl Error for ServerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ServerErr::Io(e) => Some(e),
            ServerErr::Bind { source, .. } => Some(source),
            ServerErr::Listener(e) => Some(e),
            ServerErr::Training(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ServerErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<MlErr> for ServerErr {
    fn from(value: MlErr) -> Self {
        Self::Training(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<ServerErr> for io::Error {
    fn from(value: ServerErr) -> Self {
        match value {
            ServerErr::Io(e) | ServerErr::Listener(e) | ServerErr::Bind { source: e, .. } => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
