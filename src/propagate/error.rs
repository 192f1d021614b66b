use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropagateError {
    #[error("TLE directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid TLE format in {file}: {message}")]
    InvalidTle { file: String, message: String },
    #[error("satellite not found: {0}")]
    SatelliteNotFound(String),
    #[error("Propagation error: {0}")]
    Propagation(String),
}

impl From<sgp4::Error> for PropagateError {
    fn from(err: sgp4::Error) -> Self {
        PropagateError::Propagation(err.to_string())
    }
}
