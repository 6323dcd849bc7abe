use std::path::PathBuf;

use pixel_dither::BufferError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Failed to start engine worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Engine worker has shut down")]
    Closed,

    #[error("Engine worker dropped request {0} without a reply")]
    NoReply(u64),
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("PNG decode error: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("Unsupported PNG layout: {0:?} at {1:?}")]
    Unsupported(png::ColorType, png::BitDepth),

    #[error("Pixel buffer error: {0}")]
    Buffer(#[from] BufferError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_error_closed() {
        let message = WorkerError::Closed.to_string();
        assert_eq!(message, "Engine worker has shut down");
    }

    #[test]
    fn test_worker_error_no_reply() {
        assert_eq!(
            WorkerError::NoReply(7).to_string(),
            "Engine worker dropped request 7 without a reply"
        );
    }

    #[test]
    fn test_codec_error_from_buffer() {
        let err: CodecError = BufferError::LengthMismatch {
            width: 2,
            height: 2,
            expected: 16,
            actual: 3,
        }
        .into();
        assert!(matches!(err, CodecError::Buffer(_)));
        assert!(err.to_string().starts_with("Pixel buffer error: "));
    }

    #[test]
    fn test_settings_error_read() {
        let err = SettingsError::Read {
            path: PathBuf::from("/nope/settings.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read settings file /nope/settings.yaml: missing"
        );
    }

    #[test]
    fn test_settings_error_unknown_profile() {
        let err = SettingsError::UnknownProfile("gameboy".to_string());
        assert_eq!(err.to_string(), "Unknown profile: gameboy");
    }
}
