use std::net::SocketAddr;

use tonic::Code;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not able to start gRPC server on {addr}: {source}")]
    BackendStart {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] tonic::transport::Error),

    #[error("could not establish client connection to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error(
        "failed gRPC call {call}: status code mismatch, expected {expected:?}, got {actual:?} ({message:?})"
    )]
    StatusMismatch {
        call: usize,
        expected: Code,
        actual: Code,
        message: String,
    },

    #[error("failed gRPC call {call}: transport error without status: {status}")]
    Transport { call: usize, status: tonic::Status },
}

impl Error {
    /// Status code observed by the failing call, if any.
    #[must_use]
    pub fn actual_code(&self) -> Option<Code> {
        match self {
            Self::StatusMismatch { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}
