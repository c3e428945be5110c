//! Mock gRPC echo backend.
//!
//! The backend answers every `Echo` call with the status the caller asked
//! for in `return_status`, unless configured with [`EchoBehavior::Fixed`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tonic::Code;

pub mod grpc;
pub use grpc::{EchoBackend, echo, reply_status};

/// How the backend picks the status of each reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EchoBehavior {
    /// Answer with the status carried by the request.
    #[default]
    Echo,

    /// Ignore the request and always answer with this code.
    Fixed(Code),

    /// Echo the first `after` requests, then answer every later one with
    /// `code`.
    FixedFrom { after: u64, code: Code },
}

#[derive(Debug, Clone, Default)]
pub struct EchoStats {
    requests_total: Arc<AtomicU64>,
    non_ok_total: Arc<AtomicU64>,
}

impl EchoStats {
    /// Returns the 1-based sequence number of the request just counted.
    fn inc_requests_total(&self) -> u64 {
        self.requests_total.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn inc_non_ok_total(&self) {
        self.non_ok_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    /// Replies sent with a code other than `Ok`.
    pub fn non_ok_total(&self) -> u64 {
        self.non_ok_total.load(Ordering::Relaxed)
    }
}
