use e2e_echo::echo::EchoResponse;
use tonic::{Code, Response, Status};

/// What to do when a call fails below the gRPC layer and no peer status was
/// received.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum TransportErrorPolicy {
    /// Skip the status comparison for that call.
    #[default]
    Ignore,
    /// Fail the step.
    Fail,
}

#[derive(Debug)]
pub(crate) enum CallOutcome {
    /// The peer answered with a status (`Ok` for a plain response).
    Status { code: Code, message: String },
    /// The call failed locally; tonic synthesized a status around the cause.
    NoStatus(Status),
}

pub(crate) fn classify(res: Result<Response<EchoResponse>, Status>) -> CallOutcome {
    match res {
        Ok(_) => CallOutcome::Status {
            code: Code::Ok,
            message: String::new(),
        },
        // Statuses decoded from the peer's trailers never carry a source.
        Err(status) if std::error::Error::source(&status).is_some() => {
            CallOutcome::NoStatus(status)
        }
        Err(status) => CallOutcome::Status {
            code: status.code(),
            message: status.message().to_string(),
        },
    }
}
