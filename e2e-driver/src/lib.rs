//! gRPC steps for the end-to-end test driver.
//!
//! [`GrpcServer`] runs a mock echo backend, [`GrpcCall`] drives echo calls
//! through the proxy under test and checks the returned status codes.

mod error;
mod grpc;
mod params;
mod scenario;
mod status;
mod step;

pub use error::{Error, Result};
pub use grpc::{GrpcCall, GrpcServer, TransportErrorPolicy};
pub use params::{Params, Ports};
pub use scenario::Scenario;
pub use status::{ExpectedStatus, parse_code};
pub use step::Step;

pub use e2e_echo::{EchoBehavior, EchoStats};
pub use tonic::Code;
