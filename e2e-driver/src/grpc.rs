mod call;
mod outcome;
mod server;

pub use call::GrpcCall;
pub use outcome::TransportErrorPolicy;
pub use server::GrpcServer;
