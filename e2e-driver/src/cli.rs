use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use e2e_driver::{Code, parse_code};

#[derive(Debug, Parser)]
#[command(
    name = "e2e-driver",
    version,
    about = "Run the gRPC end-to-end test steps against real ports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the mock echo backend until Ctrl-C.
    Backend(BackendArgs),

    /// Drive echo calls through the proxy and check the returned status codes.
    Call(CallArgs),
}

#[derive(Debug, Args)]
pub struct BackendArgs {
    #[arg(long, env = "E2E_BACKEND_PORT")]
    pub backend_port: u16,

    /// Ignore the requested status and always answer with this code.
    #[arg(long, value_parser = parse_code)]
    pub fixed_code: Option<Code>,
}

#[derive(Debug, Args)]
pub struct CallArgs {
    #[arg(long, env = "E2E_CLIENT_PORT")]
    pub client_port: u16,

    /// Number of calls to issue.
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Status code every call asks for, by name (`not_found`) or number (`5`).
    #[arg(long, default_value = "ok", value_parser = parse_code)]
    pub want_code: Code,

    #[arg(long, default_value = "")]
    pub want_message: String,

    /// e.g. `500ms`, `5s`.
    #[arg(long, value_parser = humantime::parse_duration)]
    pub connect_timeout: Option<Duration>,

    /// Treat calls that fail without a peer status as failures.
    #[arg(long)]
    pub fail_on_transport_error: bool,
}
