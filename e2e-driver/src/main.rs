mod cli;
mod exit_codes;
mod telemetry;

use anyhow::Context as _;
use clap::Parser;
use e2e_driver::{
    EchoBehavior, ExpectedStatus, GrpcCall, GrpcServer, Params, Ports, Step,
    TransportErrorPolicy,
};

use crate::exit_codes::ExitCode;

#[tokio::main]
async fn main() {
    let cli = match cli::Cli::try_parse() {
        Ok(v) => v,
        Err(err) => {
            use clap::error::ErrorKind;
            let _ = err.print();
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Success,
                _ => ExitCode::InvalidInput,
            };
            std::process::exit(code.as_i32());
        }
    };

    telemetry::init_tracing("info");

    let res = match cli.command {
        cli::Command::Backend(args) => backend(args).await,
        cli::Command::Call(args) => call(args).await,
    };

    let code = match res {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::StepFailed
        }
    };

    std::process::exit(code.as_i32());
}

async fn backend(args: cli::BackendArgs) -> anyhow::Result<()> {
    // Only the backend port is used by this step.
    let params = Params::new(Ports::direct(args.backend_port));

    let behavior = args
        .fixed_code
        .map_or(EchoBehavior::Echo, EchoBehavior::Fixed);
    let mut step = GrpcServer::with_behavior(behavior);

    step.run(&params).await.context("run backend step")?;

    let res = tokio::signal::ctrl_c().await.context("wait for ctrl-c");
    step.cleanup().await;
    res
}

async fn call(args: cli::CallArgs) -> anyhow::Result<()> {
    let params = Params::new(Ports::direct(args.client_port));

    let policy = if args.fail_on_transport_error {
        TransportErrorPolicy::Fail
    } else {
        TransportErrorPolicy::Ignore
    };

    let mut step = GrpcCall::new(
        args.count,
        ExpectedStatus::new(args.want_code, args.want_message),
    )
    .transport_errors(policy);
    if let Some(timeout) = args.connect_timeout {
        step = step.connect_timeout(timeout);
    }

    let res = step.run(&params).await.context("run call step");
    step.cleanup().await;
    res
}
