use std::time::Duration;

use e2e_echo::echo::EchoRequest;
use e2e_echo::echo::echo_client::EchoClient;
use tonic::transport::Endpoint;

use super::TransportErrorPolicy;
use super::outcome::{CallOutcome, classify};
use crate::{Error, ExpectedStatus, Params, Result, Step};

/// Issues `req_count` echo calls through `params.ports.client_port` and
/// checks every returned status code against `want_status`.
#[derive(Debug, Clone)]
pub struct GrpcCall {
    pub req_count: usize,
    pub want_status: ExpectedStatus,
    pub connect_timeout: Option<Duration>,
    pub transport_errors: TransportErrorPolicy,
}

impl GrpcCall {
    #[must_use]
    pub fn new(req_count: usize, want_status: impl Into<ExpectedStatus>) -> Self {
        Self {
            req_count,
            want_status: want_status.into(),
            connect_timeout: None,
            transport_errors: TransportErrorPolicy::default(),
        }
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn transport_errors(mut self, policy: TransportErrorPolicy) -> Self {
        self.transport_errors = policy;
        self
    }

    async fn connect(&self, params: &Params) -> Result<EchoClient<tonic::transport::Channel>> {
        let target = format!("http://{}", params.client_addr());

        let mut endpoint = Endpoint::from_shared(target.clone())?;
        if let Some(timeout) = self.connect_timeout {
            endpoint = endpoint.connect_timeout(timeout);
        }

        let channel = endpoint
            .connect()
            .await
            .map_err(|source| Error::Connect { target, source })?;

        Ok(EchoClient::new(channel))
    }
}

#[tonic::async_trait]
impl Step for GrpcCall {
    async fn run(&mut self, params: &Params) -> Result<()> {
        // Dropped on every return below, which closes the connection.
        let mut client = self.connect(params).await?;
        let expected = self.want_status.code;

        for call in 1..=self.req_count {
            let req = EchoRequest {
                return_status: Some(self.want_status.to_proto()),
                message: format!("call {call}"),
            };

            match classify(client.echo(req).await) {
                CallOutcome::Status { code, message } if code != expected => {
                    return Err(Error::StatusMismatch {
                        call,
                        expected,
                        actual: code,
                        message,
                    });
                }
                CallOutcome::Status { code, .. } => {
                    tracing::debug!(call, ?code, "gRPC call returned expected status");
                }
                CallOutcome::NoStatus(status) => match self.transport_errors {
                    TransportErrorPolicy::Ignore => {
                        tracing::warn!(
                            call,
                            error = %status,
                            policy = %self.transport_errors,
                            "gRPC call failed without a peer status, skipping code check"
                        );
                    }
                    TransportErrorPolicy::Fail => {
                        return Err(Error::Transport { call, status });
                    }
                },
            }
        }

        tracing::info!(
            calls = self.req_count,
            code = ?expected,
            "all gRPC calls returned expected status"
        );
        Ok(())
    }

    async fn cleanup(&mut self) {}
}
