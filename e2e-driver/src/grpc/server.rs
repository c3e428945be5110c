use e2e_echo::{EchoBackend, EchoBehavior, EchoStats};

use crate::{Error, Params, Result, Step};

/// Runs the mock echo backend on `params.ports.backend_port`.
#[derive(Debug, Default)]
pub struct GrpcServer {
    behavior: EchoBehavior,
    backend: Option<EchoBackend>,
}

impl GrpcServer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_behavior(behavior: EchoBehavior) -> Self {
        Self {
            behavior,
            backend: None,
        }
    }

    /// Counters of the running backend. The returned handle stays readable
    /// after cleanup.
    pub fn stats(&self) -> Option<EchoStats> {
        self.backend.as_ref().map(|b| b.stats().clone())
    }

    pub fn is_running(&self) -> bool {
        self.backend.is_some()
    }
}

#[tonic::async_trait]
impl Step for GrpcServer {
    async fn run(&mut self, params: &Params) -> Result<()> {
        if let Some(previous) = self.backend.take() {
            previous.shutdown().await;
        }

        let addr = params.backend_addr();
        tracing::info!(%addr, behavior = ?self.behavior, "starting gRPC echo server");

        let backend = EchoBackend::start_with(addr, self.behavior)
            .await
            .map_err(|source| Error::BackendStart { addr, source })?;

        self.backend = Some(backend);
        Ok(())
    }

    async fn cleanup(&mut self) {
        if let Some(backend) = self.backend.take() {
            let addr = backend.addr();
            backend.shutdown().await;
            tracing::info!(%addr, "stopped gRPC echo server");
        }
    }
}
