use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Code, Request, Response, Status};

use crate::{EchoBehavior, EchoStats};

pub mod echo {
    tonic::include_proto!("e2e.echo");
}

fn requested(req: &echo::EchoRequest) -> (Code, String) {
    match &req.return_status {
        Some(rs) => (Code::from_i32(rs.code), rs.message.clone()),
        None => (Code::Ok, String::new()),
    }
}

/// Status the backend answers `req` with, or `None` for `Ok`. `seq` is the
/// 1-based position of `req` among all requests the backend has seen.
#[must_use]
pub fn reply_status(behavior: EchoBehavior, req: &echo::EchoRequest, seq: u64) -> Option<Status> {
    let (code, message) = match behavior {
        EchoBehavior::Echo => requested(req),
        EchoBehavior::Fixed(code) => (code, format!("fixed reply: {code:?}")),
        EchoBehavior::FixedFrom { after, .. } if seq <= after => requested(req),
        EchoBehavior::FixedFrom { code, .. } => {
            (code, format!("fixed reply from request {seq}: {code:?}"))
        }
    };

    if code == Code::Ok {
        None
    } else {
        Some(Status::new(code, message))
    }
}

#[derive(Debug)]
struct EchoSvc {
    behavior: EchoBehavior,
    stats: EchoStats,
}

#[tonic::async_trait]
impl echo::echo_server::Echo for EchoSvc {
    async fn echo(
        &self,
        request: Request<echo::EchoRequest>,
    ) -> Result<Response<echo::EchoResponse>, Status> {
        let seq = self.stats.inc_requests_total();

        let req = request.into_inner();
        if let Some(status) = reply_status(self.behavior, &req, seq) {
            self.stats.inc_non_ok_total();
            return Err(status);
        }

        Ok(Response::new(echo::EchoResponse {
            message: req.message,
        }))
    }
}

/// Handle to a running echo backend.
///
/// Valid between a successful [`EchoBackend::start`] and
/// [`EchoBackend::shutdown`]. Dropping a handle that was never shut down
/// aborts the serving task.
#[derive(Debug)]
pub struct EchoBackend {
    addr: SocketAddr,
    stats: EchoStats,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl EchoBackend {
    pub async fn start(addr: SocketAddr) -> std::io::Result<Self> {
        Self::start_with(addr, EchoBehavior::default()).await
    }

    /// Binds `addr` and starts serving. The bind happens before the serving
    /// task is spawned, so a taken port is reported here.
    pub async fn start_with(addr: SocketAddr, behavior: EchoBehavior) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;

        let stats = EchoStats::default();
        let svc = echo::echo_server::EchoServer::new(EchoSvc {
            behavior,
            stats: stats.clone(),
        });

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let incoming = TcpListenerStream::new(listener);

            let server = tonic::transport::Server::builder()
                .add_service(svc)
                .serve_with_incoming_shutdown(incoming, async move {
                    let _ = shutdown_rx.await;
                });

            if let Err(err) = server.await {
                tracing::warn!(%addr, error = %err, "echo backend stopped with error");
            }
        });

        let backend = Self {
            addr,
            stats,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        };
        tracing::debug!(grpc_target = %backend.target(), ?behavior, "echo backend listening");

        Ok(backend)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `host:port` form accepted by gRPC clients.
    pub fn target(&self) -> String {
        format!("{}:{}", self.addr.ip(), self.addr.port())
    }

    pub fn stats(&self) -> &EchoStats {
        &self.stats
    }

    /// Signals a graceful shutdown and waits until the listener is released.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for EchoBackend {
    fn drop(&mut self) {
        if self.shutdown_tx.is_some()
            && let Some(task) = self.task.take()
        {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(code: Code, message: &str) -> echo::EchoRequest {
        echo::EchoRequest {
            return_status: Some(echo::ReturnStatus {
                code: code as i32,
                message: message.to_string(),
            }),
            message: String::new(),
        }
    }

    #[test]
    fn missing_return_status_is_ok() {
        let req = echo::EchoRequest::default();
        assert!(reply_status(EchoBehavior::Echo, &req, 1).is_none());
    }

    #[test]
    fn echo_returns_requested_code_and_message() {
        let status = reply_status(EchoBehavior::Echo, &request(Code::NotFound, "gone"), 1)
            .unwrap_or_else(|| panic!("expected a non-ok status"));
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "gone");
    }

    #[test]
    fn unknown_numeric_code_maps_to_unknown() {
        let req = echo::EchoRequest {
            return_status: Some(echo::ReturnStatus {
                code: 999,
                message: String::new(),
            }),
            message: String::new(),
        };
        let status = reply_status(EchoBehavior::Echo, &req, 1)
            .unwrap_or_else(|| panic!("expected a non-ok status"));
        assert_eq!(status.code(), Code::Unknown);
    }

    #[test]
    fn fixed_behavior_ignores_request() {
        let req = request(Code::NotFound, "");
        assert!(reply_status(EchoBehavior::Fixed(Code::Ok), &req, 1).is_none());

        let status = reply_status(EchoBehavior::Fixed(Code::Internal), &request(Code::Ok, ""), 1)
            .unwrap_or_else(|| panic!("expected a non-ok status"));
        assert_eq!(status.code(), Code::Internal);
    }

    #[test]
    fn fixed_from_echoes_until_threshold() {
        let behavior = EchoBehavior::FixedFrom {
            after: 2,
            code: Code::Internal,
        };
        let req = request(Code::NotFound, "gone");

        for seq in 1..=2 {
            let status = reply_status(behavior, &req, seq)
                .unwrap_or_else(|| panic!("request {seq} should be echoed"));
            assert_eq!(status.code(), Code::NotFound);
        }

        let status = reply_status(behavior, &req, 3)
            .unwrap_or_else(|| panic!("request 3 should get the fixed code"));
        assert_eq!(status.code(), Code::Internal);
    }

    #[tokio::test]
    async fn start_reports_taken_port() -> anyhow::Result<()> {
        let first = EchoBackend::start("127.0.0.1:0".parse()?).await?;

        let second = EchoBackend::start(first.addr()).await;
        anyhow::ensure!(second.is_err(), "second bind on {} succeeded", first.target());

        first.shutdown().await;
        Ok(())
    }
}
