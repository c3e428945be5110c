use std::sync::{Arc, Mutex};

use anyhow::Context as _;
use e2e_driver::{
    Code, EchoBehavior, Error, GrpcCall, GrpcServer, Params, Ports, Result, Scenario, Step,
};

type Log = Arc<Mutex<Vec<String>>>;

struct Recording {
    name: &'static str,
    fail: bool,
    log: Log,
}

impl Recording {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            fail: false,
            log: Arc::clone(log),
        }
    }

    fn failing(name: &'static str, log: &Log) -> Self {
        Self {
            fail: true,
            ..Self::new(name, log)
        }
    }

    fn push(&self, event: &str) {
        if let Ok(mut log) = self.log.lock() {
            log.push(format!("{event} {}", self.name));
        }
    }
}

#[tonic::async_trait]
impl Step for Recording {
    async fn run(&mut self, _params: &Params) -> Result<()> {
        self.push("run");
        if self.fail {
            return Err(Error::StatusMismatch {
                call: 1,
                expected: Code::Ok,
                actual: Code::Internal,
                message: String::new(),
            });
        }
        Ok(())
    }

    async fn cleanup(&mut self) {
        self.push("cleanup");
    }
}

fn events(log: &Log) -> Vec<String> {
    log.lock().map(|l| l.clone()).unwrap_or_default()
}

fn params() -> Params {
    Params::new(Ports::direct(0))
}

#[tokio::test]
async fn empty_scenario_passes() -> anyhow::Result<()> {
    let mut scenario = Scenario::new();
    assert!(scenario.is_empty());

    scenario.run(&params()).await.context("empty scenario")?;
    Ok(())
}

#[tokio::test]
async fn steps_run_in_order_and_clean_up_in_reverse() -> anyhow::Result<()> {
    let log = Log::default();
    let mut scenario = Scenario::new()
        .step(Recording::new("a", &log))
        .step(Recording::new("b", &log));

    scenario.run(&params()).await.context("scenario")?;

    assert_eq!(
        events(&log),
        ["run a", "run b", "cleanup b", "cleanup a"]
    );
    Ok(())
}

#[tokio::test]
async fn failing_step_stops_scenario() -> anyhow::Result<()> {
    let log = Log::default();
    let mut scenario = Scenario::new()
        .step(Recording::new("a", &log))
        .step(Recording::failing("b", &log))
        .step(Recording::new("c", &log));

    let res = scenario.run(&params()).await;
    anyhow::ensure!(res.is_err(), "expected failure");

    assert_eq!(
        events(&log),
        ["run a", "run b", "cleanup b", "cleanup a"]
    );
    Ok(())
}

#[tokio::test]
async fn backend_and_calls_scenario() -> anyhow::Result<()> {
    let ports = Ports::ephemeral().context("reserve ports")?;
    let params = Params::new(Ports::direct(ports.backend_port));

    let mut ok = Scenario::new()
        .step(GrpcServer::new())
        .step(GrpcCall::new(3, Code::Ok));
    assert_eq!(ok.len(), 2);
    assert!(!ok.is_empty());
    ok.run(&params).await.context("compliant scenario")?;

    // Backend was cleaned up, so the port can host the next scenario.
    let mut mismatch = Scenario::new()
        .step(GrpcServer::with_behavior(EchoBehavior::Fixed(Code::Ok)))
        .step(GrpcCall::new(2, Code::NotFound));
    let res = mismatch.run(&params).await;

    anyhow::ensure!(
        matches!(res, Err(Error::StatusMismatch { call: 1, .. })),
        "expected mismatch on call 1, got {res:?}"
    );
    Ok(())
}
