use crate::{Params, Result};

/// A unit of test orchestration.
///
/// `cleanup` is called once after `run`, whether or not `run` succeeded.
#[tonic::async_trait]
pub trait Step: Send {
    async fn run(&mut self, params: &Params) -> Result<()>;

    async fn cleanup(&mut self);
}
