use crate::{Params, Result, Step};

/// Runs steps in order and cleans them up in reverse.
#[derive(Default)]
pub struct Scenario {
    steps: Vec<Box<dyn Step>>,
}

impl Scenario {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Stops at the first failing step. Every step that was run, the failing
    /// one included, is cleaned up before the error is returned.
    pub async fn run(&mut self, params: &Params) -> Result<()> {
        let mut started = 0;
        let mut result = Ok(());

        for (i, step) in self.steps.iter_mut().enumerate() {
            started += 1;
            if let Err(err) = step.run(params).await {
                tracing::error!(step = i, error = %err, "step failed");
                result = Err(err);
                break;
            }
        }

        for step in self.steps[..started].iter_mut().rev() {
            step.cleanup().await;
        }

        result
    }
}
