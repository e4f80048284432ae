use anyhow::Result;
use async_trait::async_trait;

/// Produces the answer to a prompt for a given model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String>;
}

/// Answers with a canned response instead of calling a model.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedGenerator;

#[async_trait]
impl ResponseGenerator for SimulatedGenerator {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        Ok(format!(
            "This is a simulated response for prompt \"{prompt}\" using model \"{model}\""
        ))
    }
}
