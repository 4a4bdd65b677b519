pub mod error;
pub mod gemini;
pub mod json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
}

/// A generative text model reachable over the network.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Sends a single-turn prompt and returns the concatenated text output.
    async fn generate_text(&self, prompt: &str) -> anyhow::Result<String>;
}
