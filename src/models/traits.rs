use anyhow::Result;
use async_trait::async_trait;

/// One ongoing exchange with a remote conversational service.
///
/// Implementations keep whatever context the service needs between turns;
/// callers treat the value as an opaque handle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatSession: Send {
    /// Send the next user turn and wait for the reply.
    /// `Ok(None)` means the service answered without any text.
    async fn send(&mut self, text: &str) -> Result<Option<String>>;

    /// Get the name of the model behind this session
    fn model_name(&self) -> &str;
}
