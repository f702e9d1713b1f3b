use once_cell::sync::OnceCell;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::app::Config;
use crate::constants::{EMPTY_REPLY_FALLBACK, SEND_FAILURE_MESSAGE};
use crate::models::{ChatSession, GeminiSession, SessionConfig};
use crate::utils::SafeSpaceError;

static GLOBAL: OnceCell<SessionGateway> = OnceCell::new();

/// The only error a send ever reports to the user
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{}", SEND_FAILURE_MESSAGE)]
pub struct SendError;

/// Owns the one remote session and relays every exchange through it.
///
/// A gateway whose session could not be created is still a gateway: every
/// send on it fails with [`SendError`].
pub struct SessionGateway {
    session: Option<Mutex<Box<dyn ChatSession>>>,
}

impl SessionGateway {
    /// Establish the session described by `config`
    pub fn connect(config: &Config) -> Self {
        let session_config = SessionConfig::from(&config.model);
        let api_key = config.api.read_api_key();

        match GeminiSession::new(&config.api.endpoint, api_key, session_config) {
            Ok(session) => {
                info!(model = %config.model.name, "Chat session created");
                Self::with_session(Box::new(session))
            }
            Err(e) => {
                error!("Failed to create chat session: {:#}", e);
                Self::unavailable()
            }
        }
    }

    /// Wrap an already created session
    pub fn with_session(session: Box<dyn ChatSession>) -> Self {
        Self {
            session: Some(Mutex::new(session)),
        }
    }

    /// A gateway with no usable session
    pub fn unavailable() -> Self {
        Self { session: None }
    }

    /// Process-wide gateway, created from `config` on first use.
    /// Later calls return the existing instance and ignore `config`.
    pub fn global(config: &Config) -> &'static SessionGateway {
        GLOBAL.get_or_init(|| Self::connect(config))
    }

    pub fn is_available(&self) -> bool {
        self.session.is_some()
    }

    /// Send `text` as the next turn and return the reply.
    ///
    /// Never returns an empty reply. Every failure collapses to [`SendError`];
    /// the cause is logged and goes no further.
    pub async fn send_message(&self, text: &str) -> Result<String, SendError> {
        let Some(session) = &self.session else {
            error!(
                "Send failed: {}",
                SafeSpaceError::SessionUnavailable("session was never created".to_string())
            );
            return Err(SendError);
        };

        let mut session = session.lock().await;
        debug!(model = session.model_name(), chars = text.len(), "Sending message");

        match session.send(text).await {
            Ok(Some(reply)) if !reply.trim().is_empty() => Ok(reply),
            Ok(_) => {
                debug!("Empty reply, using fallback");
                Ok(EMPTY_REPLY_FALLBACK.to_string())
            }
            Err(e) => {
                error!("Send failed: {:#}", e);
                Err(SendError)
            }
        }
    }
}
