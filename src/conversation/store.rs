use chrono::Utc;
use tracing::{debug, warn};

use super::message::{Message, MessageId, Role};
use crate::constants::{GREETING, SEED_MESSAGE_ID};

/// A submission the store accepted and that now has to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub text: String,
}

/// Transcript and status flags of the one conversation on screen.
///
/// Mutated only through `submit`, `resolve`, `fail` and `reset`. The
/// transcript always starts with the seeded greeting.
#[derive(Debug, Clone)]
pub struct ConversationState {
    messages: Vec<Message>,
    is_loading: bool,
    error: Option<String>,
    next_seq: u64,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    /// Create a conversation holding only the greeting
    pub fn new() -> Self {
        Self {
            messages: vec![Message::new(
                MessageId::new(SEED_MESSAGE_ID),
                Role::Assistant,
                GREETING,
            )],
            is_loading: false,
            error: None,
            next_seq: 0,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true, the greeting cannot be removed
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn last(&self) -> &Message {
        // The seed message is never removed.
        &self.messages[self.messages.len() - 1]
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether `submit(text)` would be accepted right now
    pub fn can_submit(&self, text: &str) -> bool {
        !self.is_loading && !text.trim().is_empty()
    }

    /// Accept a user submission.
    ///
    /// Returns `None` without touching anything when `text` is blank or a
    /// send is already in flight.
    pub fn submit(&mut self, text: &str) -> Option<PendingSend> {
        if !self.can_submit(text) {
            debug!(loading = self.is_loading, "Submission ignored");
            return None;
        }

        let id = self.next_id();
        self.messages.push(Message::new(id, Role::User, text));
        self.is_loading = true;
        self.error = None;

        Some(PendingSend {
            text: text.to_string(),
        })
    }

    /// Record the assistant's reply to the outstanding send
    pub fn resolve(&mut self, reply: impl Into<String>) {
        if !self.is_loading {
            warn!("Reply arrived with no send outstanding, dropping it");
            return;
        }

        let id = self.next_id();
        self.messages.push(Message::new(id, Role::Assistant, reply));
        self.is_loading = false;
    }

    /// Record that the outstanding send failed. The user's message stays
    /// in the transcript unanswered.
    pub fn fail(&mut self, error_text: impl Into<String>) {
        if !self.is_loading {
            warn!("Failure arrived with no send outstanding, dropping it");
            return;
        }

        self.error = Some(error_text.into());
        self.is_loading = false;
    }

    /// Truncate the transcript back to the greeting.
    /// Refused while a send is in flight.
    pub fn reset(&mut self) -> bool {
        if self.is_loading {
            debug!("Reset refused while a send is outstanding");
            return false;
        }

        self.messages.truncate(1);
        true
    }

    fn next_id(&mut self) -> MessageId {
        self.next_seq += 1;
        MessageId::new(format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            self.next_seq
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    const FAILURE: &str =
        "I'm having a little trouble connecting right now. I'm still here for you, though.";

    #[test]
    fn test_seed_state() {
        let state = ConversationState::new();

        assert_eq!(state.len(), 1);
        assert!(!state.is_empty());
        assert_eq!(state.messages()[0].id().as_str(), "initial");
        assert_eq!(state.messages()[0].role(), Role::Assistant);
        assert_eq!(state.messages()[0].content(), GREETING);
        assert!(!state.is_loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_submit_appends_user_message() {
        let mut state = ConversationState::new();

        let pending = state.submit("I feel anxious today.");

        assert_eq!(
            pending,
            Some(PendingSend {
                text: "I feel anxious today.".to_string()
            })
        );
        assert_eq!(state.len(), 2);
        assert_eq!(state.last().role(), Role::User);
        assert_eq!(state.last().content(), "I feel anxious today.");
        assert!(state.is_loading());
    }

    #[test]
    fn test_submit_keeps_text_verbatim() {
        let mut state = ConversationState::new();
        state.submit("  hello  ");
        assert_eq!(state.last().content(), "  hello  ");
    }

    #[test]
    fn test_blank_submissions_are_ignored() {
        let mut state = ConversationState::new();

        for text in ["", "   ", "\n\t "] {
            assert_eq!(state.submit(text), None);
        }

        assert_eq!(state.len(), 1);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_submit_while_loading_is_ignored() {
        let mut state = ConversationState::new();
        state.submit("first");

        assert_eq!(state.submit("test"), None);

        assert_eq!(state.len(), 2);
        assert_eq!(state.last().content(), "first");
        assert!(state.is_loading());
    }

    #[test]
    fn test_resolve_appends_assistant_message() {
        let mut state = ConversationState::new();
        state.submit("I feel anxious today.");

        state.resolve("That sounds heavy. I'm glad you shared it.");

        assert_eq!(state.len(), 3);
        assert_eq!(state.last().role(), Role::Assistant);
        assert_eq!(
            state.last().content(),
            "That sounds heavy. I'm glad you shared it."
        );
        assert!(!state.is_loading());
    }

    #[test]
    fn test_fail_sets_error_without_reply() {
        let mut state = ConversationState::new();
        state.submit("hello");

        state.fail(FAILURE);

        assert_eq!(state.len(), 2);
        assert_eq!(state.last().role(), Role::User);
        assert_eq!(state.error(), Some(FAILURE));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_next_submit_clears_error() {
        let mut state = ConversationState::new();
        state.submit("hello");
        state.fail(FAILURE);

        state.submit("again");

        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_blank_submit_keeps_error() {
        let mut state = ConversationState::new();
        state.submit("hello");
        state.fail(FAILURE);

        state.submit("   ");

        assert_eq!(state.error(), Some(FAILURE));
    }

    #[test]
    fn test_stale_completions_are_dropped() {
        let mut state = ConversationState::new();

        state.resolve("nobody asked");
        state.fail(FAILURE);

        assert_eq!(state.len(), 1);
        assert_eq!(state.error(), None);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_reset_truncates_to_seed() {
        let mut state = ConversationState::new();
        let seed = state.messages()[0].clone();
        state.submit("one");
        state.resolve("reply one");
        state.submit("two");
        state.resolve("reply two");

        assert!(state.reset());
        assert_eq!(state.messages(), &[seed.clone()]);

        assert!(state.reset());
        assert_eq!(state.messages(), &[seed]);
    }

    #[test]
    fn test_reset_refused_while_loading() {
        let mut state = ConversationState::new();
        state.submit("one");

        assert!(!state.reset());
        assert_eq!(state.len(), 2);
        assert!(state.is_loading());
    }

    #[test]
    fn test_reset_leaves_error() {
        let mut state = ConversationState::new();
        state.submit("one");
        state.fail(FAILURE);

        assert!(state.reset());
        assert_eq!(state.error(), Some(FAILURE));
    }

    #[test]
    fn test_message_ids_are_unique() {
        let mut state = ConversationState::new();
        for i in 0..50 {
            state.submit(&format!("message {i}"));
            state.resolve("ok");
        }

        let ids: HashSet<&str> = state.messages().iter().map(|m| m.id().as_str()).collect();
        assert_eq!(ids.len(), state.len());
    }
}
