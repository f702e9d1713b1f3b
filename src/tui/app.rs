use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders},
};
use tui_textarea::TextArea;

use crate::constants::INPUT_PLACEHOLDER;
use crate::conversation::{ConversationState, PendingSend};
use crate::gateway::SendError;

/// What a dispatched send produced
pub type SendOutcome = Result<String, SendError>;

/// Application state
pub struct App {
    /// The conversation on screen
    pub conversation: ConversationState,
    /// User input box
    pub input: TextArea<'static>,
    /// Is the app running?
    pub running: bool,
    /// Lines scrolled up from the bottom of the transcript
    pub scroll_offset: u16,
    /// Animation frame counter for the listening indicator
    pub tick: usize,
    /// Model name for display
    pub model_name: String,
}

impl App {
    /// Create a new app instance
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            conversation: ConversationState::new(),
            input: new_input(),
            running: true,
            scroll_offset: 0,
            tick: 0,
            model_name: model_name.into(),
        }
    }

    /// Current contents of the input box
    pub fn input_text(&self) -> String {
        self.input.lines().join("\n")
    }

    /// Submit whatever is in the input box.
    ///
    /// The box is cleared as soon as the store accepts the text, before
    /// anything goes over the network.
    pub fn submit_input(&mut self) -> Option<PendingSend> {
        let pending = self.conversation.submit(&self.input_text())?;
        self.clear_input();
        self.scroll_offset = 0;
        Some(pending)
    }

    /// Apply the result of the outstanding send
    pub fn apply_outcome(&mut self, outcome: SendOutcome) {
        match outcome {
            Ok(reply) => self.conversation.resolve(reply),
            Err(e) => self.conversation.fail(e.to_string()),
        }
        self.scroll_offset = 0;
    }

    /// "Clear space": back to the greeting, unless a send is in flight
    pub fn clear_space(&mut self) -> bool {
        let cleared = self.conversation.reset();
        if cleared {
            self.scroll_offset = 0;
        }
        cleared
    }

    /// Clear the input buffer
    pub fn clear_input(&mut self) {
        self.input = new_input();
    }

    /// Scroll transcript towards older messages
    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }

    /// Scroll transcript towards newer messages
    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}

fn new_input() -> TextArea<'static> {
    let mut input = TextArea::default();
    input.set_placeholder_text(INPUT_PLACEHOLDER);
    input.set_cursor_line_style(Style::default());
    input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Indexed(146)))
            .title(" Share "),
    );
    input
}
