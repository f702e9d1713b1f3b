use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::constants::{UI_POLL_INTERVAL_MS, UI_SCROLL_LINES, UI_TICK_INTERVAL_MS};
use crate::conversation::PendingSend;
use crate::gateway::SessionGateway;
use crate::tui::app::{App, SendOutcome};
use crate::tui::render::render_ui;
use crate::utils::SafeSpaceError;

/// Run the terminal UI until the user quits
pub async fn run_ui(mut app: App, gateway: &'static SessionGateway) -> Result<()> {
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        return Err(SafeSpaceError::UIError(
            "SafeSpace needs an interactive terminal".to_string(),
        )
        .into());
    }

    install_panic_hook();

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // At most one send is in flight, so capacity 1 is enough
    let (tx, mut rx) = mpsc::channel::<SendOutcome>(1);

    info!("UI started");
    let res = run_app(&mut terminal, &mut app, gateway, tx, &mut rx).await;

    restore_terminal()?;
    terminal.show_cursor()?;
    info!("UI stopped");

    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    gateway: &'static SessionGateway,
    tx: mpsc::Sender<SendOutcome>,
    rx: &mut mpsc::Receiver<SendOutcome>,
) -> Result<()> {
    let tick_interval = Duration::from_millis(UI_TICK_INTERVAL_MS);
    let mut last_tick = Instant::now();

    while app.running {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(Duration::from_millis(UI_POLL_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                if let Some(pending) = handle_key(app, key) {
                    dispatch(gateway, pending, tx.clone());
                }
            }
        }

        while let Ok(outcome) = rx.try_recv() {
            app.apply_outcome(outcome);
        }

        if last_tick.elapsed() >= tick_interval {
            app.on_tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

/// Apply a key press to the app.
/// Returns the send to dispatch when the key submitted a message.
pub(crate) fn handle_key(app: &mut App, key: KeyEvent) -> Option<PendingSend> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => app.quit(),
        KeyCode::Esc => app.quit(),
        KeyCode::Char('l') if ctrl => {
            if !app.clear_space() {
                debug!("Clear space ignored while a reply is pending");
            }
        }
        KeyCode::Enter => return app.submit_input(),
        KeyCode::PageUp => app.scroll_up(UI_SCROLL_LINES),
        KeyCode::PageDown => app.scroll_down(UI_SCROLL_LINES),
        // The input is disabled while a reply is pending
        _ if app.conversation.is_loading() => {}
        _ => {
            app.input.input(key);
        }
    }

    None
}

/// Relay an accepted submission to the gateway off the UI loop.
fn dispatch(gateway: &'static SessionGateway, pending: PendingSend, tx: mpsc::Sender<SendOutcome>) {
    tokio::spawn(async move {
        let outcome = gateway.send_message(&pending.text).await;
        if tx.send(outcome).await.is_err() {
            debug!("UI closed before the reply arrived");
        }
    });
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Install panic hook to restore terminal on panic
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MockChatSession;
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert_eq!(handle_key(app, press(KeyCode::Char(c))), None);
        }
    }

    #[test]
    fn test_enter_submits_typed_text() {
        let mut app = App::new("test-model");
        type_text(&mut app, "I feel anxious today.");

        let pending = handle_key(&mut app, press(KeyCode::Enter));

        assert_eq!(
            pending.map(|p| p.text),
            Some("I feel anxious today.".to_string())
        );
        assert_eq!(app.conversation.len(), 2);
        assert_eq!(app.input_text(), "");
    }

    #[test]
    fn test_enter_on_blank_input_does_nothing() {
        let mut app = App::new("test-model");
        type_text(&mut app, "   ");

        assert_eq!(handle_key(&mut app, press(KeyCode::Enter)), None);
        assert_eq!(app.conversation.len(), 1);
    }

    #[test]
    fn test_typing_ignored_while_loading() {
        let mut app = App::new("test-model");
        type_text(&mut app, "first");
        handle_key(&mut app, press(KeyCode::Enter));

        type_text(&mut app, "test");
        assert_eq!(app.input_text(), "");
        assert_eq!(handle_key(&mut app, press(KeyCode::Enter)), None);
        assert_eq!(app.conversation.len(), 2);
    }

    #[test]
    fn test_ctrl_l_clears_space() {
        let mut app = App::new("test-model");
        type_text(&mut app, "hello");
        handle_key(&mut app, press(KeyCode::Enter));
        app.apply_outcome(Ok("hi".to_string()));

        handle_key(&mut app, ctrl('l'));

        assert_eq!(app.conversation.len(), 1);
        assert!(app.running);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new("test-model");
        handle_key(&mut app, press(KeyCode::Esc));
        assert!(!app.running);

        let mut app = App::new("test-model");
        handle_key(&mut app, ctrl('c'));
        assert!(!app.running);
    }

    fn leak_gateway(session: MockChatSession) -> &'static SessionGateway {
        Box::leak(Box::new(SessionGateway::with_session(Box::new(session))))
    }

    fn mock_session() -> MockChatSession {
        let mut session = MockChatSession::new();
        session
            .expect_model_name()
            .return_const("mock-model".to_string());
        session
    }

    #[tokio::test]
    async fn test_conversation_round_trip() {
        let mut session = mock_session();
        session
            .expect_send()
            .times(1)
            .returning(|_| Ok(Some("That sounds heavy. I'm glad you shared it.".to_string())));
        let gateway = leak_gateway(session);
        let (tx, mut rx) = mpsc::channel(1);
        let mut app = App::new("test-model");
        type_text(&mut app, "I feel anxious today.");

        let pending = handle_key(&mut app, press(KeyCode::Enter)).unwrap();
        assert_eq!(app.conversation.len(), 2);
        assert!(app.conversation.is_loading());

        dispatch(gateway, pending, tx);
        app.apply_outcome(rx.recv().await.unwrap());

        assert_eq!(app.conversation.len(), 3);
        assert_eq!(
            app.conversation.last().content(),
            "That sounds heavy. I'm glad you shared it."
        );
        assert!(!app.conversation.is_loading());
    }

    #[tokio::test]
    async fn test_submit_while_pending_adds_nothing() {
        let mut session = mock_session();
        session
            .expect_send()
            .times(1)
            .returning(|_| Ok(Some("reply".to_string())));
        let gateway = leak_gateway(session);
        let (tx, mut rx) = mpsc::channel(1);
        let mut app = App::new("test-model");
        type_text(&mut app, "first");
        let pending = handle_key(&mut app, press(KeyCode::Enter)).unwrap();

        app.input.insert_str("test");
        assert_eq!(app.submit_input(), None);
        assert_eq!(app.conversation.len(), 2);
        assert_eq!(app.conversation.last().content(), "first");

        dispatch(gateway, pending, tx);
        app.apply_outcome(rx.recv().await.unwrap());
        assert_eq!(app.conversation.len(), 3);
    }

    #[tokio::test]
    async fn test_network_error_keeps_user_message() {
        let mut session = mock_session();
        session
            .expect_send()
            .returning(|_| Err(anyhow::anyhow!("dns error: failed to lookup address")));
        let gateway = leak_gateway(session);
        let (tx, mut rx) = mpsc::channel(1);
        let mut app = App::new("test-model");
        type_text(&mut app, "hello");

        let pending = handle_key(&mut app, press(KeyCode::Enter)).unwrap();
        dispatch(gateway, pending, tx);
        app.apply_outcome(rx.recv().await.unwrap());

        assert_eq!(app.conversation.len(), 2);
        assert_eq!(app.conversation.last().content(), "hello");
        assert_eq!(
            app.conversation.error(),
            Some("I'm having a little trouble connecting right now. I'm still here for you, though.")
        );
        assert!(!app.conversation.is_loading());
    }

    #[tokio::test]
    async fn test_dispatch_delivers_outcome() {
        let gateway: &'static SessionGateway = Box::leak(Box::new(SessionGateway::unavailable()));
        let (tx, mut rx) = mpsc::channel(1);
        let mut app = App::new("test-model");
        type_text(&mut app, "hello");

        let pending = handle_key(&mut app, press(KeyCode::Enter)).unwrap();
        dispatch(gateway, pending, tx);
        let outcome = rx.recv().await.unwrap();
        app.apply_outcome(outcome);

        assert!(!app.conversation.is_loading());
        assert_eq!(app.conversation.len(), 2);
        assert!(app.conversation.error().is_some());
    }
}
