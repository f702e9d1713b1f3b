use chrono::Datelike;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::constants::{APP_TAGLINE, APP_TITLE, DISCLAIMER};
use crate::conversation::{Message, Role};
use crate::tui::app::App;

const USER_COLOR: Color = Color::Indexed(61);
const ASSISTANT_COLOR: Color = Color::Indexed(245);
const ACCENT_COLOR: Color = Color::Indexed(146);
const NOTICE_COLOR: Color = Color::Indexed(180);

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Transcript
            Constraint::Length(4), // Disclaimer
            Constraint::Length(3), // Input
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);
    render_transcript(frame, chunks[1], app);
    render_disclaimer(frame, chunks[2]);
    render_input(frame, chunks[3], app);
    render_footer(frame, chunks[4], app);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            APP_TITLE,
            Style::default()
                .fg(ACCENT_COLOR)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            APP_TAGLINE,
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(header, area);
}

fn render_transcript(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    let lines = transcript_lines(app);

    // Counted before the block is attached so borders are not included
    let transcript = Paragraph::new(lines).wrap(Wrap { trim: false });
    let total = u16::try_from(transcript.line_count(inner.width)).unwrap_or(u16::MAX);

    // Stick to the newest message unless the user scrolled up
    let max_scroll = total.saturating_sub(inner.height);
    let scroll = max_scroll.saturating_sub(app.scroll_offset);

    let transcript = transcript.block(block).scroll((scroll, 0));

    frame.render_widget(transcript, area);
}

/// Lines of the transcript, oldest first, including the listening indicator
/// and the inline error.
pub(crate) fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for msg in app.conversation.messages() {
        push_message(&mut lines, msg);
    }

    if app.conversation.is_loading() {
        let dots = ".".repeat(app.tick % 3 + 1);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", Role::Assistant.display_name()),
                Style::default().fg(ASSISTANT_COLOR).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("is listening{dots}"),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    if let Some(error) = app.conversation.error() {
        lines.push(Line::from(""));
        lines.push(
            Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::LightRed),
            ))
            .alignment(Alignment::Center),
        );
    }

    lines
}

fn push_message(lines: &mut Vec<Line<'static>>, msg: &Message) {
    let (alignment, color) = match msg.role() {
        Role::User => (Alignment::Right, USER_COLOR),
        Role::Assistant => (Alignment::Left, ASSISTANT_COLOR),
    };

    lines.push(
        Line::from(vec![
            Span::styled(
                msg.role().display_name(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", msg.timestamp().format("%H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
        ])
        .alignment(alignment),
    );

    for text in msg.content().lines() {
        lines.push(Line::from(text.to_string()).alignment(alignment));
    }

    lines.push(Line::from(""));
}

fn render_disclaimer(frame: &mut Frame, area: Rect) {
    let disclaimer = Paragraph::new(Line::from(vec![
        Span::styled(
            "NOTICE: ",
            Style::default()
                .fg(NOTICE_COLOR)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(DISCLAIMER, Style::default().fg(NOTICE_COLOR)),
    ]))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    frame.render_widget(disclaimer, area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    if app.conversation.is_loading() {
        let waiting = Paragraph::new(Span::styled(
            "Take a breath while SafeSpace replies...",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(waiting, area);
    } else {
        frame.render_widget(&app.input, area);
    }
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(
                "© {} {} • Anonymous & Private • {}",
                chrono::Local::now().year(),
                APP_TITLE,
                app.model_name
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("   "),
        Span::styled("Enter", Style::default().fg(ACCENT_COLOR)),
        Span::styled(" send  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Ctrl+L", Style::default().fg(ACCENT_COLOR)),
        Span::styled(" clear space  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(ACCENT_COLOR)),
        Span::styled(" quit", Style::default().fg(Color::DarkGray)),
    ]))
    .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::SendError;
    use ratatui::{backend::TestBackend, Terminal};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn screen_text(app: &App) -> String {
        screen_text_sized(app, 100, 40)
    }

    fn screen_text_sized(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_transcript_orders_oldest_first() {
        let mut app = App::new("test-model");
        app.input.insert_str("I feel anxious today.");
        app.submit_input();
        app.apply_outcome(Ok("That sounds heavy.".to_string()));

        let text: Vec<String> = transcript_lines(&app).iter().map(line_text).collect();
        let greeting = text.iter().position(|l| l.starts_with("Hello.")).unwrap();
        let user = text.iter().position(|l| l == "I feel anxious today.").unwrap();
        let reply = text.iter().position(|l| l == "That sounds heavy.").unwrap();

        assert!(greeting < user && user < reply);
    }

    #[test]
    fn test_user_lines_are_right_aligned() {
        let mut app = App::new("test-model");
        app.input.insert_str("hello");
        app.submit_input();

        let lines = transcript_lines(&app);
        let user = lines.iter().find(|l| line_text(l) == "hello").unwrap();
        assert_eq!(user.alignment, Some(Alignment::Right));
    }

    #[test]
    fn test_listening_indicator_while_loading() {
        let mut app = App::new("test-model");
        app.input.insert_str("hello");
        app.submit_input();

        let text: Vec<String> = transcript_lines(&app).iter().map(line_text).collect();
        assert!(text.iter().any(|l| l.contains("is listening")));

        app.apply_outcome(Ok("hi".to_string()));
        let text: Vec<String> = transcript_lines(&app).iter().map(line_text).collect();
        assert!(!text.iter().any(|l| l.contains("is listening")));
    }

    #[test]
    fn test_error_shown_inline() {
        let mut app = App::new("test-model");
        app.input.insert_str("hello");
        app.submit_input();
        app.apply_outcome(Err(SendError));

        let text: Vec<String> = transcript_lines(&app).iter().map(line_text).collect();
        assert_eq!(
            text.last().map(String::as_str),
            Some("I'm having a little trouble connecting right now. I'm still here for you, though.")
        );
    }

    #[test]
    fn test_screen_shows_header_disclaimer_and_placeholder() {
        let app = App::new("test-model");
        let screen = screen_text(&app);

        assert!(screen.contains("SafeSpace AI"));
        assert!(screen.contains("Breathe. Speak. Be heard."));
        assert!(screen.contains("NOTICE:"));
        assert!(screen.contains("Tell me how you're feeling..."));
    }

    #[test]
    fn test_newest_word_wrapped_reply_stays_on_screen() {
        let mut app = App::new("test-model");
        app.input.insert_str("hello");
        app.submit_input();
        let mut reply = vec!["w".repeat(60); 12];
        reply.push("LASTWORD".to_string());
        app.apply_outcome(Ok(reply.join(" ")));

        let screen = screen_text_sized(&app, 100, 20);

        assert!(screen.contains("LASTWORD"));
    }
}
