pub mod compose;
pub mod progress;
pub mod toast;

pub use compose::ComposeForm;
pub use toast::ToastRenderer;

use crate::tea::Model;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Key hints for the footer
pub const HELP_TEXT: &str =
    "Tab/Shift-Tab: move  Enter (file field): load  Ctrl-S: send  Ctrl-X: stop  Esc: quit";

/// How to fill in the form
pub const INSTRUCTIONS: [&str; 4] = [
    "Enter your address in \"Your Email Address\".",
    "Generate an \"App-Specific Password\" in your Google account (two-factor authentication is required) and paste it.",
    "Enter the subject in \"Email Subject\".",
    "Load a spreadsheet with one column of addresses in \"Recipients File\".",
];

/// Draw the whole composer
pub fn render(frame: &mut Frame, model: &Model) {
    let area = frame.size();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    ComposeForm::render(frame, columns[0], model);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Percentage(30),
            Constraint::Min(5),
            Constraint::Length(8),
        ])
        .split(columns[1]);

    progress::render(frame, side[0], model);
    render_recipients(frame, side[1], model);
    render_preview(frame, side[2], model);
    render_instructions(frame, side[3]);

    let help = Paragraph::new(HELP_TEXT).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[2]);

    // Drawn over the preview so the counters stay visible
    if let Some(notification) = model.visible_notification() {
        ToastRenderer::render(frame, side[2], notification);
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled("Email Sender", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  ·  Effortless Email Delivery"),
    ]);
    let header = Paragraph::new(title)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_instructions(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = INSTRUCTIONS
        .iter()
        .map(|step| Line::from(format!("• {}", step)))
        .collect();
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title(" Instructions "));
    frame.render_widget(paragraph, area);
}

fn render_recipients(frame: &mut Frame, area: Rect, model: &Model) {
    let items: Vec<ListItem> = model
        .recipients
        .iter()
        .map(|address| ListItem::new(address.as_str()))
        .collect();

    let title = format!(" Recipients ({}) ", model.recipients.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn render_preview(frame: &mut Frame, area: Rect, model: &Model) {
    let width = area.width.saturating_sub(2).max(1) as usize;
    let preview = body_preview(&model.body_editor, width);

    let paragraph = Paragraph::new(preview)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Preview "));
    frame.render_widget(paragraph, area);
}

/// Plain-text rendering of the HTML body
pub fn body_preview(html: &str, width: usize) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    html2text::from_read(html.as_bytes(), width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_body_preview_strips_markup() {
        let preview = body_preview("<p>Hello <b>world</b></p>", 80);
        assert!(preview.contains("Hello"));
        assert!(preview.contains("world"));
        assert!(!preview.contains("<p>"));
        assert_eq!(body_preview("   ", 80), "");
    }

    #[test]
    fn test_render_shows_counters_and_notification() {
        use crate::tea::message::NotificationLevel;
        use crate::tea::model::Notification;

        let mut model = Model::default();
        model.status.total = 2;
        model.notification = Some(Notification {
            id: uuid::Uuid::new_v4(),
            message: "Emails are being sent.".to_string(),
            level: NotificationLevel::Success,
        });

        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, &model)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(content.contains("Total emails: 2"));
        assert!(content.contains("Sent emails: 0"));
        assert!(content.contains("Failed emails: 0"));
        assert!(content.contains("Emails are being sent."));
        assert!(content.contains("Instructions"));
    }

    #[test]
    fn test_render_small_terminal() {
        let mut model = Model::default();
        model.notification = Some(crate::tea::model::Notification {
            id: uuid::Uuid::new_v4(),
            message: "Could not read list.xlsx: Spreadsheet error: broken".to_string(),
            level: crate::tea::message::NotificationLevel::Error,
        });

        for (width, height) in [(20, 3), (40, 8), (80, 12)] {
            let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
            terminal.draw(|frame| render(frame, &model)).unwrap();
        }
    }
}
