use crate::tea::model::{Model, SessionState};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const ALL_SENT_TEXT: &str = "All emails sent successfully!";

/// Label for the session state shown in the counters panel title
pub fn session_label(session: SessionState) -> &'static str {
    match session {
        SessionState::Idle => "Idle",
        SessionState::Starting => "Starting...",
        SessionState::Sending => "Sending Emails...",
        SessionState::Completed => "Completed",
    }
}

/// Counters line: total, sent, failed
pub fn counters_line(model: &Model) -> Line<'static> {
    Line::from(vec![
        Span::styled("Total emails: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(model.status.total.to_string()),
        Span::raw("   "),
        Span::styled(
            "Sent emails: ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(model.status.sent.to_string()),
        Span::raw("   "),
        Span::styled(
            "Failed emails: ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(model.status.failed.to_string()),
    ])
}

pub fn render(frame: &mut Frame, area: Rect, model: &Model) {
    let mut lines = vec![counters_line(model)];
    if model.all_sent {
        lines.push(Line::from(Span::styled(
            ALL_SENT_TEXT,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    }

    let border = if model.is_sending() {
        Color::Yellow
    } else {
        Color::Gray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" Status: {} ", session_label(model.session)));

    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Left),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::SendStatus;

    #[test]
    fn test_counters_line_text() {
        let mut model = Model::default();
        model.status = SendStatus {
            total: 3,
            sent: 2,
            failed: 1,
            all_emails_sent: false,
        };
        let text: String = counters_line(&model)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert_eq!(text, "Total emails: 3   Sent emails: 2   Failed emails: 1");
    }

    #[test]
    fn test_session_labels() {
        assert_eq!(session_label(SessionState::Sending), "Sending Emails...");
        assert_eq!(session_label(SessionState::Idle), "Idle");
    }
}
