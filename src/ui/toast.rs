/// Single transient notification shown in the top-right corner
///
/// The model keeps at most one notification; a newer one replaces the
/// visible one and the update loop hides it when its timer fires.

use crate::tea::message::NotificationLevel;
use crate::tea::model::Notification;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Max toast width in columns
const TOAST_WIDTH: u16 = 50;
/// Max toast height in rows, borders included
const MAX_TOAST_HEIGHT: u16 = 8;
/// Columns taken by the borders and the icon
const TOAST_CHROME_WIDTH: u16 = 5;

/// Icon for a notification level
pub fn icon(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Info => "ℹ",
        NotificationLevel::Success => "✓",
        NotificationLevel::Error => "✗",
    }
}

/// Accent color for a notification level
pub fn accent(level: NotificationLevel) -> Color {
    match level {
        NotificationLevel::Info => Color::Cyan,
        NotificationLevel::Success => Color::Green,
        NotificationLevel::Error => Color::Red,
    }
}

/// Rows `text` needs when word-wrapped to `width` columns
pub fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    let mut rows = 0usize;

    for line in text.lines() {
        let mut current = 0usize;
        rows += 1;
        for word in line.split_whitespace() {
            let len = word.chars().count();
            if current == 0 {
                current = len;
            } else if current + 1 + len <= width {
                current += 1 + len;
            } else {
                rows += 1;
                current = len;
            }
            // Words longer than a row are broken across rows
            while current > width {
                rows += 1;
                current -= width;
            }
        }
    }

    rows.max(1).min(u16::MAX as usize) as u16
}

/// Where the toast for `message` goes; always inside `area`
pub fn toast_area(area: Rect, message: &str) -> Rect {
    let width = area.width.saturating_sub(2).min(TOAST_WIDTH);
    let text_rows = wrapped_height(message, width.saturating_sub(TOAST_CHROME_WIDTH));
    let height = text_rows
        .saturating_add(2)
        .min(MAX_TOAST_HEIGHT)
        .min(area.height.saturating_sub(1));

    Rect {
        x: area.x + area.width.saturating_sub(width + 2),
        y: area.y + 1,
        width,
        height,
    }
}

pub struct ToastRenderer;

impl ToastRenderer {
    pub fn render(frame: &mut Frame, area: Rect, notification: &Notification) {
        let area = toast_area(area, &notification.message);
        if area.width < 6 || area.height < 3 {
            return;
        }

        // Clear the area first for proper overlay
        frame.render_widget(Clear, area);

        let color = accent(notification.level);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        let inner = block.inner(area);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(inner);

        frame.render_widget(block, area);

        let icon_paragraph = Paragraph::new(icon(notification.level))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(icon_paragraph, chunks[0]);

        let lines: Vec<Line> = notification
            .message
            .lines()
            .map(|line| Line::from(Span::raw(line)))
            .collect();
        let content = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Left);
        frame.render_widget(content, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tea::update::MSG_SENDING;
    use ratatui::{backend::TestBackend, Terminal};
    use uuid::Uuid;

    fn notification(message: &str) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            message: message.to_string(),
            level: NotificationLevel::Error,
        }
    }

    #[test]
    fn test_toast_area_top_right() {
        let area = toast_area(Rect::new(0, 0, 120, 40), MSG_SENDING);
        assert_eq!(area.width, TOAST_WIDTH);
        assert_eq!(area.x, 120 - TOAST_WIDTH - 2);
        assert_eq!(area.y, 1);
        assert_eq!(area.height, 3);

        let narrow = toast_area(Rect::new(0, 0, 30, 2), MSG_SENDING);
        assert_eq!(narrow.width, 28);
        assert_eq!(narrow.height, 1);
    }

    #[test]
    fn test_toast_area_stays_inside() {
        let bounds = Rect::new(10, 5, 40, 4);
        let message = "Could not read recipients.xlsx: Spreadsheet error: \
                       the archive is corrupt and cannot be opened";
        let area = toast_area(bounds, message);
        assert!(area.x >= bounds.x);
        assert!(area.right() <= bounds.right());
        assert!(area.bottom() <= bounds.bottom());
    }

    #[test]
    fn test_toast_grows_with_message() {
        let long = "Could not read recipients.xlsx: Spreadsheet error: \
                    Xlsx error: Zip error: invalid Zip archive: Could not find central directory end";
        let area = toast_area(Rect::new(0, 0, 120, 40), long);
        let text_width = TOAST_WIDTH - TOAST_CHROME_WIDTH;
        assert_eq!(area.height, wrapped_height(long, text_width) + 2);
        assert!(area.height > 3);
        assert!(area.height <= MAX_TOAST_HEIGHT);
    }

    #[test]
    fn test_wrapped_height() {
        assert_eq!(wrapped_height("", 10), 1);
        assert_eq!(wrapped_height("short", 10), 1);
        assert_eq!(wrapped_height("aaaa bbbb cccc", 9), 2);
        assert_eq!(wrapped_height("abcdefghijkl", 5), 3);
        assert_eq!(wrapped_height("one\ntwo", 10), 2);
    }

    #[test]
    fn test_short_terminals_do_not_panic() {
        for height in 1..=6 {
            let mut terminal = Terminal::new(TestBackend::new(80, height)).unwrap();
            terminal
                .draw(|frame| {
                    let area = frame.size();
                    ToastRenderer::render(frame, area, &notification(MSG_SENDING));
                })
                .unwrap();
        }
    }

    #[test]
    fn test_levels_have_distinct_styles() {
        assert_ne!(accent(NotificationLevel::Success), accent(NotificationLevel::Error));
        assert_eq!(icon(NotificationLevel::Error), "✗");
    }
}
