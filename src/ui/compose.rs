use crate::tea::message::Field;
use crate::tea::model::Model;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Single-line fields shown above the body editor
const LINE_FIELDS: [Field; 4] = [
    Field::Sender,
    Field::Password,
    Field::Subject,
    Field::RecipientsFile,
];

/// Email composition form
pub struct ComposeForm;

impl ComposeForm {
    pub fn render(frame: &mut Frame, area: Rect, model: &Model) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
            ])
            .split(area);

        for (field, chunk) in LINE_FIELDS.iter().zip(chunks.iter()) {
            Self::render_line_field(frame, *chunk, model, *field);
        }
        Self::render_body(frame, chunks[4], model);
    }

    fn field_block(field: Field, focused: bool) -> Block<'static> {
        let style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(format!(" {} ", field.label()))
    }

    fn render_line_field(frame: &mut Frame, area: Rect, model: &Model, field: Field) {
        let focused = model.focus == field;
        let mut text = model.field_text(field);
        if focused {
            text.push('▏');
        }

        let paragraph = Paragraph::new(text).block(Self::field_block(field, focused));
        frame.render_widget(paragraph, area);
    }

    fn render_body(frame: &mut Frame, area: Rect, model: &Model) {
        let focused = model.focus == Field::Body;
        let mut text = Text::from(
            model
                .body_editor
                .split('\n')
                .map(|line| Line::from(line.to_string()))
                .collect::<Vec<_>>(),
        );
        if focused {
            if let Some(line) = text.lines.last_mut() {
                line.spans.push("▏".into());
            }
        }

        // Keep the cursor line in view
        let visible = area.height.saturating_sub(2) as usize;
        let scroll = text.lines.len().saturating_sub(visible) as u16;

        let paragraph = Paragraph::new(text)
            .block(Self::field_block(Field::Body, focused))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        frame.render_widget(paragraph, area);
    }
}
