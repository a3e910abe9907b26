use crate::tea::message::{Field, Message, RecipientsMessage, SendMessage, UIMessage};
use crate::tea::Model;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;

/// Translates terminal key presses into composer messages
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Map a key event to a message; `None` when the key does nothing
    pub fn handle_key_event(&self, key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => Some(Message::UI(UIMessage::Quit)),
            KeyCode::Char('q') if ctrl => Some(Message::UI(UIMessage::Quit)),

            // Disabled controls produce nothing
            KeyCode::Char('s') if ctrl => {
                (!model.is_sending()).then_some(Message::Send(SendMessage::Start))
            }
            KeyCode::Char('x') if ctrl => {
                model.is_sending().then_some(Message::Send(SendMessage::Stop))
            }
            KeyCode::Char('o') if ctrl => self.load_file(model),
            KeyCode::Char(_) if ctrl => None,

            KeyCode::Tab => Some(Message::UI(UIMessage::FocusNext)),
            KeyCode::BackTab => Some(Message::UI(UIMessage::FocusPrevious)),

            KeyCode::Enter => match model.focus {
                Field::Body => Some(Message::UI(UIMessage::InsertChar('\n'))),
                Field::RecipientsFile => self.load_file(model),
                _ => Some(Message::UI(UIMessage::FocusNext)),
            },

            KeyCode::Backspace => Some(Message::UI(UIMessage::Backspace)),
            KeyCode::Char(c) => Some(Message::UI(UIMessage::InsertChar(c))),

            _ => None,
        }
    }

    fn load_file(&self, model: &Model) -> Option<Message> {
        let path = model.file_input.trim();
        if path.is_empty() {
            return None;
        }
        Some(Message::Recipients(RecipientsMessage::Load(expand_home(path))))
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tea::model::SessionState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_send_disabled_while_sending() {
        let handler = EventHandler::new();
        let mut model = Model::default();

        assert!(matches!(
            handler.handle_key_event(ctrl('s'), &model),
            Some(Message::Send(SendMessage::Start))
        ));
        assert!(handler.handle_key_event(ctrl('x'), &model).is_none());

        model.session = SessionState::Sending;
        assert!(handler.handle_key_event(ctrl('s'), &model).is_none());
        assert!(matches!(
            handler.handle_key_event(ctrl('x'), &model),
            Some(Message::Send(SendMessage::Stop))
        ));
    }

    #[test]
    fn test_enter_depends_on_focus() {
        let handler = EventHandler::new();
        let mut model = Model::default();

        model.focus = Field::Body;
        assert!(matches!(
            handler.handle_key_event(key(KeyCode::Enter), &model),
            Some(Message::UI(UIMessage::InsertChar('\n')))
        ));

        model.focus = Field::RecipientsFile;
        assert!(handler.handle_key_event(key(KeyCode::Enter), &model).is_none());

        model.file_input = " recipients.xlsx ".to_string();
        match handler.handle_key_event(key(KeyCode::Enter), &model) {
            Some(Message::Recipients(RecipientsMessage::Load(path))) => {
                assert_eq!(path, PathBuf::from("recipients.xlsx"));
            }
            other => panic!("unexpected {:?}", other),
        }

        model.focus = Field::Subject;
        assert!(matches!(
            handler.handle_key_event(key(KeyCode::Enter), &model),
            Some(Message::UI(UIMessage::FocusNext))
        ));
    }

    #[test]
    fn test_quit_and_typing() {
        let handler = EventHandler::new();
        let model = Model::default();
        assert!(matches!(
            handler.handle_key_event(key(KeyCode::Esc), &model),
            Some(Message::UI(UIMessage::Quit))
        ));
        assert!(matches!(
            handler.handle_key_event(key(KeyCode::Char('a')), &model),
            Some(Message::UI(UIMessage::InsertChar('a')))
        ));
        assert!(handler.handle_key_event(ctrl('z'), &model).is_none());
    }
}
