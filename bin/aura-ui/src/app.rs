//! ---
//! aura_section: "06-presentation"
//! aura_subsection: "binary"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Key handling for the terminal dashboard."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use aura_core::{Answer, AppState, BookingFlowStage, Command, ServiceSlot};
use aura_sim::Component;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Picker rows in display order.
pub const PICKER_ROWS: [Component; 5] = [
    Component::BrakePads,
    Component::Battery,
    Component::Tires,
    Component::EngineOil,
    Component::CatalyticConverter,
];

/// Whether keystrokes drive the console or edit the chat draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Input,
}

/// What the event loop should do after a keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Quit,
    Dispatch(Command),
    Idle,
}

#[derive(Debug, Default)]
pub struct App {
    pub mode: Mode,
    pub picker_cursor: usize,
    /// Last rejected command, shown in the footer until the next success.
    pub status: Option<String>,
}

impl App {
    pub fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Intent {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Intent::Quit;
        }
        match self.mode {
            Mode::Input => self.handle_input_key(key, state),
            Mode::Normal if state.picker_open() => self.handle_picker_key(key),
            Mode::Normal => self.handle_normal_key(key, state),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent, state: &AppState) -> Intent {
        match (key.code, state.booking()) {
            (KeyCode::Char('q'), _) => Intent::Quit,
            (KeyCode::Char('y'), Some(BookingFlowStage::Prompt)) => {
                Intent::Dispatch(Command::Respond(Answer::Accept))
            }
            (KeyCode::Char('n'), Some(BookingFlowStage::Prompt)) => {
                Intent::Dispatch(Command::Respond(Answer::Decline))
            }
            (KeyCode::Char(c @ '1'..='4'), Some(BookingFlowStage::SlotSelection)) => {
                let index = (c as usize) - ('1' as usize);
                Intent::Dispatch(Command::SelectSlot(ServiceSlot::ALL[index]))
            }
            (KeyCode::Char('1'), None) => Intent::Dispatch(Command::StartAlternator),
            (KeyCode::Char('2'), None) => Intent::Dispatch(Command::StartFatigue),
            (KeyCode::Char('3'), None) => {
                self.picker_cursor = 0;
                Intent::Dispatch(Command::OpenComponentPicker)
            }
            (KeyCode::Char('r'), _) => Intent::Dispatch(Command::Reset),
            (KeyCode::Char('v'), _) => Intent::Dispatch(Command::PushToTalk),
            (KeyCode::Char('i'), _) | (KeyCode::Enter, _) => {
                self.mode = Mode::Input;
                Intent::Idle
            }
            _ => Intent::Idle,
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> Intent {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.picker_cursor = self.picker_cursor.saturating_sub(1);
                Intent::Idle
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.picker_cursor = (self.picker_cursor + 1).min(PICKER_ROWS.len() - 1);
                Intent::Idle
            }
            KeyCode::Char(' ') => Intent::Dispatch(Command::ToggleComponent(self.cursor_component())),
            KeyCode::Enter => Intent::Dispatch(Command::ConfirmComponentPicker),
            KeyCode::Esc | KeyCode::Char('q') => Intent::Dispatch(Command::CancelComponentPicker),
            _ => Intent::Idle,
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent, state: &AppState) -> Intent {
        let draft = &state.voice().draft;
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                Intent::Idle
            }
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                if draft.trim().is_empty() {
                    Intent::Idle
                } else {
                    Intent::Dispatch(Command::SendChat(draft.clone()))
                }
            }
            KeyCode::Backspace => {
                let mut next = draft.clone();
                next.pop();
                Intent::Dispatch(Command::SetDraft(next))
            }
            KeyCode::Char(c) => Intent::Dispatch(Command::SetDraft(format!("{draft}{c}"))),
            _ => Intent::Idle,
        }
    }

    pub fn cursor_component(&self) -> Component {
        PICKER_ROWS[self.picker_cursor.min(PICKER_ROWS.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn digits_start_scenarios_when_idle() {
        let mut app = App::default();
        let state = AppState::new();
        assert_eq!(
            app.handle_key(press(KeyCode::Char('1')), &state),
            Intent::Dispatch(Command::StartAlternator)
        );
        assert_eq!(
            app.handle_key(press(KeyCode::Char('3')), &state),
            Intent::Dispatch(Command::OpenComponentPicker)
        );
        assert_eq!(app.handle_key(press(KeyCode::Char('y')), &state), Intent::Idle);
        assert_eq!(app.handle_key(press(KeyCode::Char('q')), &state), Intent::Quit);
    }

    #[test]
    fn picker_keys_toggle_the_row_under_the_cursor() {
        let mut app = App::default();
        let mut state = AppState::new();
        state.open_component_picker().unwrap();
        app.handle_key(press(KeyCode::Down), &state);
        app.handle_key(press(KeyCode::Down), &state);
        assert_eq!(
            app.handle_key(press(KeyCode::Char(' ')), &state),
            Intent::Dispatch(Command::ToggleComponent(Component::Tires))
        );
        for _ in 0..10 {
            app.handle_key(press(KeyCode::Down), &state);
        }
        assert_eq!(app.cursor_component(), Component::CatalyticConverter);
        assert_eq!(
            app.handle_key(press(KeyCode::Esc), &state),
            Intent::Dispatch(Command::CancelComponentPicker)
        );
    }

    #[test]
    fn input_mode_edits_and_sends_the_draft() {
        let mut app = App::default();
        let mut state = AppState::new();
        app.handle_key(press(KeyCode::Char('i')), &state);
        assert_eq!(app.mode, Mode::Input);

        state.set_draft("hi").unwrap();
        assert_eq!(
            app.handle_key(press(KeyCode::Char('!')), &state),
            Intent::Dispatch(Command::SetDraft("hi!".into()))
        );
        assert_eq!(
            app.handle_key(press(KeyCode::Backspace), &state),
            Intent::Dispatch(Command::SetDraft("h".into()))
        );
        assert_eq!(
            app.handle_key(press(KeyCode::Enter), &state),
            Intent::Dispatch(Command::SendChat("hi".into()))
        );
        assert_eq!(app.mode, Mode::Normal);
    }
}
