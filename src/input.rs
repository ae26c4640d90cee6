//! Input handling abstractions.
//!
//! Keys are mapped to [`Command`]s by small mode-specific handlers, so the
//! bindings can be tested without an [`App`](crate::app::App) or a terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of processing an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// The input was consumed and handled.
    Consumed,
    /// The input was ignored (not applicable to this handler).
    Ignored,
    /// The application should quit.
    Quit,
    /// The mode should change.
    ModeChange(AppMode),
    /// A presenter command to apply.
    Command(Command),
}

/// Application modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Arrow keys move through the deck.
    #[default]
    Presenting,
    /// The jump-to-slide field has focus.
    JumpInput,
    /// Tab moves a hover through the current slide's diagrams.
    Diagram,
}

/// Things the presenter can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Previous slide.
    Prev,
    /// Reveal the next item, or go to the next slide.
    Advance,
    /// First slide.
    First,
    /// Last slide.
    Last,
    /// Focus the jump field, optionally pre-filled.
    OpenJump(Option<char>),
    /// Type into the jump field.
    JumpChar(char),
    /// Delete the last character of the jump field.
    JumpBackspace,
    /// Submit the jump field.
    SubmitJump,
    /// Leave the jump field, submitting it if it has text.
    BlurJump,
    /// Show or hide the key reference.
    ToggleHelp,
    /// Start keyboard interaction with the slide's diagrams.
    FocusDiagrams,
    /// Hover the next interactive element.
    FocusNext,
    /// Hover the previous interactive element.
    FocusPrev,
    /// Click the hovered element.
    Activate,
}

/// Context passed to input handlers.
///
/// This provides handlers with the information they need to process
/// input without directly accessing the full App state.
#[derive(Debug, Clone, Copy)]
pub struct InputContext {
    /// Current application mode.
    pub mode: AppMode,
    /// Whether help is currently shown.
    pub show_help: bool,
    /// Whether the current slide has a diagram to focus.
    pub has_diagrams: bool,
}

/// Trait for handling keyboard input.
///
/// Implementations of this trait handle input for specific modes
/// or input contexts.
pub trait InputHandler {
    /// Handle a key event.
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext) -> InputResult;

    /// Get the name of this handler (for debugging).
    fn name(&self) -> &'static str;
}

/// Handler for global shortcuts (help, quit).
#[derive(Debug, Default)]
pub struct GlobalHandler;

impl InputHandler for GlobalHandler {
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext) -> InputResult {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputResult::Quit;
        }

        if key.code == KeyCode::F(1) {
            return InputResult::Command(Command::ToggleHelp);
        }

        // Inside the jump field these are just characters
        if ctx.mode == AppMode::JumpInput {
            return InputResult::Ignored;
        }

        match key.code {
            KeyCode::Char('?') => InputResult::Command(Command::ToggleHelp),
            KeyCode::Char('q') => InputResult::Quit,
            KeyCode::Esc if ctx.show_help => InputResult::Command(Command::ToggleHelp),
            _ => InputResult::Ignored,
        }
    }

    fn name(&self) -> &'static str {
        "GlobalHandler"
    }
}

/// Handler for slide navigation.
#[derive(Debug, Default)]
pub struct PresentingHandler;

impl InputHandler for PresentingHandler {
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext) -> InputResult {
        let command = match key.code {
            KeyCode::Left => Command::Prev,
            KeyCode::Right | KeyCode::Char(' ') => Command::Advance,
            KeyCode::Home => Command::First,
            KeyCode::End => Command::Last,
            KeyCode::Char('g') => Command::OpenJump(None),
            KeyCode::Char(c) if c.is_ascii_digit() => Command::OpenJump(Some(c)),
            KeyCode::Char('d') if ctx.has_diagrams => Command::FocusDiagrams,
            _ => return InputResult::Ignored,
        };
        InputResult::Command(command)
    }

    fn name(&self) -> &'static str {
        "PresentingHandler"
    }
}

/// Handler for the jump-to-slide field.
#[derive(Debug, Default)]
pub struct JumpInputHandler;

impl InputHandler for JumpInputHandler {
    fn handle(&mut self, key: KeyEvent, _ctx: &InputContext) -> InputResult {
        let command = match key.code {
            KeyCode::Enter => Command::SubmitJump,
            KeyCode::Esc => Command::BlurJump,
            KeyCode::Backspace => Command::JumpBackspace,
            KeyCode::Char(c) => Command::JumpChar(c),
            _ => return InputResult::Consumed,
        };
        InputResult::Command(command)
    }

    fn name(&self) -> &'static str {
        "JumpInputHandler"
    }
}

/// Handler for keyboard interaction with diagrams.
///
/// Keys it does not know fall through to [`PresentingHandler`].
#[derive(Debug, Default)]
pub struct DiagramHandler;

impl InputHandler for DiagramHandler {
    fn handle(&mut self, key: KeyEvent, _ctx: &InputContext) -> InputResult {
        let command = match key.code {
            KeyCode::Tab => Command::FocusNext,
            KeyCode::BackTab => Command::FocusPrev,
            KeyCode::Enter => Command::Activate,
            KeyCode::Esc | KeyCode::Char('d') => return InputResult::ModeChange(AppMode::Presenting),
            _ => return InputResult::Ignored,
        };
        InputResult::Command(command)
    }

    fn name(&self) -> &'static str {
        "DiagramHandler"
    }
}

/// Run the handler chain for a mode: global first, then the mode's own
/// handler, then navigation as the fallback in diagram mode.
pub fn dispatch(key: KeyEvent, ctx: &InputContext) -> InputResult {
    let result = GlobalHandler.handle(key, ctx);
    if result != InputResult::Ignored {
        return result;
    }
    match ctx.mode {
        AppMode::Presenting => PresentingHandler.handle(key, ctx),
        AppMode::JumpInput => JumpInputHandler.handle(key, ctx),
        AppMode::Diagram => match DiagramHandler.handle(key, ctx) {
            InputResult::Ignored => PresentingHandler.handle(key, ctx),
            other => other,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn make_context(mode: AppMode) -> InputContext {
        InputContext { mode, show_help: false, has_diagrams: true }
    }

    fn command(code: KeyCode, mode: AppMode) -> InputResult {
        dispatch(make_key(code), &make_context(mode))
    }

    #[test]
    fn test_navigation_bindings() {
        let p = AppMode::Presenting;
        assert_eq!(command(KeyCode::Left, p), InputResult::Command(Command::Prev));
        assert_eq!(command(KeyCode::Right, p), InputResult::Command(Command::Advance));
        assert_eq!(command(KeyCode::Char(' '), p), InputResult::Command(Command::Advance));
        assert_eq!(command(KeyCode::Home, p), InputResult::Command(Command::First));
        assert_eq!(command(KeyCode::End, p), InputResult::Command(Command::Last));
    }

    #[test]
    fn test_digit_opens_prefilled_jump() {
        assert_eq!(
            command(KeyCode::Char('4'), AppMode::Presenting),
            InputResult::Command(Command::OpenJump(Some('4')))
        );
        assert_eq!(command(KeyCode::Char('g'), AppMode::Presenting), InputResult::Command(Command::OpenJump(None)));
    }

    #[test]
    fn test_jump_field_takes_quit_and_help_keys_as_text() {
        let j = AppMode::JumpInput;
        assert_eq!(command(KeyCode::Char('q'), j), InputResult::Command(Command::JumpChar('q')));
        assert_eq!(command(KeyCode::Char('?'), j), InputResult::Command(Command::JumpChar('?')));
        assert_eq!(command(KeyCode::Enter, j), InputResult::Command(Command::SubmitJump));
        assert_eq!(command(KeyCode::Esc, j), InputResult::Command(Command::BlurJump));
        assert_eq!(command(KeyCode::Left, j), InputResult::Consumed);
    }

    #[test]
    fn test_global_handler_quit_and_help() {
        assert_eq!(command(KeyCode::Char('q'), AppMode::Presenting), InputResult::Quit);
        assert_eq!(command(KeyCode::F(1), AppMode::JumpInput), InputResult::Command(Command::ToggleHelp));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(dispatch(ctrl_c, &make_context(AppMode::JumpInput)), InputResult::Quit);
    }

    #[test]
    fn test_diagram_mode_falls_back_to_navigation() {
        let d = AppMode::Diagram;
        assert_eq!(command(KeyCode::Tab, d), InputResult::Command(Command::FocusNext));
        assert_eq!(command(KeyCode::BackTab, d), InputResult::Command(Command::FocusPrev));
        assert_eq!(command(KeyCode::Enter, d), InputResult::Command(Command::Activate));
        assert_eq!(command(KeyCode::Esc, d), InputResult::ModeChange(AppMode::Presenting));
        assert_eq!(command(KeyCode::Right, d), InputResult::Command(Command::Advance));
    }

    #[test]
    fn test_focus_diagrams_needs_a_diagram() {
        let ctx = InputContext { mode: AppMode::Presenting, show_help: false, has_diagrams: false };
        assert_eq!(dispatch(make_key(KeyCode::Char('d')), &ctx), InputResult::Ignored);
    }
}
