// dirview-core/src/controller/keymap.rs
// Key bindings for the browse area and the search input

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::trace;

use crate::controller::actions::Action;

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn shifted(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT)
}

fn plain(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn alt(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::ALT)
}

/// Maps terminal key events to [`Action`]s.
///
/// While the search input has focus, printable characters go to the input
/// and only a handful of control keys keep their browse meaning.
pub struct KeyMap {
    bindings: HashMap<KeyEvent, Action>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyMap {
    pub fn new() -> Self {
        let mut bindings = HashMap::with_capacity(32);

        bindings.insert(key('q'), Action::Quit);
        bindings.insert(key('/'), Action::FocusSearch);
        bindings.insert(plain(KeyCode::Esc), Action::ClearSearch);

        // Tabs
        bindings.insert(plain(KeyCode::Tab), Action::NextTab);
        bindings.insert(plain(KeyCode::Right), Action::NextTab);
        bindings.insert(plain(KeyCode::BackTab), Action::PrevTab);
        bindings.insert(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), Action::PrevTab);
        bindings.insert(plain(KeyCode::Left), Action::PrevTab);
        bindings.insert(plain(KeyCode::Enter), Action::SelectTab);
        for (idx, digit) in ('1'..='9').enumerate() {
            bindings.insert(key(digit), Action::SelectCategoryAt(idx));
        }

        // Pages
        bindings.insert(key('n'), Action::NextPage);
        bindings.insert(plain(KeyCode::PageDown), Action::NextPage);
        bindings.insert(key('p'), Action::PrevPage);
        bindings.insert(plain(KeyCode::PageUp), Action::PrevPage);

        // Rows
        bindings.insert(plain(KeyCode::Up), Action::MoveCursorUp);
        bindings.insert(key('k'), Action::MoveCursorUp);
        bindings.insert(plain(KeyCode::Down), Action::MoveCursorDown);
        bindings.insert(key('j'), Action::MoveCursorDown);

        bindings.insert(key('y'), Action::CopySelected);
        bindings.insert(shifted('Y'), Action::CopyAll);
        bindings.insert(key('Y'), Action::CopyAll);
        bindings.insert(key('o'), Action::OpenSelected);
        bindings.insert(key('t'), Action::ToggleTheme);
        bindings.insert(key('x'), Action::DismissNotification);

        bindings.insert(alt(KeyCode::Left), Action::HistoryBack);
        bindings.insert(alt(KeyCode::Right), Action::HistoryForward);

        Self { bindings }
    }

    pub fn resolve(&self, event: KeyEvent, input_focused: bool) -> Action {
        if event.kind == KeyEventKind::Release {
            return Action::NoOp;
        }

        trace!(?event, input_focused, "Resolving key");

        if event.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(event.code, KeyCode::Char('c'))
        {
            return Action::Quit;
        }

        if input_focused {
            return Self::resolve_input(event);
        }

        let lookup = KeyEvent::new(event.code, event.modifiers);
        self.bindings.get(&lookup).cloned().unwrap_or(Action::NoOp)
    }

    fn resolve_input(event: KeyEvent) -> Action {
        match event.code {
            KeyCode::Esc => Action::ClearSearch,
            KeyCode::Enter | KeyCode::Down | KeyCode::Tab => Action::BlurSearch,
            KeyCode::Backspace => Action::SearchBackspace,
            KeyCode::Char(c)
                if !event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Action::SearchInsert(c)
            }
            _ => Action::NoOp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_bindings() {
        let map = KeyMap::new();
        assert_eq!(map.resolve(key('/'), false), Action::FocusSearch);
        assert_eq!(map.resolve(key('n'), false), Action::NextPage);
        assert_eq!(map.resolve(plain(KeyCode::PageUp), false), Action::PrevPage);
        assert_eq!(map.resolve(key('3'), false), Action::SelectCategoryAt(2));
        assert_eq!(map.resolve(shifted('Y'), false), Action::CopyAll);
        assert_eq!(map.resolve(alt(KeyCode::Left), false), Action::HistoryBack);
        assert_eq!(map.resolve(key('z'), false), Action::NoOp);
    }

    #[test]
    fn test_input_captures_printable_keys() {
        let map = KeyMap::new();
        assert_eq!(map.resolve(key('q'), true), Action::SearchInsert('q'));
        assert_eq!(map.resolve(shifted('A'), true), Action::SearchInsert('A'));
        assert_eq!(map.resolve(plain(KeyCode::Backspace), true), Action::SearchBackspace);
        assert_eq!(map.resolve(plain(KeyCode::Esc), true), Action::ClearSearch);
        assert_eq!(map.resolve(plain(KeyCode::Enter), true), Action::BlurSearch);
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let map = KeyMap::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map.resolve(ctrl_c, true), Action::Quit);
        assert_eq!(map.resolve(ctrl_c, false), Action::Quit);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let map = KeyMap::new();
        let mut event = key('q');
        event.kind = KeyEventKind::Release;
        assert_eq!(map.resolve(event, false), Action::NoOp);
    }
}
