use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use qtris_engine::Action;

/// Keys pressed together for an action; empty for [`Action::NoMove`].
pub(crate) const fn keys_for(action: Action) -> &'static [KeyCode] {
    match action {
        Action::Down => &[KeyCode::Down],
        Action::Left => &[KeyCode::Left],
        Action::Right => &[KeyCode::Right],
        Action::DownRight => &[KeyCode::Down, KeyCode::Right],
        Action::DownLeft => &[KeyCode::Down, KeyCode::Left],
        Action::Up | Action::RotateRight => &[KeyCode::Up],
        Action::RotateLeft => &[KeyCode::Char('z')],
        Action::Restart => &[KeyCode::Enter],
        Action::NoMove => &[],
    }
}

/// Sink for the key events of chosen actions.
pub(crate) trait KeyDispatcher {
    fn send(&mut self, event: KeyEvent);

    /// Presses every key of the action, then releases them in the same order.
    fn dispatch(&mut self, action: Action) {
        let keys = keys_for(action);
        for kind in [KeyEventKind::Press, KeyEventKind::Release] {
            for &code in keys {
                self.send(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind));
            }
        }
    }
}

/// Emits key events as trace-level log records.
#[derive(Debug, Default)]
pub(crate) struct LogDispatcher;

impl KeyDispatcher for LogDispatcher {
    fn send(&mut self, event: KeyEvent) {
        tracing::trace!(code = ?event.code, kind = ?event.kind, "key event");
    }
}
