//! Terminal input mapped to session interactions

use crossterm::event::{Event, KeyEventKind, MouseEventKind};

use prepper_core::Interaction;

/// Interaction a terminal event counts as, if any
///
/// Resizes, focus changes and pastes are not user activity.
pub fn interaction_for(event: &Event) -> Option<Interaction> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(Interaction::KeyPress),
        Event::Mouse(mouse) => Some(match mouse.kind {
            MouseEventKind::Down(_) => Interaction::PointerDown,
            MouseEventKind::Up(_) => Interaction::Click,
            MouseEventKind::Drag(_) | MouseEventKind::Moved => Interaction::PointerMove,
            MouseEventKind::ScrollDown
            | MouseEventKind::ScrollUp
            | MouseEventKind::ScrollLeft
            | MouseEventKind::ScrollRight => Interaction::Scroll,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{
        KeyCode, KeyEvent, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
    };
    use rstest::rstest;

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[rstest]
    #[case(MouseEventKind::Down(MouseButton::Left), Interaction::PointerDown)]
    #[case(MouseEventKind::Up(MouseButton::Left), Interaction::Click)]
    #[case(MouseEventKind::Drag(MouseButton::Right), Interaction::PointerMove)]
    #[case(MouseEventKind::Moved, Interaction::PointerMove)]
    #[case(MouseEventKind::ScrollUp, Interaction::Scroll)]
    #[case(MouseEventKind::ScrollDown, Interaction::Scroll)]
    fn test_mouse_interactions(#[case] kind: MouseEventKind, #[case] expected: Interaction) {
        assert_eq!(interaction_for(&mouse(kind)), Some(expected));
    }

    #[test]
    fn test_key_press_only() {
        let press = Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(interaction_for(&press), Some(Interaction::KeyPress));

        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(interaction_for(&release), None);
    }

    #[test]
    fn test_non_activity_events() {
        assert_eq!(interaction_for(&Event::Resize(80, 24)), None);
        assert_eq!(interaction_for(&Event::FocusGained), None);
    }
}
