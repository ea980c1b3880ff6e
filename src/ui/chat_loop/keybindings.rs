//! Page-aware key handling.
//!
//! Each page interprets keys on its own; Ctrl+C quits from anywhere.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::prelude::Size;

use crate::core::app::App;
use crate::core::session::{Page, PendingTurn};
use crate::ui::layout::{max_scroll_offset, prewrap_lines, ConsultationLayout};
use crate::ui::renderer::transcript_lines;
use crate::ui::theme::Theme;

const PAGE_SCROLL_LINES: u16 = 10;

#[derive(Debug, PartialEq, Eq)]
pub enum KeyLoopAction {
    Continue,
    Break,
    /// A turn was started; its request still has to be issued.
    StartTurn(PendingTurn),
}

pub fn handle_key_event(app: &mut App, key: &KeyEvent, term_size: Size) -> KeyLoopAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => KeyLoopAction::Break,
            KeyCode::Char('l') => {
                app.ui.clear_status();
                KeyLoopAction::Continue
            }
            _ => KeyLoopAction::Continue,
        };
    }

    match app.session.page() {
        Page::Welcome => handle_welcome_key(app, key),
        Page::Consultation => handle_consultation_key(app, key, term_size),
        Page::Recommendations => handle_recommendations_key(app, key),
    }
}

fn handle_welcome_key(app: &mut App, key: &KeyEvent) -> KeyLoopAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.session.get_started(),
        KeyCode::Esc | KeyCode::Char('q') => return KeyLoopAction::Break,
        _ => {}
    }
    KeyLoopAction::Continue
}

fn handle_consultation_key(app: &mut App, key: &KeyEvent, term_size: Size) -> KeyLoopAction {
    match key.code {
        KeyCode::Esc => app.session.retreat(),
        KeyCode::Tab => app.session.advance(),
        KeyCode::Enter => {
            if let Some(turn) = app.submit_draft() {
                app.ui.pin_to_bottom();
                return KeyLoopAction::StartTurn(turn);
            }
        }
        KeyCode::Up => scroll_transcript(app, term_size, ScrollDirection::Up(1)),
        KeyCode::Down => scroll_transcript(app, term_size, ScrollDirection::Down(1)),
        KeyCode::PageUp => {
            scroll_transcript(app, term_size, ScrollDirection::Up(PAGE_SCROLL_LINES))
        }
        KeyCode::PageDown => {
            scroll_transcript(app, term_size, ScrollDirection::Down(PAGE_SCROLL_LINES))
        }
        KeyCode::End => app.ui.pin_to_bottom(),
        // Input is disabled while a reply is in flight
        KeyCode::Backspace if !app.session.is_pending() => app.session.pop_draft_char(),
        KeyCode::Char(c)
            if !app.session.is_pending() && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            app.session.push_draft_char(c)
        }
        _ => {}
    }
    KeyLoopAction::Continue
}

fn handle_recommendations_key(app: &mut App, key: &KeyEvent) -> KeyLoopAction {
    match key.code {
        KeyCode::Esc => app.session.retreat(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.ui.form_focus = app.ui.form_focus.next();
        }
        KeyCode::Enter => app.book_now(),
        KeyCode::Backspace => app.edit_focused_field(|value| {
            value.pop();
        }),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
            app.edit_focused_field(|value| value.push(c))
        }
        _ => {}
    }
    KeyLoopAction::Continue
}

enum ScrollDirection {
    Up(u16),
    Down(u16),
}

fn scroll_transcript(app: &mut App, term_size: Size, direction: ScrollDirection) {
    let layout = ConsultationLayout::new(Rect::new(0, 0, term_size.width, term_size.height));
    let inner = layout.transcript_inner();
    let max_offset = {
        let rows = prewrap_lines(&transcript_lines(app, &Theme::default()), inner.width);
        max_scroll_offset(&rows, inner.height)
    };

    match direction {
        ScrollDirection::Up(lines) => app.ui.scroll_up(lines, max_offset),
        ScrollDirection::Down(lines) => app.ui.scroll_down(lines, max_offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use crate::utils::test_utils::create_test_app;

    const TERM: Size = Size {
        width: 80,
        height: 24,
    };

    fn press(app: &mut App, code: KeyCode) -> KeyLoopAction {
        handle_key_event(app, &KeyEvent::new(code, KeyModifiers::NONE), TERM)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn ctrl_c_quits_from_any_page() {
        let mut app = create_test_app();
        for _ in 0..3 {
            let action = handle_key_event(
                &mut app,
                &KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                TERM,
            );
            assert_eq!(action, KeyLoopAction::Break);
            app.session.advance();
        }
    }

    #[test]
    fn enter_walks_from_welcome_to_consultation() {
        let mut app = create_test_app();
        assert_eq!(press(&mut app, KeyCode::Enter), KeyLoopAction::Continue);
        assert_eq!(app.session.page(), Page::Consultation);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.session.page(), Page::Recommendations);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session.page(), Page::Welcome);
    }

    #[test]
    fn typing_and_enter_start_a_turn() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "I need a plumbe");
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('r'));

        let action = press(&mut app, KeyCode::Enter);
        let KeyLoopAction::StartTurn(turn) = action else {
            panic!("expected a turn, got {action:?}");
        };
        assert_eq!(
            turn.payload.last(),
            Some(&Message::user("I need a plumber"))
        );
        assert_eq!(app.session.draft(), "");
        assert!(app.session.is_pending());
    }

    #[test]
    fn input_is_ignored_while_pending() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "hello");
        assert!(matches!(
            press(&mut app, KeyCode::Enter),
            KeyLoopAction::StartTurn(_)
        ));

        type_text(&mut app, "more");
        assert_eq!(app.session.draft(), "");
        assert_eq!(press(&mut app, KeyCode::Enter), KeyLoopAction::Continue);
        assert_eq!(app.session.transcript().len(), 2);
    }

    #[test]
    fn blank_draft_does_not_start_a_turn() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "   ");
        assert_eq!(press(&mut app, KeyCode::Enter), KeyLoopAction::Continue);
        assert!(!app.session.is_pending());
        assert_eq!(app.session.transcript().len(), 1);
    }

    #[test]
    fn recommendations_form_fills_fields_and_books() {
        let mut app = create_test_app();
        app.session.advance();
        app.session.advance();

        type_text(&mut app, "Ada");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "555-0100");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session.field("name"), Some("Ada"));
        assert_eq!(app.session.field("contact"), Some("555-0100"));
        assert!(app
            .ui
            .status
            .as_deref()
            .is_some_and(|status| status.starts_with("Thanks, Ada!")));
    }

    #[test]
    fn scrolling_up_with_long_transcript_disables_auto_scroll() {
        let mut app = create_test_app();
        app.session.get_started();
        for i in 0..40 {
            app.session
                .append_message(crate::core::message::Role::Assistant, format!("line {i}"));
        }
        press(&mut app, KeyCode::Up);
        assert!(!app.ui.auto_scroll);
        press(&mut app, KeyCode::End);
        assert!(app.ui.auto_scroll);
    }
}
