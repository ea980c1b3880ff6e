use super::*;
use crate::core::chat_stream::TurnError;
use crate::core::message::Message;
use crate::core::session::{Page, TURN_ERROR_MESSAGE};
use crate::utils::test_utils::{create_test_app, test_settings};
use tempfile::TempDir;

#[test]
fn new_app_opens_with_greeting_on_welcome() {
    let app = create_test_app();
    assert_eq!(app.session.page(), Page::Welcome);
    assert_eq!(
        app.session.transcript(),
        &[Message::assistant(test_settings().greeting)]
    );
}

#[test]
fn chunks_build_preview_until_end_commits() {
    let mut app = create_test_app();
    app.session.set_draft("I need a plumber");
    let turn = app.submit_draft().expect("turn starts");

    app.apply_stream_message(StreamMessage::Chunk("Hel".into()), turn.id);
    app.apply_stream_message(StreamMessage::Chunk("lo".into()), turn.id);
    assert_eq!(app.ui.reply_preview, "Hello");
    assert_eq!(app.session.transcript().len(), 2);

    app.apply_stream_message(StreamMessage::End("Hello".into()), turn.id);
    assert!(app.ui.reply_preview.is_empty());
    assert!(!app.session.is_pending());
    assert_eq!(
        app.session.transcript().last(),
        Some(&Message::assistant("Hello"))
    );
}

#[test]
fn error_event_commits_fixed_text() {
    let mut app = create_test_app();
    app.session.set_draft("hello");
    let turn = app.submit_draft().expect("turn starts");

    app.apply_stream_message(StreamMessage::Chunk("par".into()), turn.id);
    app.apply_stream_message(
        StreamMessage::Error(TurnError::Status { status: 500 }),
        turn.id,
    );

    assert_eq!(
        app.session.transcript().last(),
        Some(&Message::assistant(TURN_ERROR_MESSAGE))
    );
    assert!(app.ui.reply_preview.is_empty());
    assert!(!app.session.is_pending());
}

#[test]
fn events_for_other_turns_are_ignored() {
    let mut app = create_test_app();
    app.session.set_draft("hello");
    let turn = app.submit_draft().expect("turn starts");

    app.apply_stream_message(StreamMessage::Chunk("stale".into()), turn.id + 7);
    app.apply_stream_message(StreamMessage::End("stale".into()), turn.id + 7);

    assert!(app.ui.reply_preview.is_empty());
    assert!(app.session.is_pending());
    assert_eq!(app.session.transcript().len(), 2);
}

#[test]
fn book_now_requires_both_fields() {
    let mut app = create_test_app();
    app.book_now();
    let status = app.ui.status.clone().expect("status");
    assert!(status.starts_with("Please enter"));

    app.edit_focused_field(|value| value.push_str("Ada"));
    app.ui.form_focus = FormField::Contact;
    app.edit_focused_field(|value| value.push_str("ada@example.com"));
    app.book_now();

    assert_eq!(app.session.field("name"), Some("Ada"));
    assert_eq!(
        app.ui.status.as_deref(),
        Some("Thanks, Ada! We'll reach out at ada@example.com to confirm your booking.")
    );
}

#[test]
fn transcript_log_receives_committed_messages_once() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("session.txt");
    let log = TranscriptLog::new(Some(path.clone())).expect("log");
    let mut app = App::new(&test_settings(), log);

    app.session.set_draft("hi");
    let turn = app.submit_draft().expect("turn starts");
    app.apply_stream_message(StreamMessage::End("hello there".into()), turn.id);
    app.apply_stream_message(StreamMessage::End("hello there".into()), turn.id);

    let contents = std::fs::read_to_string(&path).expect("read");
    assert_eq!(
        contents,
        format!(
            "Assistant: {}\n\nYou: hi\n\nAssistant: hello there\n\n",
            test_settings().greeting
        )
    );
}
