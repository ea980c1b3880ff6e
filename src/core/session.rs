//! Session state for the three-page consultation flow.
//!
//! A [`Session`] is the single mutable context handed to every handler. It
//! owns the active page, the transcript, the draft input, the form fields,
//! and the in-flight turn marker. Each user turn is modeled as two disjoint
//! transitions: [`Session::begin_turn`] appends the user message right away
//! and hands back the request payload, and [`Session::finish_turn`] commits
//! the assistant reply (or the fixed error text) once the stream resolves.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::core::chat_stream::TurnError;
use crate::core::message::{Message, Role};

/// Assistant content committed in place of a reply when a turn fails.
pub const TURN_ERROR_MESSAGE: &str = "There was an error. Please try again later.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Page {
    #[default]
    Welcome = 1,
    Consultation = 2,
    Recommendations = 3,
}

impl Page {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Page::Welcome),
            2 => Some(Page::Consultation),
            3 => Some(Page::Recommendations),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Welcome => "Welcome",
            Page::Consultation => "Consultation",
            Page::Recommendations => "Recommended Services",
        }
    }

    fn next(self) -> Self {
        match self {
            Page::Welcome => Page::Consultation,
            Page::Consultation | Page::Recommendations => Page::Recommendations,
        }
    }

    fn previous(self) -> Self {
        match self {
            Page::Welcome | Page::Consultation => Page::Welcome,
            Page::Recommendations => Page::Consultation,
        }
    }
}

/// A turn that has been started but not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub id: u64,
    /// Full conversation including the newest user message.
    pub payload: Vec<Message>,
}

#[derive(Debug, Default)]
pub struct Session {
    page: Page,
    transcript: Vec<Message>,
    draft: String,
    pending_turn: Option<u64>,
    last_turn_id: u64,
    form_fields: BTreeMap<String, String>,
    scroll_requested: bool,
    /// Transcript indices holding the fixed text of a failed turn.
    failed_entries: BTreeSet<usize>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session whose transcript opens with an assistant greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.append_message(Role::Assistant, greeting);
        session
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_pending(&self) -> bool {
        self.pending_turn.is_some()
    }

    /// Whether the transcript entry at `index` records a failed turn.
    pub fn is_failed_entry(&self, index: usize) -> bool {
        self.failed_entries.contains(&index)
    }

    pub fn pending_turn_id(&self) -> Option<u64> {
        self.pending_turn
    }

    pub fn form_fields(&self) -> &BTreeMap<String, String> {
        &self.form_fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.form_fields.get(name).map(String::as_str)
    }

    pub fn advance(&mut self) {
        self.page = self.page.next();
    }

    pub fn retreat(&mut self) {
        self.page = self.page.previous();
    }

    /// The welcome screen's single action. Ignored on any other page.
    pub fn get_started(&mut self) {
        if self.page == Page::Welcome {
            self.advance();
        }
    }

    pub fn append_message(&mut self, role: Role, content: impl Into<String>) {
        self.transcript.push(Message::new(role, content));
        self.scroll_requested = true;
    }

    /// Returns whether a message was appended since the last call.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    pub fn update_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.form_fields.insert(name.into(), value.into());
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn push_draft_char(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn pop_draft_char(&mut self) {
        self.draft.pop();
    }

    /// Start a turn from `text`.
    ///
    /// Returns `None` without touching any state when the text is blank or a
    /// turn is already in flight.
    pub fn begin_turn(&mut self, text: &str) -> Option<PendingTurn> {
        if text.trim().is_empty() || self.is_pending() {
            return None;
        }

        self.append_message(Role::User, text);
        self.draft.clear();
        self.last_turn_id += 1;
        self.pending_turn = Some(self.last_turn_id);
        debug!(turn_id = self.last_turn_id, "turn started");

        Some(PendingTurn {
            id: self.last_turn_id,
            payload: self.transcript.clone(),
        })
    }

    /// Start a turn from the current draft input.
    pub fn submit_draft(&mut self) -> Option<PendingTurn> {
        let text = self.draft.clone();
        self.begin_turn(&text)
    }

    /// Commit the outcome of turn `turn_id`.
    ///
    /// Outcomes for a turn that is not the one in flight are dropped and
    /// `false` is returned.
    pub fn finish_turn(&mut self, turn_id: u64, outcome: Result<String, TurnError>) -> bool {
        if self.pending_turn != Some(turn_id) {
            debug!(turn_id, "ignoring outcome for stale turn");
            return false;
        }

        let content = match outcome {
            Ok(reply) => reply,
            Err(_) => {
                self.failed_entries.insert(self.transcript.len());
                TURN_ERROR_MESSAGE.to_string()
            }
        };
        self.append_message(Role::Assistant, content);
        self.pending_turn = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_stays_within_page_bounds() {
        let mut session = Session::new();
        assert_eq!(session.page(), Page::Welcome);

        session.retreat();
        assert_eq!(session.page(), Page::Welcome);

        for _ in 0..5 {
            session.advance();
        }
        assert_eq!(session.page(), Page::Recommendations);

        session.retreat();
        assert_eq!(session.page(), Page::Consultation);

        // Deterministic pseudo-random walk over both directions.
        let mut state: u32 = 7;
        for _ in 0..200 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            if state & 0x100 == 0 {
                session.advance();
            } else {
                session.retreat();
            }
            let number = session.page().number();
            assert!((1..=3).contains(&number));
        }
    }

    #[test]
    fn get_started_only_acts_on_welcome() {
        let mut session = Session::new();
        session.get_started();
        assert_eq!(session.page(), Page::Consultation);
        session.get_started();
        assert_eq!(session.page(), Page::Consultation);
    }

    #[test]
    fn page_numbers_round_trip() {
        for page in [Page::Welcome, Page::Consultation, Page::Recommendations] {
            assert_eq!(Page::from_number(page.number()), Some(page));
        }
        assert_eq!(Page::from_number(0), None);
        assert_eq!(Page::from_number(4), None);
    }

    #[test]
    fn blank_input_is_rejected_without_mutation() {
        let mut session = Session::new();
        session.set_draft("   \t ");
        assert!(session.submit_draft().is_none());
        assert!(session.begin_turn("").is_none());
        assert!(session.transcript().is_empty());
        assert!(!session.is_pending());
        assert_eq!(session.draft(), "   \t ");
    }

    #[test]
    fn second_turn_is_rejected_while_pending() {
        let mut session = Session::new();
        let first = session.begin_turn("hello").expect("first turn starts");
        assert!(session.is_pending());

        assert!(session.begin_turn("again").is_none());
        assert_eq!(session.transcript().len(), 1);

        assert!(session.finish_turn(first.id, Ok("hi".into())));
        assert!(!session.is_pending());
        assert!(session.begin_turn("again").is_some());
    }

    #[test]
    fn begin_turn_appends_user_message_and_clears_draft() {
        let mut session = Session::with_greeting("Hi there");
        session.set_draft("I need a plumber");
        let turn = session.submit_draft().expect("turn starts");

        assert_eq!(session.draft(), "");
        assert_eq!(
            turn.payload,
            vec![
                Message::assistant("Hi there"),
                Message::user("I need a plumber")
            ]
        );
        assert_eq!(session.pending_turn_id(), Some(turn.id));
    }

    #[test]
    fn successful_turn_adds_user_then_assistant() {
        let mut session = Session::new();
        let turn = session.begin_turn("I need a plumber").expect("turn starts");
        session.finish_turn(turn.id, Ok("Sure, where are you located?".into()));

        assert_eq!(
            session.transcript(),
            &[
                Message::user("I need a plumber"),
                Message::assistant("Sure, where are you located?"),
            ]
        );
        assert!(!session.is_pending());
    }

    #[test]
    fn failed_turn_commits_fixed_error_text() {
        let mut session = Session::new();
        let turn = session.begin_turn("hello").expect("turn starts");
        session.finish_turn(turn.id, Err(TurnError::Status { status: 500 }));

        assert_eq!(session.transcript().len(), 2);
        assert_eq!(
            session.transcript().last(),
            Some(&Message::assistant(TURN_ERROR_MESSAGE))
        );
        assert!(!session.is_pending());
        assert!(session.is_failed_entry(1));
    }

    #[test]
    fn reply_matching_error_text_is_not_marked_failed() {
        let mut session = Session::new();
        let turn = session.begin_turn("hello").expect("turn starts");
        session.finish_turn(turn.id, Ok(TURN_ERROR_MESSAGE.to_string()));

        assert_eq!(
            session.transcript().last(),
            Some(&Message::assistant(TURN_ERROR_MESSAGE))
        );
        assert!(!session.is_failed_entry(1));
        assert!(!session.is_failed_entry(0));
    }

    #[test]
    fn page_titles() {
        assert_eq!(Page::Welcome.title(), "Welcome");
        assert_eq!(Page::Consultation.title(), "Consultation");
        assert_eq!(Page::Recommendations.title(), "Recommended Services");
    }

    #[test]
    fn stale_outcomes_are_ignored() {
        let mut session = Session::new();
        let turn = session.begin_turn("hello").expect("turn starts");

        assert!(!session.finish_turn(turn.id + 1, Ok("ghost".into())));
        assert_eq!(session.transcript().len(), 1);
        assert!(session.is_pending());

        assert!(session.finish_turn(turn.id, Ok("real".into())));
        assert!(!session.finish_turn(turn.id, Ok("duplicate".into())));
        assert_eq!(session.transcript().len(), 2);
    }

    #[test]
    fn appending_requests_scroll_once() {
        let mut session = Session::new();
        assert!(!session.take_scroll_request());
        session.append_message(Role::Assistant, "hi");
        assert!(session.take_scroll_request());
        assert!(!session.take_scroll_request());
    }

    #[test]
    fn update_field_last_write_wins() {
        let mut session = Session::new();
        session.update_field("name", "Ada");
        session.update_field("contact", "ada@example.com");
        session.update_field("name", "Grace");

        assert_eq!(session.field("name"), Some("Grace"));
        assert_eq!(session.field("contact"), Some("ada@example.com"));
        assert_eq!(session.form_fields().len(), 2);
    }

    #[test]
    fn draft_editing_helpers() {
        let mut session = Session::new();
        session.push_draft_char('h');
        session.push_draft_char('é');
        assert_eq!(session.draft(), "hé");
        session.pop_draft_char();
        assert_eq!(session.draft(), "h");
    }
}
