use std::time::Instant;

/// Booking form fields on the recommendations page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Contact,
}

impl FormField {
    pub const ALL: [FormField; 2] = [FormField::Name, FormField::Contact];

    /// Key used in the session's form field mapping.
    pub fn key(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Contact => "contact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Contact => "Phone or email",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Contact,
            FormField::Contact => FormField::Name,
        }
    }
}

/// Presentation state that never leaves the terminal.
pub struct UiState {
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    /// Text of the in-flight reply, shown until the turn is committed.
    pub reply_preview: String,
    pub pulse_start: Instant,
    pub status: Option<String>,
    pub form_focus: FormField,
    pub exit_requested: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            scroll_offset: 0,
            auto_scroll: true,
            reply_preview: String::new(),
            pulse_start: Instant::now(),
            status: None,
            form_focus: FormField::Name,
            exit_requested: false,
        }
    }
}

impl UiState {
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Scroll towards older messages. `max_offset` is the offset that shows
    /// the newest line, which is where an auto-scrolling view sits.
    pub fn scroll_up(&mut self, lines: u16, max_offset: u16) {
        if self.auto_scroll {
            self.scroll_offset = max_offset;
        }
        self.scroll_offset = self.scroll_offset.min(max_offset).saturating_sub(lines);
        self.auto_scroll = self.scroll_offset >= max_offset;
    }

    pub fn scroll_down(&mut self, lines: u16, max_offset: u16) {
        if self.auto_scroll {
            return;
        }
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(max_offset);
        if self.scroll_offset >= max_offset {
            self.auto_scroll = true;
        }
    }

    pub fn pin_to_bottom(&mut self) {
        self.auto_scroll = true;
    }

    /// Offset to render with, given the current content height.
    pub fn effective_scroll_offset(&self, max_offset: u16) -> u16 {
        if self.auto_scroll {
            max_offset
        } else {
            self.scroll_offset.min(max_offset)
        }
    }
}
