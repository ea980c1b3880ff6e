//! Page geometry shared by the renderer and the key handlers.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// Rows of the consultation page, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsultationLayout {
    pub header: Rect,
    pub transcript: Rect,
    pub input: Rect,
    pub footer: Rect,
}

impl ConsultationLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            header: chunks[0],
            transcript: chunks[1],
            input: chunks[2],
            footer: chunks[3],
        }
    }

    /// Text area inside the transcript border.
    pub fn transcript_inner(&self) -> Rect {
        Rect {
            x: self.transcript.x.saturating_add(1),
            y: self.transcript.y.saturating_add(1),
            width: self.transcript.width.saturating_sub(2),
            height: self.transcript.height.saturating_sub(2),
        }
    }
}

/// Wrap `lines` to `width` columns at spaces, keeping span and line styles.
/// Words wider than a row are split. The result is drawn without ratatui
/// wrapping, so its length is the row count used for scrolling.
pub fn prewrap_lines(lines: &[Line<'_>], width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let mut wrapper = LineWrapper::new(width, line.style);
        for span in &line.spans {
            for ch in span.content.chars() {
                wrapper.push(ch, span.style);
            }
        }
        wrapper.finish(&mut out);
    }
    out
}

/// Largest scroll offset that still fills the viewport, for pre-wrapped rows.
pub fn max_scroll_offset(rows: &[Line<'_>], viewport_height: u16) -> u16 {
    u16::try_from(rows.len())
        .unwrap_or(u16::MAX)
        .saturating_sub(viewport_height)
}

struct LineWrapper {
    width: usize,
    line_style: Style,
    rows: Vec<Line<'static>>,
    row: Vec<Span<'static>>,
    row_width: usize,
    word: Vec<(char, Style)>,
    word_width: usize,
}

impl LineWrapper {
    fn new(width: usize, line_style: Style) -> Self {
        Self {
            width,
            line_style,
            rows: Vec::new(),
            row: Vec::new(),
            row_width: 0,
            word: Vec::new(),
            word_width: 0,
        }
    }

    fn push(&mut self, ch: char, style: Style) {
        if ch == ' ' {
            self.flush_word();
            // A space that would overflow becomes the row break.
            if self.row_width < self.width {
                self.append(' ', style, 1);
            } else {
                self.break_row();
            }
        } else {
            self.word_width += ch.width().unwrap_or(0);
            self.word.push((ch, style));
        }
    }

    fn flush_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        if self.row_width > 0 && self.row_width + self.word_width > self.width {
            self.break_row();
        }
        for (ch, style) in std::mem::take(&mut self.word) {
            let ch_width = ch.width().unwrap_or(0);
            if self.row_width > 0 && self.row_width + ch_width > self.width {
                self.break_row();
            }
            self.append(ch, style, ch_width);
        }
        self.word_width = 0;
    }

    fn append(&mut self, ch: char, style: Style, ch_width: usize) {
        match self.row.last_mut() {
            Some(span) if span.style == style => span.content.to_mut().push(ch),
            _ => self.row.push(Span::styled(ch.to_string(), style)),
        }
        self.row_width += ch_width;
    }

    fn break_row(&mut self) {
        let spans = std::mem::take(&mut self.row);
        self.rows.push(Line::from(spans).style(self.line_style));
        self.row_width = 0;
    }

    fn finish(mut self, out: &mut Vec<Line<'static>>) {
        self.flush_word();
        if !self.row.is_empty() || self.rows.is_empty() {
            self.break_row();
        }
        out.append(&mut self.rows);
    }
}

/// Horizontally and vertically centered box of at most `width` x `height`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
