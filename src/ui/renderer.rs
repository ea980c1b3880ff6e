use crate::core::app::{App, FormField};
use crate::core::message::{Message, Role};
use crate::core::session::Page;
use crate::ui::layout::{centered, max_scroll_offset, prewrap_lines, ConsultationLayout};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const INPUT_PLACEHOLDER: &str = "Describe what you need...";

pub fn ui(f: &mut Frame, app: &App, theme: &Theme) {
    match app.session.page() {
        Page::Welcome => render_welcome(f, theme),
        Page::Consultation => render_consultation(f, app, theme),
        Page::Recommendations => render_recommendations(f, app, theme),
    }
}

/// Transcript rows, plus a live row for the reply still streaming in.
pub fn transcript_lines<'a>(app: &'a App, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    for (index, message) in app.session.transcript().iter().enumerate() {
        let failed = app.session.is_failed_entry(index);
        push_message_lines(&mut lines, message, failed, theme);
    }

    if app.session.is_pending() {
        let mut first = vec![Span::styled(
            format!("{}: ", Role::Assistant.display_name()),
            theme.assistant_prefix_style,
        )];
        let mut preview = app.ui.reply_preview.lines();
        if let Some(text) = preview.next() {
            first.push(Span::styled(text, theme.assistant_text_style));
        }
        lines.push(Line::from(first));
        for text in preview {
            lines.push(Line::styled(text, theme.assistant_text_style));
        }
        if let Some(last) = lines.last_mut() {
            last.push_span(Span::styled(
                format!(" {}", spinner_frame(app)),
                theme.streaming_indicator_style,
            ));
        }
    }

    lines
}

fn push_message_lines<'a>(
    lines: &mut Vec<Line<'a>>,
    message: &'a Message,
    failed: bool,
    theme: &Theme,
) {
    let (prefix_style, text_style) = match message.role {
        Role::User => (theme.user_prefix_style, theme.user_text_style),
        Role::Assistant if failed => (theme.assistant_prefix_style, theme.error_text_style),
        Role::Assistant => (theme.assistant_prefix_style, theme.assistant_text_style),
    };

    let mut content = message.content.lines();
    let mut first = vec![Span::styled(
        format!("{}: ", message.role.display_name()),
        prefix_style,
    )];
    if let Some(text) = content.next() {
        first.push(Span::styled(text, text_style));
    }
    lines.push(Line::from(first));
    for text in content {
        lines.push(Line::styled(text, text_style));
    }
    lines.push(Line::from(""));
}

fn spinner_frame(app: &App) -> &'static str {
    let tick = app.ui.pulse_start.elapsed().as_millis() / 100;
    SPINNER_FRAMES[(tick % SPINNER_FRAMES.len() as u128) as usize]
}

fn split_body_status_footer(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

fn render_footer(f: &mut Frame, area: Rect, hints: &str, theme: &Theme) {
    f.render_widget(
        Paragraph::new(Line::styled(hints, theme.subtle_style)).alignment(Alignment::Center),
        area,
    );
}

fn render_welcome(f: &mut Frame, theme: &Theme) {
    let (body, _, footer) = split_body_status_footer(f.area());

    let lines = vec![
        Line::styled("Welcome to Headstarter!", theme.heading_style),
        Line::from(""),
        Line::from("Let's help you find the right service."),
        Line::from(""),
        Line::from(""),
        Line::styled("  Get Started  ", theme.button_style),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered(body, 60, 6),
    );
    render_footer(f, footer, "Enter: get started · Ctrl+C: quit", theme);
}

fn render_consultation(f: &mut Frame, app: &App, theme: &Theme) {
    let layout = ConsultationLayout::new(f.area());

    f.render_widget(
        Paragraph::new(Line::styled(Page::Consultation.title(), theme.heading_style))
            .alignment(Alignment::Center),
        layout.header,
    );

    let inner = layout.transcript_inner();
    let rows = prewrap_lines(&transcript_lines(app, theme), inner.width);
    let max_offset = max_scroll_offset(&rows, inner.height);
    let scroll_offset = app.ui.effective_scroll_offset(max_offset);
    let transcript = Paragraph::new(rows)
        .block(Block::default().borders(Borders::ALL).title(" Conversation "))
        .scroll((scroll_offset, 0));
    f.render_widget(transcript, layout.transcript);

    let pending = app.session.is_pending();
    let (border_style, title) = if pending {
        (theme.input_disabled_style, " Waiting for the assistant... ")
    } else {
        (theme.input_focused_border_style, " Message ")
    };
    let draft = app.session.draft();
    let content = if draft.is_empty() {
        Line::styled(INPUT_PLACEHOLDER, theme.placeholder_style)
    } else if pending {
        Line::styled(draft, theme.input_disabled_style)
    } else {
        Line::styled(draft, theme.input_text_style)
    };
    let input = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    f.render_widget(input, layout.input);

    if !pending {
        place_cursor(f, layout.input, draft);
    }

    let hints = if pending {
        "Up/Down: scroll · Tab: recommendations · Esc: back · Ctrl+C: quit"
    } else {
        "Enter: send · Up/Down: scroll · Tab: recommendations · Esc: back · Ctrl+C: quit"
    };
    render_footer(f, layout.footer, hints, theme);
}

fn render_recommendations(f: &mut Frame, app: &App, theme: &Theme) {
    let (body, status, footer) = split_body_status_footer(f.area());

    let mut lines = vec![
        Line::styled(Page::Recommendations.title(), theme.heading_style),
        Line::from(""),
        Line::from("Based on your input, here are the best services for you:"),
        Line::from(""),
    ];
    for service in &app.services {
        lines.push(Line::from(format!("  • {service}")));
    }
    lines.push(Line::from(""));

    let form_top = lines.len() as u16;
    for field in FormField::ALL {
        let value = app.session.field(field.key()).unwrap_or_default();
        let style = if app.ui.form_focus == field {
            theme.input_focused_border_style
        } else {
            theme.input_border_style
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>15}: ", field.label()), style),
            Span::styled(value, theme.input_text_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::styled("  Book Now  ", theme.button_style));

    let height = lines.len() as u16;
    let area = centered(body, 70, height);
    f.render_widget(Paragraph::new(lines), area);

    if let Some(index) = FormField::ALL.iter().position(|field| *field == app.ui.form_focus) {
        let value = app.session.field(app.ui.form_focus.key()).unwrap_or_default();
        let value_width = u16::try_from(value.width()).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(17).saturating_add(value_width);
        let y = area
            .y
            .saturating_add(form_top)
            .saturating_add(u16::try_from(index).unwrap_or(u16::MAX));
        if x < area.right() && y < area.bottom() {
            f.set_cursor_position((x, y));
        }
    }

    if let Some(text) = &app.ui.status {
        f.render_widget(
            Paragraph::new(Line::styled(text.as_str(), theme.status_style))
                .alignment(Alignment::Center),
            status,
        );
    }

    render_footer(
        f,
        footer,
        "Type to fill the form · Tab: next field · Enter: Book Now · Esc: back · Ctrl+C: quit",
        theme,
    );
}

fn place_cursor(f: &mut Frame, input: Rect, draft: &str) {
    let inner_width = input.width.saturating_sub(2);
    if inner_width == 0 {
        return;
    }
    let column = (draft.width() as u16).min(inner_width.saturating_sub(1));
    f.set_cursor_position((input.x + 1 + column, input.y + 1));
}
