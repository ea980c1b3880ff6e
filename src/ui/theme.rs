use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_prefix_style: Style,
    pub assistant_text_style: Style,
    pub error_text_style: Style,

    // Chrome
    pub heading_style: Style,
    pub subtle_style: Style,
    pub button_style: Style,
    pub streaming_indicator_style: Style,
    pub status_style: Style,

    // Input area
    pub input_border_style: Style,
    pub input_focused_border_style: Style,
    pub input_disabled_style: Style,
    pub input_text_style: Style,
    pub placeholder_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark_default()
    }
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_prefix_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::White),
            error_text_style: Style::default().fg(Color::LightRed),

            heading_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            subtle_style: Style::default().fg(Color::DarkGray),
            button_style: Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
            streaming_indicator_style: Style::default().fg(Color::Yellow),
            status_style: Style::default().fg(Color::LightGreen),

            input_border_style: Style::default().fg(Color::Gray),
            input_focused_border_style: Style::default().fg(Color::Cyan),
            input_disabled_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::White),
            placeholder_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        }
    }
}
