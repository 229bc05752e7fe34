//! Styles for the viewer
//!
//! Concrete styles live in [`PresentationStyles`], grouped by role. UI code
//! asks [`Theme`] for a style by the element it is drawing, so elements that
//! should look alike share one presentation entry.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct PresentationStyles {
    /// The highlighted stitch phrase
    pub active: Style,
    pub normal: Style,
    /// Panel titles and field names
    pub label: Style,
    pub muted: Style,
    pub title: Style,
    pub error: Style,
}

#[derive(Debug, Clone)]
pub struct Theme {
    presentation: PresentationStyles,
}

impl Theme {
    pub fn title_bar(&self) -> Style {
        self.presentation.title
    }

    pub fn phrase_highlight(&self) -> Style {
        self.presentation.active
    }

    pub fn row_text(&self) -> Style {
        self.presentation.normal
    }

    pub fn description(&self) -> Style {
        self.presentation.normal
    }

    pub fn field_label(&self) -> Style {
        self.presentation.label
    }

    pub fn help_bar(&self) -> Style {
        self.presentation.muted
    }

    pub fn status_error(&self) -> Style {
        self.presentation.error
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            presentation: PresentationStyles {
                active: Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                normal: Style::default(),
                label: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                muted: Style::default().fg(Color::DarkGray),
                title: Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            },
        }
    }
}
