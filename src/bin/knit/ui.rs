//! UI rendering logic
//!
//! Layout, top to bottom:
//! - Title bar (1 line): file name and state position
//! - Descriptions (block, group, row; takes the spare height)
//! - Row panel: the row with the current phrase highlighted, plus arguments
//! - Counters panel: repeats and the interactive counters
//! - Status bar (1 line): last action's feedback, or key help

use crate::app::App;
use crate::theme::Theme;
use knit::knit::engine::{Repeat, State};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Minimum terminal width required for the UI
pub const MIN_TERMINAL_WIDTH: u16 = 40;
const ROW_PANEL_HEIGHT: u16 = 6;
const COUNTER_PANEL_HEIGHT: u16 = 3;

const HELP: &str = "j/k step  h/l phrase  +/-/0 stitches  ]/[/) rows  w save  q quit";

pub fn render(frame: &mut Frame, app: &App) {
    let theme = Theme::default();
    let size = frame.area();

    if size.width < MIN_TERMINAL_WIDTH {
        let msg = format!("Terminal too narrow: {} < {} chars", size.width, MIN_TERMINAL_WIDTH);
        frame.render_widget(Paragraph::new(msg).style(theme.status_error()), size);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(ROW_PANEL_HEIGHT),
            Constraint::Length(COUNTER_PANEL_HEIGHT),
            Constraint::Length(1),
        ])
        .split(size);

    render_title_bar(frame, chunks[0], app, &theme);
    match app.model.current() {
        Some(state) => {
            render_descriptions(frame, chunks[1], state, &theme);
            render_row(frame, chunks[2], state, &theme);
            render_counters(frame, chunks[3], state, &theme);
        }
        None => {
            let empty = Paragraph::new("The pattern has no rows.")
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, chunks[1]);
        }
    }
    render_status_bar(frame, chunks[4], app, &theme);
}

fn render_title_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let (index, len) = app.model.position();
    let title = format!("knit:: {}  [{}/{}]", app.model.name, index, len);
    frame.render_widget(Paragraph::new(title).style(theme.title_bar()), area);
}

fn render_descriptions(frame: &mut Frame, area: Rect, state: &State, theme: &Theme) {
    let mut lines = Vec::new();
    for (label, text) in [
        ("Block", &state.desc.block),
        ("Group", &state.desc.group),
        ("Row", &state.desc.row),
    ] {
        if text.trim().is_empty() {
            continue;
        }
        lines.push(Line::from(Span::styled(label, theme.field_label())));
        lines.extend(
            text.trim_end()
                .lines()
                .map(|line| Line::from(Span::styled(line.to_string(), theme.description()))),
        );
    }
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Notes"));
    frame.render_widget(paragraph, area);
}

/// The row as in [`State::history_row`], with the phrase under the cursor highlighted
pub fn row_line<'a>(state: &'a State, theme: &Theme) -> Line<'a> {
    let mut spans = Vec::with_capacity(state.row.len() * 2);
    for (idx, fragment) in state.row.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if idx == state.counters.phrase {
            theme.phrase_highlight()
        } else {
            theme.row_text()
        };
        spans.push(Span::styled(fragment.as_str(), style));
        let last = idx + 1 == state.row.len();
        let before_close = state.row.get(idx + 1).is_some_and(|next| next.starts_with('}'));
        if fragment != "{" && !before_close && !last {
            spans.push(Span::styled(",", theme.row_text()));
        }
    }
    Line::from(spans)
}

fn render_row(frame: &mut Frame, area: Rect, state: &State, theme: &Theme) {
    let mut lines = vec![row_line(state, theme)];
    if !state.args.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("Args: ", theme.field_label()),
            Span::raw(state.args.join(", ")),
        ]));
    }
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Row"));
    frame.render_widget(paragraph, area);
}

fn repeat_text(repeat: Option<Repeat>) -> String {
    repeat.map_or_else(|| "-".to_string(), |r| r.to_string())
}

fn render_counters(frame: &mut Frame, area: Rect, state: &State, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled("Group ", theme.field_label()),
        Span::raw(repeat_text(state.group_repeat)),
        Span::styled("  Row ", theme.field_label()),
        Span::raw(repeat_text(state.row_repeat)),
        Span::styled("  Stitches ", theme.field_label()),
        Span::raw(state.counters.stitch.to_string()),
        Span::styled("  Rows ", theme.field_label()),
        Span::raw(state.counters.row.to_string()),
    ]);
    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let paragraph = match &app.model.status {
        Some(status) if status.starts_with("save failed") => {
            Paragraph::new(status.as_str()).style(theme.status_error())
        }
        Some(status) => Paragraph::new(status.as_str()),
        None => Paragraph::new(HELP).style(theme.help_bar()),
    };
    frame.render_widget(paragraph, area);
}
