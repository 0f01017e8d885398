//! Top-level UI layout — single trading screen with status bar.
//!
//! ```text
//! ┌ header: date, price, returns, value ───────────────────────┐
//! │ candles (visible window)            │ trade form           │
//! │                                     │ trade history        │
//! ├ cumulative return ─────────────────────────────────────────┤
//! status bar
//! ```

pub mod candle_chart;
pub mod header;
pub mod history_panel;
pub mod overlays;
pub mod returns_chart;
pub mod status_bar;
pub mod trade_panel;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Overlay};
use crate::theme;

pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    match &app.session {
        Some(_) => draw_session(f, main_area, app),
        None => draw_empty(f, main_area),
    }

    status_bar::render(f, status_area, app);

    match app.overlay {
        Overlay::Picker => overlays::render_picker(f, main_area, app),
        Overlay::Settings => overlays::render_settings(f, main_area, app),
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

fn draw_session(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(10),
        ])
        .split(area);

    header::render(f, rows[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
        .split(rows[1]);

    candle_chart::render(f, middle[0], app);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(4)])
        .split(middle[1]);

    trade_panel::render(f, side[0], app);
    history_panel::render(f, side[1], app);
    returns_chart::render(f, rows[2], app);
}

fn draw_empty(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(" PaperTrade ")
        .title_style(theme::panel_title(false));

    let text = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled("No stock loaded.", theme::muted())),
        Line::from(""),
        Line::from(Span::styled(
            "Press o to open the stock picker, ? for help.",
            theme::muted(),
        )),
    ];
    let para = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(para, area);
}

/// Bordered block in the house style.
pub fn panel_block(title: impl Into<String>, active: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(active))
        .title(format!(" {} ", title.into()))
        .title_style(theme::panel_title(active))
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
