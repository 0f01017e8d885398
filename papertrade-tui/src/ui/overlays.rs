//! Overlay widgets — stock picker, settings, help, error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, SettingsField, COMMISSION_MAX, COMMISSION_MIN};
use crate::theme;
use crate::ui::centered_rect;

/// Stock picker: manual choice from the library or a random draw.
pub fn render_picker(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(50, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Open Stock [Enter]load [r]andom [Esc]close ")
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let picker = &app.picker;
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            format!("Library: {}", app.library.dir().display()),
            theme::muted(),
        )),
        Line::from(""),
    ];

    if picker.entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "No .csv files found. Add <stock_id>.csv files with",
            theme::muted(),
        )));
        lines.push(Line::from(Span::styled(
            "trade_date, open, high, low, close columns.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), inner);
        return;
    }

    // Keep the cursor row on screen.
    let visible_height = (inner.height as usize).saturating_sub(lines.len()).max(1);
    let start = picker.cursor.saturating_sub(visible_height - 1);
    let end = (start + visible_height).min(picker.entries.len());

    for (i, entry) in picker.entries[start..end].iter().enumerate() {
        let idx = start + i;
        let loaded = app
            .session
            .as_ref()
            .is_some_and(|s| s.stock_id() == entry.stock_id);
        let marker = if loaded { "*" } else { " " };
        let style = if idx == picker.cursor {
            theme::accent_bold().add_modifier(Modifier::REVERSED)
        } else {
            theme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} "), theme::highlight()),
            Span::styled(entry.stock_id.clone(), style),
        ]));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

/// Capital and commission editor. Locked once a buy has executed.
pub fn render_settings(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(50, 40, area);
    f.render_widget(Clear, popup);

    let locked = app.settings_locked();
    let border = if locked { theme::warning() } else { theme::accent() };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Settings [j/k]field [h/l]adjust [Enter]apply [Esc]cancel ")
        .title_style(border.add_modifier(Modifier::BOLD));

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let s = &app.settings;
    let row = |label: &str, value: String, field: SettingsField| {
        let style = if s.field == field {
            theme::accent_bold().add_modifier(Modifier::REVERSED)
        } else {
            theme::text()
        };
        Line::from(vec![
            Span::styled(format!("  {label:>16}: "), theme::muted()),
            Span::styled(value, style),
        ])
    };

    let mut lines = vec![
        Line::from(""),
        row(
            "Initial capital",
            format!("{:.0}", s.capital),
            SettingsField::Capital,
        ),
        row(
            "Commission",
            format!("{:.2}%", s.commission_rate * 100.0),
            SettingsField::Commission,
        ),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "  Capital steps by 1000; commission {:.2}% to {:.2}% in 0.01% steps.",
                COMMISSION_MIN * 100.0,
                COMMISSION_MAX * 100.0
            ),
            theme::muted(),
        )),
    ];
    if locked {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Locked: a buy has been executed. Reset (R) to change settings.",
            theme::warning(),
        )));
    } else if app.session.is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Applying restarts the account on the current day.",
            theme::neutral(),
        )));
    }

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(para, inner);
}

pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Help [any key]close ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Time");
    key(&mut lines, "d / w / m", "Advance 1 day / 7 days / 30 days");
    key(&mut lines, "R", "Reset: back to the first day, fresh account");
    lines.push(Line::from(""));

    section(&mut lines, "Trading (at today's close)");
    key(&mut lines, "b / s / h", "Choose Buy / Sell / Hold");
    key(&mut lines, "0-9, Backspace", "Edit quantity");
    key(&mut lines, "x", "Fill the maximum quantity");
    key(&mut lines, "Enter", "Execute");
    lines.push(Line::from(""));

    section(&mut lines, "Other");
    key(&mut lines, "o", "Open stock picker (r in picker: random)");
    key(&mut lines, "c", "Settings: capital and commission");
    key(&mut lines, "e", "Error history");
    key(&mut lines, "?", "This help");
    key(&mut lines, "q", "Quit");

    let para = Paragraph::new(lines).block(block);
    f.render_widget(para, popup);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let visible_height = inner.height as usize;
    let start = app.error_scroll;
    let end = (start + visible_height).min(app.error_history.len());

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app.error_history.iter().enumerate().take(end).skip(start) {
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}
