//! Cumulative return line over the visited days.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(session) = &app.session else {
        return;
    };
    let snapshots = session.ledger().snapshots();
    let block = panel_block(format!("Cumulative Return ({} days)", snapshots.len()), false);

    if snapshots.len() < 2 {
        let para = Paragraph::new(Span::styled(
            "Step ahead (d/w/m) to build the return curve.",
            theme::muted(),
        ))
        .block(block);
        f.render_widget(para, area);
        return;
    }

    let data: Vec<(f64, f64)> = snapshots
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f64, s.cumulative_return_pct))
        .collect();
    let (y_min, y_max) = bounds(data.iter().map(|&(_, y)| y));
    let x_max = (data.len() - 1) as f64;
    let baseline = [(0.0, 0.0), (x_max, 0.0)];

    let last = data.last().map_or(0.0, |&(_, y)| y);
    let line = Dataset::default()
        .name(format!("{last:+.2}%"))
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(theme::ACCENT))
        .graph_type(GraphType::Line)
        .data(&data);
    let zero = Dataset::default()
        .marker(symbols::Marker::Dot)
        .style(theme::muted())
        .graph_type(GraphType::Line)
        .data(&baseline);

    let first_date = snapshots[0].date.format("%Y-%m-%d").to_string();
    let last_date = snapshots[snapshots.len() - 1].date.format("%Y-%m-%d").to_string();

    let chart = Chart::new(vec![zero, line])
        .block(block)
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::styled(first_date, theme::muted()),
                    Span::styled(last_date, theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.1}%"), theme::muted()),
                    Span::styled(format!("{y_max:.1}%"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

/// Padded y-bounds that always include zero.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = ((hi - lo) * 0.05).max(0.5);
    (lo - pad, hi + pad)
}
