//! Trade history — newest trade first.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use ratatui::Frame;

use papertrade_core::TradeSide;

use crate::app::AppState;
use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(session) = &app.session else {
        return;
    };
    let ledger = session.ledger();
    let trades = ledger.trades();
    let block = panel_block(
        format!(
            "Trade History ({}) realized {:+.2}",
            trades.len(),
            ledger.realized_pnl()
        ),
        false,
    );

    if trades.is_empty() {
        let para = Paragraph::new(Span::styled("No trades yet.", theme::muted())).block(block);
        f.render_widget(para, area);
        return;
    }

    let header = Row::new(
        ["Date", "Side", "Qty", "Price", "Cash"]
            .into_iter()
            .map(|h| Cell::from(h).style(theme::accent_bold())),
    );

    let rows = trades.iter().rev().map(|t| {
        let side_color = match t.side {
            TradeSide::Buy => theme::up(),
            TradeSide::Sell => theme::down(),
        };
        Row::new(vec![
            Cell::from(t.date.format("%Y-%m-%d").to_string()),
            Cell::from(t.side.label()).style(Style::default().fg(side_color)),
            Cell::from(t.quantity.to_string()),
            Cell::from(format!("{:.2}", t.price)),
            Cell::from(format!("{:+.2}", t.cash_delta)).style(theme::signed(t.cash_delta)),
        ])
        .style(theme::text())
    });

    let widths = [
        Constraint::Length(10),
        Constraint::Length(4),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
