//! Header strip — today's date and price, returns, account value.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(session) = &app.session else {
        return;
    };
    let bar = session.current_bar();
    let returns = session.last_returns();
    let ledger = session.ledger();
    let cursor = session.cursor();
    // Live value; the day's snapshot predates same-day trades.
    let pnl = session.portfolio_value() - session.initial_capital();
    let total_pct = pnl / session.initial_capital() * 100.0;

    let title = format!(
        "{}  day {}/{}",
        session.stock_id(),
        cursor.current_index() + 1,
        cursor.total_days()
    );
    let block = panel_block(title, true);

    let first = Line::from(vec![
        Span::styled("Date ", theme::muted()),
        Span::styled(bar.date.format("%Y-%m-%d").to_string(), theme::accent_bold()),
        Span::styled("   Close ", theme::muted()),
        Span::styled(format!("{:.2}", bar.close), theme::text()),
        Span::styled("   Day ", theme::muted()),
        Span::styled(
            format!("{:+.2}%", returns.daily_pct),
            theme::signed(returns.daily_pct),
        ),
        Span::styled("   Total ", theme::muted()),
        Span::styled(format!("{total_pct:+.2}%"), theme::signed(total_pct)),
    ]);

    let second = Line::from(vec![
        Span::styled("Value ", theme::muted()),
        Span::styled(format!("{:.2}", session.portfolio_value()), theme::text()),
        Span::styled(format!(" ({pnl:+.2})"), theme::signed(pnl)),
        Span::styled("   Shares ", theme::muted()),
        Span::styled(ledger.shares().to_string(), theme::text()),
        if ledger.shares() > 0 {
            Span::styled(
                format!(" @ {:.2} avg", ledger.average_cost()),
                theme::secondary(),
            )
        } else {
            Span::raw("")
        },
        Span::styled("   Cash ", theme::muted()),
        Span::styled(format!("{:.2}", ledger.cash()), theme::text()),
        Span::styled("   Fee ", theme::muted()),
        Span::styled(
            format!("{:.2}%", session.commission_rate() * 100.0),
            theme::secondary(),
        ),
        if session.is_exhausted() {
            Span::styled("   END OF DATA", theme::warning())
        } else {
            Span::raw("")
        },
    ]);

    f.render_widget(Paragraph::new(vec![first, second]).block(block), area);
}
