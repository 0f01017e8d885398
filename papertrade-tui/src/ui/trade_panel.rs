//! Trade form — action selector, quantity input, affordability hint.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, FormAction};
use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(session) = &app.session else {
        return;
    };
    let form = &app.form;
    let block = panel_block(format!("Trade @ {:.2}", session.current_price()), true);

    let mut actions: Vec<Span> = vec![Span::styled("Action  ", theme::muted())];
    for (action, key) in [
        (FormAction::Buy, 'b'),
        (FormAction::Sell, 's'),
        (FormAction::Hold, 'h'),
    ] {
        let label = format!("[{key}]{} ", action.label());
        let style = if action == form.action {
            theme::accent_bold().add_modifier(Modifier::REVERSED)
        } else {
            theme::muted()
        };
        actions.push(Span::styled(label, style));
    }

    let mut lines = vec![Line::from(actions), Line::from("")];

    match form.action {
        FormAction::Hold => {
            lines.push(Line::from(Span::styled(
                "Holding: Enter confirms, or step ahead with d/w/m",
                theme::secondary(),
            )));
        }
        side => {
            let (max, noun) = if side == FormAction::Buy {
                (session.max_buyable(), "affordable")
            } else {
                (session.max_sellable(), "held")
            };
            lines.push(Line::from(vec![
                Span::styled("Qty     ", theme::muted()),
                Span::styled(form.quantity.clone(), theme::accent_bold()),
                Span::styled("_", theme::accent()),
            ]));
            lines.push(Line::from(Span::styled(
                format!("max {max} {noun}  [x] fill max"),
                theme::secondary(),
            )));
            if let Some(qty) = form.quantity_value() {
                let notional = qty as f64 * session.current_price();
                let fee = notional * session.commission_rate();
                let (label, total) = if side == FormAction::Buy {
                    ("cost", notional + fee)
                } else {
                    ("income", notional - fee)
                };
                let style = if qty > max { theme::negative() } else { theme::text() };
                lines.push(Line::from(Span::styled(
                    format!("{label} {total:.2} (fee {fee:.2})"),
                    style,
                )));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("[Enter] execute", theme::muted())));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
