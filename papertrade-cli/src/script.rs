//! Replay scripts — one command per line, `#` starts a comment.
//!
//! ```text
//! buy max        # all-in at today's close
//! week
//! sell 500
//! month
//! sell all
//! ```

use anyhow::{anyhow, bail, Context, Result};
use papertrade_core::StepSize;

/// How many shares a buy or sell asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Shares(u64),
    /// `max` for buys, `all` for sells.
    Everything,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Step(StepSize),
    Buy(Quantity),
    Sell(Quantity),
    Hold,
    Capital(f64),
    Commission(f64),
}

/// A parsed command with its 1-based source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub number: usize,
    pub command: Command,
}

pub fn parse_script(source: &str) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let text = raw.split('#').next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }
        let command = parse_command(text).with_context(|| format!("script line {}", idx + 1))?;
        lines.push(Line {
            number: idx + 1,
            command,
        });
    }
    Ok(lines)
}

fn parse_command(text: &str) -> Result<Command> {
    let mut words = text.split_whitespace();
    let verb = words.next().unwrap_or("").to_ascii_lowercase();
    let arg = words.next();
    if let Some(extra) = words.next() {
        bail!("unexpected argument '{extra}'");
    }

    let command = match (verb.as_str(), arg) {
        ("day", None) => Command::Step(StepSize::Day),
        ("week", None) => Command::Step(StepSize::Week),
        ("month", None) => Command::Step(StepSize::Month),
        ("hold", None) => Command::Hold,
        ("buy", Some(a)) => Command::Buy(parse_quantity(a, "max")?),
        ("sell", Some(a)) => Command::Sell(parse_quantity(a, "all")?),
        ("capital", Some(a)) => Command::Capital(parse_number(a)?),
        ("commission", Some(a)) => Command::Commission(parse_number(a)?),
        ("day" | "week" | "month" | "hold", Some(a)) => {
            bail!("'{verb}' takes no argument, got '{a}'")
        }
        ("buy" | "sell" | "capital" | "commission", None) => {
            bail!("'{verb}' needs an argument")
        }
        _ => bail!(
            "unknown command '{verb}'. Valid: day, week, month, buy, sell, hold, capital, commission"
        ),
    };
    Ok(command)
}

fn parse_quantity(word: &str, everything: &str) -> Result<Quantity> {
    if word.eq_ignore_ascii_case(everything) {
        return Ok(Quantity::Everything);
    }
    word.parse::<u64>()
        .map(Quantity::Shares)
        .map_err(|_| anyhow!("expected a share count or '{everything}', got '{word}'"))
}

fn parse_number(word: &str) -> Result<f64> {
    let value: f64 = word
        .parse()
        .map_err(|_| anyhow!("expected a number, got '{word}'"))?;
    if !value.is_finite() {
        bail!("expected a finite number, got '{word}'");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_verbs() {
        let script = "\
day
week
month
hold
buy 1000
buy max
sell 500
sell ALL
capital 50000
commission 0.0005
";
        let commands: Vec<Command> = parse_script(script)
            .unwrap()
            .into_iter()
            .map(|l| l.command)
            .collect();
        assert_eq!(
            commands,
            vec![
                Command::Step(StepSize::Day),
                Command::Step(StepSize::Week),
                Command::Step(StepSize::Month),
                Command::Hold,
                Command::Buy(Quantity::Shares(1000)),
                Command::Buy(Quantity::Everything),
                Command::Sell(Quantity::Shares(500)),
                Command::Sell(Quantity::Everything),
                Command::Capital(50_000.0),
                Command::Commission(0.0005),
            ]
        );
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let lines = parse_script("# warm-up\n\n  buy 10   # first entry\nday\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 3);
        assert_eq!(lines[1].number, 4);
    }

    #[test]
    fn error_names_the_line() {
        let err = parse_script("day\nfly 3\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_script("buy").is_err());
        assert!(parse_script("buy all").is_err());
        assert!(parse_script("sell -5").is_err());
        assert!(parse_script("day 3").is_err());
        assert!(parse_script("capital lots").is_err());
        assert!(parse_script("buy 10 20").is_err());
    }
}
