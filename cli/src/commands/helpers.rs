use anyhow::{Context, Result, bail};
use chrono::{Days, Local, NaiveDate};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use larder_core::models::IngredientRecord;

use crate::image::describe_image;

/// Normalize an expiration argument to `YYYY-MM-DD`.
/// Accepts: "2024-05-01", "today", "tomorrow", "+3d" (days from today).
pub(crate) fn parse_expiration(input: Option<&str>) -> Result<String> {
    match input {
        None => Ok(String::new()),
        Some(s) => resolve_expiration(s, Local::now().date_naive()),
    }
}

pub(crate) fn resolve_expiration(s: &str, today: NaiveDate) -> Result<String> {
    let s = s.trim();
    let date = match s {
        "" => return Ok(String::new()),
        "today" => today,
        "tomorrow" => add_days(today, 1, s)?,
        _ => {
            if let Some(days) = s.strip_prefix('+').and_then(|r| r.strip_suffix('d')) {
                let days: u64 = days
                    .parse()
                    .with_context(|| format!("Invalid relative date '{s}'. Use e.g. '+3d'"))?;
                add_days(today, days, s)?
            } else {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| {
                    format!("Invalid date '{s}'. Use YYYY-MM-DD, today, tomorrow or +Nd")
                })?
            }
        }
    };
    Ok(date.format("%Y-%m-%d").to_string())
}

fn add_days(today: NaiveDate, days: u64, input: &str) -> Result<NaiveDate> {
    today
        .checked_add_days(Days::new(days))
        .with_context(|| format!("Relative date '{input}' is out of range"))
}

/// Convert a 1-based position from the command line to a 0-based index.
pub(crate) fn to_index(position: usize) -> Result<usize> {
    if position == 0 {
        bail!("Positions start at 1");
    }
    Ok(position - 1)
}

pub(crate) fn prompt_confirm(message: &str) -> Result<bool> {
    eprint!("{message} [y/N]: ");
    io::stderr().flush()?;
    let stdin = io::stdin();
    let Some(line) = stdin.lock().lines().next() else {
        return Ok(false);
    };
    Ok(is_yes(&line?))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub(crate) fn print_ingredient_table(rows: &[(usize, &IngredientRecord)]) {
    #[derive(Tabled)]
    struct IngredientRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "")]
        bought: &'static str,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Quantity")]
        quantity: String,
        #[tabled(rename = "Expires")]
        expiration: String,
        #[tabled(rename = "Notes")]
        notes: String,
        #[tabled(rename = "Image")]
        image: String,
    }

    let rows: Vec<IngredientRow> = rows
        .iter()
        .map(|(i, r)| IngredientRow {
            idx: i + 1,
            bought: if r.bought { "[x]" } else { "[ ]" },
            name: truncate(&r.name, 30),
            category: truncate(&r.category, 20),
            quantity: if r.quantity.is_empty() {
                "-".to_string()
            } else {
                truncate(&r.quantity, 24)
            },
            expiration: r.expiration.clone(),
            notes: truncate(&r.notes, 40),
            image: describe_image(&r.image),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..5)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()
    }

    #[test]
    fn test_resolve_expiration_absolute() {
        assert_eq!(resolve_expiration("2024-05-01", today()).unwrap(), "2024-05-01");
    }

    #[test]
    fn test_resolve_expiration_relative() {
        assert_eq!(resolve_expiration("today", today()).unwrap(), "2024-04-30");
        assert_eq!(resolve_expiration("tomorrow", today()).unwrap(), "2024-05-01");
        assert_eq!(resolve_expiration("+7d", today()).unwrap(), "2024-05-07");
    }

    #[test]
    fn test_resolve_expiration_blank() {
        assert_eq!(resolve_expiration("  ", today()).unwrap(), "");
        assert_eq!(parse_expiration(None).unwrap(), "");
    }

    #[test]
    fn test_resolve_expiration_invalid() {
        assert!(resolve_expiration("next week", today()).is_err());
        assert!(resolve_expiration("2024-13-01", today()).is_err());
        assert!(resolve_expiration("+xd", today()).is_err());
        assert!(resolve_expiration("+-3d", today()).is_err());
    }

    #[test]
    fn test_resolve_expiration_out_of_range() {
        assert!(resolve_expiration("+100000000d", today()).is_err());
        assert!(resolve_expiration("+999999999999999d", today()).is_err());
        assert!(resolve_expiration("+18446744073709551615d", today()).is_err());
        assert_eq!(resolve_expiration("+365d", today()).unwrap(), "2025-04-30");
        assert!(resolve_expiration("tomorrow", NaiveDate::MAX).is_err());
    }

    #[test]
    fn test_to_index() {
        assert_eq!(to_index(1).unwrap(), 0);
        assert!(to_index(0).is_err());
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES\n"));
        assert!(!is_yes(""));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long ingredient name", 10), "a very ...");
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("boom"), r#"{"error":"boom"}"#);
    }
}
