/// A quantity split into its leading number (if any) and the trailing unit text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuantity {
    pub num: Option<f64>,
    pub unit: String,
}

/// Parse "6 pcs", "1.5kg", "2" or free text like "a bunch".
///
/// Only a leading unsigned decimal (`digits[.digits]`) counts as a number; the
/// remainder, trimmed, is the unit. Units are not interpreted: "500 g" and
/// "1 kg" both parse, but nothing relates them.
#[must_use]
pub fn parse_quantity(text: &str) -> ParsedQuantity {
    let trimmed = text.trim();
    match split_leading_number(trimmed) {
        Some((num, rest)) => ParsedQuantity {
            num: Some(num),
            unit: rest.trim().to_string(),
        },
        None => ParsedQuantity {
            num: None,
            unit: trimmed.to_string(),
        },
    }
}

/// Inverse of [`parse_quantity`] for well-formed input.
#[must_use]
pub fn format_quantity(num: Option<f64>, unit: &str) -> String {
    match num {
        None => unit.to_string(),
        Some(n) if unit.is_empty() => format!("{n}"),
        Some(n) => format!("{n} {unit}"),
    }
}

/// Split "12.5 kg" into (12.5, " kg"). Returns `None` when the text does not
/// start with an ASCII digit.
fn split_leading_number(s: &str) -> Option<(f64, &str)> {
    let int_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if int_end == 0 {
        return None;
    }

    let mut end = int_end;
    if let Some(after_dot) = s[int_end..].strip_prefix('.') {
        let frac_len = after_dot
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after_dot.len());
        if frac_len > 0 {
            end = int_end + 1 + frac_len;
        }
    }

    let (num_part, rest) = s.split_at(end);
    let num: f64 = num_part.parse().ok()?;
    num.is_finite().then_some((num, rest))
}
