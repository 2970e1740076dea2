use quote_core::calculations::common::round_half_up;
use rust_decimal::Decimal;

use crate::Language;

/// Formats an amount in euros with two decimals and the language's
/// separators, e.g. `1.234,50 €` in Italian and `1,234.50 €` in English.
pub fn format_money(
    amount: Decimal,
    language: Language,
) -> String {
    let rounded = round_half_up(amount);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, dec_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let (thousands, decimal) = language.separators();

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!(
        "{sign}{}{decimal}{dec_part} €",
        group_thousands(int_part, thousands)
    )
}

/// Formats a quantity or rate without padding zeros, e.g. `2,5` in Italian.
pub fn format_quantity(
    value: Decimal,
    language: Language,
) -> String {
    let (_, decimal) = language.separators();
    value.normalize().to_string().replace('.', &decimal.to_string())
}

fn group_thousands(
    digits: &str,
    separator: char,
) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
