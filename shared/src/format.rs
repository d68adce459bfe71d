use crate::constants::CURRENCY_SUFFIX;
use rust_decimal::Decimal;

/// Render an amount rounded to whole units with thousands separators and the
/// currency suffix, e.g. `1,250,000 Toman`.
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp(0);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{} {}", sign, grouped, CURRENCY_SUFFIX)
}
