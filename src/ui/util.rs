use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::aggregate::round_display;

/// Dollar amount rounded half away from zero, with thousand separators.
/// e.g. `-1234567.885` → `"-$1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let rounded = round_display(val);
    let formatted = format!("{:.2}", rounded.abs());
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if rounded < Decimal::ZERO {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Amount with an explicit sign, for income/expense columns.
pub(crate) fn format_signed(val: Decimal) -> String {
    if val > Decimal::ZERO {
        format!("+{}", format_amount(val))
    } else {
        format_amount(val)
    }
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into())
}

/// Truncate to `max` visible characters, counting the trailing "…" as one.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max - 1).collect();
    format!("{kept}…")
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page.saturating_sub(1));
        }
    }
}

pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}

/// Pull the cursor back inside a list that just shrank.
pub(crate) fn clamp_cursor(index: &mut usize, scroll: &mut usize, len: usize) {
    if len == 0 {
        *index = 0;
        *scroll = 0;
    } else if *index >= len {
        *index = len - 1;
        *scroll = (*scroll).min(*index);
    }
}
