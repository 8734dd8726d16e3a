//! Cleaning for the structured (open-data API) path, where each record
//! already carries one `<br/>`-delimited menu field per date.

use crate::core::classifier::{collapse_whitespace, strip_allergen_codes};
use crate::domain::model::{CalendarDate, MealRecord, MenuSchedule};
use regex::Regex;
use std::sync::LazyLock;

static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|\r?\n").unwrap());

/// `보리밥<br/>소불고기(5.6.13.16)` -> `["보리밥", "소불고기"]`.
/// A missing field is an empty list.
pub fn clean_field(field: Option<&str>) -> Vec<String> {
    let Some(field) = field else {
        return Vec::new();
    };
    LINE_BREAK_RE
        .split(field)
        .map(|segment| collapse_whitespace(&strip_allergen_codes(segment)))
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Records with a missing or malformed date/menu are skipped with a warning.
/// Several meals on one date are appended in record order.
pub fn records_to_schedule(records: &[MealRecord]) -> MenuSchedule {
    let mut schedule = MenuSchedule::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(date) = record.date.as_deref().and_then(CalendarDate::from_compact) else {
            tracing::warn!("⚠️ Skipping meal record with invalid date: {:?}", record.date);
            skipped += 1;
            continue;
        };

        let items = clean_field(record.menu.as_deref());
        if items.is_empty() {
            tracing::warn!("⚠️ Skipping meal record for {} with empty menu", date);
            skipped += 1;
            continue;
        }

        tracing::debug!(
            "🍱 {} {} -> {} items",
            date,
            record.meal_name.as_deref().unwrap_or("-"),
            items.len()
        );
        schedule.append(date, items);
    }

    if skipped > 0 {
        tracing::info!("Skipped {} of {} meal records", skipped, records.len());
    }
    schedule
}
