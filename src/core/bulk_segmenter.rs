//! Whole-text fallback for flattened tables.
//!
//! When the layout extractor loses column alignment, dates and dishes stop
//! being grouped line by line. This segmenter collects every `M월 D일(요일)`
//! anchor in text order, gathers every dish-looking line, and splits the dish
//! list evenly across the anchors. The split is purely positional.

use crate::core::classifier::{
    collapse_whitespace, contains_noise_keyword, is_allergen_group, is_digits_and_symbols,
    strip_allergen_codes,
};
use crate::core::date_pattern::{infer_year, YearPolicy};
use crate::domain::model::{CalendarDate, MenuSchedule};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})월\s*(\d{1,2})일\s*\(([^)]*)\)").unwrap());
static DATE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\s*[월일]|\(\s*[월화수목금토일]\s*\)|[월화수목금토일]요일").unwrap()
});
static ARROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:->|=>|→|⇒)\s*").unwrap());
static SCRIPT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[가-힣]{2,}").unwrap());

pub fn segment_bulk(text: &str, today: NaiveDate) -> MenuSchedule {
    let anchors = find_anchors(text, today);
    if anchors.is_empty() {
        tracing::debug!("No table anchors found, bulk segmentation skipped");
        return MenuSchedule::new();
    }

    let items = collect_menu_items(text);
    tracing::debug!(
        "📋 Bulk segmentation: {} anchors, {} menu items",
        anchors.len(),
        items.len()
    );

    let mut schedule = MenuSchedule::new();
    for (date, slice) in anchors.iter().zip(split_evenly(&items, anchors.len())) {
        schedule.insert(*date, slice.to_vec());
    }
    schedule
}

/// Distinct `M월 D일(요일)` anchors in the order they first appear.
pub fn find_anchors(text: &str, today: NaiveDate) -> Vec<CalendarDate> {
    let mut anchors: Vec<CalendarDate> = Vec::new();
    for caps in ANCHOR_RE.captures_iter(text) {
        let (Ok(month), Ok(day)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            continue;
        };
        let year = infer_year(month, today, YearPolicy::BoundaryCorrected);
        let Some(date) = CalendarDate::from_ymd(year, month, day) else {
            tracing::debug!("Skipping impossible anchor '{}'", &caps[0]);
            continue;
        };
        if !anchors.contains(&date) {
            anchors.push(date);
        }
    }
    anchors
}

/// Every line of `text` that survives the table filters, cleaned, in order.
pub fn collect_menu_items(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !DATE_TOKEN_RE.is_match(line))
        .filter(|line| !contains_noise_keyword(line))
        .filter(|line| !is_allergen_group(line))
        .map(clean_table_line)
        .filter(|line| SCRIPT_RUN_RE.is_match(line) && !is_digits_and_symbols(line))
        .collect()
}

fn clean_table_line(line: &str) -> String {
    let stripped = strip_allergen_codes(line);
    let arrows = ARROW_RE.replace_all(&stripped, "/");
    collapse_whitespace(&arrows)
}

/// `floor(len / parts)` items for each part except the last, which takes the
/// rest.
pub fn split_evenly<T>(items: &[T], parts: usize) -> Vec<&[T]> {
    if parts == 0 {
        return Vec::new();
    }
    let per_part = items.len() / parts;
    let mut slices = Vec::with_capacity(parts);
    for idx in 0..parts - 1 {
        slices.push(&items[idx * per_part..(idx + 1) * per_part]);
    }
    slices.push(&items[(parts - 1) * per_part..]);
    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_split_evenly_two_parts() {
        let items: Vec<usize> = (0..10).collect();
        let parts = split_evenly(&items, 2);
        assert_eq!(parts, vec![&items[0..5], &items[5..10]]);
    }

    #[test]
    fn test_split_evenly_remainder_goes_last() {
        let items: Vec<usize> = (0..10).collect();
        let lens: Vec<usize> = split_evenly(&items, 3).iter().map(|p| p.len()).collect();
        assert_eq!(lens, vec![3, 3, 4]);
    }

    #[test]
    fn test_split_evenly_fewer_items_than_parts() {
        let items = vec!["a", "b"];
        let parts = split_evenly(&items, 3);
        let lens: Vec<usize> = parts.iter().map(|p| p.len()).collect();
        assert_eq!(lens, vec![0, 0, 2]);
        assert_eq!(parts[2], &items[..]);
        assert!(split_evenly(&items, 0).is_empty());
    }

    #[test]
    fn test_anchors_are_distinct_and_ordered() {
        let text = "3월 3일(화) 3월 2일(월)\n3월 3일(화) 반복\n2월 30일(금)";
        assert_eq!(
            find_anchors(text, today()),
            vec![date("2026-03-03"), date("2026-03-02")]
        );
    }

    #[test]
    fn test_anchor_requires_weekday() {
        assert!(find_anchors("3월 3일\n흰밥", today()).is_empty());
        assert!(segment_bulk("3월 3일\n흰밥", today()).is_empty());
    }

    #[test]
    fn test_collect_menu_items_filters_and_cleans() {
        let text = "3월 2일(월) 3월 3일(화)\n\
                    흰밥\n\
                    스팸짜글이(1.2.5.6.10)\n\
                    (5.6.13)\n\
                    에너지 650 kcal\n\
                    월요일 특식\n\
                    우유 -> 두유\n\
                    돈까스    소스\n\
                    123.4\n\
                    김";
        assert_eq!(
            collect_menu_items(text),
            vec!["흰밥", "스팸짜글이", "우유/두유", "돈까스 소스"]
        );
    }

    #[test]
    fn test_bulk_distribution_across_anchors() {
        let dishes = [
            "흰밥", "미역국", "제육볶음", "깍두기", "사과", "잡곡밥", "된장국", "생선구이", "배추김치",
            "요구르트",
        ];
        let text = format!("3월 2일(월) 3월 3일(화)\n{}", dishes.join("\n"));
        let schedule = segment_bulk(&text, today());

        assert_eq!(schedule.get(&date("2026-03-02")).unwrap(), &dishes[0..5]);
        assert_eq!(schedule.get(&date("2026-03-03")).unwrap(), &dishes[5..10]);
    }

    #[test]
    fn test_bulk_three_anchors_ten_items() {
        let dishes: Vec<String> = (0..10).map(|i| format!("반찬메뉴{}", i)).collect();
        let text = format!(
            "3월 2일(월)\n3월 3일(화)\n3월 4일(수)\n{}",
            dishes.join("\n")
        );
        let schedule = segment_bulk(&text, today());

        assert_eq!(schedule.get(&date("2026-03-02")).unwrap(), &dishes[0..3]);
        assert_eq!(schedule.get(&date("2026-03-03")).unwrap(), &dishes[3..6]);
        assert_eq!(schedule.get(&date("2026-03-04")).unwrap(), &dishes[6..10]);
    }

    #[test]
    fn test_empty_slices_are_omitted() {
        let schedule = segment_bulk("3월 2일(월) 3월 3일(화) 3월 4일(수)\n흰밥", today());
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.get(&date("2026-03-04")).unwrap(), ["흰밥"]);
    }

    #[test]
    fn test_year_boundary_correction() {
        let january = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let december = NaiveDate::from_ymd_opt(2026, 12, 28).unwrap();

        assert_eq!(
            find_anchors("12월 29일(월)", january),
            vec![date("2025-12-29")]
        );
        assert_eq!(
            find_anchors("1월 4일(월)", december),
            vec![date("2027-01-04")]
        );
    }
}
