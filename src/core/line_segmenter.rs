//! Line-based segmentation: every menu line belongs to the closest date line
//! above it.

use crate::core::classifier::is_menu_line;
use crate::core::date_pattern::{scan, DateToken};
use crate::domain::model::{CalendarDate, MenuSchedule};
use chrono::NaiveDate;

#[derive(Debug, Default)]
struct SegmentState {
    current_date: Option<CalendarDate>,
    buffer: Vec<String>,
}

impl SegmentState {
    fn commit(&mut self, schedule: &mut MenuSchedule) {
        if let Some(date) = self.current_date {
            let items = std::mem::take(&mut self.buffer);
            if !items.is_empty() {
                tracing::debug!("📅 {} -> {} items", date, items.len());
                schedule.insert(date, items);
            }
        }
    }
}

pub fn segment_lines(text: &str, today: NaiveDate) -> MenuSchedule {
    let mut schedule = MenuSchedule::new();
    let mut state = SegmentState::default();

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match scan(line, today) {
            Some(DateToken::Valid(found)) => {
                state.commit(&mut schedule);
                state.current_date = Some(found.date);
                tracing::trace!("anchor '{}' ({})", line, found.format.name());
                continue;
            }
            // 不存在的日期仍是區塊分界，後面的菜單沒有歸屬，直接丟掉
            Some(DateToken::Invalid(format)) => {
                state.commit(&mut schedule);
                state.current_date = None;
                tracing::warn!(
                    "⚠️ '{}' is not a real {} date, dropping its block",
                    line,
                    format.name()
                );
                continue;
            }
            None => {}
        }

        // 第一個日期之前的內容直接略過
        if state.current_date.is_none() {
            continue;
        }

        if is_menu_line(line) {
            state.buffer.push(line.to_string());
        } else {
            tracing::trace!("noise line dropped: '{}'", line);
        }
    }

    state.commit(&mut schedule);
    schedule
}
