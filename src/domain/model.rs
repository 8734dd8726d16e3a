use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 正規化後的日期鍵，固定以 `YYYY-MM-DD` 表示
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Returns `None` for dates that do not exist (e.g. 2/30).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// NEIS `MLSV_YMD` form: `YYYYMMDD`.
    pub fn from_compact(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.len() != 8 || !value.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        NaiveDate::parse_from_str(value, "%Y%m%d").ok().map(Self)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// 例如 `2025년 1월 20일 (월)`
    pub fn korean_label(&self) -> String {
        let weekday = match self.0.weekday() {
            Weekday::Mon => "월",
            Weekday::Tue => "화",
            Weekday::Wed => "수",
            Weekday::Thu => "목",
            Weekday::Fri => "금",
            Weekday::Sat => "토",
            Weekday::Sun => "일",
        };
        format!(
            "{}년 {}월 {}일 ({})",
            self.year(),
            self.month(),
            self.day(),
            weekday
        )
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// 一次解析的完整結果：日期 -> 依序排列的菜單項目。
///
/// Every stored item list is non-empty. A schedule is never edited after an
/// extraction returns it; merging produces a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuSchedule {
    entries: BTreeMap<CalendarDate, Vec<String>>,
}

impl MenuSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty item lists are dropped instead of stored.
    pub(crate) fn insert(&mut self, date: CalendarDate, items: Vec<String>) {
        if items.is_empty() {
            return;
        }
        self.entries.insert(date, items);
    }

    pub(crate) fn append(&mut self, date: CalendarDate, items: Vec<String>) {
        if items.is_empty() {
            return;
        }
        self.entries.entry(date).or_default().extend(items);
    }

    pub fn get(&self, date: &CalendarDate) -> Option<&[String]> {
        self.entries.get(date).map(Vec::as_slice)
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.entries.contains_key(date)
    }

    pub fn dates(&self) -> impl Iterator<Item = &CalendarDate> {
        self.entries.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, CalendarDate, Vec<String>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Keys present in `self` replace the whole entry in `base`.
    pub fn merged_over(self, base: MenuSchedule) -> MenuSchedule {
        let mut entries = base.entries;
        entries.extend(self.entries);
        MenuSchedule { entries }
    }

    /// Date header followed by its items, one per line.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.entries.len() + self.item_count());
        for (date, items) in &self.entries {
            lines.push(date.to_string());
            lines.extend(items.iter().cloned());
        }
        lines.join("\n")
    }
}

impl<'a> IntoIterator for &'a MenuSchedule {
    type Item = (&'a CalendarDate, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, CalendarDate, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// 開放資料 API 回傳的一筆原始紀錄（尚未清理）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    #[serde(rename = "MLSV_YMD", default, deserialize_with = "compact_date")]
    pub date: Option<String>,
    #[serde(rename = "DDISH_NM", default)]
    pub menu: Option<String>,
    #[serde(rename = "MMEAL_SC_NM", default)]
    pub meal_name: Option<String>,
}

/// `MLSV_YMD` 可能是字串 "20250120" 也可能是數字 20250120
fn compact_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        Text(String),
        Number(u64),
    }

    Ok(
        Option::<RawDate>::deserialize(deserializer)?.map(|raw| match raw {
            RawDate::Text(text) => text,
            RawDate::Number(number) => number.to_string(),
        }),
    )
}

/// Output of the extract stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDocument {
    Text(String),
    Records(Vec<MealRecord>),
}
