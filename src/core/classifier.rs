//! Line classification: noise vs. menu item.

use regex::Regex;
use std::sync::LazyLock;

static DIGITS_AND_SYMBOLS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s.,\-()/]+$").unwrap());
static ALLERGEN_GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\s*\d+(?:\s*[.,]\s*\d+)*\s*[.,]?\s*\)$").unwrap());
static ALLERGEN_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\d+(?:\s*[.,]\s*\d+)*\s*[.,]?\s*\)").unwrap());

/// 營養成分、原產地、過敏原說明等表格用語
pub const NOISE_KEYWORDS: &[&str] = &[
    "에너지",
    "열량",
    "칼슘",
    "단백질",
    "지방",
    "탄수화물",
    "비타민",
    "원산지",
    "평균",
    "권장",
    "섭취",
    "영양",
    "알레르기",
    "나트륨",
    "철분",
    "kcal",
    "energy",
    "calcium",
    "protein",
    "fat",
    "carbohydrate",
    "vitamin",
    "origin",
    "average",
];

pub const FOOD_KEYWORDS: &[&str] = &[
    "밥", "국", "찌개", "김치", "반찬", "조림", "구이", "볶음", "튀김", "샐러드", "과일", "우유",
    "음료",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Noise,
    MenuItem,
}

pub fn classify_line(line: &str) -> LineClass {
    if is_noise(line) {
        return LineClass::Noise;
    }

    let has_script = contains_hangul(line);
    let has_keyword = FOOD_KEYWORDS.iter().any(|keyword| line.contains(keyword));
    if has_script && (has_keyword || char_len(line) >= 3) {
        LineClass::MenuItem
    } else {
        LineClass::Noise
    }
}

pub fn is_menu_line(line: &str) -> bool {
    classify_line(line) == LineClass::MenuItem
}

fn is_noise(line: &str) -> bool {
    char_len(line) < 2
        || is_digits_and_symbols(line)
        || contains_noise_keyword(line)
        || is_allergen_group(line)
}

/// No script content at all: digits, whitespace and `. , - ( ) /` only.
pub fn is_digits_and_symbols(line: &str) -> bool {
    DIGITS_AND_SYMBOLS_RE.is_match(line)
}

pub fn contains_noise_keyword(line: &str) -> bool {
    let lowered = line.to_lowercase();
    NOISE_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// The whole line is one allergen-code group such as `(1.2.5.6)`.
pub fn is_allergen_group(line: &str) -> bool {
    ALLERGEN_GROUP_RE.is_match(line.trim())
}

pub fn strip_allergen_codes(text: &str) -> String {
    ALLERGEN_CODE_RE.replace_all(text, "").into_owned()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_hangul(c: char) -> bool {
    ('가'..='힣').contains(&c)
}

pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(is_hangul)
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
