//! Field extraction from free-text event descriptions.
//!
//! Event descriptions are written by hand and loosely follow a numbered-list
//! convention:
//!
//! ```text
//! 1. Город: Центр, Москва
//! 3. НАИМЕНОВАНИЕ
//! Фестиваль света
//! 8. Цена: 500 руб.
//! ```
//!
//! The extractor recovers the ten [`FieldLabel`]s from such text. A value is
//! taken from the rest of the label line, or from the following line when the
//! label stands alone. Lines that open another numbered field are never
//! consumed as a value. Nothing here fails: anything the extractor cannot find
//! resolves to the field's fallback.
//!
//! # Example
//!
//! ```
//! use afisha_core::extract::{extract_fields, FieldLabel};
//!
//! let fields = extract_fields("1. Город: Видное, ЮЗАО\n8. Цена: 300 руб.");
//! assert_eq!(fields.get(FieldLabel::Price), "300 руб.");
//!
//! let place = fields.city_district();
//! assert_eq!(place.district, "Видное");
//! assert_eq!(place.city, "ЮЗАО");
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::event::{
    DEFAULT_AGE_LIMIT, DEFAULT_PRICE, UNSPECIFIED_CITY, UNSPECIFIED_VENUE, UNTITLED,
};

/// Markup tags, including an unterminated trailing one.
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>?").expect("Invalid tag regex"));

/// Non-breaking space entity left behind by rich-text editors.
const NBSP_ENTITY: &str = "&nbsp;";

/// Numeric prefixes that open a field. Matched literally.
const HEADER_MARKERS: [&str; 10] = ["1.", "2.", "3.", "4.", "5.", "6.", "7.", "8.", "9.", "10."];

/// Label words that open a field even without their number.
const BARE_HEADER_WORDS: [&str; 1] = ["Округ"];

/// One of the ten numbered fields of the description convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldLabel {
    /// 1. City and district, comma separated.
    CityDistrict,
    /// 2. District on its own line. Reserved; the district is read from field 1.
    District,
    /// 3. Event name.
    Name,
    /// 4. Short description.
    ShortDescription,
    /// 5. Date. Reserved; the date comes from the provider.
    Date,
    /// 6. Venue.
    Venue,
    /// 7. Age limit.
    AgeLimit,
    /// 8. Price.
    Price,
    /// 9. Website link.
    Link,
    /// 10. Contacts of the organizers.
    Contacts,
}

impl FieldLabel {
    /// All labels in their numbered order.
    pub const ALL: [FieldLabel; 10] = [
        Self::CityDistrict,
        Self::District,
        Self::Name,
        Self::ShortDescription,
        Self::Date,
        Self::Venue,
        Self::AgeLimit,
        Self::Price,
        Self::Link,
        Self::Contacts,
    ];

    /// Returns the field number used in descriptions.
    pub fn number(self) -> u8 {
        match self {
            Self::CityDistrict => 1,
            Self::District => 2,
            Self::Name => 3,
            Self::ShortDescription => 4,
            Self::Date => 5,
            Self::Venue => 6,
            Self::AgeLimit => 7,
            Self::Price => 8,
            Self::Link => 9,
            Self::Contacts => 10,
        }
    }

    /// Returns the label prefixes recognized for this field, in match order.
    ///
    /// Variants cover the space after the number being present or not, and
    /// alternate wordings used by authors and by the admin template.
    pub fn patterns(self) -> &'static [&'static str] {
        match self {
            Self::CityDistrict => &["1. Город", "1.Город"],
            Self::District => &["2. Округ", "2.Округ"],
            Self::Name => &[
                "3. НАИМЕНОВАНИЕ",
                "3.НАИМЕНОВАНИЕ",
                "3. Название",
                "3.Название",
            ],
            Self::ShortDescription => &[
                "4. Описание",
                "4.Описание",
                "4. Краткое описание",
                "4.Краткое описание",
            ],
            Self::Date => &["5. Дата", "5.Дата"],
            Self::Venue => &["6. Площадка", "6.Площадка"],
            Self::AgeLimit => &[
                "7. Допуск",
                "7.Допуск",
                "7. Возрастной ценз",
                "7.Возрастной ценз",
            ],
            Self::Price => &["8. Стоимость", "8. Цена", "8.Стоимость", "8.Цена"],
            Self::Link => &["9. Сайт", "9. Ссылка", "9.Сайт", "9.Ссылка"],
            Self::Contacts => &[
                "10. Обратная связь",
                "10. Ответственные",
                "10. Контакты",
                "10.Обратная связь",
                "10.Ответственные",
                "10.Контакты",
            ],
        }
    }

    /// Returns the value used when the field is not found.
    ///
    /// For [`FieldLabel::CityDistrict`] this is the raw combined value; the
    /// city fallback is applied by [`split_city_district`].
    pub fn fallback(self) -> &'static str {
        match self {
            Self::Name => UNTITLED,
            Self::Venue => UNSPECIFIED_VENUE,
            Self::AgeLimit => DEFAULT_AGE_LIMIT,
            Self::Price => DEFAULT_PRICE,
            Self::CityDistrict
            | Self::District
            | Self::ShortDescription
            | Self::Date
            | Self::Link
            | Self::Contacts => "",
        }
    }
}

/// City and district recovered from field 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityDistrict {
    pub city: String,
    pub district: String,
}

/// The result of extracting all fields from one description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    cleaned: String,
    values: HashMap<FieldLabel, String>,
}

impl ExtractedFields {
    /// Returns the extracted value, or `None` if the field was not found.
    pub fn value(&self, label: FieldLabel) -> Option<&str> {
        self.values.get(&label).map(String::as_str)
    }

    /// Returns the extracted value, or the field's fallback.
    pub fn get(&self, label: FieldLabel) -> &str {
        self.value(label).unwrap_or(label.fallback())
    }

    /// Returns true if the field was found in the text.
    pub fn contains(&self, label: FieldLabel) -> bool {
        self.values.contains_key(&label)
    }

    /// Splits field 1 into city and district.
    pub fn city_district(&self) -> CityDistrict {
        split_city_district(self.get(FieldLabel::CityDistrict))
    }

    /// Returns the cleaned description (tags stripped, entities decoded).
    pub fn cleaned(&self) -> &str {
        &self.cleaned
    }

    /// Consumes the fields and returns the cleaned description.
    pub fn into_cleaned(self) -> String {
        self.cleaned
    }
}

/// Extracts all ten fields from a raw description.
pub fn extract_fields(raw: &str) -> ExtractedFields {
    let cleaned = clean_description(raw);
    let lines = description_lines(&cleaned);

    let values = FieldLabel::ALL
        .into_iter()
        .filter_map(|label| find_value(&lines, label.patterns()).map(|value| (label, value)))
        .collect();

    ExtractedFields { cleaned, values }
}

/// Strips markup tags and decodes non-breaking spaces.
pub fn clean_description(raw: &str) -> String {
    TAG_REGEX.replace_all(raw, "").replace(NBSP_ENTITY, " ")
}

/// Splits cleaned text into trimmed, non-empty lines.
pub fn description_lines(cleaned: &str) -> Vec<&str> {
    cleaned
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Returns true if the line opens a numbered field.
pub fn is_header_line(line: &str) -> bool {
    HEADER_MARKERS.iter().any(|marker| line.starts_with(marker))
        || BARE_HEADER_WORDS
            .iter()
            .any(|word| strip_prefix_ignore_case(line, word).is_some())
}

/// Splits a combined `"district, city"` value.
///
/// Two or more parts yield district then city, in that order. A single part
/// is the city alone. An empty value yields the city fallback.
pub fn split_city_district(raw: &str) -> CityDistrict {
    if raw.is_empty() {
        return CityDistrict {
            city: UNSPECIFIED_CITY.to_string(),
            district: String::new(),
        };
    }

    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [district, city, ..] => CityDistrict {
            city: (*city).to_string(),
            district: (*district).to_string(),
        },
        [city] => CityDistrict {
            city: (*city).to_string(),
            district: String::new(),
        },
        [] => CityDistrict {
            city: UNSPECIFIED_CITY.to_string(),
            district: String::new(),
        },
    }
}

/// Finds the value for the first line matching any of `patterns`.
fn find_value(lines: &[&str], patterns: &[&str]) -> Option<String> {
    for (idx, line) in lines.iter().enumerate() {
        let Some(after) = patterns
            .iter()
            .find_map(|pattern| strip_prefix_ignore_case(line, pattern))
        else {
            continue;
        };

        let remainder = after.trim_start_matches(is_separator).trim();
        if !remainder.is_empty() && !is_header_line(remainder) {
            return Some(remainder.to_string());
        }

        if let Some(next) = lines.get(idx + 1)
            && !is_header_line(next)
        {
            return Some((*next).to_string());
        }
    }

    None
}

fn is_separator(c: char) -> bool {
    matches!(c, ':' | '.' | '-') || c.is_whitespace()
}

/// Strips `prefix` from `text`, comparing characters case-insensitively.
///
/// Works on characters rather than bytes since lowercasing may change the
/// byte length of some letters.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = text.chars();
    for expected in prefix.chars() {
        let actual = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(chars.as_str())
}
