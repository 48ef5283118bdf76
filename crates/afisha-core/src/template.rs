//! The numbered description template used by organizers.
//!
//! Rendering an [`EventDraft`] produces text that [`crate::extract`] reads
//! back, so a description pasted into the calendar provider shows up with
//! every field filled in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::event::{DATE_FORMAT, DEFAULT_PRICE};

/// Age limit pre-filled in a new draft.
pub const DRAFT_AGE_LIMIT: &str = "18+";

/// Form state for a new event description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub city: String,
    pub district: String,
    pub name: String,
    pub description: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub venue: String,
    pub age_limit: String,
    pub price: String,
    pub link: String,
    pub contacts: String,
}

impl EventDraft {
    /// Creates an empty draft dated `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            city: String::new(),
            district: String::new(),
            name: String::new(),
            description: String::new(),
            date: date.format(DATE_FORMAT).to_string(),
            venue: String::new(),
            age_limit: DRAFT_AGE_LIMIT.to_string(),
            price: DEFAULT_PRICE.to_string(),
            link: String::new(),
            contacts: String::new(),
        }
    }

    /// Creates a draft dated on the selected day, or today when none is selected.
    pub fn for_selection(selected: Option<NaiveDate>, today: NaiveDate) -> Self {
        Self::new(selected.unwrap_or(today))
    }

    /// Renders the ten-line description. The name is uppercased.
    pub fn render_description(&self) -> String {
        [
            format!("1. Город: {}", self.city),
            format!("2. ОКРУГ: {}", self.district),
            format!("3. НАИМЕНОВАНИЕ: {}", self.name.to_uppercase()),
            format!("4. Краткое описание: {}", self.description),
            format!("5. Дата проведения: {}", self.date),
            format!("6. Площадка: {}", self.venue),
            format!("7. Возрастной ценз: {}", self.age_limit),
            format!("8. Цена: {}", self.price),
            format!("9. Ссылка: {}", self.link),
            format!("10. Ответственные: {}", self.contacts),
        ]
        .join("\n")
    }
}
