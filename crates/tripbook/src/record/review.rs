use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Checker, Fields, Record};
use crate::error::Result;

/// Lowest accepted star rating.
pub const MIN_STARS: u8 = 1;

/// Highest accepted star rating.
pub const MAX_STARS: u8 = 5;

/// A rated comment about a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier within the collection.
    pub id: String,
    /// The comment itself.
    pub text: String,
    /// Rating from 1 to 5.
    pub stars: u8,
    /// Place being reviewed.
    pub location: String,
}

/// Parse a star rating; anything unparseable or out of range becomes 0.
fn coerce_stars(raw: &str) -> u8 {
    raw.parse::<i64>()
        .ok()
        .and_then(|n| u8::try_from(n).ok())
        .filter(|n| (MIN_STARS..=MAX_STARS).contains(n))
        .unwrap_or(0)
}

impl Record for Review {
    const KEY: &'static str = "@reviews";
    const NAME: &'static str = "reviews";
    const REQUIRED: &'static [&'static str] = &["text", "stars", "location"];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_fields(id: String, fields: &Fields) -> Result<Self> {
        let mut check = Checker::for_record::<Self>(fields);
        let text = check.value("text");
        let raw_stars = check.value("stars");
        let stars = coerce_stars(&raw_stars);
        if stars == 0 && !raw_stars.is_empty() {
            check.problem(format!(
                "stars must be a whole number from {MIN_STARS} to {MAX_STARS}"
            ));
        }
        let location = check.value("location");
        check.finish(Self {
            id,
            text,
            stars,
            location,
        })
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("text", &self.text)
            .with("stars", self.stars.to_string())
            .with("location", &self.location)
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Local: {} - Stars: {}",
            self.text, self.location, self.stars
        )
    }
}
