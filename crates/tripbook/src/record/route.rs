use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Checker, Fields, Record};
use crate::error::Result;

/// A planned itinerary stop. Date and time are free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Unique identifier within the collection.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Date as typed, e.g. `12/07/2024`.
    pub date: String,
    /// Time as typed, e.g. `09:30`.
    pub time: String,
}

impl Record for Route {
    const KEY: &'static str = "@routes";
    const NAME: &'static str = "routes";
    const REQUIRED: &'static [&'static str] = &["name", "date", "time"];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_fields(id: String, fields: &Fields) -> Result<Self> {
        let check = Checker::for_record::<Self>(fields);
        let name = check.value("name");
        let date = check.value("date");
        let time = check.value("time");
        check.finish(Self {
            id,
            name,
            date,
            time,
        })
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("name", &self.name)
            .with("date", &self.date)
            .with("time", &self.time)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} {}", self.name, self.date, self.time)
    }
}
