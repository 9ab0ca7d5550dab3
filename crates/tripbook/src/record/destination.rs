use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Checker, Fields, Record};
use crate::error::Result;

/// A place worth visiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Unique identifier within the collection.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Country the destination is in.
    pub country: String,
    /// City the destination is in.
    pub city: String,
}

impl Record for Destination {
    const KEY: &'static str = "@destinations";
    const NAME: &'static str = "destinations";
    const REQUIRED: &'static [&'static str] = &["name", "country", "city"];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_fields(id: String, fields: &Fields) -> Result<Self> {
        let check = Checker::for_record::<Self>(fields);
        let name = check.value("name");
        let country = check.value("country");
        let city = check.value("city");
        check.finish(Self {
            id,
            name,
            country,
            city,
        })
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("name", &self.name)
            .with("country", &self.country)
            .with("city", &self.city)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.city, self.country)
    }
}
