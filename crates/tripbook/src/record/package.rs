use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Checker, EditMode, Fields, Record};
use crate::config::DisplayConfig;
use crate::error::Result;

/// A priced travel package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Unique identifier within the collection.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Price, stored as a JSON number.
    ///
    /// Older data may hold `null` where a price failed to parse; it loads as
    /// `None` and is written back as `null`. New input always has a price.
    pub value: Option<f64>,
}

impl Package {
    fn price_with(&self, currency_symbol: &str) -> String {
        match self.value {
            Some(value) => format!("{} - {currency_symbol} {value:.2}", self.name),
            None => format!("{} - {currency_symbol} (no price)", self.name),
        }
    }
}

impl Record for Package {
    const KEY: &'static str = "@packages";
    const NAME: &'static str = "packages";
    const REQUIRED: &'static [&'static str] = &["name", "value"];
    // Saving an edit re-identifies the package and moves it to the end.
    const EDIT_MODE: EditMode = EditMode::Recreate;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_fields(id: String, fields: &Fields) -> Result<Self> {
        let mut check = Checker::for_record::<Self>(fields);
        let name = check.value("name");
        let raw = check.value("value");
        let value = match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ if raw.is_empty() => None,
            _ => {
                check.problem(format!("value must be a number, got '{raw}'"));
                None
            }
        };
        check.finish(Self { id, name, value })
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("name", &self.name)
            .with(
                "value",
                self.value.map(|value| value.to_string()).unwrap_or_default(),
            )
    }

    fn render(&self, display: &DisplayConfig) -> String {
        self.price_with(&display.currency_symbol)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.price_with(&DisplayConfig::default().currency_symbol))
    }
}
