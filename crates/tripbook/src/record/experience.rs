use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Checker, Fields, Record};
use crate::error::Result;

/// Category of an experience.
///
/// Stored data carries the category as a free-text tag; these are the tags
/// the planner itself writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExperienceKind {
    /// A general experience.
    #[default]
    General,
    /// A tip, carried in the `tip` field.
    Tip,
    /// A place, carried in the `place` field.
    Place,
}

impl ExperienceKind {
    /// Stored tag for this kind.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::General => "Coloque sua experiência",
            Self::Tip => "Dica",
            Self::Place => "Lugar",
        }
    }

    /// Kind for a stored tag; unknown tags read as [`ExperienceKind::General`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Dica" => Self::Tip,
            "Lugar" => Self::Place,
            _ => Self::General,
        }
    }
}

/// Something to do, a tip, or a place, depending on its tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    /// Unique identifier within the collection.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-text category tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Tip text; empty unless the tag is the tip tag.
    #[serde(default)]
    pub tip: String,
    /// Place text; empty unless the tag is the place tag.
    #[serde(default)]
    pub place: String,
}

impl Experience {
    /// Category derived from the stored tag.
    #[must_use]
    pub fn category(&self) -> ExperienceKind {
        ExperienceKind::from_tag(&self.kind)
    }
}

impl Record for Experience {
    const KEY: &'static str = "@experiences";
    const NAME: &'static str = "experiences";
    const REQUIRED: &'static [&'static str] = &["name"];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_fields(id: String, fields: &Fields) -> Result<Self> {
        let check = Checker::for_record::<Self>(fields);
        let name = check.value("name");
        let mut kind = check.value("type");
        if kind.is_empty() {
            kind = ExperienceKind::General.tag().to_string();
        }

        let category = ExperienceKind::from_tag(&kind);
        let tip = if category == ExperienceKind::Tip {
            check.value("tip")
        } else {
            String::new()
        };
        let place = if category == ExperienceKind::Place {
            check.value("place")
        } else {
            String::new()
        };

        check.finish(Self {
            id,
            name,
            kind,
            tip,
            place,
        })
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("name", &self.name)
            .with("type", &self.kind)
            .with("tip", &self.tip)
            .with("place", &self.place)
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category() {
            ExperienceKind::Tip if !self.tip.is_empty() => write!(f, "{} - {}", self.name, self.tip),
            ExperienceKind::Place if !self.place.is_empty() => {
                write!(f, "{} @ {}", self.name, self.place)
            }
            _ => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_name_required() {
        let err = Experience::from_fields("1".to_string(), &Fields::new()).unwrap_err();
        assert_eq!(err.to_string(), "invalid experiences: name is required");
    }

    #[test]
    fn test_default_tag() {
        let exp = Experience::from_fields("1".to_string(), &Fields::new().with("name", "Surf"))
            .unwrap();
        assert_eq!(exp.kind, "Coloque sua experiência");
        assert_eq!(exp.category(), ExperienceKind::General);
        assert!(exp.tip.is_empty());
        assert!(exp.place.is_empty());
    }

    #[test]
    fn test_tip_kept_only_for_tip_tag() {
        let fields = Fields::new()
            .with("name", "Sunset")
            .with("type", "Dica")
            .with("tip", "bring water")
            .with("place", "Arpoador");
        let exp = Experience::from_fields("1".to_string(), &fields).unwrap();
        assert_eq!(exp.tip, "bring water");
        assert_eq!(exp.place, "");
    }

    #[test]
    fn test_place_kept_only_for_place_tag() {
        let fields = Fields::new()
            .with("name", "Sunset")
            .with("type", "Lugar")
            .with("tip", "bring water")
            .with("place", "Arpoador");
        let exp = Experience::from_fields("1".to_string(), &fields).unwrap();
        assert_eq!(exp.tip, "");
        assert_eq!(exp.place, "Arpoador");
        assert_eq!(exp.to_string(), "Sunset @ Arpoador");
    }

    #[test]
    fn test_unknown_tag_is_kept_verbatim() {
        let fields = Fields::new().with("name", "Museum").with("type", "culture");
        let exp = Experience::from_fields("1".to_string(), &fields).unwrap();
        assert_eq!(exp.kind, "culture");
        assert_eq!(exp.category(), ExperienceKind::General);
    }

    #[test]
    fn test_json_uses_type_key() {
        let json = r#"{"id":"9","name":"Trail","type":"Dica","tip":"go early","place":""}"#;
        let exp: Experience = serde_json::from_str(json).unwrap();
        assert_eq!(exp.kind, "Dica");

        let value = serde_json::to_value(&exp).unwrap();
        assert_eq!(value["type"], "Dica");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in [ExperienceKind::General, ExperienceKind::Tip, ExperienceKind::Place] {
            assert_eq!(ExperienceKind::from_tag(kind.tag()), kind);
        }
    }
}
