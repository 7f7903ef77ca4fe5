//! Label-driven cleaning of the film detail fields.
//!
//! Each field block on the page looks like `"Regia: Ridley Scott"`,
//! `"NEW! Il gladiatore"` or `"155 min - V.M.14"`. The rules below decide what
//! gets stripped and whether the field tells us anything about the age
//! restriction.

use crate::Restriction;

const PROMO_MARKER: &str = "NEW!";
const PROMO_PREFIX: &str = "NEW! ";
const RESTRICTION_MARKER: &str = "V.M.14";
const RESTRICTION_SUFFIX: &str = " - V.M.14";

/// The labelled detail blocks of a film entry, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilmField {
    Title,
    Director,
    Genre,
    Duration,
    Cast,
}

impl FilmField {
    pub const ALL: [FilmField; 5] = [
        FilmField::Title,
        FilmField::Director,
        FilmField::Genre,
        FilmField::Duration,
        FilmField::Cast,
    ];

    /// CSS class of the block holding this field.
    pub fn class(self) -> &'static str {
        match self {
            FilmField::Title => "titolo",
            FilmField::Director => "regia",
            FilmField::Genre => "genere",
            FilmField::Duration => "durata",
            FilmField::Cast => "cast",
        }
    }

    /// Label the site prints in front of the value.
    pub fn label(self) -> &'static str {
        match self {
            FilmField::Title => "Titolo",
            FilmField::Director => "Regia",
            FilmField::Genre => "Genere",
            FilmField::Duration => "Durata",
            FilmField::Cast => "Cast",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Marker {
    FieldLabel,
    Literal(&'static str),
}

impl Marker {
    fn matches(self, field: FilmField, text: &str) -> bool {
        match self {
            Marker::FieldLabel => text.contains(field.label()),
            Marker::Literal(needle) => text.contains(needle),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Strip {
    LabelAndPromo,
    RestrictionSuffix,
}

/// First matching rule wins.
const CLEANING_RULES: [(Marker, Strip); 3] = [
    (Marker::FieldLabel, Strip::LabelAndPromo),
    (Marker::Literal(PROMO_MARKER), Strip::LabelAndPromo),
    (Marker::Literal(RESTRICTION_MARKER), Strip::RestrictionSuffix),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedField {
    pub text: String,
    /// `None` when this field says nothing about the restriction.
    pub restriction: Option<Restriction>,
}

pub fn clean_field(field: FilmField, raw: &str) -> CleanedField {
    let rule = CLEANING_RULES
        .iter()
        .find(|(marker, _)| marker.matches(field, raw))
        .map(|(_, strip)| *strip);

    match rule {
        Some(Strip::LabelAndPromo) => CleanedField {
            text: raw
                .replace(&format!("{}: ", field.label()), "")
                .replace(PROMO_PREFIX, "")
                .trim()
                .to_string(),
            restriction: None,
        },
        Some(Strip::RestrictionSuffix) => CleanedField {
            text: raw.replace(RESTRICTION_SUFFIX, "").trim().to_string(),
            restriction: Some(Restriction::Restricted),
        },
        None => CleanedField {
            text: raw.trim().to_string(),
            restriction: Some(Restriction::Unrestricted),
        },
    }
}
