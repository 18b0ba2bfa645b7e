//! Shift codes and free-text normalization.
//!
//! Source files spell shifts in many ways ("Mañana", "manana", "M", "TM",
//! "Turno noche", "night"). Everything that is not a known synonym lands in
//! [`Shift::Unknown`] instead of failing, so one bad row cannot hide the rest
//! of a roster.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// One of the three fixed daily periods, plus a bucket for unrecognized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shift {
    /// Morning shift (`M`, "Mañana").
    Morning,
    /// Afternoon shift (`T`, "Tarde").
    Afternoon,
    /// Night shift (`N`, "Noche").
    Night,
    /// Text that matched no known synonym.
    Unknown,
}

const MORNING: &[&str] = &[
    "m", "ma", "man", "manana", "mananas", "tm", "mat", "matutino", "am", "morning",
];
const AFTERNOON: &[&str] = &[
    "t", "ta", "tar", "tarde", "tardes", "tt", "vesp", "vespertino", "pm", "afternoon",
];
const NIGHT: &[&str] = &[
    "n", "no", "noc", "noche", "noches", "tn", "noct", "nocturno", "night",
];

impl Shift {
    /// The three shifts a service is staffed for, in daily order.
    pub const SCHEDULED: [Shift; 3] = [Shift::Morning, Shift::Afternoon, Shift::Night];

    /// Maps free text onto a shift.
    ///
    /// Case, surrounding whitespace, accents, a trailing period and a leading
    /// "turno" are ignored.
    pub fn normalize(raw: &str) -> Shift {
        let folded = fold(raw);
        let token = folded
            .strip_prefix("turno")
            .map(str::trim_start)
            .filter(|rest| !rest.is_empty())
            .unwrap_or(&folded);
        if MORNING.contains(&token) {
            Shift::Morning
        } else if AFTERNOON.contains(&token) {
            Shift::Afternoon
        } else if NIGHT.contains(&token) {
            Shift::Night
        } else {
            Shift::Unknown
        }
    }

    /// Canonical one-letter code.
    pub const fn code(&self) -> &'static str {
        match self {
            Shift::Morning => "M",
            Shift::Afternoon => "T",
            Shift::Night => "N",
            Shift::Unknown => "?",
        }
    }

    /// Label written back to the CSV files.
    pub const fn label(&self) -> &'static str {
        match self {
            Shift::Morning => "Mañana",
            Shift::Afternoon => "Tarde",
            Shift::Night => "Noche",
            Shift::Unknown => "Desconocido",
        }
    }

    pub const fn is_scheduled(&self) -> bool {
        !matches!(self, Shift::Unknown)
    }
}

fn fold(raw: &str) -> String {
    raw.trim()
        .trim_end_matches('.')
        .chars()
        .map(|ch| match ch {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
            'ñ' | 'Ñ' => 'n',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Strict parse: unrecognized text is an error rather than [`Shift::Unknown`].
impl FromStr for Shift {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Shift::normalize(s) {
            Shift::Unknown => Err(ModelError::UnknownShift(s.to_string())),
            shift => Ok(shift),
        }
    }
}
