//! Diatonic pitches: a tone placed in an octave
//!
//! The octave belongs to the letter, so B#:4 sounds like C:5 and Cb:5 like
//! B:4. Equality is symbolic (same tone and octave); ordering by sound goes
//! through `chromatic_distance`.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::chromatic;
use super::diatonic_tone::{DiatonicTone, Letter};
use crate::error::{TonalError, TonalResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiatonicPitch {
    octave: i32,
    tone: DiatonicTone,
}

static PITCH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Ga-g](?:bbb|bb|b|###|##|#)?):?(-?\d+)$").expect("pitch pattern")
});

impl DiatonicPitch {
    pub fn new(octave: i32, tone: DiatonicTone) -> Self {
        Self { octave, tone }
    }

    /// Parse pitch text of the form "F#:5" (the colon is optional)
    ///
    /// Octaves beyond `chromatic::MAX_OCTAVE` in either direction are rejected.
    pub fn parse(text: &str) -> TonalResult<Self> {
        let trimmed = text.trim();
        let captures = PITCH_PATTERN
            .captures(trimmed)
            .ok_or_else(|| TonalError::InvalidPitch(text.to_string()))?;
        let tone = DiatonicTone::parse(&captures[1])
            .map_err(|_| TonalError::InvalidPitch(text.to_string()))?;
        let octave = captures[2]
            .parse::<i32>()
            .ok()
            .filter(|octave| octave.unsigned_abs() <= chromatic::MAX_OCTAVE.unsigned_abs())
            .ok_or_else(|| TonalError::InvalidPitch(text.to_string()))?;
        Ok(Self::new(octave, tone))
    }

    /// Spell the pitch at `chromatic_distance` with `tone`
    ///
    /// The tone's placement must match the distance's position in the octave.
    pub fn from_chromatic(chromatic_distance: i32, tone: DiatonicTone) -> TonalResult<Self> {
        let base = chromatic_distance - tone.tonal_offset();
        if base.rem_euclid(chromatic::SEMITONES_PER_OCTAVE) != 0 {
            return Err(TonalError::InvalidPitch(format!(
                "{} cannot sound at chromatic index {}",
                tone, chromatic_distance
            )));
        }
        Ok(Self::new(base.div_euclid(chromatic::SEMITONES_PER_OCTAVE), tone))
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn tone(&self) -> DiatonicTone {
        self.tone
    }

    /// Semitones above C:0; this is also the pitch's chromatic index
    pub fn chromatic_distance(&self) -> i32 {
        chromatic::SEMITONES_PER_OCTAVE * self.octave + self.tone.tonal_offset()
    }

    /// Letters above C:0, used for diatonic interval arithmetic
    pub fn diatonic_distance(&self) -> i32 {
        7 * self.octave + self.tone.diatonic_index()
    }

    pub fn frequency(&self) -> f64 {
        chromatic::index_to_frequency(self.chromatic_distance())
    }

    /// Same sounding pitch, regardless of spelling
    pub fn is_enharmonic(&self, other: &DiatonicPitch) -> bool {
        self.chromatic_distance() == other.chromatic_distance()
    }

    /// Whether moving from `from` to the adjacent letter of `to` changes octave
    ///
    /// Upward motion crosses when the letter wraps from B to C, downward when
    /// it wraps from C to B.
    pub fn crosses_c(from: &DiatonicTone, to: &DiatonicTone, up: bool) -> bool {
        if up {
            to.diatonic_index() < from.diatonic_index()
        } else {
            to.diatonic_index() > from.diatonic_index()
        }
    }

    /// The natural C that starts this pitch's octave
    pub fn octave_floor(&self) -> DiatonicPitch {
        DiatonicPitch::new(self.octave, DiatonicTone::natural(Letter::C))
    }
}

impl fmt::Display for DiatonicPitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tone, self.octave)
    }
}

impl FromStr for DiatonicPitch {
    type Err = TonalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiatonicPitch::parse(s)
    }
}

impl Serialize for DiatonicPitch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DiatonicPitch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        DiatonicPitch::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(text: &str) -> DiatonicPitch {
        DiatonicPitch::parse(text).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(p("F#:5").to_string(), "F#:5");
        assert_eq!(p("c4").to_string(), "C:4");
        assert_eq!(p("Bbb:3").tone().to_string(), "Bbb");
        assert!(DiatonicPitch::parse("H:4").is_err());
        assert!(DiatonicPitch::parse("C#").is_err());
    }

    #[test]
    fn test_chromatic_distance() {
        assert_eq!(p("C:5").chromatic_distance(), 60);
        assert_eq!(p("A:0").chromatic_distance(), 9);
        assert_eq!(p("C:8").chromatic_distance(), 96);
        // Octave follows the letter
        assert_eq!(p("B#:4").chromatic_distance(), 60);
        assert_eq!(p("Cb:5").chromatic_distance(), 59);
    }

    #[test]
    fn test_equality_is_symbolic() {
        assert_ne!(p("B#:4"), p("C:5"));
        assert!(p("B#:4").is_enharmonic(&p("C:5")));
        assert_eq!(p("C:5"), p("C:5"));
    }

    #[test]
    fn test_from_chromatic() {
        let b_sharp = DiatonicTone::parse("B#").unwrap();
        assert_eq!(DiatonicPitch::from_chromatic(60, b_sharp).unwrap(), p("B#:4"));
        let a = DiatonicTone::parse("A").unwrap();
        assert!(DiatonicPitch::from_chromatic(60, a).is_err());
    }

    #[test]
    fn test_crosses_c() {
        let b = DiatonicTone::parse("B").unwrap();
        let c = DiatonicTone::parse("C").unwrap();
        assert!(DiatonicPitch::crosses_c(&b, &c, true));
        assert!(!DiatonicPitch::crosses_c(&c, &b, true));
        assert!(DiatonicPitch::crosses_c(&c, &b, false));
    }
}
