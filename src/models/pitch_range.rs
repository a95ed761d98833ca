//! Inclusive chromatic pitch ranges
//!
//! A range is a pair of chromatic indices bounded by the chromatic scale,
//! A:0 (index 9) through C:8 (index 96).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::chromatic::{self, CHROMATIC_END_INDEX, CHROMATIC_START_INDEX};
use super::diatonic_pitch::DiatonicPitch;
use crate::error::{TonalError, TonalResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct PitchRange {
    start_index: i32,
    end_index: i32,
}

#[derive(Deserialize)]
struct RawRange {
    start_index: i32,
    end_index: i32,
}

impl TryFrom<RawRange> for PitchRange {
    type Error = TonalError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        PitchRange::new(raw.start_index, raw.end_index)
    }
}

impl PitchRange {
    pub fn new(start_index: i32, end_index: i32) -> TonalResult<Self> {
        if start_index < CHROMATIC_START_INDEX {
            return Err(TonalError::InvalidRange(format!(
                "start index {} is below A:0",
                start_index
            )));
        }
        if end_index > CHROMATIC_END_INDEX {
            return Err(TonalError::InvalidRange(format!(
                "end index {} is above C:8",
                end_index
            )));
        }
        if start_index > end_index {
            return Err(TonalError::InvalidRange(format!(
                "start index {} exceeds end index {}",
                start_index, end_index
            )));
        }
        Ok(Self {
            start_index,
            end_index,
        })
    }

    /// The whole chromatic scale
    pub fn full() -> Self {
        Self {
            start_index: CHROMATIC_START_INDEX,
            end_index: CHROMATIC_END_INDEX,
        }
    }

    /// Range between two pitch strings, e.g. ("C:2", "C:8")
    pub fn from_pitches(start: &str, end: &str) -> TonalResult<Self> {
        let start = DiatonicPitch::parse(start)?;
        let end = DiatonicPitch::parse(end)?;
        Self::new(start.chromatic_distance(), end.chromatic_distance())
    }

    pub fn from_locations(start: (i32, i32), end: (i32, i32)) -> TonalResult<Self> {
        let index = |(partition, offset): (i32, i32)| {
            partition
                .checked_mul(chromatic::SEMITONES_PER_OCTAVE)
                .and_then(|base| base.checked_add(offset))
                .ok_or_else(|| {
                    TonalError::InvalidRange(format!("location ({}, {})", partition, offset))
                })
        };
        Self::new(index(start)?, index(end)?)
    }

    pub fn start_index(&self) -> i32 {
        self.start_index
    }

    pub fn end_index(&self) -> i32 {
        self.end_index
    }

    /// Number of chromatic indices covered
    pub fn size(&self) -> usize {
        (self.end_index - self.start_index + 1) as usize
    }

    pub fn is_index_in_range(&self, index: i32) -> bool {
        (self.start_index..=self.end_index).contains(&index)
    }

    pub fn is_location_in_range(&self, location: (i32, i32)) -> bool {
        self.is_index_in_range(chromatic::location_to_index(location))
    }

    pub fn is_pitch_in_range(&self, pitch: &DiatonicPitch) -> bool {
        self.is_index_in_range(pitch.chromatic_distance())
    }

    /// Containment test for pitch text; unparseable text is never in range
    pub fn is_pitch_text_in_range(&self, text: &str) -> bool {
        DiatonicPitch::parse(text)
            .map(|pitch| self.is_pitch_in_range(&pitch))
            .unwrap_or(false)
    }

    /// True when every index of `other` lies in this range
    pub fn contains_range(&self, other: &PitchRange) -> bool {
        self.start_index <= other.start_index && other.end_index <= self.end_index
    }

    /// Lowest index in the range whose placement (0..=11) matches
    pub fn find_lowest_placement_in_range(&self, placement: i32) -> Option<i32> {
        let placement = placement.rem_euclid(chromatic::SEMITONES_PER_OCTAVE);
        let delta = (placement - self.start_index).rem_euclid(chromatic::SEMITONES_PER_OCTAVE);
        let index = self.start_index + delta;
        self.is_index_in_range(index).then_some(index)
    }

    /// Octaves whose C..B span touches the range, lowest first
    pub fn octaves(&self) -> std::ops::RangeInclusive<i32> {
        // One octave of slack on each side catches spellings such as B#:4 or Cb:5.
        (self.start_index.div_euclid(12) - 1)..=(self.end_index.div_euclid(12) + 1)
    }
}

impl fmt::Display for PitchRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (s_part, s_off) = chromatic::index_to_location(self.start_index);
        let (e_part, e_off) = chromatic::index_to_location(self.end_index);
        write!(f, "P[({}, {})-({}, {})]", s_part, s_off, e_part, e_off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_bounds() {
        assert!(PitchRange::new(9, 96).is_ok());
        assert!(PitchRange::new(8, 96).is_err());
        assert!(PitchRange::new(9, 97).is_err());
        assert!(PitchRange::new(60, 59).is_err());
        let range = PitchRange::from_pitches("C:2", "C:8").unwrap();
        assert_eq!(range.start_index(), 24);
        assert_eq!(range.end_index(), 96);
    }

    #[test]
    fn test_containment_forms() {
        let range = PitchRange::from_pitches("C:4", "C:6").unwrap();
        assert!(range.is_index_in_range(48));
        assert!(range.is_location_in_range((5, 11)));
        assert!(range.is_pitch_text_in_range("B#:5"));
        assert!(!range.is_pitch_text_in_range("C#:6"));
        assert!(!range.is_pitch_text_in_range("garbage"));
        assert!(!range.is_pitch_in_range(&DiatonicPitch::parse("Cb:4").unwrap()));
    }

    #[test]
    fn test_lowest_placement() {
        let range = PitchRange::from_pitches("D:4", "C:5").unwrap();
        assert_eq!(range.find_lowest_placement_in_range(2), Some(50));
        assert_eq!(range.find_lowest_placement_in_range(0), Some(60));
        // C#:4 is below the range and C#:5 above it
        assert_eq!(range.find_lowest_placement_in_range(1), None);
        let narrow = PitchRange::new(60, 61).unwrap();
        assert_eq!(narrow.find_lowest_placement_in_range(5), None);
    }

    #[test]
    fn test_serde_validates() {
        let json = r#"{"start_index": 24, "end_index": 96}"#;
        let range: PitchRange = serde_json::from_str(json).unwrap();
        assert_eq!(range, PitchRange::new(24, 96).unwrap());
        let bad = r#"{"start_index": 50, "end_index": 20}"#;
        assert!(serde_json::from_str::<PitchRange>(bad).is_err());
    }
}
