//! Diatonic intervals
//!
//! An interval is a count of letter steps together with a count of semitones.
//! The quality (major, minor, perfect, diminished, augmented) is derived from
//! the two, so spelling arithmetic works directly on steps and semitones:
//! applying an interval to a tone moves the letter by the step count and
//! takes whatever accidental is needed to land on the semitone count.

use std::fmt;
use std::ops::{Add, Neg};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::chromatic::MAX_OCTAVE;
use super::diatonic_pitch::DiatonicPitch;
use super::diatonic_tone::{DiatonicTone, Letter};
use crate::error::{TonalError, TonalResult};

/// Semitones of the major or perfect interval for each letter step 0..=6
const REFERENCE_SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Widest span between two parseable pitches, in letter steps
const MAX_LETTER_STEPS: i32 = 7 * 2 * MAX_OCTAVE + 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalQuality {
    DoublyDiminished,
    Diminished,
    Minor,
    Major,
    Perfect,
    Augmented,
    DoublyAugmented,
}

impl IntervalQuality {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            IntervalQuality::DoublyDiminished => "dd",
            IntervalQuality::Diminished => "d",
            IntervalQuality::Minor => "m",
            IntervalQuality::Major => "M",
            IntervalQuality::Perfect => "P",
            IntervalQuality::Augmented => "A",
            IntervalQuality::DoublyAugmented => "AA",
        }
    }

    pub fn from_abbreviation(text: &str) -> Option<IntervalQuality> {
        match text {
            "dd" => Some(IntervalQuality::DoublyDiminished),
            "d" => Some(IntervalQuality::Diminished),
            "m" => Some(IntervalQuality::Minor),
            "M" => Some(IntervalQuality::Major),
            "P" => Some(IntervalQuality::Perfect),
            "A" => Some(IntervalQuality::Augmented),
            "AA" => Some(IntervalQuality::DoublyAugmented),
            _ => None,
        }
    }
}

/// Unisons, fourths and fifths (and their compounds) take perfect qualities
fn is_perfect_class(letter_steps: i32) -> bool {
    matches!(letter_steps.rem_euclid(7), 0 | 3 | 4)
}

/// Semitone adjustment of a quality relative to the major/perfect reference
fn quality_adjustment(quality: IntervalQuality, perfect_class: bool) -> Option<i32> {
    use IntervalQuality::*;
    match (quality, perfect_class) {
        (DoublyDiminished, true) => Some(-2),
        (Diminished, true) => Some(-1),
        (Perfect, true) => Some(0),
        (Augmented, true) => Some(1),
        (DoublyAugmented, true) => Some(2),
        (DoublyDiminished, false) => Some(-3),
        (Diminished, false) => Some(-2),
        (Minor, false) => Some(-1),
        (Major, false) => Some(0),
        (Augmented, false) => Some(1),
        (DoublyAugmented, false) => Some(2),
        _ => None,
    }
}

fn reference_semitones(letter_steps: i32) -> i32 {
    REFERENCE_SEMITONES[letter_steps.rem_euclid(7) as usize] + 12 * letter_steps.div_euclid(7)
}

static INTERVAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-)?(dd|d|m|M|P|AA|A):(\d+)$").expect("interval pattern"));

/// A signed interval: letter steps and semitones move in the same direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    letter_steps: i32,
    semitones: i32,
}

impl Interval {
    /// Ascending interval from its musical number (1 = unison) and quality
    pub fn new(number: i32, quality: IntervalQuality) -> TonalResult<Self> {
        if !(1..=MAX_LETTER_STEPS + 1).contains(&number) {
            return Err(TonalError::InvalidInterval(format!(
                "interval number {} must lie in 1..={}",
                number,
                MAX_LETTER_STEPS + 1
            )));
        }
        let letter_steps = number - 1;
        let adjustment = quality_adjustment(quality, is_perfect_class(letter_steps))
            .ok_or_else(|| {
                TonalError::InvalidInterval(format!("{}:{}", quality.abbreviation(), number))
            })?;
        let semitones = reference_semitones(letter_steps) + adjustment;
        if semitones < 0 {
            return Err(TonalError::InvalidInterval(format!(
                "{}:{}",
                quality.abbreviation(),
                number
            )));
        }
        Ok(Self {
            letter_steps,
            semitones,
        })
    }

    /// Build from raw steps and semitones, checking that a quality exists
    pub fn from_steps(letter_steps: i32, semitones: i32) -> TonalResult<Self> {
        if letter_steps.unsigned_abs() > MAX_LETTER_STEPS.unsigned_abs() {
            return Err(TonalError::InvalidInterval(format!(
                "{} letter steps exceeds {}",
                letter_steps, MAX_LETTER_STEPS
            )));
        }
        let interval = Self {
            letter_steps,
            semitones,
        };
        interval.quality()?;
        Ok(interval)
    }

    /// Parse text such as "M:2", "P:5" or "-m:3"
    pub fn parse(text: &str) -> TonalResult<Self> {
        let captures = INTERVAL_PATTERN
            .captures(text.trim())
            .ok_or_else(|| TonalError::InvalidInterval(text.to_string()))?;
        let quality = IntervalQuality::from_abbreviation(&captures[2])
            .ok_or_else(|| TonalError::InvalidInterval(text.to_string()))?;
        let number = captures[3]
            .parse::<i32>()
            .map_err(|_| TonalError::InvalidInterval(text.to_string()))?;
        let interval = Self::new(number, quality)?;
        Ok(if captures.get(1).is_some() {
            -interval
        } else {
            interval
        })
    }

    /// Interval from one pitch up (or down) to another
    pub fn between_pitches(from: &DiatonicPitch, to: &DiatonicPitch) -> TonalResult<Self> {
        Self::from_steps(
            to.diatonic_distance() - from.diatonic_distance(),
            to.chromatic_distance() - from.chromatic_distance(),
        )
    }

    /// Ascending interval within one octave from one tone to another
    pub fn between_tones(from: &DiatonicTone, to: &DiatonicTone) -> TonalResult<Self> {
        let letter_steps = (to.diatonic_index() - from.diatonic_index()).rem_euclid(7);
        let wraps = from.diatonic_index() + letter_steps >= 7;
        let semitones =
            to.tonal_offset() + if wraps { 12 } else { 0 } - from.tonal_offset();
        Self::from_steps(letter_steps, semitones)
    }

    pub fn letter_steps(&self) -> i32 {
        self.letter_steps
    }

    pub fn semitones(&self) -> i32 {
        self.semitones
    }

    /// Musical number of the interval, negative when descending
    pub fn number(&self) -> i32 {
        if self.is_descending() {
            self.letter_steps - 1
        } else {
            self.letter_steps + 1
        }
    }

    pub fn is_descending(&self) -> bool {
        self.letter_steps < 0 || (self.letter_steps == 0 && self.semitones < 0)
    }

    pub fn quality(&self) -> TonalResult<IntervalQuality> {
        let (steps, semitones) = if self.is_descending() {
            (-self.letter_steps, -self.semitones)
        } else {
            (self.letter_steps, self.semitones)
        };
        let difference = semitones - reference_semitones(steps);
        let perfect = is_perfect_class(steps);
        use IntervalQuality::*;
        let quality = match (difference, perfect) {
            (-2, true) => Some(DoublyDiminished),
            (-1, true) => Some(Diminished),
            (0, true) => Some(Perfect),
            (1, true) => Some(Augmented),
            (2, true) => Some(DoublyAugmented),
            (-3, false) => Some(DoublyDiminished),
            (-2, false) => Some(Diminished),
            (-1, false) => Some(Minor),
            (0, false) => Some(Major),
            (1, false) => Some(Augmented),
            (2, false) => Some(DoublyAugmented),
            _ => None,
        };
        quality.ok_or_else(|| {
            TonalError::InvalidInterval(format!(
                "{} letter steps over {} semitones",
                self.letter_steps, self.semitones
            ))
        })
    }

    /// The tone reached by applying this interval to `tone`
    pub fn end_tone(&self, tone: &DiatonicTone) -> TonalResult<DiatonicTone> {
        let target_index = tone.diatonic_index() + self.letter_steps;
        let letter = Letter::from_index(target_index);
        let natural = letter.semitones() + 12 * target_index.div_euclid(7);
        DiatonicTone::new(letter, tone.tonal_offset() + self.semitones - natural)
    }

    /// The pitch reached by applying this interval to `pitch`
    pub fn end_pitch(&self, pitch: &DiatonicPitch) -> TonalResult<DiatonicPitch> {
        let target = pitch.diatonic_distance() + self.letter_steps;
        let octave = target.div_euclid(7);
        let letter = Letter::from_index(target);
        let natural = 12 * octave + letter.semitones();
        let tone = DiatonicTone::new(letter, pitch.chromatic_distance() + self.semitones - natural)?;
        Ok(DiatonicPitch::new(octave, tone))
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Interval) -> Interval {
        Interval {
            letter_steps: self.letter_steps + rhs.letter_steps,
            semitones: self.semitones + rhs.semitones,
        }
    }
}

impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        Interval {
            letter_steps: -self.letter_steps,
            semitones: -self.semitones,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_descending() { "-" } else { "" };
        match self.quality() {
            Ok(quality) => write!(
                f,
                "{}{}:{}",
                sign,
                quality.abbreviation(),
                self.number().abs()
            ),
            Err(_) => write!(f, "[{} steps, {} semitones]", self.letter_steps, self.semitones),
        }
    }
}

impl FromStr for Interval {
    type Err = TonalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(text: &str) -> DiatonicTone {
        DiatonicTone::parse(text).unwrap()
    }

    fn pitch(text: &str) -> DiatonicPitch {
        DiatonicPitch::parse(text).unwrap()
    }

    #[test]
    fn test_semitones_by_quality() {
        assert_eq!(Interval::parse("P:1").unwrap().semitones(), 0);
        assert_eq!(Interval::parse("m:2").unwrap().semitones(), 1);
        assert_eq!(Interval::parse("A:2").unwrap().semitones(), 3);
        assert_eq!(Interval::parse("d:3").unwrap().semitones(), 2);
        assert_eq!(Interval::parse("A:4").unwrap().semitones(), 6);
        assert_eq!(Interval::parse("d:5").unwrap().semitones(), 6);
        assert_eq!(Interval::parse("P:8").unwrap().semitones(), 12);
        assert_eq!(Interval::parse("M:9").unwrap().semitones(), 14);
        assert!(Interval::parse("M:5").is_err());
        assert!(Interval::parse("P:3").is_err());
        assert!(Interval::parse("d:1").is_err());
    }

    #[test]
    fn test_end_tone_spelling() {
        let m3 = Interval::parse("m:3").unwrap();
        assert_eq!(m3.end_tone(&tone("A")).unwrap(), tone("C"));
        assert_eq!(m3.end_tone(&tone("F#")).unwrap(), tone("A"));
        let a2 = Interval::parse("A:2").unwrap();
        assert_eq!(a2.end_tone(&tone("Ab")).unwrap(), tone("B"));
        let m2 = Interval::parse("m:2").unwrap();
        assert_eq!(m2.end_tone(&tone("B")).unwrap(), tone("C"));
    }

    #[test]
    fn test_end_pitch_crosses_octave() {
        let m2 = Interval::parse("m:2").unwrap();
        assert_eq!(m2.end_pitch(&pitch("B:5")).unwrap(), pitch("C:6"));
        assert_eq!((-m2).end_pitch(&pitch("C:6")).unwrap(), pitch("B:5"));
        let p5 = Interval::parse("-P:5").unwrap();
        assert_eq!(p5.end_pitch(&pitch("D:5")).unwrap(), pitch("G:4"));
    }

    #[test]
    fn test_between_tones_and_pitches() {
        let interval = Interval::between_tones(&tone("B"), &tone("C")).unwrap();
        assert_eq!(interval.to_string(), "m:2");
        let interval = Interval::between_tones(&tone("C"), &tone("G")).unwrap();
        assert_eq!(interval.to_string(), "P:5");
        let interval = Interval::between_pitches(&pitch("E:5"), &pitch("C:5")).unwrap();
        assert_eq!(interval.to_string(), "-M:3");
    }

    #[test]
    fn test_composition() {
        let m3 = Interval::parse("m:3").unwrap();
        let maj3 = Interval::parse("M:3").unwrap();
        assert_eq!((m3 + maj3).to_string(), "P:5");
        assert_eq!((maj3 + -maj3).to_string(), "P:1");
    }

    #[test]
    fn test_spelling_overflow() {
        let aa = Interval::parse("AA:2").unwrap();
        assert!(aa.end_tone(&tone("B##")).is_err());
    }
}
