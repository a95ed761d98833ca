//! Tertian chords named relative to a tonality
//!
//! Template text is `t` followed by a root and an optional quality:
//!
//! - `tV`, `tIV`, `tii` - roman numeral scale degree; without a quality the
//!   chord is the diatonic triad stacked in thirds within the key
//! - `tF#`, `tBb` - explicit root tone; defaults to a major triad
//! - `tVDom7`, `tCMin`, `tIISus4` - explicit quality, built from the root by
//!   fixed intervals
//!
//! Roman numerals are case-insensitive; the key decides the chord's quality
//! unless one is given.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::diatonic_tone::DiatonicTone;
use super::interval::Interval;
use super::tonality::Tonality;
use crate::error::{TonalError, TonalResult};

const ROMAN_NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    Maj,
    Min,
    Dim,
    Aug,
    Maj7,
    Dom7,
    Min7,
    HalfDim7,
    Dim7,
    Sus2,
    Sus4,
}

impl ChordQuality {
    /// Intervals above the root, excluding the root itself
    fn intervals(&self) -> &'static [&'static str] {
        match self {
            ChordQuality::Maj => &["M:3", "P:5"],
            ChordQuality::Min => &["m:3", "P:5"],
            ChordQuality::Dim => &["m:3", "d:5"],
            ChordQuality::Aug => &["M:3", "A:5"],
            ChordQuality::Maj7 => &["M:3", "P:5", "M:7"],
            ChordQuality::Dom7 => &["M:3", "P:5", "m:7"],
            ChordQuality::Min7 => &["m:3", "P:5", "m:7"],
            ChordQuality::HalfDim7 => &["m:3", "d:5", "m:7"],
            ChordQuality::Dim7 => &["m:3", "d:5", "d:7"],
            ChordQuality::Sus2 => &["M:2", "P:5"],
            ChordQuality::Sus4 => &["P:4", "P:5"],
        }
    }

    fn from_suffix(suffix: &str) -> Option<ChordQuality> {
        match suffix {
            "Maj" => Some(ChordQuality::Maj),
            "Min" => Some(ChordQuality::Min),
            "Dim" => Some(ChordQuality::Dim),
            "Aug" => Some(ChordQuality::Aug),
            "Maj7" => Some(ChordQuality::Maj7),
            "Dom7" => Some(ChordQuality::Dom7),
            "Min7" => Some(ChordQuality::Min7),
            "HalfDim7" => Some(ChordQuality::HalfDim7),
            "Dim7" => Some(ChordQuality::Dim7),
            "Sus2" => Some(ChordQuality::Sus2),
            "Sus4" => Some(ChordQuality::Sus4),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordRoot {
    /// 0-based scale degree of the harmonic context's tonality
    Degree(usize),
    Tone(DiatonicTone),
}

static CHORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^t(?:(VII|VI|V|IV|III|II|I|vii|vi|v|iv|iii|ii|i)|([A-G](?:bb|b|##|#)?))(Maj7|Dom7|Min7|HalfDim7|Dim7|Maj|Min|Dim|Aug|Sus2|Sus4)?$",
    )
    .expect("chord pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChordTemplate {
    root: ChordRoot,
    quality: Option<ChordQuality>,
}

impl ChordTemplate {
    pub fn new(root: ChordRoot, quality: Option<ChordQuality>) -> Self {
        Self { root, quality }
    }

    pub fn parse(text: &str) -> TonalResult<Self> {
        let captures = CHORD_PATTERN
            .captures(text.trim())
            .ok_or_else(|| TonalError::InvalidChord(text.to_string()))?;
        let root = if let Some(numeral) = captures.get(1) {
            let upper = numeral.as_str().to_uppercase();
            let degree = ROMAN_NUMERALS
                .iter()
                .position(|r| *r == upper)
                .ok_or_else(|| TonalError::InvalidChord(text.to_string()))?;
            ChordRoot::Degree(degree)
        } else {
            ChordRoot::Tone(DiatonicTone::parse(&captures[2])?)
        };
        let quality = captures.get(3).and_then(|m| ChordQuality::from_suffix(m.as_str()));
        Ok(Self { root, quality })
    }

    pub fn root(&self) -> ChordRoot {
        self.root
    }

    pub fn quality(&self) -> Option<ChordQuality> {
        self.quality
    }

    /// Realize the template's tones in a tonality
    pub fn create_chord(&self, tonality: &Tonality) -> TonalResult<Chord> {
        let root_tone = match self.root {
            ChordRoot::Degree(degree) => *tonality.tones().get(degree).ok_or_else(|| {
                TonalError::InvalidChord(format!(
                    "{} has no degree {} in {}",
                    self, ROMAN_NUMERALS[degree.min(6)], tonality
                ))
            })?,
            ChordRoot::Tone(tone) => tone,
        };

        let tones = match (self.root, self.quality) {
            (ChordRoot::Degree(degree), None) => {
                let key_tones = tonality.tones();
                [0, 2, 4]
                    .iter()
                    .map(|step| key_tones[(degree + step) % key_tones.len()])
                    .collect()
            }
            (_, quality) => {
                let quality = quality.unwrap_or(ChordQuality::Maj);
                let mut tones = vec![root_tone];
                for text in quality.intervals() {
                    tones.push(Interval::parse(text)?.end_tone(&root_tone)?);
                }
                tones
            }
        };

        Ok(Chord {
            template: *self,
            tones,
        })
    }
}

impl fmt::Display for ChordTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            ChordRoot::Degree(degree) => write!(f, "t{}", ROMAN_NUMERALS[degree.min(6)])?,
            ChordRoot::Tone(tone) => write!(f, "t{}", tone)?,
        }
        if let Some(quality) = self.quality {
            write!(f, "{:?}", quality)?;
        }
        Ok(())
    }
}

impl FromStr for ChordTemplate {
    type Err = TonalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChordTemplate::parse(s)
    }
}

/// A realized chord: root first, then the stacked tones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    template: ChordTemplate,
    tones: Vec<DiatonicTone>,
}

impl Chord {
    pub fn template(&self) -> &ChordTemplate {
        &self.template
    }

    pub fn root_tone(&self) -> DiatonicTone {
        self.tones[0]
    }

    pub fn tones(&self) -> &[DiatonicTone] {
        &self.tones
    }

    /// Membership by placement, so enharmonic spellings count
    pub fn contains_placement(&self, placement: i32) -> bool {
        self.tones.iter().any(|t| t.placement() == placement)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.tones.iter().map(|t| t.to_string()).collect();
        write!(f, "{} [{}]", self.template, names.join(", "))
    }
}
