//! Diatonic tones: a letter plus an augmentation
//!
//! Tones are spelled symbolically, so C# and Db are different tones that
//! share a placement (their chromatic position within the octave).
//!
//! Every spelling from triple-flat to triple-sharp is parsed once into a
//! process-wide cache; the enharmonic table lists, per placement, the
//! spellings that need at most two accidentals.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{TonalError, TonalResult};

pub const MIN_AUGMENTATION: i32 = -3;
pub const MAX_AUGMENTATION: i32 = 3;

/// Diatonic letter names in scale order starting at C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Diatonic index, C = 0 through B = 6
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Letter at a diatonic index, wrapping around the octave
    pub fn from_index(index: i32) -> Letter {
        Letter::ALL[index.rem_euclid(7) as usize]
    }

    /// Semitones above C of the natural form of this letter
    pub fn semitones(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    /// Case-insensitive letter lookup
    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

/// A letter with an augmentation between triple-flat and triple-sharp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiatonicTone {
    letter: Letter,
    augmentation: i8,
}

static TONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Ga-g])(bbb|bb|b|###|##|#)?$").expect("tone pattern"));

static TONE_CACHE: Lazy<HashMap<String, DiatonicTone>> = Lazy::new(|| {
    let mut cache = HashMap::new();
    for letter in Letter::ALL {
        for augmentation in MIN_AUGMENTATION..=MAX_AUGMENTATION {
            let tone = DiatonicTone {
                letter,
                augmentation: augmentation as i8,
            };
            cache.insert(tone.to_string(), tone);
        }
    }
    cache
});

static ENHARMONICS: Lazy<Vec<Vec<DiatonicTone>>> = Lazy::new(|| {
    let mut table = vec![Vec::new(); 12];
    for letter in Letter::ALL {
        for augmentation in -2..=2 {
            let tone = DiatonicTone {
                letter,
                augmentation,
            };
            table[tone.placement() as usize].push(tone);
        }
    }
    table
});

impl DiatonicTone {
    /// Build a tone from a letter and an augmentation in -3..=3
    pub fn new(letter: Letter, augmentation: i32) -> TonalResult<Self> {
        if !(MIN_AUGMENTATION..=MAX_AUGMENTATION).contains(&augmentation) {
            return Err(TonalError::Spelling(format!(
                "{} with augmentation {}",
                letter.symbol(),
                augmentation
            )));
        }
        Ok(Self {
            letter,
            augmentation: augmentation as i8,
        })
    }

    pub fn natural(letter: Letter) -> Self {
        Self {
            letter,
            augmentation: 0,
        }
    }

    /// Parse tone text such as "C", "F#", "Bbb" (letter is case-insensitive)
    pub fn parse(text: &str) -> TonalResult<Self> {
        let trimmed = text.trim();
        let captures = TONE_PATTERN
            .captures(trimmed)
            .ok_or_else(|| TonalError::InvalidTone(text.to_string()))?;
        let letter = captures[1].to_ascii_uppercase();
        let accidentals = captures.get(2).map_or("", |m| m.as_str());
        TONE_CACHE
            .get(&format!("{}{}", letter, accidentals))
            .copied()
            .ok_or_else(|| TonalError::InvalidTone(text.to_string()))
    }

    /// Spell `placement` using `letter`, choosing the smallest augmentation
    pub fn with_letter_and_placement(letter: Letter, placement: i32) -> TonalResult<Self> {
        let mut augmentation = (placement - letter.semitones()).rem_euclid(12);
        if augmentation > 6 {
            augmentation -= 12;
        }
        Self::new(letter, augmentation)
    }

    pub fn letter(&self) -> Letter {
        self.letter
    }

    /// Augmentation offset, flats negative
    pub fn augmentation(&self) -> i32 {
        self.augmentation as i32
    }

    pub fn diatonic_index(&self) -> i32 {
        self.letter.index()
    }

    /// Semitones above C; Cb is -1 and B# is 12
    pub fn tonal_offset(&self) -> i32 {
        self.letter.semitones() + self.augmentation()
    }

    /// Chromatic position within the octave, 0..=11
    pub fn placement(&self) -> i32 {
        self.tonal_offset().rem_euclid(12)
    }

    pub fn augmentation_symbol(&self) -> &'static str {
        match self.augmentation {
            -3 => "bbb",
            -2 => "bb",
            -1 => "b",
            1 => "#",
            2 => "##",
            3 => "###",
            _ => "",
        }
    }

    /// Spellings of this tone's placement with at most two accidentals
    pub fn enharmonics(&self) -> &'static [DiatonicTone] {
        enharmonics_of(self.placement())
    }

    pub fn is_enharmonic(&self, other: &DiatonicTone) -> bool {
        self.placement() == other.placement()
    }
}

/// Fixed enharmonic list for a placement, ordered by letter
pub fn enharmonics_of(placement: i32) -> &'static [DiatonicTone] {
    &ENHARMONICS[placement.rem_euclid(12) as usize]
}

impl fmt::Display for DiatonicTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter.symbol(), self.augmentation_symbol())
    }
}

impl FromStr for DiatonicTone {
    type Err = TonalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiatonicTone::parse(s)
    }
}

impl Serialize for DiatonicTone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DiatonicTone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        DiatonicTone::parse(&text).map_err(serde::de::Error::custom)
    }
}
