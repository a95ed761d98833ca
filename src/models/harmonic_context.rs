//! Harmonic contexts: the key and chord in force over a span of time

use std::fmt;

use super::chord::{Chord, ChordTemplate};
use super::modality::ModalityType;
use super::note::Rational;
use super::tonality::Tonality;
use crate::error::TonalResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarmonicContext {
    tonality: Tonality,
    chord: Chord,
    duration: Rational,
}

impl HarmonicContext {
    pub fn new(tonality: Tonality, chord: Chord, duration: Rational) -> Self {
        Self {
            tonality,
            chord,
            duration,
        }
    }

    /// Realize `template` in `tonality` and wrap both
    pub fn from_template(
        tonality: Tonality,
        template: &ChordTemplate,
        duration: Rational,
    ) -> TonalResult<Self> {
        let chord = template.create_chord(&tonality)?;
        Ok(Self::new(tonality, chord, duration))
    }

    /// Shorthand: ("G", Major, "tV", 1/1)
    pub fn create(
        root: &str,
        modality_type: ModalityType,
        chord_text: &str,
        duration: Rational,
    ) -> TonalResult<Self> {
        let tonality = Tonality::create(modality_type, root)?;
        Self::from_template(tonality, &ChordTemplate::parse(chord_text)?, duration)
    }

    pub fn tonality(&self) -> &Tonality {
        &self.tonality
    }

    pub fn chord(&self) -> &Chord {
        &self.chord
    }

    /// Span as a fraction of a whole note
    pub fn duration(&self) -> Rational {
        self.duration
    }
}

impl fmt::Display for HarmonicContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h.c.[{}, {}, {}/{}]",
            self.tonality,
            self.chord,
            self.duration.numer(),
            self.duration.denom()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_display() {
        let hc = HarmonicContext::create("G", ModalityType::Major, "tV", Rational::new(1, 1)).unwrap();
        assert_eq!(hc.chord().root_tone().to_string(), "D");
        assert_eq!(hc.to_string(), "h.c.[G-Major, tV [D, F#, A], 1/1]");
        assert!(HarmonicContext::create("G", ModalityType::Major, "tX", Rational::new(1, 1)).is_err());
    }
}
