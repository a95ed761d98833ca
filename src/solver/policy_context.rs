//! Policy contexts: the harmonic context and pitch range attached to an actor

use std::fmt;

use crate::error::TonalResult;
use crate::models::pitch_scale::compute_scale_pitches;
use crate::models::{DiatonicPitch, HarmonicContext, PitchRange, Tonality};

/// Immutable (harmonic context, pitch range) pair
///
/// The in-scale pitches of the range are enumerated once here; every
/// constraint that needs "all scale pitches for v" reads them from the
/// context instead of walking the scale again.
#[derive(Debug, Clone)]
pub struct PolicyContext {
    harmonic_context: HarmonicContext,
    pitch_range: PitchRange,
    scale_pitches: Vec<DiatonicPitch>,
}

impl PolicyContext {
    pub fn new(harmonic_context: HarmonicContext, pitch_range: PitchRange) -> TonalResult<Self> {
        let scale_pitches = compute_scale_pitches(harmonic_context.tonality(), &pitch_range)?;
        Ok(Self {
            harmonic_context,
            pitch_range,
            scale_pitches,
        })
    }

    pub fn harmonic_context(&self) -> &HarmonicContext {
        &self.harmonic_context
    }

    pub fn tonality(&self) -> &Tonality {
        self.harmonic_context.tonality()
    }

    pub fn pitch_range(&self) -> &PitchRange {
        &self.pitch_range
    }

    /// Ascending in-scale pitches of the tonality inside the range
    pub fn scale_pitches(&self) -> &[DiatonicPitch] {
        &self.scale_pitches
    }
}

impl PartialEq for PolicyContext {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for PolicyContext {}

impl fmt::Display for PolicyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p.c.[{}, {}]", self.harmonic_context, self.pitch_range)
    }
}
