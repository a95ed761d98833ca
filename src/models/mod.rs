//! Tonal model
//!
//! Value types for chromatic arithmetic, diatonic tones and pitches,
//! intervals, modalities, tonalities, chords, pitch ranges and the notes
//! the solver assigns.

pub mod chromatic;
pub mod chord;
pub mod diatonic_pitch;
pub mod diatonic_tone;
pub mod harmonic_context;
pub mod interval;
pub mod modality;
pub mod note;
pub mod pitch_range;
pub mod pitch_scale;
pub mod tonality;

// Re-export commonly used types
pub use chord::{Chord, ChordQuality, ChordRoot, ChordTemplate};
pub use diatonic_pitch::DiatonicPitch;
pub use diatonic_tone::{DiatonicTone, Letter};
pub use harmonic_context::HarmonicContext;
pub use interval::{Interval, IntervalQuality};
pub use modality::{Modality, ModalityFactory, ModalityType};
pub use note::{Actor, ActorId, Duration, Line, Note, Rational};
pub use pitch_range::PitchRange;
pub use pitch_scale::PitchScale;
pub use tonality::Tonality;
