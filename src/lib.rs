//! Melodic constraint solver
//!
//! Generates melodic lines that satisfy a set of declared constraints. Each
//! position of a melody (an actor) carries a harmonic context and a pitch
//! range; constraints such as "chordal", "one scale step above" or "not equal
//! to" narrow the pitches an actor may take, and the solver searches for
//! complete assignments.
//!
//! - `models`: tones, pitches, intervals, modalities, tonalities, chords,
//!   pitch ranges, notes and lines
//! - `transposition`: key-aware spelling and scale-step arithmetic
//! - `constraints`: the constraint contract and catalog
//! - `solver`: parameter maps and the search engine

pub mod constraints;
pub mod error;
pub mod models;
pub mod solver;
pub mod transposition;

// Re-export commonly used types
pub use constraints::Constraint;
pub use error::{Result, SolverError, TonalError, TonalResult};
pub use models::{
    Actor, DiatonicPitch, DiatonicTone, Duration, HarmonicContext, Interval, Line, ModalityType,
    Note, PitchRange, Tonality,
};
pub use solver::{MelodicConstraintSolver, PMap, PolicyContext, SolveOptions, SolveResults};
