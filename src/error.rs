//! Error types for the tonal model and the constraint solver
//!
//! Domain violations raised while building tones, pitches, intervals, ranges,
//! modalities and chords are `TonalError`s. The solver wraps them in
//! `SolverError` next to its own configuration and reference errors.
//!
//! An unsatisfiable constraint set is not an error: it shows up as an empty
//! list of full results.

use thiserror::Error;

/// Violations of the tonal model's value invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TonalError {
    /// Text that does not name a diatonic tone
    #[error("invalid diatonic tone: {0}")]
    InvalidTone(String),

    /// Text or values that do not form a diatonic pitch
    #[error("invalid diatonic pitch: {0}")]
    InvalidPitch(String),

    /// Interval number/quality combination that does not exist
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// Pitch range outside the chromatic scale or with start above end
    #[error("invalid pitch range: {0}")]
    InvalidRange(String),

    /// Modality type that has no interval specification
    #[error("undefined modality: {0}")]
    UndefinedModality(String),

    /// Chord template that cannot be parsed or realized
    #[error("invalid chord: {0}")]
    InvalidChord(String),

    /// Note length that is not a positive fraction of a whole note, or
    /// overflows once dots are applied
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// A computed tone would need more accidentals than the model allows
    #[error("cannot spell tone: {0}")]
    Spelling(String),
}

/// Errors surfaced by constraint construction and solving
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// Parameter map and constraints do not describe the same actors, or the
    /// constraint set itself is unusable
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An actor was handed to a constraint that is not defined over it
    #[error("invalid actor reference: {0}")]
    InvalidReference(String),

    /// No unassigned actor had candidate values on the first ordering pass
    #[error("policies insufficient for solution or parameter map is full")]
    InsufficientPolicies,

    #[error(transparent)]
    Tonal(#[from] TonalError),
}

pub type TonalResult<T> = std::result::Result<T, TonalError>;

pub type Result<T> = std::result::Result<T, SolverError>;
