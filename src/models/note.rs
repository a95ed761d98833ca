//! Notes, actors and lines
//!
//! A `Note` is a value: a pitch with a rhythmic footprint (base duration as
//! a fraction of a whole note, plus augmentation dots). An `Actor` is a melody
//! position: the note it was written with plus an identity that survives
//! cloning, so solver results can be projected back onto the line.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use num_rational::{Rational32, Rational64};
use serde::{Deserialize, Serialize};

use super::diatonic_pitch::DiatonicPitch;
use crate::error::{TonalError, TonalResult};

/// Re-export Rational for duration calculations
pub type Rational = Rational32;

/// Base note value as a fraction of a whole note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Duration(Rational);

impl Duration {
    pub const WHOLE: Duration = Duration(Rational::new_raw(1, 1));
    pub const HALF: Duration = Duration(Rational::new_raw(1, 2));
    pub const QUARTER: Duration = Duration(Rational::new_raw(1, 4));
    pub const EIGHTH: Duration = Duration(Rational::new_raw(1, 8));
    pub const SIXTEENTH: Duration = Duration(Rational::new_raw(1, 16));

    /// A positive fraction of a whole note
    pub fn new(numer: i32, denom: i32) -> TonalResult<Self> {
        if numer <= 0 || denom <= 0 {
            return Err(TonalError::InvalidDuration(format!("{}/{}", numer, denom)));
        }
        Ok(Duration(Rational::new(numer, denom)))
    }

    pub fn value(&self) -> Rational {
        self.0
    }

    /// Length once `dots` augmentation dots are applied
    ///
    /// dotted = base * (2 - 1/2^dots)
    pub fn dotted(&self, dots: u8) -> TonalResult<Rational> {
        let too_long = || TonalError::InvalidDuration(format!("{} with {} dots", self, dots));
        let denom = 1i64.checked_shl(u32::from(dots)).filter(|d| *d > 0).ok_or_else(too_long)?;
        let factor = Rational64::new(2 * denom - 1, denom);
        checked_product(self.0, factor).ok_or_else(too_long)
    }
}

fn widen(value: Rational) -> Rational64 {
    Rational64::new_raw(i64::from(*value.numer()), i64::from(*value.denom()))
}

fn narrow(value: Rational64) -> Option<Rational> {
    Some(Rational::new_raw(
        i32::try_from(*value.numer()).ok()?,
        i32::try_from(*value.denom()).ok()?,
    ))
}

fn checked_product(value: Rational, factor: Rational64) -> Option<Rational> {
    let numer = i64::from(*value.numer()).checked_mul(*factor.numer())?;
    let denom = i64::from(*value.denom()).checked_mul(*factor.denom())?;
    narrow(Rational64::new(numer, denom))
}

/// `a + b`, or `None` when the reduced sum does not fit a `Rational`
pub(crate) fn checked_sum(a: Rational, b: Rational) -> Option<Rational> {
    narrow(widen(a) + widen(b))
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0.numer(), self.0.denom())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub pitch: DiatonicPitch,
    pub base_duration: Duration,
    pub num_dots: u8,
}

impl Note {
    pub fn new(pitch: DiatonicPitch, base_duration: Duration, num_dots: u8) -> Self {
        Self {
            pitch,
            base_duration,
            num_dots,
        }
    }

    /// Same rhythmic footprint as `self`, different pitch
    pub fn with_pitch(&self, pitch: DiatonicPitch) -> Self {
        Self { pitch, ..*self }
    }

    pub fn duration(&self) -> TonalResult<Rational> {
        self.base_duration.dotted(self.num_dots)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}{})", self.pitch, self.base_duration, ".".repeat(self.num_dots as usize))
    }
}

static NEXT_ACTOR_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// A process-unique identity
    pub fn next() -> Self {
        ActorId(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A melody position, identified independently of the note it holds
///
/// Equality and hashing use the identity only.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    id: ActorId,
    note: Note,
}

impl Actor {
    pub fn new(note: Note) -> Self {
        Self {
            id: ActorId::next(),
            note,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    /// The note this position was written with
    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn base_duration(&self) -> Duration {
        self.note.base_duration
    }

    pub fn num_dots(&self) -> u8 {
        self.note.num_dots
    }

    /// A note for this position at `pitch`, keeping the written rhythm
    pub fn realize(&self, pitch: DiatonicPitch) -> Note {
        self.note.with_pitch(pitch)
    }
}

impl PartialEq for Actor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Actor {}

impl std::hash::Hash for Actor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note, self.id)
    }
}

/// An ordered melodic line
#[derive(Debug, Clone, Default)]
pub struct Line {
    notes: Vec<Actor>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line of undotted notes of one duration from pitch text
    pub fn from_pitches(pitches: &[&str], duration: Duration) -> TonalResult<Self> {
        let mut line = Line::new();
        for text in pitches {
            line.push(Note::new(DiatonicPitch::parse(text)?, duration, 0));
        }
        Ok(line)
    }

    /// Append a note as a new actor and return it
    pub fn push(&mut self, note: Note) -> Actor {
        let actor = Actor::new(note);
        self.notes.push(actor);
        actor
    }

    pub fn notes(&self) -> &[Actor] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Replace the pitch of the actor with `id`; false if it is not on the line
    pub fn set_pitch(&mut self, id: ActorId, pitch: DiatonicPitch) -> bool {
        match self.notes.iter_mut().find(|a| a.id == id) {
            Some(actor) => {
                actor.note.pitch = pitch;
                true
            }
            None => false,
        }
    }

    /// Onset of each note as a fraction of a whole note from the line start
    pub fn onsets(&self) -> TonalResult<Vec<Rational>> {
        let mut position = Rational::from_integer(0);
        let mut onsets = Vec::with_capacity(self.notes.len());
        for actor in &self.notes {
            onsets.push(position);
            position = checked_sum(position, actor.note.duration()?).ok_or_else(|| {
                TonalError::InvalidDuration(format!("line overruns at {}", actor))
            })?;
        }
        Ok(onsets)
    }

    pub fn pitch_string(&self) -> String {
        self.notes
            .iter()
            .map(|a| a.note.pitch.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_durations() {
        assert_eq!(Duration::QUARTER.dotted(0), Ok(Rational::new(1, 4)));
        assert_eq!(Duration::QUARTER.dotted(1), Ok(Rational::new(3, 8)));
        assert_eq!(Duration::HALF.dotted(2), Ok(Rational::new(7, 8)));
    }

    #[test]
    fn test_duration_domain() {
        assert_eq!(Duration::new(3, 8).unwrap().value(), Rational::new(3, 8));
        assert!(matches!(Duration::new(1, 0), Err(TonalError::InvalidDuration(_))));
        assert!(matches!(Duration::new(0, 4), Err(TonalError::InvalidDuration(_))));
        assert!(matches!(Duration::new(-1, 4), Err(TonalError::InvalidDuration(_))));

        assert!(Duration::QUARTER.dotted(20).is_ok());
        assert!(matches!(Duration::QUARTER.dotted(31), Err(TonalError::InvalidDuration(_))));
        assert!(matches!(Duration::QUARTER.dotted(u8::MAX), Err(TonalError::InvalidDuration(_))));
    }

    #[test]
    fn test_overlong_note_is_an_error() {
        let mut line = Line::new();
        line.push(Note::new(DiatonicPitch::parse("C:5").unwrap(), Duration::QUARTER, 40));
        assert!(matches!(line.onsets(), Err(TonalError::InvalidDuration(_))));
    }

    #[test]
    fn test_actor_identity() {
        let note = Note::new(DiatonicPitch::parse("C:5").unwrap(), Duration::QUARTER, 0);
        let a = Actor::new(note);
        let b = Actor::new(note);
        assert_ne!(a, b);
        let copy = a;
        assert_eq!(copy, a);
    }

    #[test]
    fn test_line_onsets_and_set_pitch() {
        let mut line = Line::from_pitches(&["C:5", "D:5", "E:5"], Duration::QUARTER).unwrap();
        assert_eq!(
            line.onsets().unwrap(),
            vec![Rational::new(0, 1), Rational::new(1, 4), Rational::new(1, 2)]
        );
        let id = line.notes()[1].id();
        assert!(line.set_pitch(id, DiatonicPitch::parse("F#:5").unwrap()));
        assert_eq!(line.pitch_string(), "C:5 F#:5 E:5");
    }
}
