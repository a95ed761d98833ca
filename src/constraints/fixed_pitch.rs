//! Constraints that pin an actor to one pitch or to a set of pitches

use super::{actor_position, check_arity, policy_of, realize_all, Constraint};
use crate::error::Result;
use crate::models::{Actor, DiatonicPitch, Note};
use crate::solver::PMap;
use crate::transposition::respell_pitch_in_key;

/// The actor sounds exactly `pitch`
///
/// The produced note uses the local key's spelling when the key has one
/// (C:5 in C# major is written B#:4); verification compares by sound.
#[derive(Debug, Clone)]
pub struct FixedPitchConstraint {
    actors: [Actor; 1],
    pitch: DiatonicPitch,
}

impl FixedPitchConstraint {
    pub fn new(actor: Actor, pitch: DiatonicPitch) -> Self {
        Self {
            actors: [actor],
            pitch,
        }
    }

    pub fn pitch(&self) -> DiatonicPitch {
        self.pitch
    }
}

impl Constraint for FixedPitchConstraint {
    fn name(&self) -> &'static str {
        "FixedPitch"
    }

    fn actors(&self) -> &[Actor] {
        &self.actors
    }

    fn values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>> {
        actor_position(self, actor)?;
        let policy = policy_of(p_map, actor)?;
        let pitch = respell_pitch_in_key(self.pitch, policy.tonality());
        if !policy.pitch_range().is_pitch_in_range(&pitch) {
            return Ok(Vec::new());
        }
        Ok(vec![actor.realize(pitch)])
    }

    fn verify(&self, p_map: &PMap) -> bool {
        p_map
            .pitch(&self.actors[0])
            .is_some_and(|p| p.is_enharmonic(&self.pitch))
    }

    fn clone_with(&self, actors: &[Actor]) -> Result<Box<dyn Constraint>> {
        check_arity(self.name(), 1, actors)?;
        Ok(Box::new(Self::new(actors[0], self.pitch)))
    }
}

/// The actor takes one of an explicit list of pitches
///
/// Like `FixedPitchConstraint`, candidates use the local key's spelling and
/// verification compares by sound.
#[derive(Debug, Clone)]
pub struct FixedPitchSelectSetConstraint {
    actors: [Actor; 1],
    pitches: Vec<DiatonicPitch>,
}

impl FixedPitchSelectSetConstraint {
    /// Duplicate pitches are dropped; the first occurrence keeps its place
    pub fn new(actor: Actor, pitches: Vec<DiatonicPitch>) -> Self {
        let mut distinct: Vec<DiatonicPitch> = Vec::with_capacity(pitches.len());
        for pitch in pitches {
            if !distinct.contains(&pitch) {
                distinct.push(pitch);
            }
        }
        Self {
            actors: [actor],
            pitches: distinct,
        }
    }

    pub fn pitches(&self) -> &[DiatonicPitch] {
        &self.pitches
    }
}

impl Constraint for FixedPitchSelectSetConstraint {
    fn name(&self) -> &'static str {
        "FixedPitchSelectSet"
    }

    fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// In-range members of the set, spelled in the local key
    fn values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>> {
        actor_position(self, actor)?;
        let policy = policy_of(p_map, actor)?;
        let mut spelled: Vec<DiatonicPitch> = Vec::with_capacity(self.pitches.len());
        for pitch in &self.pitches {
            let pitch = respell_pitch_in_key(*pitch, policy.tonality());
            if policy.pitch_range().is_pitch_in_range(&pitch) && !spelled.contains(&pitch) {
                spelled.push(pitch);
            }
        }
        Ok(realize_all(actor, spelled))
    }

    fn verify(&self, p_map: &PMap) -> bool {
        p_map
            .pitch(&self.actors[0])
            .is_some_and(|assigned| self.pitches.iter().any(|p| p.is_enharmonic(&assigned)))
    }

    fn clone_with(&self, actors: &[Actor]) -> Result<Box<dyn Constraint>> {
        check_arity(self.name(), 1, actors)?;
        Ok(Box::new(Self::new(actors[0], self.pitches.clone())))
    }
}
