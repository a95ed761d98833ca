//! Equality and distinctness across a group of actors
//!
//! Pitches are compared by sound, so B#:4 and C:5 count as equal.

use super::{actor_position, check_distinct, policy_of, scale_notes, Constraint};
use crate::error::Result;
use crate::models::{Actor, DiatonicPitch, Note};
use crate::solver::PMap;

/// Pitches assigned to the group's actors other than `actor`
fn other_pitches(actors: &[Actor], p_map: &PMap, actor: &Actor) -> Vec<DiatonicPitch> {
    actors
        .iter()
        .filter(|a| *a != actor)
        .filter_map(|a| p_map.pitch(a))
        .collect()
}

/// Every actor of the group sounds the same pitch
#[derive(Debug, Clone)]
pub struct EqualPitchConstraint {
    actors: Vec<Actor>,
}

impl EqualPitchConstraint {
    pub fn new(actors: Vec<Actor>) -> Result<Self> {
        check_distinct("EqualPitch", &actors)?;
        Ok(Self { actors })
    }
}

impl Constraint for EqualPitchConstraint {
    fn name(&self) -> &'static str {
        "EqualPitch"
    }

    fn actors(&self) -> &[Actor] {
        &self.actors
    }

    fn values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>> {
        actor_position(self, actor)?;
        let policy = policy_of(p_map, actor)?;
        match other_pitches(&self.actors, p_map, actor).first() {
            Some(pitch) if policy.pitch_range().is_pitch_in_range(pitch) => {
                Ok(vec![actor.realize(*pitch)])
            }
            Some(_) => Ok(Vec::new()),
            None => Ok(scale_notes(policy, actor)),
        }
    }

    fn verify(&self, p_map: &PMap) -> bool {
        let assigned: Vec<DiatonicPitch> = self.actors.iter().filter_map(|a| p_map.pitch(a)).collect();
        assigned.windows(2).all(|pair| pair[0].is_enharmonic(&pair[1]))
    }

    fn clone_with(&self, actors: &[Actor]) -> Result<Box<dyn Constraint>> {
        Ok(Box::new(Self::new(actors.to_vec())?))
    }
}

/// No two actors of the group sound the same pitch
#[derive(Debug, Clone)]
pub struct NotEqualPitchConstraint {
    actors: Vec<Actor>,
}

impl NotEqualPitchConstraint {
    pub fn new(actors: Vec<Actor>) -> Result<Self> {
        check_distinct("NotEqualPitch", &actors)?;
        Ok(Self { actors })
    }
}

impl Constraint for NotEqualPitchConstraint {
    fn name(&self) -> &'static str {
        "NotEqualPitch"
    }

    fn actors(&self) -> &[Actor] {
        &self.actors
    }

    fn values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>> {
        actor_position(self, actor)?;
        let policy = policy_of(p_map, actor)?;
        let taken = other_pitches(&self.actors, p_map, actor);
        let mut notes = scale_notes(policy, actor);
        notes.retain(|note| !taken.iter().any(|p| p.is_enharmonic(&note.pitch)));
        Ok(notes)
    }

    fn verify(&self, p_map: &PMap) -> bool {
        let assigned: Vec<DiatonicPitch> = self.actors.iter().filter_map(|a| p_map.pitch(a)).collect();
        assigned
            .iter()
            .enumerate()
            .all(|(i, p)| !assigned[..i].iter().any(|q| q.is_enharmonic(p)))
    }

    fn clone_with(&self, actors: &[Actor]) -> Result<Box<dyn Constraint>> {
        Ok(Box::new(Self::new(actors.to_vec())?))
    }
}
