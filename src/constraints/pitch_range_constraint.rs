use super::{actor_position, check_distinct, policy_of, scale_notes, Constraint};
use crate::error::Result;
use crate::models::{Actor, Note, PitchRange};
use crate::solver::PMap;

/// Every actor of the group stays inside a sub-range
#[derive(Debug, Clone)]
pub struct PitchRangeConstraint {
    actors: Vec<Actor>,
    range: PitchRange,
}

impl PitchRangeConstraint {
    pub fn new(actors: Vec<Actor>, range: PitchRange) -> Result<Self> {
        check_distinct("PitchRange", &actors)?;
        Ok(Self { actors, range })
    }

    pub fn range(&self) -> &PitchRange {
        &self.range
    }
}

impl Constraint for PitchRangeConstraint {
    fn name(&self) -> &'static str {
        "PitchRange"
    }

    fn actors(&self) -> &[Actor] {
        &self.actors
    }

    fn values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>> {
        actor_position(self, actor)?;
        let mut notes = scale_notes(policy_of(p_map, actor)?, actor);
        notes.retain(|note| self.range.is_pitch_in_range(&note.pitch));
        Ok(notes)
    }

    fn verify(&self, p_map: &PMap) -> bool {
        self.actors
            .iter()
            .filter_map(|a| p_map.pitch(a))
            .all(|p| self.range.is_pitch_in_range(&p))
    }

    fn clone_with(&self, actors: &[Actor]) -> Result<Box<dyn Constraint>> {
        Ok(Box::new(Self::new(actors.to_vec(), self.range)?))
    }
}
