use super::{actor_position, check_arity, policy_of, realize_all, Constraint};
use crate::error::Result;
use crate::models::{Actor, DiatonicPitch, Note};
use crate::solver::PMap;

/// The actor sounds a tone of the chord in its harmonic context
#[derive(Debug, Clone)]
pub struct ChordalPitchConstraint {
    actors: [Actor; 1],
}

impl ChordalPitchConstraint {
    pub fn new(actor: Actor) -> Self {
        Self { actors: [actor] }
    }
}

impl Constraint for ChordalPitchConstraint {
    fn name(&self) -> &'static str {
        "ChordalPitch"
    }

    fn actors(&self) -> &[Actor] {
        &self.actors
    }

    fn values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>> {
        actor_position(self, actor)?;
        let policy = policy_of(p_map, actor)?;
        let chord = policy.harmonic_context().chord();
        let range = policy.pitch_range();

        let mut pitches: Vec<DiatonicPitch> = range
            .octaves()
            .flat_map(|octave| chord.tones().iter().map(move |&t| DiatonicPitch::new(octave, t)))
            .filter(|p| range.is_pitch_in_range(p))
            .collect();
        pitches.sort_by_key(|p| p.chromatic_distance());
        Ok(realize_all(actor, pitches))
    }

    fn verify(&self, p_map: &PMap) -> bool {
        let actor = &self.actors[0];
        match (p_map.pitch(actor), p_map.policy_context(actor)) {
            (Some(pitch), Some(policy)) => policy
                .harmonic_context()
                .chord()
                .contains_placement(pitch.tone().placement()),
            _ => false,
        }
    }

    fn clone_with(&self, actors: &[Actor]) -> Result<Box<dyn Constraint>> {
        check_arity(self.name(), 1, actors)?;
        Ok(Box::new(Self::new(actors[0])))
    }
}
