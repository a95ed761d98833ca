use super::{actor_position, check_arity, policy_of, realize_all, Constraint};
use crate::error::Result;
use crate::models::{Actor, DiatonicPitch, DiatonicTone, Note};
use crate::solver::PMap;
use crate::transposition::respell_tone_in_key;

/// The actor sounds `tone` in any octave of its range
///
/// Candidates use the key's spelling of the tone when it has one, so Bbb in
/// C major yields A pitches; a tone foreign to the key is used as written.
#[derive(Debug, Clone)]
pub struct FixedToneConstraint {
    actors: [Actor; 1],
    tone: DiatonicTone,
}

impl FixedToneConstraint {
    pub fn new(actor: Actor, tone: DiatonicTone) -> Self {
        Self {
            actors: [actor],
            tone,
        }
    }

    pub fn tone(&self) -> DiatonicTone {
        self.tone
    }
}

impl Constraint for FixedToneConstraint {
    fn name(&self) -> &'static str {
        "FixedTone"
    }

    fn actors(&self) -> &[Actor] {
        &self.actors
    }

    fn values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>> {
        actor_position(self, actor)?;
        let policy = policy_of(p_map, actor)?;
        let tone = respell_tone_in_key(self.tone, policy.tonality());
        let range = policy.pitch_range();
        Ok(realize_all(
            actor,
            range
                .octaves()
                .map(|octave| DiatonicPitch::new(octave, tone))
                .filter(|p| range.is_pitch_in_range(p)),
        ))
    }

    fn verify(&self, p_map: &PMap) -> bool {
        let actor = &self.actors[0];
        match (p_map.pitch(actor), p_map.policy_context(actor)) {
            (Some(pitch), Some(policy)) => {
                pitch.tone().placement() == self.tone.placement()
                    && policy.pitch_range().is_pitch_in_range(&pitch)
            }
            _ => false,
        }
    }

    fn clone_with(&self, actors: &[Actor]) -> Result<Box<dyn Constraint>> {
        check_arity(self.name(), 1, actors)?;
        Ok(Box::new(Self::new(actors[0], self.tone)))
    }
}
