use super::{actor_position, check_arity, policy_of, realize_all, Constraint};
use crate::error::Result;
use crate::models::{Actor, DiatonicPitch, Note, Tonality};
use crate::solver::PMap;

/// The actor sounds a tone of its tonality, optionally limited to certain
/// scale degrees
///
/// Roles are 0-based degree indices into the tonality's tones; degrees the
/// tonality does not have simply never match.
#[derive(Debug, Clone)]
pub struct ScalarConstraint {
    actors: [Actor; 1],
    roles: Option<Vec<usize>>,
}

impl ScalarConstraint {
    pub fn new(actor: Actor) -> Self {
        Self {
            actors: [actor],
            roles: None,
        }
    }

    pub fn with_roles(actor: Actor, roles: Vec<usize>) -> Self {
        Self {
            actors: [actor],
            roles: Some(roles),
        }
    }

    pub fn roles(&self) -> Option<&[usize]> {
        self.roles.as_deref()
    }

    fn permits(&self, tonality: &Tonality, pitch: &DiatonicPitch) -> bool {
        match tonality.degree_of_placement(pitch.tone().placement()) {
            Some(degree) => self.roles.as_ref().map_or(true, |roles| roles.contains(&degree)),
            None => false,
        }
    }
}

impl Constraint for ScalarConstraint {
    fn name(&self) -> &'static str {
        "Scalar"
    }

    fn actors(&self) -> &[Actor] {
        &self.actors
    }

    fn values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>> {
        actor_position(self, actor)?;
        let policy = policy_of(p_map, actor)?;
        Ok(realize_all(
            actor,
            policy
                .scale_pitches()
                .iter()
                .copied()
                .filter(|p| self.permits(policy.tonality(), p)),
        ))
    }

    fn verify(&self, p_map: &PMap) -> bool {
        let actor = &self.actors[0];
        match (p_map.pitch(actor), p_map.policy_context(actor)) {
            (Some(pitch), Some(policy)) => self.permits(policy.tonality(), &pitch),
            _ => false,
        }
    }

    fn clone_with(&self, actors: &[Actor]) -> Result<Box<dyn Constraint>> {
        check_arity(self.name(), 1, actors)?;
        Ok(Box::new(Self {
            actors: [actors[0]],
            roles: self.roles.clone(),
        }))
    }
}
