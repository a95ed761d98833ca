//! Scale-step relations between two actors
//!
//! Steps are counted in the second actor's tonality: the first actor's pitch
//! is anchored there by placement and walked along that key's scale.

use serde::{Deserialize, Serialize};

use super::{actor_position, check_arity, policy_of, realize_all, scale_notes, Constraint};
use crate::error::{Result, SolverError};
use crate::models::{Actor, Note};
use crate::solver::PMap;
use crate::transposition::{scale_step, scale_steps_between};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepDirection {
    Up,
    Down,
}

impl StepDirection {
    pub fn sign(&self) -> i32 {
        match self {
            StepDirection::Up => 1,
            StepDirection::Down => -1,
        }
    }
}

/// Scale steps from v1's pitch to v2's pitch, measured in v2's tonality
fn measured_steps(p_map: &PMap, first: &Actor, second: &Actor) -> Option<i32> {
    let tonality = p_map.policy_context(second)?.tonality();
    scale_steps_between(p_map.pitch(first)?, p_map.pitch(second)?, tonality)
}

/// Notes for `actor` (v1) whose distance to the assigned v2 satisfies `accept`
fn backward_candidates(
    p_map: &PMap,
    actor: &Actor,
    second: &Actor,
    accept: impl Fn(i32) -> bool,
) -> Result<Vec<Note>> {
    let mut notes = scale_notes(policy_of(p_map, actor)?, actor);
    let (Some(target), Some(policy)) = (p_map.pitch(second), p_map.policy_context(second)) else {
        return Ok(notes);
    };
    notes.retain(|note| {
        scale_steps_between(note.pitch, target, policy.tonality()).is_some_and(|steps| accept(steps))
    });
    Ok(notes)
}

/// v2 lies exactly `steps` scale steps above or below v1
#[derive(Debug, Clone)]
pub struct PitchStepConstraint {
    actors: [Actor; 2],
    steps: i32,
    direction: StepDirection,
}

impl PitchStepConstraint {
    pub fn new(first: Actor, second: Actor, steps: u32, direction: StepDirection) -> Result<Self> {
        let steps = i32::try_from(steps).map_err(|_| {
            SolverError::Configuration(format!("PitchStep of {} steps is out of range", steps))
        })?;
        Ok(Self {
            actors: [first, second],
            steps,
            direction,
        })
    }

    /// One scale step in `direction`
    pub fn single(first: Actor, second: Actor, direction: StepDirection) -> Self {
        Self {
            actors: [first, second],
            steps: 1,
            direction,
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps.unsigned_abs()
    }

    fn signed_steps(&self) -> i32 {
        self.steps * self.direction.sign()
    }
}

impl Constraint for PitchStepConstraint {
    fn name(&self) -> &'static str {
        "PitchStep"
    }

    fn actors(&self) -> &[Actor] {
        &self.actors
    }

    fn values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>> {
        let [first, second] = &self.actors;
        let signed = self.signed_steps();
        if actor_position(self, actor)? == 0 {
            return backward_candidates(p_map, actor, second, |steps| steps == signed);
        }

        let policy = policy_of(p_map, actor)?;
        let Some(anchor) = p_map.pitch(first) else {
            return Ok(scale_notes(policy, actor));
        };
        Ok(match scale_step(anchor, signed, policy.tonality())? {
            Some(pitch) if policy.pitch_range().is_pitch_in_range(&pitch) => {
                vec![actor.realize(pitch)]
            }
            _ => Vec::new(),
        })
    }

    fn verify(&self, p_map: &PMap) -> bool {
        measured_steps(p_map, &self.actors[0], &self.actors[1]) == Some(self.signed_steps())
    }

    fn clone_with(&self, actors: &[Actor]) -> Result<Box<dyn Constraint>> {
        check_arity(self.name(), 2, actors)?;
        Ok(Box::new(Self {
            actors: [actors[0], actors[1]],
            steps: self.steps,
            direction: self.direction,
        }))
    }
}

/// v2 lies between `low` and `high` scale steps (inclusive) from v1
#[derive(Debug, Clone)]
pub struct RelativeScalarStepConstraint {
    actors: [Actor; 2],
    low: i32,
    high: i32,
}

impl RelativeScalarStepConstraint {
    pub fn new(first: Actor, second: Actor, low: i32, high: i32) -> Result<Self> {
        if low > high {
            return Err(SolverError::Configuration(format!(
                "RelativeScalarStep window [{}, {}] is empty",
                low, high
            )));
        }
        Ok(Self {
            actors: [first, second],
            low,
            high,
        })
    }

    pub fn window(&self) -> (i32, i32) {
        (self.low, self.high)
    }

    fn accepts(&self, steps: i32) -> bool {
        (self.low..=self.high).contains(&steps)
    }
}

impl Constraint for RelativeScalarStepConstraint {
    fn name(&self) -> &'static str {
        "RelativeScalarStep"
    }

    fn actors(&self) -> &[Actor] {
        &self.actors
    }

    fn values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>> {
        let [first, second] = &self.actors;
        if actor_position(self, actor)? == 0 {
            return backward_candidates(p_map, actor, second, |steps| self.accepts(steps));
        }

        let policy = policy_of(p_map, actor)?;
        let Some(anchor) = p_map.pitch(first) else {
            return Ok(scale_notes(policy, actor));
        };
        let mut pitches = Vec::new();
        for k in self.low..=self.high {
            if let Some(pitch) = scale_step(anchor, k, policy.tonality())? {
                if policy.pitch_range().is_pitch_in_range(&pitch) {
                    pitches.push(pitch);
                }
            }
        }
        Ok(realize_all(actor, pitches))
    }

    fn verify(&self, p_map: &PMap) -> bool {
        measured_steps(p_map, &self.actors[0], &self.actors[1]).is_some_and(|s| self.accepts(s))
    }

    fn clone_with(&self, actors: &[Actor]) -> Result<Box<dyn Constraint>> {
        check_arity(self.name(), 2, actors)?;
        Ok(Box::new(Self::new(actors[0], actors[1], self.low, self.high)?))
    }
}
