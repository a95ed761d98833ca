//! Melodic constraints
//!
//! Every constraint is defined over an ordered list of actors and answers two
//! questions about a parameter map:
//!
//! - `values(p_map, v)`: which notes may `v` take given what is assigned so
//!   far. An empty list means the constraint cannot be satisfied at `v`.
//! - `verify(p_map)`: does the current assignment satisfy the constraint.
//!
//! Constraints hold no mutable state and may be shared between searches.

use std::fmt;

use crate::error::{Result, SolverError};
use crate::models::{Actor, DiatonicPitch, Note};
use crate::solver::{PMap, PolicyContext};

pub mod chordal;
pub mod comparative;
pub mod equal_pitch;
pub mod fixed_pitch;
pub mod fixed_tone;
pub mod pitch_range_constraint;
pub mod scalar;
pub mod step;
pub mod step_sequence;

pub use chordal::ChordalPitchConstraint;
pub use comparative::{ComparativePitchConstraint, ComparisonOp};
pub use equal_pitch::{EqualPitchConstraint, NotEqualPitchConstraint};
pub use fixed_pitch::{FixedPitchConstraint, FixedPitchSelectSetConstraint};
pub use fixed_tone::FixedToneConstraint;
pub use pitch_range_constraint::PitchRangeConstraint;
pub use scalar::ScalarConstraint;
pub use step::{PitchStepConstraint, RelativeScalarStepConstraint, StepDirection};
pub use step_sequence::StepSequenceConstraint;

/// The contract every melodic constraint satisfies
pub trait Constraint: fmt::Debug + Send + Sync {
    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;

    /// Actors the constraint is defined over, in order
    fn actors(&self) -> &[Actor];

    /// Permitted notes for `actor` given the current assignments
    ///
    /// Fails with `InvalidReference` when `actor` is not one of `actors()`.
    fn values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>>;

    /// Whether the current assignments satisfy the constraint
    fn verify(&self, p_map: &PMap) -> bool;

    /// The same constraint over substituted actors
    fn clone_with(&self, actors: &[Actor]) -> Result<Box<dyn Constraint>>;
}

/// Index of `actor` within the constraint's actors
pub(crate) fn actor_position(constraint: &dyn Constraint, actor: &Actor) -> Result<usize> {
    constraint
        .actors()
        .iter()
        .position(|a| a == actor)
        .ok_or_else(|| {
            SolverError::InvalidReference(format!(
                "{} is not defined over actor {}",
                constraint.name(),
                actor
            ))
        })
}

/// The policy context of `actor`, which must be a key of the map
pub(crate) fn policy_of<'a>(p_map: &'a PMap, actor: &Actor) -> Result<&'a PolicyContext> {
    p_map
        .policy_context(actor)
        .map(|pc| pc.as_ref())
        .ok_or_else(|| {
            SolverError::Configuration(format!("actor {} is not in the parameter map", actor))
        })
}

/// Every in-scale pitch of the actor's policy context, as notes for the actor
pub(crate) fn scale_notes(policy: &PolicyContext, actor: &Actor) -> Vec<Note> {
    realize_all(actor, policy.scale_pitches().iter().copied())
}

pub(crate) fn realize_all(actor: &Actor, pitches: impl IntoIterator<Item = DiatonicPitch>) -> Vec<Note> {
    pitches.into_iter().map(|pitch| actor.realize(pitch)).collect()
}

/// Reject `clone_with` actor lists of the wrong length
pub(crate) fn check_arity(name: &str, expected: usize, actors: &[Actor]) -> Result<()> {
    if actors.len() != expected {
        return Err(SolverError::Configuration(format!(
            "{} takes {} actor(s), got {}",
            name,
            expected,
            actors.len()
        )));
    }
    Ok(())
}

/// Reject actor lists that are empty or repeat an actor
pub(crate) fn check_distinct(name: &str, actors: &[Actor]) -> Result<()> {
    if actors.is_empty() {
        return Err(SolverError::Configuration(format!("{} needs at least one actor", name)));
    }
    for (i, actor) in actors.iter().enumerate() {
        if actors[..i].contains(actor) {
            return Err(SolverError::Configuration(format!(
                "{} lists actor {} twice",
                name, actor
            )));
        }
    }
    Ok(())
}
