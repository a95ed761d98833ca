//! A run of actors tied together by signed scale-step differentials
//!
//! Differential `d[m]` is the number of scale steps from actor `m` to actor
//! `m + 1`, counted in actor `m + 1`'s tonality. Any assigned actor anchors
//! the whole run; the pitch of every other actor follows by walking the
//! differentials forward or backward from the anchor.

use super::{actor_position, check_distinct, policy_of, scale_notes, Constraint};
use crate::error::{Result, SolverError};
use crate::models::pitch_scale::compute_scale_pitches;
use crate::models::{Actor, DiatonicPitch, Note, PitchRange, Tonality};
use crate::solver::PMap;
use crate::transposition::{scale_step, scale_steps_between};

#[derive(Debug, Clone)]
pub struct StepSequenceConstraint {
    actors: Vec<Actor>,
    differentials: Vec<i32>,
}

impl StepSequenceConstraint {
    pub fn new(actors: Vec<Actor>, differentials: Vec<i32>) -> Result<Self> {
        check_distinct("StepSequence", &actors)?;
        if differentials.len() + 1 != actors.len() {
            return Err(SolverError::Configuration(format!(
                "StepSequence over {} actors needs {} differentials, got {}",
                actors.len(),
                actors.len() - 1,
                differentials.len()
            )));
        }
        Ok(Self {
            actors,
            differentials,
        })
    }

    pub fn differentials(&self) -> &[i32] {
        &self.differentials
    }

    fn tonality<'a>(&self, p_map: &'a PMap, index: usize) -> Result<&'a Tonality> {
        Ok(policy_of(p_map, &self.actors[index])?.tonality())
    }

    /// Carry `pitch` at position `from` to position `to`
    fn propagate(
        &self,
        p_map: &PMap,
        from: usize,
        mut pitch: DiatonicPitch,
        to: usize,
    ) -> Result<Option<DiatonicPitch>> {
        if from < to {
            for m in from..to {
                let target = self.tonality(p_map, m + 1)?;
                match scale_step(pitch, self.differentials[m], target)? {
                    Some(next) => pitch = next,
                    None => return Ok(None),
                }
            }
        } else {
            for m in (to..from).rev() {
                let source = self.tonality(p_map, m)?;
                let target = self.tonality(p_map, m + 1)?;
                match step_back(pitch, self.differentials[m], source, target)? {
                    Some(previous) => pitch = previous,
                    None => return Ok(None),
                }
            }
        }
        Ok(Some(pitch))
    }
}

/// The pitch of `source` from which `steps` steps in `target_tonality` reach
/// `target`
fn step_back(
    target: DiatonicPitch,
    steps: i32,
    source: &Tonality,
    target_tonality: &Tonality,
) -> Result<Option<DiatonicPitch>> {
    if source == target_tonality {
        return Ok(scale_step(target, -steps, source)?);
    }
    Ok(compute_scale_pitches(source, &PitchRange::full())?
        .into_iter()
        .find(|p| scale_steps_between(*p, target, target_tonality) == Some(steps)))
}

impl Constraint for StepSequenceConstraint {
    fn name(&self) -> &'static str {
        "StepSequence"
    }

    fn actors(&self) -> &[Actor] {
        &self.actors
    }

    fn values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>> {
        let index = actor_position(self, actor)?;
        let policy = policy_of(p_map, actor)?;

        let anchors: Vec<(usize, DiatonicPitch)> = self
            .actors
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != index)
            .filter_map(|(j, a)| p_map.pitch(a).map(|p| (j, p)))
            .collect();
        if anchors.is_empty() {
            return Ok(scale_notes(policy, actor));
        }

        let mut realized: Option<DiatonicPitch> = None;
        for (j, pitch) in anchors {
            let Some(candidate) = self.propagate(p_map, j, pitch, index)? else {
                return Ok(Vec::new());
            };
            match realized {
                None => realized = Some(candidate),
                Some(previous) if !previous.is_enharmonic(&candidate) => return Ok(Vec::new()),
                Some(_) => {}
            }
        }

        Ok(realized
            .filter(|p| policy.pitch_range().is_pitch_in_range(p))
            .map(|p| vec![actor.realize(p)])
            .unwrap_or_default())
    }

    fn verify(&self, p_map: &PMap) -> bool {
        self.actors.windows(2).zip(&self.differentials).all(|(pair, &steps)| {
            let tonality = match p_map.policy_context(&pair[1]) {
                Some(policy) => policy.tonality(),
                None => return false,
            };
            match (p_map.pitch(&pair[0]), p_map.pitch(&pair[1])) {
                (Some(from), Some(to)) => scale_steps_between(from, to, tonality) == Some(steps),
                _ => false,
            }
        })
    }

    fn clone_with(&self, actors: &[Actor]) -> Result<Box<dyn Constraint>> {
        Ok(Box::new(Self::new(actors.to_vec(), self.differentials.clone())?))
    }
}
