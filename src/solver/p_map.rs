//! Parameter map: the assignment record the solver searches over
//!
//! A `PMap` maps each actor, in insertion order, to a `ContextualNote`. The
//! key list and its position index are shared between replicas; only the
//! assignment slots are copied, so replication is a single vector clone.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::contextual_note::ContextualNote;
use super::policy_context::PolicyContext;
use crate::constraints::Constraint;
use crate::error::{Result, SolverError};
use crate::models::note::checked_sum;
use crate::models::{Actor, ActorId, DiatonicPitch, HarmonicContext, Line, Note, PitchRange, Rational};

#[derive(Debug, Clone)]
pub struct PMap {
    actors: Arc<[Actor]>,
    positions: Arc<HashMap<ActorId, usize>>,
    slots: Vec<ContextualNote>,
}

impl PMap {
    /// Build from actors in order, each with its policy context
    pub fn new(entries: Vec<(Actor, Arc<PolicyContext>)>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(entries.len());
        let mut actors = Vec::with_capacity(entries.len());
        let mut slots = Vec::with_capacity(entries.len());
        for (actor, policy_context) in entries {
            if positions.insert(actor.id(), actors.len()).is_some() {
                return Err(SolverError::Configuration(format!(
                    "actor {} appears twice in parameter map",
                    actor
                )));
            }
            actors.push(actor);
            slots.push(ContextualNote::new(policy_context));
        }
        Ok(Self {
            actors: actors.into(),
            positions: Arc::new(positions),
            slots,
        })
    }

    /// Place every note of `line` in the harmonic context whose time window
    /// holds the note's onset; all actors start unassigned
    pub fn from_line(line: &Line, contexts: &[HarmonicContext], pitch_range: PitchRange) -> Result<Self> {
        let policies = contexts
            .iter()
            .map(|hc| PolicyContext::new(hc.clone(), pitch_range).map(Arc::new))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut window_ends = Vec::with_capacity(contexts.len());
        let mut end = Rational::from_integer(0);
        for hc in contexts {
            end = checked_sum(end, hc.duration()).ok_or_else(|| {
                SolverError::Configuration("harmonic context durations overflow".to_string())
            })?;
            window_ends.push(end);
        }

        let mut entries = Vec::with_capacity(line.len());
        for (actor, onset) in line.notes().iter().zip(line.onsets()?) {
            let index = window_ends
                .iter()
                .position(|window_end| onset < *window_end)
                .ok_or_else(|| {
                    SolverError::Configuration(format!(
                        "note {} at onset {} lies past the last harmonic context",
                        actor, onset
                    ))
                })?;
            entries.push((*actor, Arc::clone(&policies[index])));
        }
        Self::new(entries)
    }

    /// Like `from_line`, with each actor assigned the pitch written on the line
    pub fn from_line_with_pitches(
        line: &Line,
        contexts: &[HarmonicContext],
        pitch_range: PitchRange,
    ) -> Result<Self> {
        let mut p_map = Self::from_line(line, contexts, pitch_range)?;
        for (slot, actor) in p_map.slots.iter_mut().zip(line.notes()) {
            slot.set_note(Some(*actor.note()));
        }
        Ok(p_map)
    }

    /// Actors in insertion order
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn keys(&self) -> &[Actor] {
        self.actors()
    }

    pub fn values(&self) -> &[ContextualNote] {
        &self.slots
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Actor, &ContextualNote)> {
        self.actors.iter().zip(self.slots.iter())
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn contains(&self, actor: &Actor) -> bool {
        self.positions.contains_key(&actor.id())
    }

    pub fn get(&self, actor: &Actor) -> Option<&ContextualNote> {
        self.positions.get(&actor.id()).map(|&i| &self.slots[i])
    }

    pub fn note(&self, actor: &Actor) -> Option<&Note> {
        self.get(actor).and_then(|cn| cn.note())
    }

    pub fn pitch(&self, actor: &Actor) -> Option<DiatonicPitch> {
        self.note(actor).map(|note| note.pitch)
    }

    pub fn policy_context(&self, actor: &Actor) -> Option<&Arc<PolicyContext>> {
        self.get(actor).map(|cn| cn.policy_context())
    }

    pub fn is_assigned(&self, actor: &Actor) -> bool {
        self.note(actor).is_some()
    }

    pub fn assign(&mut self, actor: &Actor, note: Note) -> Result<()> {
        self.slot_mut(actor)?.set_note(Some(note));
        Ok(())
    }

    pub fn unassign(&mut self, actor: &Actor) -> Result<()> {
        self.slot_mut(actor)?.set_note(None);
        Ok(())
    }

    fn slot_mut(&mut self, actor: &Actor) -> Result<&mut ContextualNote> {
        let index = *self.positions.get(&actor.id()).ok_or_else(|| {
            SolverError::InvalidReference(format!("actor {} is not in the parameter map", actor))
        })?;
        Ok(&mut self.slots[index])
    }

    /// The constraint's actors that hold a note here
    pub fn assigned_actors(&self, constraint: &dyn Constraint) -> Vec<Actor> {
        constraint
            .actors()
            .iter()
            .filter(|a| self.is_assigned(a))
            .copied()
            .collect()
    }

    /// The constraint's actors that do not hold a note here
    pub fn unassigned_actors(&self, constraint: &dyn Constraint) -> Vec<Actor> {
        constraint
            .actors()
            .iter()
            .filter(|a| !self.is_assigned(a))
            .copied()
            .collect()
    }

    /// Every unassigned actor, in order
    pub fn unassigned(&self) -> Vec<Actor> {
        self.iter()
            .filter(|(_, cn)| !cn.is_assigned())
            .map(|(actor, _)| *actor)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|cn| cn.is_assigned())
    }

    /// Same keys in the same order, fresh assignment slots
    pub fn replicate(&self) -> PMap {
        PMap {
            actors: Arc::clone(&self.actors),
            positions: Arc::clone(&self.positions),
            slots: self.slots.iter().map(|cn| cn.replicate()).collect(),
        }
    }

    /// Whether both maps were built over the same key list
    pub fn shares_keys(&self, other: &PMap) -> bool {
        Arc::ptr_eq(&self.actors, &other.actors)
    }

    /// Assigned pitches in actor order, for value comparison
    pub fn assignment_key(&self) -> Vec<Option<DiatonicPitch>> {
        self.slots.iter().map(|cn| cn.note().map(|n| n.pitch)).collect()
    }

    /// Assigned pitches as text, "_" for an empty slot
    pub fn pitch_string(&self) -> String {
        self.slots
            .iter()
            .map(|cn| match cn.note() {
                Some(note) => note.pitch.to_string(),
                None => "_".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// A copy of `line` with this map's assignments written into it
    ///
    /// Notes are matched by actor identity; notes outside the map, or whose
    /// actor is unassigned, keep their pitch.
    pub fn apply(&self, line: &Line) -> Line {
        let mut result = line.clone();
        self.apply_in_place(&mut result);
        result
    }

    pub fn apply_in_place(&self, line: &mut Line) {
        for (actor, cn) in self.iter() {
            if let Some(note) = cn.note() {
                line.set_pitch(actor.id(), note.pitch);
            }
        }
    }
}

impl fmt::Display for PMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PMap[{}]", self.pitch_string())
    }
}
