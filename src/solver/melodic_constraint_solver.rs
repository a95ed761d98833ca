//! Backtracking search for pitch assignments that satisfy a constraint set
//!
//! Two strategies share the candidate computation:
//!
//! - `solve` (chain fill) walks the actors smallest-domain first and, for
//!   each decision, immediately resolves every unassigned actor tied to the
//!   decided one through a shared constraint.
//! - `solve_all` is a depth-first search over the same actor order with an
//!   explicit cursor and per-actor value stacks.
//!
//! Candidates for an actor are the intersection, by pitch spelling, of the
//! value sets of every constraint touching it.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, trace};

use super::options::SolveOptions;
use super::p_map::PMap;
use super::stack::{Stack, ValueMap};
use crate::constraints::Constraint;
use crate::error::{Result, SolverError};
use crate::models::{Actor, ActorId, DiatonicPitch, Note};

/// Full and (optionally) partial results of one solver run
#[derive(Debug, Default)]
pub struct SolveResults {
    pub full_results: Vec<PMap>,
    pub partial_results: Vec<PMap>,
}

impl SolveResults {
    pub fn is_empty(&self) -> bool {
        self.full_results.is_empty()
    }
}

#[derive(Debug)]
pub struct MelodicConstraintSolver {
    constraints: Vec<Box<dyn Constraint>>,
    /// Constraint indices touching each actor
    v_policy_map: HashMap<ActorId, Vec<usize>>,
}

impl MelodicConstraintSolver {
    pub fn new(constraints: Vec<Box<dyn Constraint>>) -> Result<Self> {
        if constraints.is_empty() {
            return Err(SolverError::Configuration(
                "solver needs at least one constraint".to_string(),
            ));
        }
        let mut v_policy_map: HashMap<ActorId, Vec<usize>> = HashMap::new();
        for (index, constraint) in constraints.iter().enumerate() {
            for actor in constraint.actors() {
                v_policy_map.entry(actor.id()).or_default().push(index);
            }
        }
        Ok(Self {
            constraints,
            v_policy_map,
        })
    }

    pub fn constraints(&self) -> &[Box<dyn Constraint>] {
        &self.constraints
    }

    /// Constraints defined over `actor`
    pub fn constraints_for<'a>(&'a self, actor: &Actor) -> impl Iterator<Item = &'a dyn Constraint> + 'a {
        self.v_policy_map
            .get(&actor.id())
            .into_iter()
            .flatten()
            .map(move |&i| self.constraints[i].as_ref())
    }

    /// The map's actors must be exactly the actors the constraints mention
    fn check_p_map(&self, p_map: &PMap) -> Result<()> {
        if let Some(stray) = p_map.actors().iter().find(|a| !self.v_policy_map.contains_key(&a.id())) {
            return Err(SolverError::Configuration(format!(
                "parameter map actor {} is not covered by any constraint",
                stray
            )));
        }
        let keys: HashSet<ActorId> = p_map.actors().iter().map(|a| a.id()).collect();
        if let Some(missing) = self.v_policy_map.keys().find(|id| !keys.contains(id)) {
            return Err(SolverError::Configuration(format!(
                "constraint actor {} is missing from the parameter map",
                missing
            )));
        }
        Ok(())
    }

    /// Candidate notes for `actor`: the intersection of every touching
    /// constraint's values, carrying the actor's rhythm
    pub fn policy_values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>> {
        let mut candidates: Option<Vec<DiatonicPitch>> = None;
        for constraint in self.constraints_for(actor) {
            let pitches: Vec<DiatonicPitch> = constraint
                .values(p_map, actor)?
                .into_iter()
                .map(|note| note.pitch)
                .collect();
            let next = match candidates {
                None => {
                    let mut seen = HashSet::new();
                    pitches.into_iter().filter(|p| seen.insert(*p)).collect()
                }
                Some(previous) => {
                    let allowed: HashSet<DiatonicPitch> = pitches.into_iter().collect();
                    previous.into_iter().filter(|p| allowed.contains(p)).collect::<Vec<_>>()
                }
            };
            let exhausted = next.is_empty();
            candidates = Some(next);
            if exhausted {
                break;
            }
        }
        Ok(candidates
            .unwrap_or_default()
            .into_iter()
            .map(|pitch| actor.realize(pitch))
            .collect())
    }

    /// Unassigned actors among `actors` with their candidates, fewest first
    pub fn build_potential_values(
        &self,
        p_map: &PMap,
        actors: &[Actor],
    ) -> Result<Vec<(Actor, Vec<Note>)>> {
        let mut potential = Vec::new();
        for actor in actors.iter().filter(|a| !p_map.is_assigned(a)) {
            potential.push((*actor, self.policy_values(p_map, actor)?));
        }
        potential.sort_by_key(|(_, values)| values.len());
        Ok(potential)
    }

    /// Unassigned actors that share a constraint with `actor`, `actor`
    /// included when unassigned, in first-seen order
    pub fn candidate_closure(&self, p_map: &PMap, actor: &Actor) -> Vec<Actor> {
        let mut closure: Vec<Actor> = Vec::new();
        for constraint in self.constraints_for(actor) {
            for peer in p_map.unassigned_actors(constraint) {
                if !closure.contains(&peer) {
                    closure.push(peer);
                }
            }
        }
        closure
    }

    /// Every actor assigned and every constraint verified
    pub fn full_check_and_validate(&self, p_map: &PMap) -> bool {
        p_map.is_full() && self.constraints.iter().all(|c| c.verify(p_map))
    }

    /// Initial ordering shared by both strategies
    fn initial_order(&self, p_map: &PMap) -> Result<Vec<Actor>> {
        let ordering = self.build_potential_values(p_map, p_map.actors())?;
        if ordering.is_empty() {
            return Err(SolverError::InsufficientPolicies);
        }
        trace!(
            "actor order: {}",
            ordering
                .iter()
                .map(|(a, values)| format!("{}({})", a, values.len()))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(ordering.into_iter().map(|(actor, _)| actor).collect())
    }

    /// Chain-fill search
    pub fn solve(&self, p_map: &PMap, options: SolveOptions) -> Result<SolveResults> {
        self.check_p_map(p_map)?;
        let mut results = SolveResults::default();
        if options.instance_limit == Some(0) {
            return Ok(results);
        }
        debug!(
            "solve: {} actors, {} constraints, {:?}",
            p_map.len(),
            self.constraints.len(),
            options
        );

        let mut unsolved: VecDeque<Actor> = self.initial_order(p_map)?.into();
        let mut frontier = vec![p_map.replicate()];

        'search: while let Some(v) = unsolved.pop_front() {
            let mut next_frontier = Vec::new();
            for mut m in frontier {
                if m.is_assigned(&v) {
                    next_frontier.push(m);
                    continue;
                }
                let (extensions, completed) = self.fill_chain(&mut m, &v, &mut results, options)?;
                if options.limit_reached(results.full_results.len()) {
                    debug!("solve: instance limit reached");
                    break 'search;
                }
                if extensions.is_empty() && completed == 0 {
                    if options.accept_partials {
                        results.partial_results.push(m);
                    }
                } else {
                    next_frontier.extend(extensions);
                }
            }
            frontier = next_frontier;
            trace!("solve: decided {}, frontier {}", v, frontier.len());

            // Every frontier map has the same assigned set after a step.
            unsolved.retain(|actor| !frontier.iter().all(|m| m.is_assigned(actor)));
        }

        debug!(
            "solve: {} full, {} partial",
            results.full_results.len(),
            results.partial_results.len()
        );
        Ok(results)
    }

    /// Assign `v` each of its candidates and resolve its closure
    ///
    /// Returns the extended maps still incomplete, and how many complete
    /// maps went straight into `results`.
    fn fill_chain(
        &self,
        m: &mut PMap,
        v: &Actor,
        results: &mut SolveResults,
        options: SolveOptions,
    ) -> Result<(Vec<PMap>, usize)> {
        let peers: Vec<Actor> = self
            .candidate_closure(m, v)
            .into_iter()
            .filter(|a| a != v)
            .collect();
        let remaining = m.unassigned().len() - peers.len() - 1;
        let mut extensions = Vec::new();
        let mut completed = 0;

        for note in self.policy_values(m, v)? {
            m.assign(v, note)?;
            trace!("fill_chain: {} <- {}, {} peers", v, note.pitch, peers.len());

            let mut chain = Vec::new();
            if peers.is_empty() {
                if remaining > 0 {
                    chain.push(m.replicate());
                } else if self.full_check_and_validate(m) {
                    results.full_results.push(m.replicate());
                    completed += 1;
                }
            } else {
                chain.push(m.replicate());
                for (i, q) in peers.iter().enumerate() {
                    let completes = i + 1 == peers.len() && remaining == 0;
                    let mut next_chain = Vec::new();
                    for mut partial in chain {
                        for candidate in self.policy_values(&partial, q)? {
                            partial.assign(q, candidate)?;
                            if !completes {
                                next_chain.push(partial.replicate());
                            } else if self.full_check_and_validate(&partial) {
                                results.full_results.push(partial.replicate());
                                completed += 1;
                                if options.limit_reached(results.full_results.len()) {
                                    m.unassign(v)?;
                                    return Ok((extensions, completed));
                                }
                            }
                            partial.unassign(q)?;
                        }
                    }
                    chain = next_chain;
                    if chain.is_empty() {
                        break;
                    }
                }
            }
            extensions.extend(chain);

            if options.limit_reached(results.full_results.len()) {
                break;
            }
        }

        m.unassign(v)?;
        Ok((extensions, completed))
    }

    /// Exhaustive depth-first search with an explicit stack
    pub fn solve_all(&self, p_map: &PMap, options: SolveOptions) -> Result<SolveResults> {
        self.check_p_map(p_map)?;
        let mut results = SolveResults::default();
        if options.instance_limit == Some(0) {
            return Ok(results);
        }
        debug!(
            "solve_all: {} actors, {} constraints, {:?}",
            p_map.len(),
            self.constraints.len(),
            options
        );

        let mut actors = Stack::new(self.initial_order(p_map)?);
        let mut value_map = ValueMap::new();
        let mut m = p_map.replicate();
        actors.next();

        while let Some(v) = actors.current().copied() {
            if !value_map.has_values(&v) {
                let values = self.policy_values(&m, &v)?;
                if values.is_empty() {
                    trace!("solve_all: no values for {}", v);
                    if options.accept_partials {
                        results.partial_results.push(m.replicate());
                    }
                    m.unassign(&v)?;
                    actors.prev();
                    continue;
                }
                value_map.set_values(&v, values);
            }

            match value_map.next_value(&v) {
                Some(note) => {
                    m.assign(&v, note)?;
                    if self.full_check_and_validate(&m) {
                        results.full_results.push(m.replicate());
                        if options.limit_reached(results.full_results.len()) {
                            debug!("solve_all: instance limit reached");
                            break;
                        }
                    }
                    actors.next();
                }
                None => {
                    value_map.clear(&v);
                    m.unassign(&v)?;
                    actors.prev();
                }
            }
        }

        debug!(
            "solve_all: {} full, {} partial",
            results.full_results.len(),
            results.partial_results.len()
        );
        Ok(results)
    }
}
