// End-to-end solver runs: scenarios, result invariants and failure reporting

use std::collections::BTreeSet;

use melody_solver::constraints::*;
use melody_solver::models::{
    Actor, DiatonicPitch, Duration, HarmonicContext, Line, ModalityType, PitchRange, Rational,
};
use melody_solver::{MelodicConstraintSolver, PMap, SolveOptions, SolveResults, SolverError};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn pitch(text: &str) -> DiatonicPitch {
    DiatonicPitch::parse(text).unwrap()
}

/// A line of quarter notes with one harmonic context over all of it
struct Fixture {
    line: Line,
    contexts: Vec<HarmonicContext>,
    range: PitchRange,
}

impl Fixture {
    fn new(pitches: &[&str], root: &str, chord: &str, low: &str, high: &str) -> Self {
        Self {
            line: Line::from_pitches(pitches, Duration::QUARTER).unwrap(),
            contexts: vec![
                HarmonicContext::create(root, ModalityType::Major, chord, Rational::new(16, 1)).unwrap(),
            ],
            range: PitchRange::from_pitches(low, high).unwrap(),
        }
    }

    fn actors(&self) -> Vec<Actor> {
        self.line.notes().to_vec()
    }

    fn p_map(&self) -> PMap {
        PMap::from_line(&self.line, &self.contexts, self.range).unwrap()
    }
}

fn solver(constraints: Vec<Box<dyn Constraint>>) -> MelodicConstraintSolver {
    MelodicConstraintSolver::new(constraints).unwrap()
}

fn pitch_strings(results: &SolveResults) -> Vec<String> {
    results.full_results.iter().map(|m| m.pitch_string()).collect()
}

/// Three actors in C major over C:4..C:5 with interlocking constraints
fn interlocked() -> (Fixture, MelodicConstraintSolver) {
    let fixture = Fixture::new(&["C:5", "D:5", "E:5"], "C", "tI", "C:4", "C:5");
    let a = fixture.actors();
    let constraints: Vec<Box<dyn Constraint>> = vec![
        Box::new(NotEqualPitchConstraint::new(a.clone()).unwrap()),
        Box::new(PitchStepConstraint::single(a[0], a[1], StepDirection::Up)),
        Box::new(ComparativePitchConstraint::new(a[1], a[2], ComparisonOp::Greater)),
        Box::new(ChordalPitchConstraint::new(a[2])),
    ];
    (fixture, solver(constraints))
}

#[test]
fn test_scalar_step_ascent() {
    init_logging();
    let fixture = Fixture::new(
        &["C:5", "D:5", "E:5", "G:5", "B:5", "C:6", "B:5", "G:5", "E:5", "D:5", "C:5", "C:5"],
        "G",
        "tI",
        "C:2",
        "C:8",
    );
    let actors = fixture.actors();
    let differentials = vec![1, 1, 2, 2, 1, -1, -2, -2, -1, -1, 0];
    let solver = solver(vec![Box::new(
        StepSequenceConstraint::new(actors.clone(), differentials).unwrap(),
    )]);

    let mut p_map = fixture.p_map();
    p_map.assign(&actors[2], actors[2].realize(pitch("G:5"))).unwrap();

    let expected = "E:5 F#:5 G:5 B:5 D:6 E:6 D:6 B:5 G:5 F#:5 E:5 E:5";
    let results = solver.solve(&p_map, SolveOptions::default()).unwrap();
    assert_eq!(pitch_strings(&results), vec![expected]);

    let results = solver.solve_all(&p_map, SolveOptions::default()).unwrap();
    assert_eq!(pitch_strings(&results), vec![expected]);
}

#[test]
fn test_unanchored_sequence_enumerates_every_start() {
    let fixture = Fixture::new(&["C:5", "D:5", "E:5"], "C", "tI", "C:4", "C:5");
    let actors = fixture.actors();
    let solver = solver(vec![Box::new(
        StepSequenceConstraint::new(actors, vec![1, 1]).unwrap(),
    )]);
    let results = solver.solve(&fixture.p_map(), SolveOptions::default()).unwrap();
    // C:4 through A:4 can climb two steps and stay under C:5
    assert_eq!(results.full_results.len(), 6);
    assert_eq!(results.full_results[0].pitch_string(), "C:4 D:4 E:4");
}

#[test]
fn test_results_are_sound_and_in_range() {
    let (fixture, solver) = interlocked();
    let results = solver.solve(&fixture.p_map(), SolveOptions::default()).unwrap();
    assert!(!results.full_results.is_empty());

    for result in &results.full_results {
        assert!(result.is_full());
        for constraint in solver.constraints() {
            assert!(constraint.verify(result), "{} fails {}", result, constraint.name());
        }
        for (actor, cn) in result.iter() {
            let note = cn.note().unwrap();
            assert!(cn.policy_context().pitch_range().is_pitch_in_range(&note.pitch));
            assert_eq!(note.base_duration, actor.base_duration());
            assert_eq!(note.num_dots, actor.num_dots());
        }
    }
}

#[test]
fn test_both_strategies_find_every_assignment() {
    let (fixture, solver) = interlocked();
    let p_map = fixture.p_map();

    // Brute force over the scale pitches of each actor
    let scale: Vec<DiatonicPitch> = p_map.values()[0].policy_context().scale_pitches().to_vec();
    let actors = fixture.actors();
    let mut expected = BTreeSet::new();
    let mut probe = p_map.replicate();
    for &x in &scale {
        for &y in &scale {
            for &z in &scale {
                probe.assign(&actors[0], actors[0].realize(x)).unwrap();
                probe.assign(&actors[1], actors[1].realize(y)).unwrap();
                probe.assign(&actors[2], actors[2].realize(z)).unwrap();
                if solver.full_check_and_validate(&probe) {
                    expected.insert(probe.pitch_string());
                }
            }
        }
    }
    assert!(!expected.is_empty());

    let chain: Vec<String> = pitch_strings(&solver.solve(&p_map, SolveOptions::default()).unwrap());
    let dfs: Vec<String> = pitch_strings(&solver.solve_all(&p_map, SolveOptions::default()).unwrap());

    assert_eq!(chain.len(), expected.len(), "no duplicates from solve");
    assert_eq!(dfs.len(), expected.len(), "no duplicates from solve_all");
    assert_eq!(chain.into_iter().collect::<BTreeSet<_>>(), expected);
    assert_eq!(dfs.into_iter().collect::<BTreeSet<_>>(), expected);
}

#[test]
fn test_replication_isolation_and_order() {
    let (fixture, solver) = interlocked();
    let p_map = fixture.p_map();
    let mut results = solver.solve(&p_map, SolveOptions::default()).unwrap();
    assert!(results.full_results.len() >= 2);

    for result in &results.full_results {
        assert_eq!(result.actors(), p_map.actors());
    }

    let second_before = results.full_results[1].pitch_string();
    let actor = fixture.actors()[0];
    results.full_results[0]
        .assign(&actor, actor.realize(pitch("B:4")))
        .unwrap();
    assert_eq!(results.full_results[1].pitch_string(), second_before);
    assert_eq!(p_map.unassigned().len(), 3);
}

#[test]
fn test_instance_limit() {
    let (fixture, solver) = interlocked();
    let p_map = fixture.p_map();

    for limit in [1, 2] {
        let options = SolveOptions::new().with_instance_limit(limit);
        assert_eq!(solver.solve(&p_map, options).unwrap().full_results.len(), limit);
        assert_eq!(solver.solve_all(&p_map, options).unwrap().full_results.len(), limit);
    }

    let none = SolveOptions::from_raw_limit(0, true).unwrap();
    let results = solver.solve(&p_map, none).unwrap();
    assert!(results.full_results.is_empty() && results.partial_results.is_empty());
}

#[test]
fn test_solve_is_deterministic() {
    let (fixture, solver) = interlocked();
    let p_map = fixture.p_map();
    let first = pitch_strings(&solver.solve(&p_map, SolveOptions::default()).unwrap());
    let second = pitch_strings(&solver.solve(&p_map, SolveOptions::default()).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_apply_round_trip() {
    let (fixture, solver) = interlocked();
    let results = solver.solve(&fixture.p_map(), SolveOptions::default()).unwrap();

    for result in &results.full_results {
        let applied = result.apply(&fixture.line);
        let rebuilt = PMap::from_line_with_pitches(&applied, &fixture.contexts, fixture.range).unwrap();
        assert!(solver.full_check_and_validate(&rebuilt), "{}", applied.pitch_string());
        assert_eq!(rebuilt.pitch_string(), result.pitch_string());
    }
}

#[test]
fn test_select_set_meets_scalar_across_spellings() {
    let fixture = Fixture::new(&["C:5"], "G", "tI", "C:4", "C:6");
    let actor = fixture.actors()[0];
    let solver = solver(vec![
        Box::new(FixedPitchSelectSetConstraint::new(actor, vec![pitch("Gb:5")])),
        Box::new(ScalarConstraint::new(actor)),
    ]);
    let p_map = fixture.p_map();

    assert_eq!(pitch_strings(&solver.solve(&p_map, SolveOptions::default()).unwrap()), vec!["F#:5"]);
    assert_eq!(pitch_strings(&solver.solve_all(&p_map, SolveOptions::default()).unwrap()), vec!["F#:5"]);
}

#[test]
fn test_unsatisfiable_yields_partials_not_errors() {
    let fixture = Fixture::new(&["C:5", "D:5"], "C", "tI", "C:4", "C:6");
    let a = fixture.actors();
    let solver = solver(vec![
        Box::new(ChordalPitchConstraint::new(a[0])),
        Box::new(PitchStepConstraint::single(a[0], a[1], StepDirection::Up)),
        Box::new(FixedPitchConstraint::new(a[1], pitch("C#:5"))),
    ]);
    let p_map = fixture.p_map();

    let quiet = solver.solve(&p_map, SolveOptions::default()).unwrap();
    assert!(quiet.full_results.is_empty());
    assert!(quiet.partial_results.is_empty());

    let with_partials = SolveOptions::new().with_partials(true);
    for results in [
        solver.solve(&p_map, with_partials).unwrap(),
        solver.solve_all(&p_map, with_partials).unwrap(),
    ] {
        assert!(results.full_results.is_empty());
        assert_eq!(results.partial_results.len(), 1);
        assert!(!results.partial_results[0].is_full());
    }
}

#[test]
fn test_configuration_errors() {
    assert!(matches!(
        MelodicConstraintSolver::new(Vec::new()),
        Err(SolverError::Configuration(_))
    ));

    let fixture = Fixture::new(&["C:5", "D:5"], "C", "tI", "C:4", "C:6");
    let a = fixture.actors();

    // Second actor of the map is not constrained
    let partial_cover = solver(vec![Box::new(ChordalPitchConstraint::new(a[0]))]);
    assert!(matches!(
        partial_cover.solve(&fixture.p_map(), SolveOptions::default()),
        Err(SolverError::Configuration(_))
    ));

    // Constraint names an actor the map does not have
    let stranger = Actor::new(*a[0].note());
    let over_cover = solver(vec![
        Box::new(ChordalPitchConstraint::new(a[0])),
        Box::new(ChordalPitchConstraint::new(a[1])),
        Box::new(ChordalPitchConstraint::new(stranger)),
    ]);
    assert!(matches!(
        over_cover.solve_all(&fixture.p_map(), SolveOptions::default()),
        Err(SolverError::Configuration(_))
    ));
}

#[test]
fn test_full_map_reports_insufficient_policies() {
    let fixture = Fixture::new(&["C:5"], "C", "tI", "C:4", "C:6");
    let actor = fixture.actors()[0];
    let solver = solver(vec![Box::new(FixedPitchConstraint::new(actor, pitch("E:5")))]);
    let mut p_map = fixture.p_map();
    p_map.assign(&actor, actor.realize(pitch("E:5"))).unwrap();

    assert_eq!(
        solver.solve(&p_map, SolveOptions::default()).unwrap_err(),
        SolverError::InsufficientPolicies
    );
}

#[test]
fn test_options_from_json_drive_solve() {
    let (fixture, solver) = interlocked();
    let options = SolveOptions::from_json(r#"{"instance_limit": 3, "accept_partials": false}"#).unwrap();
    let results = solver.solve(&fixture.p_map(), options).unwrap();
    assert_eq!(results.full_results.len(), 3);
}
