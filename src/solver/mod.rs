//! Constraint solving over parameter maps

pub mod contextual_note;
pub mod melodic_constraint_solver;
pub mod options;
pub mod p_map;
pub mod policy_context;
pub mod stack;

pub use contextual_note::ContextualNote;
pub use melodic_constraint_solver::{MelodicConstraintSolver, SolveResults};
pub use options::SolveOptions;
pub use p_map::PMap;
pub use policy_context::PolicyContext;
pub use stack::{Stack, ValueMap};
