use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{actor_position, check_arity, policy_of, scale_notes, Constraint};
use crate::error::{Result, SolverError};
use crate::models::{Actor, DiatonicPitch, Note};
use crate::solver::PMap;

/// Relation between the sounding heights of two pitches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    Less,
    LessEqual,
    Equal,
    GreaterEqual,
    Greater,
}

impl ComparisonOp {
    pub fn holds(&self, left: &DiatonicPitch, right: &DiatonicPitch) -> bool {
        let (l, r) = (left.chromatic_distance(), right.chromatic_distance());
        match self {
            ComparisonOp::Less => l < r,
            ComparisonOp::LessEqual => l <= r,
            ComparisonOp::Equal => l == r,
            ComparisonOp::GreaterEqual => l >= r,
            ComparisonOp::Greater => l > r,
        }
    }

    /// The relation with its operands swapped: a < b iff b > a
    pub fn reversed(&self) -> ComparisonOp {
        match self {
            ComparisonOp::Less => ComparisonOp::Greater,
            ComparisonOp::LessEqual => ComparisonOp::GreaterEqual,
            ComparisonOp::Equal => ComparisonOp::Equal,
            ComparisonOp::GreaterEqual => ComparisonOp::LessEqual,
            ComparisonOp::Greater => ComparisonOp::Less,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Less => "<",
            ComparisonOp::LessEqual => "<=",
            ComparisonOp::Equal => "==",
            ComparisonOp::GreaterEqual => ">=",
            ComparisonOp::Greater => ">",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ComparisonOp {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "<" => Ok(ComparisonOp::Less),
            "<=" => Ok(ComparisonOp::LessEqual),
            "=" | "==" => Ok(ComparisonOp::Equal),
            ">=" => Ok(ComparisonOp::GreaterEqual),
            ">" => Ok(ComparisonOp::Greater),
            other => Err(SolverError::Configuration(format!(
                "unknown comparison operator '{}'",
                other
            ))),
        }
    }
}

/// pitch(v1) op pitch(v2), compared by sound
#[derive(Debug, Clone)]
pub struct ComparativePitchConstraint {
    actors: [Actor; 2],
    op: ComparisonOp,
}

impl ComparativePitchConstraint {
    pub fn new(first: Actor, second: Actor, op: ComparisonOp) -> Self {
        Self {
            actors: [first, second],
            op,
        }
    }

    pub fn op(&self) -> ComparisonOp {
        self.op
    }
}

impl Constraint for ComparativePitchConstraint {
    fn name(&self) -> &'static str {
        "ComparativePitch"
    }

    fn actors(&self) -> &[Actor] {
        &self.actors
    }

    fn values(&self, p_map: &PMap, actor: &Actor) -> Result<Vec<Note>> {
        let position = actor_position(self, actor)?;
        let (other, op) = if position == 0 {
            (&self.actors[1], self.op)
        } else {
            (&self.actors[0], self.op.reversed())
        };

        let mut notes = scale_notes(policy_of(p_map, actor)?, actor);
        if let Some(anchor) = p_map.pitch(other) {
            notes.retain(|note| op.holds(&note.pitch, &anchor));
        }
        Ok(notes)
    }

    fn verify(&self, p_map: &PMap) -> bool {
        match (p_map.pitch(&self.actors[0]), p_map.pitch(&self.actors[1])) {
            (Some(first), Some(second)) => self.op.holds(&first, &second),
            _ => false,
        }
    }

    fn clone_with(&self, actors: &[Actor]) -> Result<Box<dyn Constraint>> {
        check_arity(self.name(), 2, actors)?;
        Ok(Box::new(Self::new(actors[0], actors[1], self.op)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversal() {
        let low = DiatonicPitch::parse("C:5").unwrap();
        let high = DiatonicPitch::parse("E:5").unwrap();
        for op in [
            ComparisonOp::Less,
            ComparisonOp::LessEqual,
            ComparisonOp::Equal,
            ComparisonOp::GreaterEqual,
            ComparisonOp::Greater,
        ] {
            assert_eq!(op.holds(&low, &high), op.reversed().holds(&high, &low));
        }
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!("<".parse::<ComparisonOp>().unwrap(), ComparisonOp::Less);
        assert_eq!("==".parse::<ComparisonOp>().unwrap(), ComparisonOp::Equal);
        assert!("<>".parse::<ComparisonOp>().is_err());
    }
}
