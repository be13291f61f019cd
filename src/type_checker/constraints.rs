use std::fmt::Display;

use super::types::Type;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The hole must unify with this type.
    Unification(Type),
    /// The hole must satisfy this type class.
    Satisfaction(Type),
}

impl Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Unification(ty) => write!(f, "Unify[{}]", ty),
            Constraint::Satisfaction(ty) => write!(f, "Satisfy[{}]", ty),
        }
    }
}

/// Constraints accumulated per hole, in the order holes were first seen.
#[derive(Debug, Clone, Default)]
pub struct ConstraintTable {
    entries: Vec<(Type, Vec<Constraint>)>,
}

impl ConstraintTable {
    pub fn new() -> Self {
        ConstraintTable::default()
    }

    /// Makes the hole known to the table without constraining it.
    pub fn register_hole(&mut self, hole: Type) {
        self.entry(hole);
    }

    pub fn add(&mut self, hole: Type, constraint: Constraint) {
        self.entry(hole).push(constraint);
    }

    /// Records that `expected` and `actual` met; any hole on either side is
    /// constrained by the other side.
    pub fn add_unification(&mut self, expected: &Type, actual: &Type) {
        if expected.is_hole() {
            self.add(expected.clone(), Constraint::Unification(actual.clone()));
        }
        if actual.is_hole() {
            self.add(actual.clone(), Constraint::Unification(expected.clone()));
        }
    }

    pub fn get(&self, hole: &Type) -> Option<&[Constraint]> {
        self.entries
            .iter()
            .find(|(known, _)| known == hole)
            .map(|(_, constraints)| constraints.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Type, &[Constraint])> {
        self.entries
            .iter()
            .map(|(hole, constraints)| (hole, constraints.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&mut self, hole: Type) -> &mut Vec<Constraint> {
        let index = match self.entries.iter().position(|(known, _)| *known == hole) {
            Some(index) => index,
            None => {
                self.entries.push((hole, vec![]));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }
}
