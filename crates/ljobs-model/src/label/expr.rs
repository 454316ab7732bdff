use std::{collections::BTreeSet, fmt};

use super::LabelAtom;

/// Boolean formula over label atoms.
///
/// Parentheses written in the source are kept as [`LabelExpr::Paren`] so that the
/// display form reproduces the expression as configured (minus whitespace).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabelExpr {
    Atom(LabelAtom),
    Not(Box<LabelExpr>),
    And(Box<LabelExpr>, Box<LabelExpr>),
    Or(Box<LabelExpr>, Box<LabelExpr>),
    /// `a -> b`, equivalent to `!a || b`.
    Implies(Box<LabelExpr>, Box<LabelExpr>),
    /// `a <-> b`, true when both sides agree.
    Iff(Box<LabelExpr>, Box<LabelExpr>),
    Paren(Box<LabelExpr>),
}

impl LabelExpr {
    pub fn not(inner: LabelExpr) -> Self {
        Self::Not(Box::new(inner))
    }

    pub fn and(lhs: LabelExpr, rhs: LabelExpr) -> Self {
        Self::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: LabelExpr, rhs: LabelExpr) -> Self {
        Self::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn paren(inner: LabelExpr) -> Self {
        Self::Paren(Box::new(inner))
    }

    /// Evaluate against a node's atom set. Absent atoms are `false`.
    pub fn eval(&self, atoms: &BTreeSet<LabelAtom>) -> bool {
        match self {
            LabelExpr::Atom(atom) => atoms.contains(atom),
            LabelExpr::Not(inner) => !inner.eval(atoms),
            LabelExpr::And(lhs, rhs) => lhs.eval(atoms) && rhs.eval(atoms),
            LabelExpr::Or(lhs, rhs) => lhs.eval(atoms) || rhs.eval(atoms),
            LabelExpr::Implies(lhs, rhs) => !lhs.eval(atoms) || rhs.eval(atoms),
            LabelExpr::Iff(lhs, rhs) => lhs.eval(atoms) == rhs.eval(atoms),
            LabelExpr::Paren(inner) => inner.eval(atoms),
        }
    }

    /// Collect every atom referenced, negated or not.
    pub fn collect_atoms(&self, out: &mut BTreeSet<LabelAtom>) {
        match self {
            LabelExpr::Atom(atom) => {
                out.insert(atom.clone());
            }
            LabelExpr::Not(inner) | LabelExpr::Paren(inner) => inner.collect_atoms(out),
            LabelExpr::And(lhs, rhs)
            | LabelExpr::Or(lhs, rhs)
            | LabelExpr::Implies(lhs, rhs)
            | LabelExpr::Iff(lhs, rhs) => {
                lhs.collect_atoms(out);
                rhs.collect_atoms(out);
            }
        }
    }
}

impl fmt::Display for LabelExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelExpr::Atom(atom) => write!(f, "{atom}"),
            LabelExpr::Not(inner) => write!(f, "!{inner}"),
            LabelExpr::And(lhs, rhs) => write!(f, "{lhs}&&{rhs}"),
            LabelExpr::Or(lhs, rhs) => write!(f, "{lhs}||{rhs}"),
            LabelExpr::Implies(lhs, rhs) => write!(f, "{lhs}->{rhs}"),
            LabelExpr::Iff(lhs, rhs) => write!(f, "{lhs}<->{rhs}"),
            LabelExpr::Paren(inner) => write!(f, "({inner})"),
        }
    }
}
