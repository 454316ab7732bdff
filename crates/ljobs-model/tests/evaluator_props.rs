//! Property tests for label expression evaluation.
use std::collections::BTreeSet;

use ljobs_model::{Label, LabelAtom};
use proptest::prelude::*;

const ATOMS: [&str; 4] = ["linux", "jdk7", "docker", "x64"];

/// Random well-parenthesized expression text over a small atom alphabet.
fn expr_text() -> impl Strategy<Value = String> {
    let leaf = prop::sample::select(ATOMS.to_vec()).prop_map(str::to_string);
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| format!("!({e})")),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l})&&({r})")),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l}) || ({r})")),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l})->({r})")),
            (inner.clone(), inner).prop_map(|(l, r)| format!("({l})<->({r})")),
        ]
    })
}

fn node_atoms() -> impl Strategy<Value = BTreeSet<LabelAtom>> {
    prop::sample::subsequence(ATOMS.to_vec(), 0..=ATOMS.len())
        .prop_map(|names| names.into_iter().map(LabelAtom::from).collect())
}

fn eval(text: &str, atoms: &BTreeSet<LabelAtom>) -> bool {
    Label::parse(text).expect("generated text must parse").matches(atoms)
}

proptest! {
    #[test]
    fn de_morgan_not_and(x in expr_text(), y in expr_text(), atoms in node_atoms()) {
        let lhs = eval(&format!("!(({x})&&({y}))"), &atoms);
        let rhs = eval(&format!("!({x})||!({y})"), &atoms);
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn de_morgan_not_or(x in expr_text(), y in expr_text(), atoms in node_atoms()) {
        let lhs = eval(&format!("!(({x})||({y}))"), &atoms);
        let rhs = eval(&format!("!({x})&&!({y})"), &atoms);
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn double_negation_is_identity(x in expr_text(), atoms in node_atoms()) {
        prop_assert_eq!(eval(&format!("!!({x})"), &atoms), eval(&x, &atoms));
    }

    #[test]
    fn evaluation_is_deterministic(x in expr_text(), atoms in node_atoms()) {
        let label = Label::parse(&x).unwrap();
        prop_assert_eq!(label.matches(&atoms), label.matches(&atoms));
    }

    #[test]
    fn display_form_reparses_to_same_label(x in expr_text(), atoms in node_atoms()) {
        let label = Label::parse(&x).unwrap();
        let again = Label::parse(label.display_name()).unwrap();
        prop_assert_eq!(&again, &label);
        prop_assert_eq!(again.matches(&atoms), label.matches(&atoms));
    }

    #[test]
    fn absent_atoms_are_false(name in "[a-z]{3,8}") {
        let label = Label::parse(&format!("zz_{name}")).unwrap();
        prop_assert!(!label.matches(&BTreeSet::new()));
    }
}
