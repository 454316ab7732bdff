//! Label atoms and label expressions.
//!
//! A [`Label`] is a parsed boolean expression over [`LabelAtom`]s together with its
//! canonical display string. Two labels are the same label when their display strings
//! are equal: `"jdk7 && windows"` and `"jdk7&&windows"` are one label,
//! `"windows&&jdk7"` is another one even though it means the same thing.
mod expr;
mod lexer;
mod parser;

pub use expr::LabelExpr;

use std::{
    cmp::Ordering,
    collections::BTreeSet,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    domain::url::encode_segment,
    error::{ModelError, ModelResult},
};

/// Indivisible label name attached to nodes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelAtom(String);

impl LabelAtom {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the name would not survive the lexer unquoted.
    pub fn needs_quoting(&self) -> bool {
        self.0.is_empty() || self.0.contains("->") || !self.0.chars().all(lexer::is_atom_char)
    }

    /// Relative URL of the label page, e.g. `label/jdk7/`.
    pub fn url(&self) -> String {
        format!("label/{}/", encode_segment(&self.to_string()))
    }
}

impl fmt::Display for LabelAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.needs_quoting() {
            return f.write_str(&self.0);
        }
        f.write_str("\"")?;
        for c in self.0.chars() {
            if matches!(c, '"' | '\\') {
                f.write_str("\\")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str("\"")
    }
}

impl From<&str> for LabelAtom {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Split a whitespace-separated label string (as configured on a node) into atoms.
pub fn parse_atoms(labels: &str) -> BTreeSet<LabelAtom> {
    labels.split_whitespace().map(LabelAtom::from).collect()
}

/// Parsed label expression with its canonical display string.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label {
    expr: LabelExpr,
    display: String,
}

impl Label {
    /// Parse a label expression.
    ///
    /// Blank input is rejected; use [`Label::parse_optional`] where blank means "no label".
    pub fn parse(text: &str) -> ModelResult<Self> {
        let expr = parser::parse(text)?;
        Ok(Self::from_parsed(expr))
    }

    /// Parse a label expression, mapping blank input to `None`.
    pub fn parse_optional(text: &str) -> ModelResult<Option<Self>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        Self::parse(text).map(Some)
    }

    /// Label made of a single atom.
    pub fn atom(atom: LabelAtom) -> Self {
        Self::from_parsed(LabelExpr::Atom(atom))
    }

    fn from_parsed(expr: LabelExpr) -> Self {
        let display = expr.to_string();
        Self { expr, display }
    }

    pub fn expr(&self) -> &LabelExpr {
        &self.expr
    }

    /// Canonical form: whitespace removed, written parentheses kept.
    pub fn display_name(&self) -> &str {
        &self.display
    }

    /// Relative URL of the label page.
    pub fn url(&self) -> String {
        format!("label/{}/", encode_segment(&self.display))
    }

    pub fn matches(&self, atoms: &BTreeSet<LabelAtom>) -> bool {
        self.expr.eval(atoms)
    }

    /// All atoms referenced by the expression, including negated ones.
    pub fn atoms(&self) -> BTreeSet<LabelAtom> {
        let mut out = BTreeSet::new();
        self.expr.collect_atoms(&mut out);
        out
    }

    /// Returns `true` if `atom` appears anywhere in the expression.
    ///
    /// `"macos&&!jdk7"` references `jdk7`; `"jdk71"` does not.
    pub fn references(&self, atom: &LabelAtom) -> bool {
        self.atoms().contains(atom)
    }

    /// The atom, when the whole expression is a single bare atom.
    pub fn as_atom(&self) -> Option<&LabelAtom> {
        match &self.expr {
            LabelExpr::Atom(atom) => Some(atom),
            _ => None,
        }
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.display == other.display
    }
}

impl Eq for Label {}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.display.hash(state);
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.display.cmp(&other.display)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl FromStr for Label {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Label {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.display
    }
}

impl From<LabelAtom> for Label {
    fn from(atom: LabelAtom) -> Self {
        Self::atom(atom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms(names: &[&str]) -> BTreeSet<LabelAtom> {
        names.iter().copied().map(LabelAtom::from).collect()
    }

    #[test]
    fn display_drops_whitespace_and_keeps_parentheses() {
        let label = Label::parse(" windows &&  ( jdk7 || jdk8 ) ").unwrap();
        assert_eq!(label.display_name(), "windows&&(jdk7||jdk8)");
    }

    #[test]
    fn identity_is_textual_not_semantic() {
        let a = Label::parse("windows&&jdk7").unwrap();
        let b = Label::parse("windows && jdk7").unwrap();
        let c = Label::parse("jdk7&&windows").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(c < a, "ordering is by display string");
    }

    #[test]
    fn matches_uses_node_atoms() {
        let label = Label::parse("windows&&jdk7").unwrap();
        assert!(label.matches(&atoms(&["windows", "jdk7", "x64"])));
        assert!(!label.matches(&atoms(&["jdk7"])));
        assert!(!label.matches(&BTreeSet::new()));
    }

    #[test]
    fn implies_and_iff_evaluate() {
        let implies = Label::parse("docker -> linux").unwrap();
        assert!(implies.matches(&atoms(&["windows"])));
        assert!(implies.matches(&atoms(&["docker", "linux"])));
        assert!(!implies.matches(&atoms(&["docker"])));

        let iff = Label::parse("a <-> b").unwrap();
        assert!(iff.matches(&atoms(&[])));
        assert!(iff.matches(&atoms(&["a", "b"])));
        assert!(!iff.matches(&atoms(&["a"])));
    }

    #[test]
    fn atoms_include_negated_references() {
        let label = Label::parse("macos&&!jdk7").unwrap();
        assert_eq!(label.atoms(), atoms(&["jdk7", "macos"]));
        assert!(label.references(&LabelAtom::from("jdk7")));
        assert!(!label.references(&LabelAtom::from("jdk")));
        assert!(!label.references(&LabelAtom::from("jdk71")));
    }

    #[test]
    fn as_atom_only_for_bare_atoms() {
        assert_eq!(
            Label::parse("jdk7").unwrap().as_atom(),
            Some(&LabelAtom::from("jdk7"))
        );
        assert_eq!(Label::parse("(jdk7)").unwrap().as_atom(), None);
        assert_eq!(Label::parse("!jdk7").unwrap().as_atom(), None);
    }

    #[test]
    fn atom_label_equals_parsed_atom() {
        assert_eq!(
            Label::atom(LabelAtom::from("jdk7")),
            Label::parse("jdk7").unwrap()
        );
    }

    #[test]
    fn quoted_atoms_round_trip_through_display() {
        let label = Label::parse(r#""my label"&&x"#).unwrap();
        assert_eq!(label.display_name(), r#""my label"&&x"#);
        let again = Label::parse(label.display_name()).unwrap();
        assert_eq!(again, label);
        assert!(label.references(&LabelAtom::from("my label")));
    }

    #[test]
    fn parse_optional_treats_blank_as_none() {
        assert!(Label::parse_optional("").unwrap().is_none());
        assert!(Label::parse_optional("  \t").unwrap().is_none());
        assert!(Label::parse_optional("a").unwrap().is_some());
        assert!(Label::parse_optional("a &&").is_err());
    }

    #[test]
    fn url_encodes_operators() {
        let label = Label::parse("windows&&jdk7").unwrap();
        assert_eq!(label.url(), "label/windows%26%26jdk7/");
        assert_eq!(LabelAtom::from("jdk7").url(), "label/jdk7/");
    }

    #[test]
    fn serde_uses_display_string() {
        let label = Label::parse("a && b").unwrap();
        let json = serde_json::to_string(&label).unwrap();
        assert_eq!(json, r#""a&&b""#);

        let back: Label = serde_json::from_str(&json).unwrap();
        assert_eq!(back, label);
        assert!(serde_json::from_str::<Label>(r#""a &&""#).is_err());
    }

    #[test]
    fn parse_atoms_splits_on_whitespace() {
        assert_eq!(parse_atoms("  linux  docker\tx64 "), atoms(&["docker", "linux", "x64"]));
        assert!(parse_atoms("").is_empty());
    }
}
