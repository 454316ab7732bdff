//! Read-only views over the farm configuration.
//!
//! The resolver never reaches for global state: everything it reads comes through these
//! traits, bundled in a [`Farm`]. [`FarmSnapshot`] implements all three.
use std::iter;

use ljobs_model::{Cloud, FarmSnapshot, Integrations, Job, LabelAtom, LabelConfig, Node};

/// Source of jobs and of the trigger integrations their configuration relies on.
pub trait JobCatalog {
    fn jobs(&self) -> &[Job];

    fn job(&self, name: &str) -> Option<&Job> {
        self.jobs().iter().find(|job| job.name == name)
    }

    fn integrations(&self) -> Integrations;
}

/// Source of execution nodes. The controller is always present.
pub trait NodeCatalog {
    fn controller(&self) -> &Node;

    /// Worker nodes, controller excluded.
    fn nodes(&self) -> &[Node];

    /// Settings of a label atom. `None` when the atom has no linked-jobs page.
    fn label_config(&self, _atom: &LabelAtom) -> Option<&LabelConfig> {
        None
    }
}

/// Source of elastic providers.
pub trait CloudCatalog {
    fn clouds(&self) -> &[Cloud];
}

impl JobCatalog for FarmSnapshot {
    fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    fn integrations(&self) -> Integrations {
        self.integrations
    }
}

impl NodeCatalog for FarmSnapshot {
    fn controller(&self) -> &Node {
        &self.controller
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn label_config(&self, atom: &LabelAtom) -> Option<&LabelConfig> {
        self.labels.get(atom)
    }
}

impl CloudCatalog for FarmSnapshot {
    fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }
}

/// The three catalogs a resolution reads from.
#[derive(Clone, Copy)]
pub struct Farm<'a> {
    jobs: &'a dyn JobCatalog,
    nodes: &'a dyn NodeCatalog,
    clouds: &'a dyn CloudCatalog,
}

impl<'a> Farm<'a> {
    pub fn new(
        jobs: &'a dyn JobCatalog,
        nodes: &'a dyn NodeCatalog,
        clouds: &'a dyn CloudCatalog,
    ) -> Self {
        Self {
            jobs,
            nodes,
            clouds,
        }
    }

    pub fn from_snapshot(snapshot: &'a FarmSnapshot) -> Self {
        Self::new(snapshot, snapshot, snapshot)
    }

    pub fn jobs(&self) -> &'a [Job] {
        self.jobs.jobs()
    }

    pub fn job(&self, name: &str) -> Option<&'a Job> {
        self.jobs.job(name)
    }

    pub fn integrations(&self) -> Integrations {
        self.jobs.integrations()
    }

    pub fn controller(&self) -> &'a Node {
        self.nodes.controller()
    }

    pub fn nodes(&self) -> &'a [Node] {
        self.nodes.nodes()
    }

    /// Controller first, then every worker node.
    pub fn all_nodes(&self) -> impl Iterator<Item = &'a Node> + use<'a> {
        iter::once(self.nodes.controller()).chain(self.nodes.nodes().iter())
    }

    /// Look a node up by name, controller included.
    pub fn node(&self, name: &str) -> Option<&'a Node> {
        self.all_nodes().find(|node| node.name == name)
    }

    pub fn label_config(&self, atom: &LabelAtom) -> Option<&'a LabelConfig> {
        self.nodes.label_config(atom)
    }

    pub fn clouds(&self) -> &'a [Cloud] {
        self.clouds.clouds()
    }
}

impl std::fmt::Debug for Farm<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Farm")
            .field("jobs", &self.jobs().len())
            .field("nodes", &(self.nodes().len() + 1))
            .field("clouds", &self.clouds().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> FarmSnapshot {
        FarmSnapshot::new()
            .with_node(Node::new("a"))
            .with_node(Node::new("b"))
            .with_job(Job::new("j1"))
    }

    #[test]
    fn all_nodes_starts_with_controller() {
        let snapshot = snapshot();
        let farm = Farm::from_snapshot(&snapshot);
        let names: Vec<_> = farm.all_nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["built-in", "a", "b"]);
    }

    #[test]
    fn lookups_by_name() {
        let snapshot = snapshot();
        let farm = Farm::from_snapshot(&snapshot);
        assert!(farm.node("built-in").is_some());
        assert!(farm.node("b").is_some());
        assert!(farm.node("gone").is_none());
        assert!(farm.job("j1").is_some());
        assert!(farm.job("j2").is_none());
    }
}
