//! Affinity resolution.
//!
//! [`ResolverContext::resolve`] reads the farm once and keeps everything a report needs:
//! each job's parsed label, the trigger graph, every node's atom set and whether any node
//! still accepts unconstrained jobs. The context is immutable; each request builds its own.
mod group;

pub use group::JobsGroup;

use std::collections::{BTreeMap, BTreeSet};

use ljobs_model::{Cloud, Job, Label, LabelAtom, Node};
use tracing::{debug, instrument, warn};

use crate::{catalog::Farm, trigger::TriggerGraph};

/// A job whose label parsed successfully. `None` means the job may run anywhere.
#[derive(Clone, Debug)]
struct Assignment<'a> {
    job: &'a Job,
    label: Option<Label>,
}

#[derive(Debug)]
pub struct ResolverContext<'a> {
    farm: Farm<'a>,
    triggers: TriggerGraph<'a>,
    node_atoms: Vec<(&'a Node, BTreeSet<LabelAtom>)>,
    self_labels: BTreeSet<LabelAtom>,
    all_nodes_exclusive: bool,
    assignments: Vec<Assignment<'a>>,
}

impl<'a> ResolverContext<'a> {
    /// Resolve every job label and extract the trigger graph.
    ///
    /// Jobs whose label does not parse are logged and left out of every group and list.
    #[instrument(level = "debug", skip(farm), fields(jobs = farm.jobs().len(), nodes = farm.nodes().len() + 1))]
    pub fn resolve(farm: Farm<'a>) -> Self {
        let node_atoms: Vec<_> = farm
            .all_nodes()
            .map(|node| (node, node.assigned_atoms()))
            .collect();
        let self_labels = farm.all_nodes().map(Node::self_label).collect();
        let all_nodes_exclusive = farm.all_nodes().all(Node::is_exclusive);

        let mut assignments = Vec::with_capacity(farm.jobs().len());
        for job in farm.jobs() {
            match job.assigned_label() {
                Ok(label) => assignments.push(Assignment { job, label }),
                Err(e) => warn!(job = %job.name, error = %e, "ignoring job with malformed label"),
            }
        }
        assignments.sort_by(|a, b| a.job.name.cmp(&b.job.name));

        let triggers = TriggerGraph::extract(&farm);

        debug!(
            assigned = assignments.len(),
            all_nodes_exclusive, "resolver context ready"
        );
        Self {
            farm,
            triggers,
            node_atoms,
            self_labels,
            all_nodes_exclusive,
            assignments,
        }
    }

    pub fn farm(&self) -> &Farm<'a> {
        &self.farm
    }

    pub fn triggers(&self) -> &TriggerGraph<'a> {
        &self.triggers
    }

    /// Self labels of every node, controller included.
    pub fn self_labels(&self) -> &BTreeSet<LabelAtom> {
        &self.self_labels
    }

    /// Returns `true` if no node, controller included, accepts unconstrained jobs.
    pub fn all_nodes_exclusive(&self) -> bool {
        self.all_nodes_exclusive
    }

    /// Jobs with a label, sorted by job name.
    pub fn labeled_jobs(&self) -> impl Iterator<Item = (&'a Job, &Label)> + '_ {
        self.assignments
            .iter()
            .filter_map(|a| a.label.as_ref().map(|label| (a.job, label)))
    }

    /// Jobs without a label, sorted by job name.
    pub fn labelless_jobs(&self) -> impl Iterator<Item = &'a Job> + '_ {
        self.assignments
            .iter()
            .filter(|a| a.label.is_none())
            .map(|a| a.job)
    }

    /// Jobs with their optional label, sorted by job name.
    pub fn jobs(&self) -> impl Iterator<Item = (&'a Job, Option<&Label>)> + '_ {
        self.assignments.iter().map(|a| (a.job, a.label.as_ref()))
    }

    /// Nodes whose atom set satisfies `label`, controller first.
    pub fn matching_nodes(&self, label: &Label) -> Vec<&'a Node> {
        self.node_atoms
            .iter()
            .filter(|(_, atoms)| label.matches(atoms))
            .map(|(node, _)| *node)
            .collect()
    }

    /// The only node matching `label`, or `None` when zero or several match.
    ///
    /// Stops at the second match.
    pub fn single_matching_node(&self, label: &Label) -> Option<&'a Node> {
        let mut found = None;
        for (node, atoms) in &self.node_atoms {
            if label.matches(atoms) {
                if found.is_some() {
                    return None;
                }
                found = Some(*node);
            }
        }
        found
    }

    /// Clouds able to provision a node for `label`.
    pub fn provisioning_clouds(&self, label: &Label) -> impl Iterator<Item = &'a Cloud> + '_ {
        let label = label.clone();
        self.farm
            .clouds()
            .iter()
            .filter(move |cloud| cloud.can_provision(&label))
    }

    pub fn can_provision(&self, label: &Label) -> bool {
        self.farm.clouds().iter().any(|cloud| cloud.can_provision(label))
    }

    /// Returns `true` if a job with this label can run nowhere.
    ///
    /// - a label is orphaned when no node matches it and no cloud can provision it;
    /// - no label is orphaned when every node, controller included, is exclusive.
    pub fn is_orphan(&self, label: Option<&Label>) -> bool {
        match label {
            None => self.all_nodes_exclusive,
            Some(label) => {
                !self.node_atoms.iter().any(|(_, atoms)| label.matches(atoms))
                    && !self.can_provision(label)
            }
        }
    }

    /// Group jobs of all three sources by label, keeping labels accepted by `relevant`.
    ///
    /// Each group's matching nodes are computed once, when the group is created.
    pub fn group_jobs<F>(&self, relevant: F) -> BTreeMap<Label, JobsGroup<'a>>
    where
        F: Fn(&Label) -> bool,
    {
        let mut groups = BTreeMap::new();

        for (job, label) in self.labeled_jobs() {
            if relevant(label) {
                self.group_entry(&mut groups, label).add_job(job);
            }
        }

        for (label, triggered) in self.triggers.triggered_jobs_by_label() {
            if relevant(label) {
                self.group_entry(&mut groups, label)
                    .add_triggered_jobs(triggered.values().cloned());
            }
        }

        for (label, jobs) in self.triggers.jobs_by_default_label() {
            if relevant(label) {
                self.group_entry(&mut groups, label)
                    .add_jobs_with_default_value(jobs.iter().copied());
            }
        }

        for group in groups.values_mut() {
            group.sort();
        }
        groups
    }

    /// Every group, without filtering.
    pub fn group_jobs_by_label(&self) -> BTreeMap<Label, JobsGroup<'a>> {
        self.group_jobs(|_| true)
    }

    fn group_entry<'g>(
        &self,
        groups: &'g mut BTreeMap<Label, JobsGroup<'a>>,
        label: &Label,
    ) -> &'g mut JobsGroup<'a> {
        groups
            .entry(label.clone())
            .or_insert_with(|| JobsGroup::new(label.clone(), self.matching_nodes(label)))
    }
}

/// Flatten groups in display order: by label display string, with the group whose label is
/// exactly `focus` moved to the front.
pub fn ordered_groups<'a>(
    groups: BTreeMap<Label, JobsGroup<'a>>,
    focus: Option<&LabelAtom>,
) -> Vec<JobsGroup<'a>> {
    let mut ordered: Vec<_> = groups.into_values().collect();
    if let Some(focus) = focus {
        if let Some(pos) = ordered
            .iter()
            .position(|g| g.label().as_atom() == Some(focus))
        {
            let pinned = ordered.remove(pos);
            ordered.insert(0, pinned);
        }
    }
    ordered
}
