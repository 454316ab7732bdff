use std::collections::{BTreeMap, BTreeSet};

use ljobs_model::{Label, LabelAtom, Node};
use tracing::{debug, instrument};

use super::{
    ReportBuilder,
    view::{
        DashboardView, GroupView, JobRef, LabelAtomData, NodeData, OrphanedJob, OrphanedJobs,
        OrphanedTriggeredJob, SingleNodeJobs,
    },
};

#[derive(Default)]
struct AtomTally {
    jobs: usize,
    triggered_jobs: usize,
    jobs_with_default_value: usize,
    nodes: usize,
}

fn tally_atoms(
    tally: &mut BTreeMap<LabelAtom, AtomTally>,
    self_labels: &BTreeSet<LabelAtom>,
    label: &Label,
    add: impl Fn(&mut AtomTally),
) {
    for atom in label.atoms() {
        if !self_labels.contains(&atom) {
            add(tally.entry(atom).or_default());
        }
    }
}

impl<'a> ReportBuilder<'a> {
    /// Farm-wide view. Optional sections follow the report settings.
    #[instrument(level = "debug", skip(self))]
    pub fn dashboard(&self) -> DashboardView {
        let view = DashboardView {
            labels: self.labels_data(),
            nodes: self.nodes_data(),
            orphaned: self.orphaned_jobs(),
            orphaned_jobs_detailed_view: self.settings.dashboard_orphaned_jobs_detailed_view,
            single_node: self
                .settings
                .show_single_node_jobs
                .then(|| self.single_node_jobs()),
            labelless_jobs: self
                .settings
                .show_labelless_jobs
                .then(|| self.labelless_jobs()),
        };
        debug!(
            labels = view.labels.len(),
            orphaned = view.orphaned.len(),
            "dashboard built"
        );
        view
    }

    /// Per-atom aggregation, sorted by atom. Node self labels are left out.
    ///
    /// A compound label counts towards every atom it references.
    pub fn labels_data(&self) -> Vec<LabelAtomData> {
        let ctx = &self.ctx;
        let self_labels = ctx.self_labels();
        let mut tally: BTreeMap<LabelAtom, AtomTally> = BTreeMap::new();

        for (_, label) in ctx.labeled_jobs() {
            tally_atoms(&mut tally, self_labels, label, |t: &mut AtomTally| t.jobs += 1);
        }
        for (label, triggered) in ctx.triggers().triggered_jobs_by_label() {
            tally_atoms(&mut tally, self_labels, label, |t: &mut AtomTally| {
                t.triggered_jobs += triggered.len()
            });
        }
        for (label, jobs) in ctx.triggers().jobs_by_default_label() {
            tally_atoms(&mut tally, self_labels, label, |t: &mut AtomTally| {
                t.jobs_with_default_value += jobs.len()
            });
        }

        for node in ctx.farm().all_nodes() {
            for atom in node.static_atoms() {
                if !self_labels.contains(&atom) {
                    tally.entry(atom).or_default().nodes += 1;
                }
            }
        }

        tally
            .into_iter()
            .map(|(atom, t)| {
                let label = Label::atom(atom.clone());
                let config = ctx.farm().label_config(&atom);
                LabelAtomData {
                    label: atom.to_string(),
                    label_url: atom.url(),
                    jobs_count: t.jobs,
                    triggered_jobs_count: t.triggered_jobs,
                    jobs_with_default_value_count: t.jobs_with_default_value,
                    nodes_count: t.nodes,
                    clouds_count: ctx.provisioning_clouds(&label).count(),
                    active: config.is_some(),
                    has_description: config.is_some_and(|c| c.description().is_some()),
                }
            })
            .collect()
    }

    /// Per-node aggregation of labels naming the node explicitly, sorted by display name.
    pub fn nodes_data(&self) -> Vec<NodeData> {
        let ctx = &self.ctx;
        let mut data: Vec<NodeData> = ctx
            .farm()
            .all_nodes()
            .map(|node| {
                let self_label = node.self_label();
                NodeData {
                    name: node.display_name().to_string(),
                    label_url: self_label.url(),
                    node_url: node.url(),
                    jobs_count: ctx
                        .labeled_jobs()
                        .filter(|(_, label)| label.references(&self_label))
                        .count(),
                    triggered_jobs_count: ctx
                        .triggers()
                        .triggered_jobs_by_label()
                        .iter()
                        .filter(|(label, _)| label.references(&self_label))
                        .map(|(_, triggered)| triggered.len())
                        .sum(),
                }
            })
            .collect();
        data.sort_by(|a, b| a.name.cmp(&b.name));
        data
    }

    /// Jobs of all three sources whose label can run nowhere, sorted by job name.
    pub fn orphaned_jobs(&self) -> OrphanedJobs {
        let ctx = &self.ctx;

        let jobs = ctx
            .jobs()
            .filter(|(_, label)| ctx.is_orphan(*label))
            .map(|(job, label)| OrphanedJob {
                job: job.into(),
                label: label.map(|l| l.display_name().to_string()),
            })
            .collect();

        let mut triggered_jobs: Vec<OrphanedTriggeredJob> = ctx
            .triggers()
            .triggered_jobs_by_label()
            .iter()
            .filter(|(label, _)| ctx.is_orphan(Some(*label)))
            .flat_map(|(label, triggered)| {
                triggered.values().map(move |t| OrphanedTriggeredJob {
                    label: label.display_name().to_string(),
                    job: t.job().into(),
                    triggered_by: t.triggering_jobs().iter().map(|&j| j.into()).collect(),
                })
            })
            .collect();
        triggered_jobs.sort_by(|a, b| a.job.name.cmp(&b.job.name).then(a.label.cmp(&b.label)));

        let mut jobs_with_default_value: Vec<OrphanedJob> = ctx
            .triggers()
            .jobs_by_default_label()
            .iter()
            .filter(|(label, _)| ctx.is_orphan(Some(*label)))
            .flat_map(|(label, jobs)| {
                jobs.iter().map(move |&job| OrphanedJob {
                    job: job.into(),
                    label: Some(label.display_name().to_string()),
                })
            })
            .collect();
        jobs_with_default_value
            .sort_by(|a, b| a.job.name.cmp(&b.job.name).then(a.label.cmp(&b.label)));

        OrphanedJobs {
            jobs,
            triggered_jobs,
            jobs_with_default_value,
        }
    }

    /// Groups matching exactly one node, bucketed by that node and sorted by node name.
    pub fn single_node_jobs(&self) -> Vec<SingleNodeJobs> {
        let mut by_node: BTreeMap<&str, (&Node, Vec<GroupView>)> = BTreeMap::new();

        for group in self.ctx.group_jobs_by_label().values() {
            if let Some(node) = self.ctx.single_matching_node(group.label()) {
                by_node
                    .entry(node.name.as_str())
                    .or_insert_with(|| (node, Vec::new()))
                    .1
                    .push(group.into());
            }
        }

        by_node
            .into_values()
            .map(|(node, groups)| SingleNodeJobs {
                node: node.into(),
                groups,
            })
            .collect()
    }

    /// Jobs without any label, sorted by job name.
    pub fn labelless_jobs(&self) -> Vec<JobRef> {
        self.ctx.labelless_jobs().map(JobRef::from).collect()
    }
}
