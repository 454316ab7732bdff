use ljobs_model::{Job, Label, Node};

use crate::trigger::TriggeredJob;

/// Jobs sharing one label expression, together with the nodes that expression matches.
///
/// Three independent sources feed a group:
/// - jobs assigned the label directly;
/// - jobs triggered by other jobs with the label as node override;
/// - jobs whose label parameter defaults to the label.
#[derive(Clone, Debug)]
pub struct JobsGroup<'a> {
    label: Label,
    nodes: Vec<&'a Node>,
    jobs: Vec<&'a Job>,
    triggered_jobs: Vec<TriggeredJob<'a>>,
    jobs_with_default_value: Vec<&'a Job>,
}

impl<'a> JobsGroup<'a> {
    /// Create an empty group. `nodes` must be the label's full matching set.
    pub fn new(label: Label, nodes: Vec<&'a Node>) -> Self {
        Self {
            label,
            nodes,
            jobs: Vec::new(),
            triggered_jobs: Vec::new(),
            jobs_with_default_value: Vec::new(),
        }
    }

    pub fn add_job(&mut self, job: &'a Job) {
        self.jobs.push(job);
    }

    pub fn add_triggered_jobs(&mut self, jobs: impl IntoIterator<Item = TriggeredJob<'a>>) {
        self.triggered_jobs.extend(jobs);
    }

    pub fn add_jobs_with_default_value(&mut self, jobs: impl IntoIterator<Item = &'a Job>) {
        self.jobs_with_default_value.extend(jobs);
    }

    pub(crate) fn sort(&mut self) {
        self.jobs.sort_by(|a, b| a.name.cmp(&b.name));
        self.triggered_jobs
            .sort_by(|a, b| a.job().name.cmp(&b.job().name));
        self.jobs_with_default_value
            .sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Controller first (when it matches), then worker nodes in catalog order.
    pub fn nodes(&self) -> &[&'a Node] {
        &self.nodes
    }

    pub fn jobs(&self) -> &[&'a Job] {
        &self.jobs
    }

    pub fn triggered_jobs(&self) -> &[TriggeredJob<'a>] {
        &self.triggered_jobs
    }

    pub fn jobs_with_default_value(&self) -> &[&'a Job] {
        &self.jobs_with_default_value
    }

    pub fn jobs_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn triggered_jobs_count(&self) -> usize {
        self.triggered_jobs.len()
    }

    pub fn jobs_with_default_value_count(&self) -> usize {
        self.jobs_with_default_value.len()
    }

    /// Returns `true` if exactly one node matches the label.
    pub fn is_single_node(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns `true` if the three collections hold more than one entry in total.
    pub fn has_more_than_one_job(&self) -> bool {
        self.jobs.len() + self.triggered_jobs.len() + self.jobs_with_default_value.len() > 1
    }
}
