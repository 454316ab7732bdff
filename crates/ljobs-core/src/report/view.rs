//! Display-ready shapes produced by the report builder.
//!
//! Everything here is owned and serializable so it can outlive the snapshot it was built from.
use serde::{Deserialize, Serialize};

use ljobs_model::{Job, Node};

use crate::{resolver::JobsGroup, trigger::TriggeredJob};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRef {
    pub name: String,
    pub display_name: String,
    pub url: String,
}

impl From<&Job> for JobRef {
    fn from(job: &Job) -> Self {
        Self {
            name: job.name.clone(),
            display_name: job.display_name().to_string(),
            url: job.url(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRef {
    pub name: String,
    pub display_name: String,
    pub url: String,
}

impl From<&Node> for NodeRef {
    fn from(node: &Node) -> Self {
        Self {
            name: node.name.clone(),
            display_name: node.display_name().to_string(),
            url: node.url(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredJobView {
    pub job: JobRef,
    pub triggered_by: Vec<JobRef>,
}

impl From<&TriggeredJob<'_>> for TriggeredJobView {
    fn from(triggered: &TriggeredJob<'_>) -> Self {
        Self {
            job: triggered.job().into(),
            triggered_by: triggered
                .triggering_jobs()
                .iter()
                .map(|&job| job.into())
                .collect(),
        }
    }
}

/// One label with its matching nodes and the jobs tied to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub label: String,
    pub label_url: String,
    pub nodes: Vec<NodeRef>,
    pub jobs: Vec<JobRef>,
    pub triggered_jobs: Vec<TriggeredJobView>,
    pub jobs_with_default_value: Vec<JobRef>,
    pub single_node: bool,
    pub has_more_than_one_job: bool,
}

impl From<&JobsGroup<'_>> for GroupView {
    fn from(group: &JobsGroup<'_>) -> Self {
        Self {
            label: group.label().display_name().to_string(),
            label_url: group.label().url(),
            nodes: group.nodes().iter().map(|&node| node.into()).collect(),
            jobs: group.jobs().iter().map(|&job| job.into()).collect(),
            triggered_jobs: group.triggered_jobs().iter().map(Into::into).collect(),
            jobs_with_default_value: group
                .jobs_with_default_value()
                .iter()
                .map(|&job| job.into())
                .collect(),
            single_node: group.is_single_node(),
            has_more_than_one_job: group.has_more_than_one_job(),
        }
    }
}

impl GroupView {
    pub fn job_names(&self) -> Vec<&str> {
        self.jobs.iter().map(|j| j.name.as_str()).collect()
    }

    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }
}

/// Every label expression referencing one atom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelView {
    pub label: String,
    pub title: String,
    /// The linked-jobs page is switched on for this atom.
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub detailed_view: bool,
    pub groups: Vec<GroupView>,
}

/// Jobs tied to one node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub node: NodeRef,
    /// Static labels, self label excluded.
    pub labels: Vec<String>,
    pub detailed_view: bool,
    pub show_single_node_jobs: bool,
    /// Groups whose label matches this node and no other.
    pub exclusive_groups: Vec<GroupView>,
    /// Groups whose label matches this node, possibly among others.
    pub linked_groups: Vec<GroupView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelAtomData {
    pub label: String,
    pub label_url: String,
    pub jobs_count: usize,
    pub triggered_jobs_count: usize,
    pub jobs_with_default_value_count: usize,
    pub nodes_count: usize,
    pub clouds_count: usize,
    /// The linked-jobs page is switched on for this atom.
    pub active: bool,
    pub has_description: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub name: String,
    pub label_url: String,
    pub node_url: String,
    pub jobs_count: usize,
    pub triggered_jobs_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedJob {
    pub job: JobRef,
    /// `None` for unconstrained jobs on a farm where every node is exclusive.
    pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedTriggeredJob {
    pub label: String,
    pub job: JobRef,
    pub triggered_by: Vec<JobRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedJobs {
    pub jobs: Vec<OrphanedJob>,
    pub triggered_jobs: Vec<OrphanedTriggeredJob>,
    pub jobs_with_default_value: Vec<OrphanedJob>,
}

impl OrphanedJobs {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty() && self.triggered_jobs.is_empty() && self.jobs_with_default_value.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len() + self.triggered_jobs.len() + self.jobs_with_default_value.len()
    }
}

/// Groups that can only run on `node`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleNodeJobs {
    pub node: NodeRef,
    pub groups: Vec<GroupView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub labels: Vec<LabelAtomData>,
    pub nodes: Vec<NodeData>,
    pub orphaned: OrphanedJobs,
    pub orphaned_jobs_detailed_view: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_node: Option<Vec<SingleNodeJobs>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labelless_jobs: Option<Vec<JobRef>>,
}
