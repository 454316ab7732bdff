//! Report builder.
//!
//! Turns a [`ResolverContext`] into the three views the presentation layer consumes:
//! a label-focused view, a node-focused view and the farm-wide dashboard.
mod dashboard;
mod view;

pub use view::{
    DashboardView, GroupView, JobRef, LabelAtomData, LabelView, NodeData, NodeRef, NodeView,
    OrphanedJob, OrphanedJobs, OrphanedTriggeredJob, SingleNodeJobs, TriggeredJobView,
};

use ljobs_model::{LabelAtom, Node};
use tracing::{debug, instrument};

use crate::{
    catalog::Farm,
    error::{CoreError, CoreResult},
    resolver::{JobsGroup, ResolverContext, ordered_groups},
    settings::ReportSettings,
};

/// Builds report views from one resolution of the farm.
#[derive(Debug)]
pub struct ReportBuilder<'a> {
    ctx: ResolverContext<'a>,
    settings: ReportSettings,
}

impl<'a> ReportBuilder<'a> {
    /// Resolve `farm` and prepare a builder over the result.
    pub fn new(farm: Farm<'a>, settings: ReportSettings) -> Self {
        Self::from_context(ResolverContext::resolve(farm), settings)
    }

    pub fn from_context(ctx: ResolverContext<'a>, settings: ReportSettings) -> Self {
        Self { ctx, settings }
    }

    pub fn context(&self) -> &ResolverContext<'a> {
        &self.ctx
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Every group whose label references `atom`, the group for the bare atom first.
    #[instrument(level = "debug", skip(self))]
    pub fn label_report(&self, atom: &str) -> CoreResult<LabelView> {
        let name = atom.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidAtom(atom.to_string()));
        }
        let focus = LabelAtom::new(name);

        let groups = self.ctx.group_jobs(|label| label.references(&focus));
        let groups: Vec<GroupView> = ordered_groups(groups, Some(&focus))
            .iter()
            .map(GroupView::from)
            .collect();
        debug!(groups = groups.len(), "label report built");

        let config = self.ctx.farm().label_config(&focus);
        Ok(LabelView {
            label: focus.to_string(),
            title: format!("{focus} Linked Jobs"),
            active: config.is_some(),
            description: config.and_then(|c| c.description()).map(str::to_string),
            detailed_view: self.settings.detailed_view,
            groups,
        })
    }

    /// Exclusive and linked groups of the node named `name`.
    #[instrument(level = "debug", skip(self))]
    pub fn node_report(&self, name: &str) -> CoreResult<NodeView> {
        let node = self
            .ctx
            .farm()
            .node(name)
            .ok_or_else(|| CoreError::UnknownNode(name.to_string()))?;

        let linked = self.linked_groups(node);
        let exclusive = linked.iter().filter(|g| g.is_single_node());

        Ok(NodeView {
            node: node.into(),
            labels: node.static_atoms().iter().map(ToString::to_string).collect(),
            detailed_view: self.settings.detailed_view,
            show_single_node_jobs: self.settings.show_single_node_jobs,
            exclusive_groups: exclusive.map(GroupView::from).collect(),
            linked_groups: linked.iter().map(GroupView::from).collect(),
        })
    }

    /// Groups whose label matches `node`, sorted by label.
    pub fn linked_groups(&self, node: &Node) -> Vec<JobsGroup<'a>> {
        let atoms = node.assigned_atoms();
        ordered_groups(self.ctx.group_jobs(|label| label.matches(&atoms)), None)
    }

    /// Groups whose label matches `node` and no other node, sorted by label.
    pub fn exclusive_groups(&self, node: &Node) -> Vec<JobsGroup<'a>> {
        self.linked_groups(node)
            .into_iter()
            .filter(JobsGroup::is_single_node)
            .collect()
    }
}
