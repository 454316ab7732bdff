//! Trigger graph extraction.
//!
//! Scans every job's trigger configuration and label parameters and produces two mappings:
//! - label → downstream job → upstream jobs triggering it with that label;
//! - label → jobs whose label parameter defaults to it.
//!
//! Label strings holding build-time macros (`${VAR}`, `$VAR`) cannot be resolved here and are
//! dropped from the analysis.
use std::collections::BTreeMap;

use ljobs_model::{Job, Label, TriggerParameter, parse_properties};
use tracing::{debug, instrument, warn};

use crate::catalog::Farm;

/// Returns `true` if `label` can be parsed outside of a build context.
///
/// Rejected:
/// - `None`;
/// - text containing `${` followed later by `}`;
/// - text containing `$` directly followed by a letter or `_`.
///
/// A `$` followed by anything else (whitespace, end of text, ...) is kept as a plain character.
pub fn is_supported_label(label: Option<&str>) -> bool {
    let Some(label) = label else {
        return false;
    };

    if let Some(start) = label.find("${") {
        if label[start..].contains('}') {
            return false;
        }
    }

    let mut chars = label.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '$' && chars.peek().is_some_and(|&n| n.is_alphabetic() || n == '_') {
            return false;
        }
    }
    true
}

/// A downstream job and the upstream jobs triggering it under one label.
#[derive(Clone, Debug)]
pub struct TriggeredJob<'a> {
    job: &'a Job,
    triggering_jobs: Vec<&'a Job>,
}

impl<'a> TriggeredJob<'a> {
    pub fn new(job: &'a Job, triggering_job: &'a Job) -> Self {
        Self {
            job,
            triggering_jobs: vec![triggering_job],
        }
    }

    /// Record another upstream job. Already known upstream jobs are ignored.
    pub fn add_triggering_job(&mut self, triggering_job: &'a Job) {
        if !self
            .triggering_jobs
            .iter()
            .any(|known| known.name == triggering_job.name)
        {
            self.triggering_jobs.push(triggering_job);
        }
    }

    pub fn job(&self) -> &'a Job {
        self.job
    }

    /// Upstream jobs in the order they were first seen.
    pub fn triggering_jobs(&self) -> &[&'a Job] {
        &self.triggering_jobs
    }
}

pub type TriggeredJobs<'a> = BTreeMap<&'a str, TriggeredJob<'a>>;

/// Both label mappings extracted from the farm's job configuration.
#[derive(Clone, Debug, Default)]
pub struct TriggerGraph<'a> {
    triggered_by_label: BTreeMap<Label, TriggeredJobs<'a>>,
    default_by_label: BTreeMap<Label, Vec<&'a Job>>,
}

impl<'a> TriggerGraph<'a> {
    /// Scan all jobs of `farm`.
    ///
    /// Returns an empty graph when the trigger integrations are not available.
    #[instrument(level = "debug", skip(farm), fields(jobs = farm.jobs().len()))]
    pub fn extract(farm: &Farm<'a>) -> Self {
        let mut graph = Self::default();

        if !farm.integrations().trigger_labels_available() {
            debug!("trigger integrations unavailable, skipping trigger analysis");
            return graph;
        }

        for job in farm.jobs() {
            graph.scan_label_defaults(job);
            graph.scan_triggers(farm, job);
        }

        debug!(
            triggered_labels = graph.triggered_by_label.len(),
            default_labels = graph.default_by_label.len(),
            "trigger graph extracted"
        );
        graph
    }

    /// label → downstream job name → triggered job entry.
    pub fn triggered_jobs_by_label(&self) -> &BTreeMap<Label, TriggeredJobs<'a>> {
        &self.triggered_by_label
    }

    /// label → jobs whose label parameter defaults to it.
    pub fn jobs_by_default_label(&self) -> &BTreeMap<Label, Vec<&'a Job>> {
        &self.default_by_label
    }

    pub fn is_empty(&self) -> bool {
        self.triggered_by_label.is_empty() && self.default_by_label.is_empty()
    }

    fn scan_label_defaults(&mut self, job: &'a Job) {
        for default in job.label_defaults() {
            let Some(label) = supported_label(Some(default), job) else {
                continue;
            };
            let jobs = self.default_by_label.entry(label).or_default();
            if !jobs.iter().any(|known| known.name == job.name) {
                jobs.push(job);
            }
        }
    }

    fn scan_triggers(&mut self, farm: &Farm<'a>, upstream: &'a Job) {
        for config in &upstream.triggers {
            let downstream: Vec<&'a Job> = config
                .project_names()
                .filter_map(|name| {
                    let found = farm.job(name);
                    if found.is_none() {
                        debug!(job = %upstream.name, downstream = name, "triggered job not found");
                    }
                    found
                })
                .collect();

            for parameter in &config.parameters {
                match parameter {
                    TriggerParameter::DirectOverride { label }
                    | TriggerParameter::AllNodesForLabel { label } => {
                        self.add_triggered(label.as_deref(), &downstream, upstream);
                    }
                    TriggerParameter::PredefinedProperties { properties } => {
                        self.scan_properties(properties, &downstream, upstream);
                    }
                }
            }
        }
    }

    fn scan_properties(&mut self, properties: &str, downstream: &[&'a Job], upstream: &'a Job) {
        for entry in parse_properties(properties) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(job = %upstream.name, error = %e, "skipping predefined property");
                    continue;
                }
            };

            for &target in downstream {
                if target.has_label_parameter(entry.key()) {
                    self.add_triggered(Some(entry.value()), &[target], upstream);
                }
            }
        }
    }

    fn add_triggered(&mut self, text: Option<&str>, downstream: &[&'a Job], upstream: &'a Job) {
        if downstream.is_empty() {
            return;
        }
        let Some(label) = supported_label(text, upstream) else {
            return;
        };

        let triggered = self.triggered_by_label.entry(label).or_default();
        for &job in downstream {
            triggered
                .entry(job.name.as_str())
                .and_modify(|t| t.add_triggering_job(upstream))
                .or_insert_with(|| TriggeredJob::new(job, upstream));
        }
    }
}

fn supported_label(text: Option<&str>, job: &Job) -> Option<Label> {
    if !is_supported_label(text) {
        debug!(job = %job.name, label = ?text, "skipping unresolvable label");
        return None;
    }

    match Label::parse_optional(text?) {
        Ok(label) => label,
        Err(e) => {
            warn!(job = %job.name, error = %e, "skipping malformed label");
            None
        }
    }
}
