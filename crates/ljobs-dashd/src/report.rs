use ljobs_core::{catalog::Farm, report::ReportBuilder, settings::ReportSettings};
use ljobs_model::FarmSnapshot;

use crate::cli::ReportCommand;

/// Build the requested report and encode it as pretty JSON.
pub fn render(
    command: &ReportCommand,
    snapshot: &FarmSnapshot,
    settings: ReportSettings,
) -> anyhow::Result<String> {
    let builder = ReportBuilder::new(Farm::from_snapshot(snapshot), settings);
    let json = match command {
        ReportCommand::Dashboard => serde_json::to_string_pretty(&builder.dashboard())?,
        ReportCommand::Labels => serde_json::to_string_pretty(&builder.labels_data())?,
        ReportCommand::Nodes => serde_json::to_string_pretty(&builder.nodes_data())?,
        ReportCommand::Label { atom } => serde_json::to_string_pretty(&builder.label_report(atom)?)?,
        ReportCommand::Node { name } => serde_json::to_string_pretty(&builder.node_report(name)?)?,
    };
    Ok(json)
}
