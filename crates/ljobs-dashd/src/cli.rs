use std::{net::SocketAddr, path::PathBuf};

use clap::{Parser, Subcommand};

use crate::config::DashdConfig;

#[derive(Debug, Parser)]
#[command(name = "ljobs-dashd")]
#[command(about = "Label affinity reports for a build farm snapshot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Daemon config file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Farm snapshot file, overrides the config
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Log level filter, overrides the config (e.g. "debug" or "ljobs_core=trace,info")
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the JSON HTTP API
    Serve {
        /// Listen address, overrides the config
        #[arg(long)]
        listen: Option<SocketAddr>,
    },
    #[command(flatten)]
    Report(ReportCommand),
}

/// One-shot reports printed to stdout as JSON.
#[derive(Debug, Clone, Subcommand)]
pub enum ReportCommand {
    /// Farm-wide dashboard
    Dashboard,
    /// Per-atom aggregation
    Labels,
    /// Per-node aggregation
    Nodes,
    /// Every label expression referencing one atom
    Label { atom: String },
    /// Jobs tied to one node
    Node { name: String },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, cfg: &mut DashdConfig) -> anyhow::Result<()> {
        if let Some(snapshot) = &self.snapshot {
            cfg.snapshot_path = snapshot.clone();
        }
        if let Some(level) = &self.log_level {
            cfg.logger.level = level.parse()?;
        }
        if let Command::Serve {
            listen: Some(listen),
        } = &self.command
        {
            cfg.listen = *listen;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_subcommands() {
        let cli = Cli::try_parse_from(["ljobs-dashd", "label", "jdk7", "--snapshot", "farm.json"])
            .unwrap();
        assert!(matches!(
            &cli.command,
            Command::Report(ReportCommand::Label { atom }) if atom == "jdk7"
        ));
        assert_eq!(cli.snapshot, Some(PathBuf::from("farm.json")));

        let cli = Cli::try_parse_from(["ljobs-dashd", "dashboard"]).unwrap();
        assert!(matches!(cli.command, Command::Report(ReportCommand::Dashboard)));
    }

    #[test]
    fn overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "ljobs-dashd",
            "serve",
            "--listen",
            "0.0.0.0:9999",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let mut cfg = DashdConfig::default();
        cli.apply(&mut cfg).unwrap();

        assert_eq!(cfg.listen.port(), 9999);
        assert_eq!(cfg.logger.level.as_str(), "debug");
    }

    #[test]
    fn bad_log_level_is_an_error() {
        let cli = Cli::try_parse_from(["ljobs-dashd", "nodes", "--log-level", " "]).unwrap();
        assert!(cli.apply(&mut DashdConfig::default()).is_err());
    }

    #[test]
    fn node_requires_a_name() {
        assert!(Cli::try_parse_from(["ljobs-dashd", "node"]).is_err());
    }
}
