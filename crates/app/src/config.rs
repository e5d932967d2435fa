use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tripsync.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Script endpoint serving the trip document.
    pub remote_url: String,
    /// Directory holding `trip_data.json` and `sync_queue.json`.
    pub data_dir: String,
    pub refresh_interval_secs: u64,
    pub probe_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub currency_symbol: String,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote_url: String::new(),
            data_dir: ".tripsync".to_string(),
            refresh_interval_secs: 300,
            probe_interval_secs: 30,
            request_timeout_secs: 15,
            currency_symbol: engine::DEFAULT_SYMBOL.to_string(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tripsync", disable_version_flag = true)]
#[command(about = "Shared trip ledger that keeps working offline")]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the remote endpoint URL.
    #[arg(long)]
    remote_url: Option<String>,
    /// Override the local data directory.
    #[arg(long)]
    data_dir: Option<String>,
    /// Override the log level (e.g. debug).
    #[arg(long)]
    level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Sync state, pending commands and trip progress.
    Status,
    /// Per-participant balances.
    Balances {
        /// Roll balances up by group.
        #[arg(long)]
        groups: bool,
    },
    /// Who `name` should pay or collect from.
    Debts { name: String },
    /// Records an expense.
    AddExpense {
        #[arg(long)]
        desc: String,
        /// Amount such as `1250` or `99,50`.
        #[arg(long)]
        amount: String,
        #[arg(long)]
        payer: String,
        /// Single beneficiary; omit to split equally.
        #[arg(long)]
        beneficiary: Option<String>,
        #[arg(long, default_value = "Misc")]
        category: String,
        /// Defaults to today (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
    },
    /// Marks an itinerary stop as visited.
    ToggleVisit {
        index: usize,
        /// Mark as not visited instead.
        #[arg(long)]
        undo: bool,
    },
    /// Marks a checklist item as packed.
    TogglePack {
        item: String,
        /// Mark as not packed instead.
        #[arg(long)]
        undo: bool,
    },
    /// Refreshes from the remote and delivers queued commands.
    Sync,
    /// Keeps syncing until Ctrl-C.
    Run,
}

pub fn load() -> Result<(AppConfig, Command)> {
    resolve(Args::parse())
}

fn resolve(args: Args) -> Result<(AppConfig, Command)> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TRIPSYNC"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(remote_url) = args.remote_url {
        settings.remote_url = remote_url;
    }
    if let Some(data_dir) = args.data_dir {
        settings.data_dir = data_dir;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }

    Ok((settings, args.command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_file(contents: &str) -> String {
        let dir = std::path::Path::new("target").join("test_configs");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn file_values_and_flag_overrides() {
        let path = config_file(
            "remote_url = \"https://script.example/exec\"\nprobe_interval_secs = 5\nlevel = \"warn\"\n",
        );
        let args = Args::try_parse_from([
            "tripsync",
            "--config",
            &path,
            "--level",
            "debug",
            "balances",
            "--groups",
        ])
        .unwrap();

        let (settings, command) = resolve(args).unwrap();
        assert_eq!(settings.remote_url, "https://script.example/exec");
        assert_eq!(settings.probe_interval_secs, 5);
        assert_eq!(settings.refresh_interval_secs, 300);
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(command, Command::Balances { groups: true });
    }

    #[test]
    fn add_expense_arguments() {
        let args = Args::try_parse_from([
            "tripsync",
            "--config",
            "target/test_configs/missing",
            "add-expense",
            "--desc",
            "dinner",
            "--amount",
            "90",
            "--payer",
            "Bob",
            "--beneficiary",
            "Carol",
        ])
        .unwrap();
        let Command::AddExpense {
            beneficiary,
            category,
            date,
            ..
        } = args.command
        else {
            panic!("expected add-expense");
        };
        assert_eq!(beneficiary.as_deref(), Some("Carol"));
        assert_eq!(category, "Misc");
        assert_eq!(date, None);
    }
}
