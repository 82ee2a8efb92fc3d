use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

pub mod advisor_model;

use advisor_model::YearMonth;

/// A model for describing ARGS of the tool.
/// Consists of:
/// 1. Path to config.json, that contains the connection parameters of the advisors table.
/// 2. Optional path to a JSON export of the advisors table. When given, the tool works on that file instead of the REST endpoint.
/// 3. Months whose calendars should be recomputed, in `YYYY-MM` form.
/// 4. Optional search query restricting the run to matching advisors.
/// 5. Dry run switch: report the changes without writing them.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config_json_path: PathBuf,
    #[arg(long, value_name = "FILE")]
    pub advisors_json_path: Option<PathBuf>,
    #[arg(long = "month", value_name = "YYYY-MM", required = true)]
    pub months: Vec<YearMonth>,
    #[arg(long, value_name = "QUERY")]
    pub search: Option<String>,
    #[arg(long)]
    pub dry_run: bool,
}

/// A model for describing configuration of the tool.
/// Consists of:
/// 1. Base URL of the REST endpoint in front of the database
/// 2. API key, sent both as `apikey` and as a bearer token
/// 3. Name of the advisors table
/// 4. Timeout of a single request, in seconds
#[derive(Deserialize, Debug)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_table() -> String {
    "scientific_advisors".to_owned()
}

fn default_request_timeout_secs() -> u64 {
    10
}
