use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

pub mod tile_model;

/// A model for describing ARGS of the tool.
/// Consists of:
/// 1. Free-form date range, e.g. `04.11.2024 - 09.11.2024`, `week` or nothing for today.
///    Several words are joined back with single spaces, so quoting is optional.
/// 2. Path to config.json, that contains portal address and optionally credentials.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(value_name = "RANGE")]
    pub range: Vec<String>,
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config_json_path: PathBuf,
}

impl Args {
    /// The range words joined back together, `None` when nothing was given.
    pub fn range_expression(&self) -> Option<String> {
        if self.range.is_empty() {
            None
        } else {
            Some(self.range.join(" "))
        }
    }
}

fn default_timezone() -> String {
    "Europe/Warsaw".to_owned()
}

/// A model for describing configuration of the tool.
/// Consists of:
/// 1. Portal domain, e.g. `dziekanat.example.edu.pl`
/// 2. School code, the prefix of `<code>-stud-app`
/// 3. Login and password, prompted for when absent
/// 4. IANA time zone the portal reports its timestamps in
/// 5. Directory for raw response snapshots, nothing is written when absent
/// 6. User-Agent override
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub domain: String,
    pub school_code: String,
    pub login: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub snapshot_dir: Option<PathBuf>,
    pub user_agent: Option<String>,
}

/// Login and password pair handed to the portal.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}
