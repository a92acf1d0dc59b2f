use std::{
    fmt::Write as _,
    io::{self, BufRead, Write},
    path::Path,
};

use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use log::info;

use super::{
    accumulator::TimetableByDay,
    errors::ToolError,
    models::{Config, Credentials},
};

pub const RANGE_PROMPT: &str = "Specify a timetable date range (eg. \"04.11.2024 - 09.11.2024\", or nothing to fetch current day, or \"week\" for current week): ";

pub fn load_config(config_json_path: &Path) -> Result<Config, ToolError> {
    let config: Config = Figment::new()
        .merge(Json::file(config_json_path))
        .merge(Env::prefixed("TT_"))
        .extract()?;
    info!(
        "Read config from {}",
        std::path::absolute(config_json_path)?.display()
    );
    Ok(config)
}

pub fn parse_timezone(name: &str) -> Result<Tz, ToolError> {
    name.parse::<Tz>()
        .map_err(|_| ToolError::TimeZone(name.to_owned()))
}

/// Prints `prompt` on stderr and reads one line from `input`, without the newline.
pub fn prompt_line<R: BufRead>(prompt: &str, input: &mut R) -> io::Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// Config values win, whatever is missing is asked for.
pub fn resolve_credentials(config: &Config) -> Result<Credentials, ToolError> {
    let login = match &config.login {
        Some(login) => login.clone(),
        None => prompt_line("Username: ", &mut io::stdin().lock())?,
    };
    let password = match &config.password {
        Some(password) => password.clone(),
        None => rpassword::prompt_password_stderr("Password: ")?,
    };
    Ok(Credentials { login, password })
}

/// Days in the order they were collected, each followed by its tiles.
/// Every tile is closed by a blank line.
pub fn render_timetable(timetable: &TimetableByDay) -> String {
    let mut out = String::new();
    for day in timetable.days() {
        let _ = write!(out, "\n\n{}\n", day.key);
        for slot in &day.slots {
            let _ = write!(out, "\n{}\n\n", slot.tile);
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/helpers.rs"]
mod tests;
