use lib::tt_fetch::helpers;
use lib::tt_fetch::models;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use helpers::{
    load_config, parse_timezone, prompt_line, render_timetable, resolve_credentials, RANGE_PROMPT,
};
use lib::tt_fetch::errors::ToolError;
use lib::tt_fetch::portal_session::PortalSession;
use lib::tt_fetch::range_parser::parse_range;
use lib::tt_fetch::run_tool::{run, today_in};
use log::{error, warn};
use models::Args;

async fn fetch_timetable(args: Args) -> Result<(), ToolError> {
    /* Get config and the range before touching the network */
    let config = load_config(&args.config_json_path)?;
    let tz = parse_timezone(&config.timezone)?;
    let expression = match args.range_expression() {
        Some(expression) => expression,
        None => prompt_line(RANGE_PROMPT, &mut io::stdin().lock())?,
    };
    let range = parse_range(&expression, today_in(&tz))?;

    /* Log in */
    let credentials = resolve_credentials(&config)?;
    let session =
        PortalSession::authenticate(reqwest::Client::new(), &config, &credentials).await?;

    /* Walk the weeks */
    match run(&session, range, tz).await {
        Ok(timetable) => {
            print!("{}", render_timetable(&timetable));
            Ok(())
        }
        Err(err) => {
            if !err.partial.is_empty() {
                warn!(
                    "Printing the {} day(s) fetched before the failure",
                    err.partial.len()
                );
                println!(
                    "Partial timetable, fetching stopped at week of {}:",
                    err.week_start.format("%d.%m.%Y")
                );
                print!("{}", render_timetable(&err.partial));
            }
            Err(err.into())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    /* Setup logging */
    env_logger::builder()
        .target(env_logger::Target::Stderr)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    match fetch_timetable(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
