use std::io::Cursor;

use crate::tt_fetch::{
    accumulator::merge,
    range_parser::parse_range,
    test_support::{at, day, tile},
};

use super::*;

#[test]
fn timetable_renders_days_in_collected_order() {
    let range = parse_range("04.11.2024 - 09.11.2024", day(1, 1, 2024)).unwrap();
    let timetable = merge(
        &[
            (2, tile(at(6, 11, 2024, 9, 45), "Programowanie")),
            (1, tile(at(4, 11, 2024, 10, 0), "Fizyka")),
            (0, tile(at(4, 11, 2024, 8, 15), "Analiza matematyczna")),
        ],
        &range,
    );
    assert_eq!(
        render_timetable(&timetable),
        "\n\n06.11.\n\
         \n09:45 - 11:15\nProgramowanie\nC-13 s. 1.27\ndr inż. Anna Nowak\n\n\
         \n\n04.11.\n\
         \n08:15 - 09:45\nAnaliza matematyczna\nC-13 s. 1.27\ndr inż. Anna Nowak\n\n\
         \n10:00 - 11:30\nFizyka\nC-13 s. 1.27\ndr inż. Anna Nowak\n\n"
    );
}

#[test]
fn empty_timetable_renders_nothing() {
    assert_eq!(render_timetable(&TimetableByDay::new()), "");
}

#[test]
fn prompt_line_strips_line_ending() {
    let mut input = Cursor::new("04.11 - 09\r\nleftover\n");
    assert_eq!(prompt_line("Range: ", &mut input).unwrap(), "04.11 - 09");
    let mut empty = Cursor::new("");
    assert_eq!(prompt_line("Range: ", &mut empty).unwrap(), "");
}

#[test]
fn known_and_unknown_time_zones() {
    assert_eq!(
        parse_timezone("Europe/Warsaw").unwrap(),
        chrono_tz::Europe::Warsaw
    );
    assert!(matches!(
        parse_timezone("Europe/Atlantis"),
        Err(ToolError::TimeZone(_))
    ));
}

#[test]
fn config_defaults_time_zone() {
    let config = load_config(Path::new("tests/test.config.json")).unwrap();
    assert_eq!(config.domain, "dziekanat.example.edu.pl");
    assert_eq!(config.school_code, "xyz");
    assert_eq!(config.timezone, "Europe/Warsaw");
    assert!(config.snapshot_dir.is_none());
}

#[test]
fn config_without_domain_is_rejected() {
    assert!(matches!(
        load_config(Path::new("tests/non_existent.config.json")),
        Err(ToolError::Config(_))
    ));
}

#[test]
fn credentials_from_config_skip_prompts() {
    let config = Config {
        domain: "dziekanat.example.edu.pl".to_owned(),
        school_code: "xyz".to_owned(),
        login: Some("s123456".to_owned()),
        password: Some("tajne".to_owned()),
        timezone: "Europe/Warsaw".to_owned(),
        snapshot_dir: None,
        user_agent: None,
    };
    let credentials = resolve_credentials(&config).unwrap();
    assert_eq!(credentials.login, "s123456");
    assert_eq!(credentials.password, "tajne");
}
