use serde_json::json;

use crate::tt_fetch::test_support::{at, day, millis, page_json, raw_item, StubSource, TZ};

use super::*;

#[test]
fn page_comes_back_highest_index_first() {
    let raw = page_json(vec![
        raw_item(at(4, 11, 2024, 8, 15), "Analiza matematyczna"),
        raw_item(at(6, 11, 2024, 9, 45), "Programowanie"),
        raw_item(at(4, 11, 2024, 10, 0), "Fizyka"),
    ]);
    let page = decode_page(&raw, &TZ).unwrap();
    let order: Vec<(usize, &str)> = page
        .iter()
        .map(|(index, tile)| (*index, tile.subject_name.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            (2, "Fizyka"),
            (1, "Programowanie"),
            (0, "Analiza matematyczna")
        ]
    );
}

#[test]
fn tile_fields_are_decoded_in_local_time() {
    let raw = page_json(vec![raw_item(at(4, 11, 2024, 8, 15), "Analiza matematyczna")]);
    let (_, tile) = decode_page(&raw, &TZ).unwrap().remove(0);
    assert_eq!(tile.start, at(4, 11, 2024, 8, 15));
    assert_eq!(tile.end, at(4, 11, 2024, 9, 45));
    assert_eq!(tile.locations, vec!["C-13 s. 1.27"]);
    assert_eq!(tile.lecturers, vec!["dr inż. Anna Nowak"]);
}

#[test]
fn num_rows_limits_the_page() {
    let raw = json!({
        "returnedValue": {
            "numRows": 1,
            "items": [
                raw_item(at(4, 11, 2024, 8, 15), "Analiza matematyczna"),
                raw_item(at(5, 11, 2024, 8, 15), "Nadmiarowy"),
            ]
        }
    })
    .to_string();
    let page = decode_page(&raw, &TZ).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].1.subject_name, "Analiza matematyczna");
}

#[test]
fn more_rows_than_items_is_an_error() {
    let raw = json!({ "returnedValue": { "numRows": 2, "items": [] } }).to_string();
    assert!(matches!(
        decode_page(&raw, &TZ),
        Err(FetchError::InconsistentPage {
            num_rows: 2,
            items: 0
        })
    ));
}

#[test]
fn one_bad_item_fails_the_whole_week() {
    let mut broken = raw_item(at(5, 11, 2024, 8, 15), "Bez sal");
    broken.as_object_mut().unwrap().remove("sale");
    let raw = page_json(vec![
        raw_item(at(4, 11, 2024, 8, 15), "Analiza matematyczna"),
        broken,
    ]);
    assert!(matches!(
        decode_page(&raw, &TZ),
        Err(FetchError::Payload(_))
    ));
}

#[test]
fn not_json_is_a_payload_error() {
    assert!(matches!(
        decode_page("<html>session expired</html>", &TZ),
        Err(FetchError::Payload(_))
    ));
}

#[test]
fn week_start_sent_as_local_midnight() {
    let source = StubSource::new();
    let fetcher = WeekFetcher::new(&source, TZ);
    assert_eq!(
        fetcher.week_start_millis(at(4, 11, 2024, 0, 0)),
        1_730_674_800_000
    );
    assert_eq!(
        fetcher.week_start_millis(at(28, 10, 2024, 0, 0)),
        1_730_070_000_000
    );
}

#[tokio::test]
async fn fetch_asks_source_for_the_week() {
    let monday = day(4, 11, 2024);
    let source = StubSource::new().with_week(
        monday,
        vec![raw_item(at(6, 11, 2024, 9, 45), "Programowanie")],
    );
    let fetcher = WeekFetcher::new(&source, TZ);
    let page = fetcher.fetch(at(4, 11, 2024, 0, 0)).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(source.requested_mondays(), vec![monday]);
    assert_eq!(millis(at(4, 11, 2024, 0, 0)), 1_730_674_800_000);
}
