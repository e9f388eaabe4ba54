mod common;

use flightview::error::ViewerError;
use flightview::fetch::{self, FetchOptions};
use flightview::parse::{parse_document, parse_value};
use serde_json::json;

use common::{fixture_path, offer_value};

#[test]
fn parses_nested_flight_array() {
    let doc = json!({
        "result": {
            "flights": [
                offer_value("a", "AF", "21049", &[(0, 140), (1, 185)]),
                offer_value("b", "KL", "19800", &[(0, 230)]),
            ]
        }
    });
    let offers = parse_value(&doc).unwrap();
    assert_eq!(offers.len(), 2);

    let a = &offers[0];
    assert_eq!(a.flight_token, "a");
    assert_eq!(a.carrier().uid, "AF");
    assert_eq!(a.carrier().airline_code, "AF");
    assert_eq!(a.total_stops(), 1);
    assert_eq!(a.total_duration(), 325);
    assert_eq!(a.price().unwrap().to_string(), "21049");

    let seg = &a.first_leg().unwrap().segments[0];
    assert_eq!(seg.departure_airport.uid, "SVO");
    assert_eq!(seg.arrival_city.as_ref().unwrap().caption, "Лондон");
    assert_eq!(seg.departure_date, "2020-08-18T11:20:00");
}

#[test]
fn empty_flight_array_is_fine() {
    let offers = parse_document(r#"{"result":{"flights":[]}}"#).unwrap();
    assert!(offers.is_empty());
}

#[test]
fn missing_result_is_unexpected_shape() {
    let err = parse_document(r#"{"flights":[]}"#).unwrap_err();
    assert!(matches!(err, ViewerError::UnexpectedShape(_)));
}

#[test]
fn flights_not_array_is_unexpected_shape() {
    let err = parse_document(r#"{"result":{"flights":{}}}"#).unwrap_err();
    assert!(matches!(err, ViewerError::UnexpectedShape(_)));
    assert!(err.to_string().contains("not an array"));
}

#[test]
fn invalid_json_is_parse_error() {
    let err = parse_document("{ result: ").unwrap_err();
    assert!(matches!(err, ViewerError::JsonParse(_)));
}

#[test]
fn malformed_offers_are_skipped() {
    let mut no_legs = offer_value("no-legs", "AF", "100", &[(0, 60)]);
    no_legs["flight"]["legs"] = json!([]);

    let mut no_price = offer_value("no-price", "AF", "100", &[(0, 60)]);
    no_price["flight"]["price"]["passengerPrices"] = json!([]);

    let bad_amount = offer_value("bad-amount", "AF", "lots", &[(0, 60)]);
    let no_segments = offer_value("no-segments", "AF", "100", &[]);

    let doc = json!({
        "result": {
            "flights": [
                no_legs,
                offer_value("ok", "KL", "19800", &[(0, 230)]),
                no_price,
                bad_amount,
                no_segments,
                { "flightToken": "garbage" },
            ]
        }
    });
    let offers = parse_value(&doc).unwrap();
    let tokens: Vec<&str> = offers.iter().map(|o| o.flight_token.as_str()).collect();
    assert_eq!(tokens, vec!["ok"]);
}

#[test]
fn missing_arrival_city_is_allowed() {
    let mut value = offer_value("a", "AF", "100", &[(0, 60)]);
    value["flight"]["legs"][0]["segments"][0]
        .as_object_mut()
        .unwrap()
        .remove("arrivalCity");
    let doc = json!({ "result": { "flights": [value] } });
    let offers = parse_value(&doc).unwrap();
    assert!(offers[0].first_leg().unwrap().segments[0].arrival_city.is_none());
}

#[tokio::test]
async fn loads_fixture_from_disk() {
    let offers = fetch::load(&fixture_path(), &FetchOptions::default())
        .await
        .unwrap();
    assert_eq!(offers.len(), 15);
    assert!(offers.iter().all(|o| o.flight_token != "token-broken"));
    assert_eq!(offers[0].flight.legs.len(), 2);
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let err = fetch::load("/nonexistent/flights.json", &FetchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ViewerError::NotFound(_)));
    assert!(err.to_string().contains("failed to load flights"));
}
