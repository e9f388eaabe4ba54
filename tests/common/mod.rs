#![allow(dead_code)]

use flightview::model::FlightOffer;
use serde_json::{json, Value};

pub fn segment(carrier: &str, stops: u32, minutes: u32) -> Value {
    json!({
        "aircraft": { "uid": "737", "caption": "Боинг 737" },
        "airline": { "uid": carrier, "caption": format!("{carrier} operating"), "airlineCode": carrier },
        "departureAirport": { "uid": "SVO", "caption": "Шереметьево" },
        "arrivalAirport": { "uid": "LHR", "caption": "Хитроу" },
        "departureCity": { "uid": "MOW", "caption": "Москва" },
        "arrivalCity": { "uid": "LON", "caption": "Лондон" },
        "departureDate": "2020-08-18T11:20:00",
        "arrivalDate": "2020-08-18T15:05:00",
        "travelDuration": minutes,
        "stops": stops
    })
}

/// One offer; `legs` lists (stops, minutes) per segment of the first leg.
pub fn offer_value(token: &str, carrier: &str, amount: &str, legs: &[(u32, u32)]) -> Value {
    let segments: Vec<Value> = legs.iter().map(|&(s, m)| segment(carrier, s, m)).collect();
    json!({
        "flight": {
            "carrier": { "uid": carrier, "caption": format!("Airline {carrier}"), "airlineCode": carrier },
            "legs": [ { "duration": 0, "segments": segments } ],
            "price": {
                "passengerPrices": [ {
                    "passengerCount": 1,
                    "passengerType": { "uid": "ADULT", "caption": "Взрослый" },
                    "singlePassengerTotal": { "amount": amount, "currency": "руб.", "currencyCode": "RUB" }
                } ]
            }
        },
        "flightToken": token
    })
}

pub fn offer(token: &str, carrier: &str, amount: &str, legs: &[(u32, u32)]) -> FlightOffer {
    serde_json::from_value(offer_value(token, carrier, amount, legs)).unwrap()
}

pub fn tokens(offers: &[&FlightOffer]) -> Vec<String> {
    offers.iter().map(|o| o.flight_token.clone()).collect()
}

/// X: 5000, nonstop. Y: 3000, one stop.
pub fn scenario_list() -> Vec<FlightOffer> {
    vec![
        offer("x", "X", "5000", &[(0, 300)]),
        offer("y", "Y", "3000", &[(1, 200), (0, 150)]),
    ]
}

pub fn fixture_path() -> String {
    format!("{}/tests/fixtures/flights.json", env!("CARGO_MANIFEST_DIR"))
}
