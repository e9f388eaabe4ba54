use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ViewerError;
use crate::model::FlightOffer;

fn token_of(entry: &Value) -> &str {
    entry
        .get("flightToken")
        .and_then(Value::as_str)
        .unwrap_or("<no token>")
}

/// Why an offer cannot take part in filtering or sorting, if it can't.
pub fn check_offer(offer: &FlightOffer) -> Option<&'static str> {
    let Some(leg) = offer.first_leg() else {
        return Some("no legs");
    };
    if leg.segments.is_empty() {
        return Some("first leg has no segments");
    }
    if offer.single_passenger_total().is_none() {
        return Some("no passenger prices");
    }
    if offer.price().is_none() {
        return Some("amount is not a number");
    }
    None
}

fn parse_offer(entry: &Value) -> Option<FlightOffer> {
    let offer: FlightOffer = match serde_json::from_value(entry.clone()) {
        Ok(offer) => offer,
        Err(e) => {
            warn!(token = token_of(entry), error = %e, "skipping malformed offer");
            return None;
        }
    };

    if let Some(reason) = check_offer(&offer) {
        warn!(token = %offer.flight_token, reason, "skipping offer");
        return None;
    }

    Some(offer)
}

pub fn parse_value(doc: &Value) -> Result<Vec<FlightOffer>, ViewerError> {
    let result = doc
        .get("result")
        .ok_or_else(|| ViewerError::UnexpectedShape("missing \"result\"".into()))?;

    let flights = result
        .get("flights")
        .ok_or_else(|| ViewerError::UnexpectedShape("missing \"result.flights\"".into()))?
        .as_array()
        .ok_or_else(|| {
            ViewerError::UnexpectedShape("\"result.flights\" is not an array".into())
        })?;

    let offers: Vec<FlightOffer> = flights.iter().filter_map(parse_offer).collect();
    debug!(
        total = flights.len(),
        kept = offers.len(),
        "parsed flight document"
    );
    Ok(offers)
}

pub fn parse_document(json: &str) -> Result<Vec<FlightOffer>, ViewerError> {
    let doc: Value =
        serde_json::from_str(json).map_err(|e| ViewerError::JsonParse(e.to_string()))?;
    parse_value(&doc)
}
