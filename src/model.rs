use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Place {
    pub uid: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Airline {
    pub uid: String,
    pub caption: String,
    #[serde(default)]
    pub airline_code: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default)]
    pub aircraft: Option<Place>,
    pub airline: Airline,
    pub departure_airport: Place,
    pub arrival_airport: Place,
    #[serde(default)]
    pub departure_city: Option<Place>,
    #[serde(default)]
    pub arrival_city: Option<Place>,
    pub departure_date: String,
    pub arrival_date: String,
    pub travel_duration: u32,
    #[serde(default)]
    pub stops: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Leg {
    #[serde(default)]
    pub duration: u32,
    pub segments: Vec<Segment>,
}

impl Leg {
    pub fn total_stops(&self) -> u32 {
        self.segments
            .iter()
            .fold(0u32, |total, s| total.saturating_add(s.stops))
    }

    pub fn total_duration(&self) -> u32 {
        self.segments
            .iter()
            .fold(0u32, |total, s| total.saturating_add(s.travel_duration))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerTotal {
    pub amount: String,
    #[serde(default)]
    pub currency: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerPrice {
    #[serde(default)]
    pub passenger_count: u32,
    #[serde(default)]
    pub passenger_type: Option<Place>,
    pub single_passenger_total: PassengerTotal,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub passenger_prices: Vec<PassengerPrice>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Flight {
    pub carrier: Airline,
    pub legs: Vec<Leg>,
    pub price: Price,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    pub flight: Flight,
    pub flight_token: String,
}

impl FlightOffer {
    pub fn carrier(&self) -> &Airline {
        &self.flight.carrier
    }

    /// Outbound leg. The return leg, if any, is carried but never displayed.
    pub fn first_leg(&self) -> Option<&Leg> {
        self.flight.legs.first()
    }

    pub fn total_stops(&self) -> u32 {
        self.first_leg().map_or(0, Leg::total_stops)
    }

    pub fn total_duration(&self) -> u32 {
        self.first_leg().map_or(0, Leg::total_duration)
    }

    pub fn single_passenger_total(&self) -> Option<&PassengerTotal> {
        self.flight
            .price
            .passenger_prices
            .first()
            .map(|p| &p.single_passenger_total)
    }

    /// Single-passenger total of the first price entry, as a decimal.
    pub fn price(&self) -> Option<Decimal> {
        self.single_passenger_total()
            .and_then(|t| Decimal::from_str(t.amount.trim()).ok())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlightsResult {
    pub flights: Vec<FlightOffer>,
}

/// Top-level shape of `flights.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightsDocument {
    pub result: FlightsResult,
}
