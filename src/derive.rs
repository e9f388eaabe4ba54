//! Turns the loaded flight list into what gets displayed: facet values for
//! the filter controls, the filter predicate and the ordering.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;
use crate::model::{Airline, FlightOffer};

pub const PRICE_STEP: Decimal = Decimal::from_parts(2500, 0, 0, false, 0);
pub const PRICE_CAP: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
pub const DEFAULT_MIN_PRICE: Decimal = Decimal::ZERO;
pub const DEFAULT_MAX_PRICE: Decimal = PRICE_CAP;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    PriceAsc,
    PriceDesc,
    DurationAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [Self::PriceAsc, Self::PriceDesc, Self::DurationAsc];

    pub fn from_str_loose(s: &str) -> Result<Self, ViewerError> {
        match s {
            "price-asc" | "price" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "duration-asc" | "duration" => Ok(Self::DurationAsc),
            _ => Err(ViewerError::Validation(format!(
                "invalid order: {s} (expected price-asc, price-desc or duration)"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::DurationAsc => "duration",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PriceAsc => "по возрастанию цены",
            Self::PriceDesc => "по убыванию цены",
            Self::DurationAsc => "по времени в пути",
        }
    }
}

/// Active filter values. Empty selection sets mean "no restriction".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterState {
    pub airlines: BTreeSet<String>,
    pub stops: BTreeSet<u32>,
    pub min_price: Decimal,
    pub max_price: Decimal,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            airlines: BTreeSet::new(),
            stops: BTreeSet::new(),
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

/// Price inputs above the cap are clamped to it.
pub fn clamp_price(price: Decimal) -> Decimal {
    price.min(PRICE_CAP)
}

/// Carriers of the given offers, unique by id, in first-seen order.
pub fn extract_airlines(flights: &[FlightOffer]) -> Vec<Airline> {
    let mut seen = HashSet::new();
    let mut airlines = Vec::new();
    for offer in flights {
        let carrier = offer.carrier();
        if seen.insert(carrier.uid.as_str()) {
            airlines.push(carrier.clone());
        }
    }
    airlines
}

/// Distinct first-leg stop totals, in first-seen order.
pub fn extract_stops(flights: &[FlightOffer]) -> Vec<u32> {
    let mut seen = HashSet::new();
    flights
        .iter()
        .map(FlightOffer::total_stops)
        .filter(|s| seen.insert(*s))
        .collect()
}

pub fn passes_filter(offer: &FlightOffer, filter: &FilterState) -> bool {
    let airline_ok =
        filter.airlines.is_empty() || filter.airlines.contains(&offer.carrier().uid);
    let stops_ok = filter.stops.is_empty() || filter.stops.contains(&offer.total_stops());
    let price_ok = offer
        .price()
        .is_some_and(|p| filter.min_price <= p && p <= filter.max_price);

    airline_ok && stops_ok && price_ok
}

fn compare_price(a: Option<Decimal>, b: Option<Decimal>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Relative order of two offers. Unpriced offers go last in both price modes.
pub fn compare(a: &FlightOffer, b: &FlightOffer, order: SortOrder) -> Ordering {
    match order {
        SortOrder::PriceAsc => compare_price(a.price(), b.price(), false),
        SortOrder::PriceDesc => compare_price(a.price(), b.price(), true),
        SortOrder::DurationAsc => a.total_duration().cmp(&b.total_duration()),
    }
}

/// Indices into `flights` of the offers that pass `filter`, stably sorted.
pub fn select(flights: &[FlightOffer], filter: &FilterState, order: SortOrder) -> Vec<usize> {
    let mut selected: Vec<usize> = flights
        .iter()
        .enumerate()
        .filter(|(_, offer)| passes_filter(offer, filter))
        .map(|(i, _)| i)
        .collect();
    selected.sort_by(|&a, &b| compare(&flights[a], &flights[b], order));
    selected
}

pub fn filter_and_sort<'a>(
    flights: &'a [FlightOffer],
    filter: &FilterState,
    order: SortOrder,
) -> Vec<&'a FlightOffer> {
    select(flights, filter, order)
        .into_iter()
        .map(|i| &flights[i])
        .collect()
}
