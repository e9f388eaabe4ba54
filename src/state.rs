//! Session state for one viewer: the loaded offers, the filter and sort
//! controls, and how many results are revealed.
//!
//! Derived values are memoized on the inputs they depend on: the facets on
//! the flight list, the filtered list on the flight list plus filter and
//! ordering. Every update goes through a method here so the caches can key
//! on a generation counter instead of comparing offer lists.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::derive::{self, FilterState, SortOrder, PRICE_STEP};
use crate::memo::Memo;
use crate::model::{Airline, FlightOffer};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub airlines: Vec<Airline>,
    pub stops: Vec<u32>,
}

type SelectionKey = (u64, FilterState, SortOrder);

#[derive(Debug)]
pub struct ViewerState {
    flights: Arc<[FlightOffer]>,
    generation: u64,
    filter: FilterState,
    order: SortOrder,
    initial_filter: FilterState,
    initial_order: SortOrder,
    page_size: usize,
    limit: usize,
    reset_on_change: bool,
    status: LoadStatus,
    facets: Memo<u64, Facets>,
    selection: Memo<SelectionKey, Vec<usize>>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, true)
    }
}

impl ViewerState {
    /// `reset_on_change` shrinks the revealed count back to one page whenever
    /// a filter value or the ordering changes.
    pub fn new(page_size: usize, reset_on_change: bool) -> Self {
        let page_size = page_size.max(1);
        Self {
            flights: Arc::from(Vec::new()),
            generation: 0,
            filter: FilterState::default(),
            order: SortOrder::default(),
            initial_filter: FilterState::default(),
            initial_order: SortOrder::default(),
            page_size,
            limit: page_size,
            reset_on_change,
            status: LoadStatus::Pending,
            facets: Memo::default(),
            selection: Memo::default(),
        }
    }

    /// Starting filter; `reset_filters` returns to it.
    pub fn with_filter(mut self, filter: FilterState) -> Self {
        self.initial_filter = filter.clone();
        self.filter = filter;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.initial_order = order;
        self.order = order;
        self
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn flights(&self) -> &[FlightOffer] {
        &self.flights
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn on_change(&mut self) {
        if self.reset_on_change && self.limit != self.page_size {
            debug!(from = self.limit, to = self.page_size, "resetting revealed count");
            self.limit = self.page_size;
        }
    }

    pub fn set_flights(&mut self, flights: Vec<FlightOffer>) {
        self.flights = Arc::from(flights);
        self.generation += 1;
        self.facets.clear();
        self.selection.clear();
        self.status = LoadStatus::Loaded;
        self.on_change();
    }

    /// Records a failed load. The flight list stays as it was.
    pub fn fail_load(&mut self, message: impl Into<String>) {
        self.status = LoadStatus::Failed(message.into());
    }

    pub fn set_order(&mut self, order: SortOrder) {
        if self.order != order {
            self.order = order;
            self.on_change();
        }
    }

    /// Adds or removes an airline id from the airline filter. Returns whether
    /// the id is now selected.
    pub fn toggle_airline(&mut self, uid: &str) -> bool {
        let selected = if self.filter.airlines.remove(uid) {
            false
        } else {
            self.filter.airlines.insert(uid.to_string());
            true
        };
        self.on_change();
        selected
    }

    pub fn toggle_stop(&mut self, stops: u32) -> bool {
        let selected = if self.filter.stops.remove(&stops) {
            false
        } else {
            self.filter.stops.insert(stops);
            true
        };
        self.on_change();
        selected
    }

    pub fn set_min_price(&mut self, price: Decimal) {
        let price = derive::clamp_price(price);
        if self.filter.min_price != price {
            self.filter.min_price = price;
            self.on_change();
        }
    }

    pub fn set_max_price(&mut self, price: Decimal) {
        let price = derive::clamp_price(price);
        if self.filter.max_price != price {
            self.filter.max_price = price;
            self.on_change();
        }
    }

    fn stepped(price: Decimal, up: bool) -> Decimal {
        if up {
            price + PRICE_STEP
        } else {
            (price - PRICE_STEP).max(Decimal::ZERO)
        }
    }

    pub fn step_min_price(&mut self, up: bool) {
        self.set_min_price(Self::stepped(self.filter.min_price, up));
    }

    pub fn step_max_price(&mut self, up: bool) {
        self.set_max_price(Self::stepped(self.filter.max_price, up));
    }

    /// Back to the starting filter and ordering.
    pub fn reset_filters(&mut self) {
        self.filter = self.initial_filter.clone();
        self.order = self.initial_order;
        self.on_change();
    }

    pub fn facets(&mut self) -> &Facets {
        let flights = &self.flights;
        self.facets.get_or_compute(self.generation, || Facets {
            airlines: derive::extract_airlines(flights),
            stops: derive::extract_stops(flights),
        })
    }

    pub fn airlines(&mut self) -> &[Airline] {
        &self.facets().airlines
    }

    pub fn stops(&mut self) -> &[u32] {
        &self.facets().stops
    }

    fn selection(&mut self) -> &[usize] {
        let key = (self.generation, self.filter.clone(), self.order);
        let flights = &self.flights;
        let filter = &self.filter;
        let order = self.order;
        self.selection
            .get_or_compute(key, || derive::select(flights, filter, order))
    }

    /// Every offer passing the filters, in display order.
    pub fn filtered(&mut self) -> Vec<&FlightOffer> {
        let indices = self.selection().to_vec();
        indices.into_iter().map(|i| &self.flights[i]).collect()
    }

    pub fn filtered_len(&mut self) -> usize {
        self.selection().len()
    }

    /// The first `limit` filtered offers.
    pub fn visible(&mut self) -> Vec<&FlightOffer> {
        let limit = self.limit;
        let indices: Vec<usize> = self.selection().iter().take(limit).copied().collect();
        indices.into_iter().map(|i| &self.flights[i]).collect()
    }

    pub fn has_more(&mut self) -> bool {
        self.filtered_len() > self.limit
    }

    /// Reveals one more page. Does nothing when everything is already shown.
    pub fn show_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.limit += self.page_size;
        true
    }
}
