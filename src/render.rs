use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use crate::derive::SortOrder;
use crate::format;
use crate::model::{FlightOffer, Segment};
use crate::state::ViewerState;

const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Compact,
    Json { pretty: bool },
}

pub fn format_price(offer: &FlightOffer) -> String {
    match offer.single_passenger_total() {
        Some(total) => format!("{} {}", total.amount, total.currency_code),
        None => PLACEHOLDER.to_string(),
    }
}

fn place_caption(segment: &Segment, departure: bool) -> String {
    let (city, airport) = if departure {
        (
            segment
                .departure_city
                .as_ref()
                .map_or("UNKNOWN", |c| c.caption.as_str()),
            &segment.departure_airport,
        )
    } else {
        (
            segment
                .arrival_city
                .as_ref()
                .map_or("UNKNOWN", |c| c.caption.as_str()),
            &segment.arrival_airport,
        )
    };
    format!("{city} {} ({})", airport.caption, airport.uid)
}

pub fn segment_route(segment: &Segment) -> String {
    format!(
        "{} → {}",
        place_caption(segment, true),
        place_caption(segment, false)
    )
}

fn departure_stamp(segment: &Segment) -> String {
    format!(
        "{} {}",
        format::format_time(&segment.departure_date),
        format::format_date_day(&segment.departure_date)
    )
}

fn arrival_stamp(segment: &Segment) -> String {
    format!(
        "{} {}",
        format::format_date_day(&segment.arrival_date),
        format::format_time(&segment.arrival_date)
    )
}

fn segments(offer: &FlightOffer) -> &[Segment] {
    offer
        .first_leg()
        .map(|leg| leg.segments.as_slice())
        .unwrap_or_default()
}

fn column(offer: &FlightOffer, cell: impl Fn(&Segment) -> String) -> String {
    let lines: Vec<String> = segments(offer).iter().map(cell).collect();
    if lines.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        lines.join("\n")
    }
}

pub fn render_table(offers: &[&FlightOffer]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Авиакомпания",
            "Маршрут",
            "Вылет",
            "Прилёт",
            "В пути",
            "Пересадки",
            "Рейс выполняет",
            "Цена за пассажира",
        ]);

    for offer in offers {
        table.add_row(vec![
            offer.carrier().caption.clone(),
            column(offer, segment_route),
            column(offer, departure_stamp),
            column(offer, arrival_stamp),
            column(offer, |s| format::format_duration(s.travel_duration)),
            column(offer, |s| format::segment_stops(s.stops)),
            column(offer, |s| s.airline.caption.clone()),
            format_price(offer),
        ]);
    }

    table.to_string()
}

pub fn compact_line(offer: &FlightOffer) -> String {
    let segs = segments(offer);
    let route: Vec<&str> = segs
        .first()
        .map(|s| s.departure_airport.uid.as_str())
        .into_iter()
        .chain(segs.iter().map(|s| s.arrival_airport.uid.as_str()))
        .collect();
    let route_str = if route.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        route.join(">")
    };

    let times = match (segs.first(), segs.last()) {
        (Some(d), Some(a)) => format!(
            "{} {}>{}",
            format::format_date_day(&d.departure_date),
            format::format_time(&d.departure_date),
            format::format_time(&a.arrival_date),
        ),
        _ => PLACEHOLDER.to_string(),
    };

    format!(
        "{} | {} | {} | {} | {} | {}",
        format_price(offer),
        offer.carrier().caption,
        route_str,
        format::format_duration(offer.total_duration()),
        format::stops_label(offer.total_stops()),
        times,
    )
}

pub fn render_filters(state: &mut ViewerState) -> String {
    let mut out = String::from("Сортировать\n");
    let active = state.order();
    for order in SortOrder::ALL {
        let mark = if order == active { "(•)" } else { "( )" };
        out.push_str(&format!("  {mark} {} [{}]\n", order.label(), order.as_str()));
    }

    out.push_str("Фильтровать\n");
    let selected_stops = state.filter().stops.clone();
    for stop in state.stops().to_vec() {
        let mark = if selected_stops.contains(&stop) { "[x]" } else { "[ ]" };
        out.push_str(&format!("  {mark} {} [{stop}]\n", format::stops_label(stop)));
    }

    let filter = state.filter();
    out.push_str(&format!(
        "Цена\n  От {}\n  До {}\n",
        filter.min_price, filter.max_price
    ));

    out.push_str("Авиакомпании\n");
    let selected_airlines = state.filter().airlines.clone();
    for airline in state.airlines().to_vec() {
        let mark = if selected_airlines.contains(&airline.uid) {
            "[x]"
        } else {
            "[ ]"
        };
        out.push_str(&format!("  {mark} {} [{}]\n", airline.caption, airline.uid));
    }

    out
}

#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    pub total: usize,
    pub shown: usize,
    pub has_more: bool,
    pub flights: Vec<&'a FlightOffer>,
}

pub fn page_view(state: &mut ViewerState) -> PageView<'_> {
    let total = state.filtered_len();
    let has_more = state.has_more();
    let flights = state.visible();
    PageView {
        total,
        shown: flights.len(),
        has_more,
        flights,
    }
}

pub fn render_page(state: &mut ViewerState, mode: OutputMode) -> Result<String, serde_json::Error> {
    if let OutputMode::Json { pretty } = mode {
        let view = page_view(state);
        return if pretty {
            serde_json::to_string_pretty(&view)
        } else {
            serde_json::to_string(&view)
        };
    }

    let total = state.filtered_len();
    let has_more = state.has_more();
    let visible = state.visible();

    if visible.is_empty() {
        return Ok("Рейсов не найдено.".to_string());
    }

    let mut out = match mode {
        OutputMode::Compact => visible
            .iter()
            .map(|offer| compact_line(offer))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => render_table(&visible),
    };

    if has_more {
        out.push_str(&format!(
            "\nПоказано {} из {total}. Показать еще: more",
            visible.len()
        ));
    }

    Ok(out)
}
