use std::str::FromStr;
use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info};

use crate::derive::{self, FilterState, SortOrder};
use crate::error::ViewerError;
use crate::fetch::{self, FetchOptions};
use crate::model::FlightOffer;
use crate::render::PageView;
use crate::state::DEFAULT_PAGE_SIZE;

/// A price given either as a JSON number or as a decimal string.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    fn to_decimal(&self, field: &str) -> Result<Decimal, ViewerError> {
        let text = match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        };
        Decimal::from_str(&text)
            .map_err(|_| ViewerError::Validation(format!("{field} must be a number, got \"{text}\"")))
    }
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
struct FilterArgs {
    #[schemars(
        description = "Airline ids to keep, comma-separated. Omit to keep every airline. Ids come from flights_facets"
    )]
    airlines: Option<String>,
    #[schemars(
        description = "Total stop counts to keep, e.g. [0, 1]. Omit to keep every stop count"
    )]
    stops: Option<Vec<u32>>,
    #[schemars(
        description = "Lowest single-passenger price, inclusive, as a number or decimal string (\"19800.50\"). Default: 0"
    )]
    min_price: Option<Amount>,
    #[schemars(
        description = "Highest single-passenger price, inclusive, as a number or decimal string. Default and cap: 1000000"
    )]
    max_price: Option<Amount>,
    #[schemars(description = "One of: price-asc, price-desc, duration. Default: price-asc")]
    order: Option<String>,
    #[schemars(description = "Return at most N offers. Default: 10")]
    limit: Option<usize>,
}

fn build_filter(args: &FilterArgs) -> Result<(FilterState, SortOrder, usize), ViewerError> {
    let mut filter = FilterState::default();

    if let Some(ref airlines) = args.airlines {
        filter.airlines = airlines
            .split(',')
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
    }
    if let Some(ref stops) = args.stops {
        filter.stops = stops.iter().copied().collect();
    }
    if let Some(ref min) = args.min_price {
        filter.min_price = derive::clamp_price(min.to_decimal("min_price")?);
    }
    if let Some(ref max) = args.max_price {
        filter.max_price = derive::clamp_price(max.to_decimal("max_price")?);
    }

    let order = args
        .order
        .as_deref()
        .map(SortOrder::from_str_loose)
        .transpose()?
        .unwrap_or_default();

    let limit = args.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if limit == 0 {
        return Err(ViewerError::Validation("limit must be at least 1".into()));
    }

    Ok((filter, order, limit))
}

fn tool_error(msg: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg.into())]))
}

fn tool_json(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => Ok(CallToolResult::success(vec![Content::text(json)])),
        Err(e) => tool_error(format!("failed to encode result: {e}")),
    }
}

#[derive(Debug, Clone)]
struct FlightviewMcp {
    tool_router: ToolRouter<Self>,
    flights: Result<Arc<[FlightOffer]>, String>,
}

#[tool_router]
impl FlightviewMcp {
    fn new(flights: Result<Arc<[FlightOffer]>, String>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            flights,
        }
    }

    fn loaded(&self) -> Result<&[FlightOffer], String> {
        self.flights.as_deref().map_err(Clone::clone)
    }

    #[tool(
        description = "List the filter options present in the loaded flights: every carrier airline (id and caption, first-seen order) and every distinct total stop count of the outbound leg."
    )]
    async fn flights_facets(&self) -> Result<CallToolResult, McpError> {
        let flights = match self.loaded() {
            Ok(f) => f,
            Err(e) => return tool_error(e),
        };

        let facets = serde_json::json!({
            "airlines": derive::extract_airlines(flights),
            "stops": derive::extract_stops(flights),
        });
        tool_json(&facets)
    }

    #[tool(
        description = "Filter and sort the loaded flight offers. Empty or omitted airline and stop selections mean no restriction. Prices are single-passenger totals. Returns total matches, how many are shown, whether more exist, and the offers."
    )]
    async fn flights_filter(
        &self,
        Parameters(args): Parameters<FilterArgs>,
    ) -> Result<CallToolResult, McpError> {
        let flights = match self.loaded() {
            Ok(f) => f,
            Err(e) => return tool_error(e),
        };
        let (filter, order, limit) = match build_filter(&args) {
            Ok(parts) => parts,
            Err(e) => return tool_error(e.to_string()),
        };

        let matches = derive::filter_and_sort(flights, &filter, order);
        let view = PageView {
            total: matches.len(),
            shown: matches.len().min(limit),
            has_more: matches.len() > limit,
            flights: matches.into_iter().take(limit).collect(),
        };
        tool_json(&view)
    }
}

#[tool_handler]
impl ServerHandler for FlightviewMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "flightview".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Flight offer viewer. Workflow: (1) flights_facets to see which airlines and stop counts exist. (2) flights_filter with those ids and counts, a price range and an order.".into(),
            ),
        }
    }
}

/// Loads the flight document once, then serves tools over stdio. A failed
/// load still starts the server; every tool then reports the failure.
pub async fn run(source: &str, options: &FetchOptions) -> Result<(), ViewerError> {
    let flights = match fetch::load(source, options).await {
        Ok(offers) => Ok(Arc::from(offers)),
        Err(e) => {
            error!(source, error = %e, "flight load failed");
            Err(e.to_string())
        }
    };

    info!("starting MCP server on stdio");
    let service = FlightviewMcp::new(flights)
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| ViewerError::Io(format!("failed to start MCP server: {e}")))?;
    service
        .waiting()
        .await
        .map_err(|e| ViewerError::Io(format!("MCP server error: {e}")))?;
    Ok(())
}
