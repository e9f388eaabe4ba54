pub mod config;
pub mod derive;
pub mod error;
pub mod fetch;
pub mod format;
pub mod logging;
pub mod mcp;
pub mod memo;
pub mod model;
pub mod parse;
pub mod render;
pub mod session;
pub mod state;

use fetch::FetchOptions;
use state::ViewerState;

/// Loads the flight document into `state`. A failure is recorded on the
/// state as well as returned, so a caller that keeps going still shows it.
pub async fn load_into(
    state: &mut ViewerState,
    source: &str,
    options: &FetchOptions,
) -> Result<(), error::ViewerError> {
    match fetch::load(source, options).await {
        Ok(offers) => {
            state.set_flights(offers);
            Ok(())
        }
        Err(e) => {
            state.fail_load(e.to_string());
            Err(e)
        }
    }
}
