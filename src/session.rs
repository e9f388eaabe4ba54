//! Interactive browsing: one command per line, each applied to the session
//! state before the page is re-rendered.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::derive::SortOrder;
use crate::error::ViewerError;
use crate::render::{self, OutputMode};
use crate::state::{LoadStatus, ViewerState};

pub const HELP: &str = "\
Commands:
  sort <price-asc|price-desc|duration>   change the ordering
  stops <N>                              toggle a stop-count filter
  airline <UID>                          toggle an airline filter
  min <AMOUNT> | max <AMOUNT>            set a price bound
  min+ | min- | max+ | max-              move a price bound by one step
  more                                   show the next page
  reset                                  clear all filters
  filters                                show the filter panel
  list                                   show the current page
  help                                   show this help
  quit                                   leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sort(SortOrder),
    ToggleStops(u32),
    ToggleAirline(String),
    SetMin(Decimal),
    SetMax(Decimal),
    StepMin { up: bool },
    StepMax { up: bool },
    ShowMore,
    Reset,
    Filters,
    List,
    Help,
    Quit,
}

fn parse_amount(s: &str) -> Result<Decimal, ViewerError> {
    Decimal::from_str(s)
        .map_err(|_| ViewerError::Validation(format!("invalid amount: {s}")))
}

fn missing(what: &str, cmd: &str) -> ViewerError {
    ViewerError::Validation(format!("{cmd} needs {what}"))
}

impl Command {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, ViewerError> {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();
        let arg = args.first().copied();

        let command = match cmd.to_lowercase().as_str() {
            "sort" | "order" => Self::Sort(SortOrder::from_str_loose(
                arg.ok_or_else(|| missing("an ordering", cmd))?,
            )?),
            "stops" => {
                let n = arg.ok_or_else(|| missing("a stop count", cmd))?;
                Self::ToggleStops(n.parse().map_err(|_| {
                    ViewerError::Validation(format!("invalid stop count: {n}"))
                })?)
            }
            "airline" => Self::ToggleAirline(
                arg.ok_or_else(|| missing("an airline id", cmd))?.to_string(),
            ),
            "min" => Self::SetMin(parse_amount(arg.ok_or_else(|| missing("an amount", cmd))?)?),
            "max" => Self::SetMax(parse_amount(arg.ok_or_else(|| missing("an amount", cmd))?)?),
            "min+" => Self::StepMin { up: true },
            "min-" => Self::StepMin { up: false },
            "max+" => Self::StepMax { up: true },
            "max-" => Self::StepMax { up: false },
            "more" => Self::ShowMore,
            "reset" => Self::Reset,
            "filters" => Self::Filters,
            "list" | "ls" => Self::List,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => {
                return Err(ViewerError::Validation(format!(
                    "unknown command: {other} (type help)"
                )))
            }
        };

        if let Some(extra) = args.get(command.arity()) {
            return Err(ViewerError::Validation(format!(
                "unexpected argument to {cmd}: {extra}"
            )));
        }
        Ok(Some(command))
    }

    fn arity(&self) -> usize {
        match self {
            Self::Sort(_)
            | Self::ToggleStops(_)
            | Self::ToggleAirline(_)
            | Self::SetMin(_)
            | Self::SetMax(_) => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// State changed; show the page again.
    Page,
    Filters,
    Help,
    /// Nothing to re-render.
    Nothing,
    Quit,
}

/// Applies one command. Toggles only accept values offered by the filter
/// panel.
pub fn apply(state: &mut ViewerState, command: Command) -> Result<Reply, ViewerError> {
    debug!(?command, "applying command");
    let reply = match command {
        Command::Sort(order) => {
            state.set_order(order);
            Reply::Page
        }
        Command::ToggleStops(n) => {
            if !state.stops().contains(&n) {
                return Err(ViewerError::Validation(format!(
                    "no offers with {n} stops; options: {:?}",
                    state.stops()
                )));
            }
            state.toggle_stop(n);
            Reply::Page
        }
        Command::ToggleAirline(uid) => {
            if !state.airlines().iter().any(|a| a.uid == uid) {
                let known: Vec<String> = state.airlines().iter().map(|a| a.uid.clone()).collect();
                return Err(ViewerError::Validation(format!(
                    "unknown airline: {uid}; options: {}",
                    known.join(", ")
                )));
            }
            state.toggle_airline(&uid);
            Reply::Page
        }
        Command::SetMin(p) => {
            state.set_min_price(p);
            Reply::Page
        }
        Command::SetMax(p) => {
            state.set_max_price(p);
            Reply::Page
        }
        Command::StepMin { up } => {
            state.step_min_price(up);
            Reply::Page
        }
        Command::StepMax { up } => {
            state.step_max_price(up);
            Reply::Page
        }
        Command::ShowMore => {
            if state.show_more() {
                Reply::Page
            } else {
                Reply::Nothing
            }
        }
        Command::Reset => {
            state.reset_filters();
            Reply::Page
        }
        Command::Filters => Reply::Filters,
        Command::List => Reply::Page,
        Command::Help => Reply::Help,
        Command::Quit => Reply::Quit,
    };
    Ok(reply)
}

fn write_page<W: Write>(state: &mut ViewerState, out: &mut W, mode: OutputMode) -> io::Result<()> {
    let page = render::render_page(state, mode).map_err(io::Error::other)?;
    writeln!(out, "{page}")
}

/// Runs the command loop until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    state: &mut ViewerState,
    input: R,
    out: &mut W,
    mode: OutputMode,
) -> io::Result<()> {
    if let LoadStatus::Failed(msg) = state.status() {
        writeln!(out, "Не удалось загрузить рейсы: {msg}")?;
    }

    write!(out, "{}", render::render_filters(state))?;
    write_page(state, out, mode)?;
    writeln!(out, "Type help for commands.")?;

    for line in input.lines() {
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(Some(c)) => c,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                continue;
            }
        };

        match apply(state, command) {
            Ok(Reply::Page) => write_page(state, out, mode)?,
            Ok(Reply::Filters) => write!(out, "{}", render::render_filters(state))?,
            Ok(Reply::Help) => writeln!(out, "{HELP}")?,
            Ok(Reply::Nothing) => writeln!(out, "Все рейсы уже показаны.")?,
            Ok(Reply::Quit) => break,
            Err(e) => writeln!(out, "error: {e}")?,
        }
        out.flush()?;
    }

    Ok(())
}
