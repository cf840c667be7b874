use std::fmt;
use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use crate::constants::{ERROR_MSG, HEADING_SUFFIX, LOADING_MSG};
use crate::data_backend::korean_date_fmt;
use crate::data_types::{DailyMenu, MealSlot};

/// The three output containers; at most one of them is visible.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Region {
    Loading,
    Result,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading { served_on: NaiveDate },
    Result(MenuPage),
    Error,
}

impl ViewState {
    pub fn visible_region(&self) -> Option<Region> {
        match self {
            ViewState::Idle => None,
            ViewState::Loading { .. } => Some(Region::Loading),
            ViewState::Result(_) => Some(Region::Result),
            ViewState::Error => Some(Region::Error),
        }
    }
}

/// Handed out by [`Presenter::begin_query`]; only the newest ticket may
/// change what is shown.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QueryTicket(u64);

pub enum SlotContent<'a> {
    Dishes(&'a [String]),
    Placeholder(String),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MenuPage {
    pub date: String,
    pub heading: String,
    #[serde(flatten)]
    pub menu: DailyMenu,
}

impl MenuPage {
    pub fn new(menu: DailyMenu, served_on: NaiveDate) -> Self {
        MenuPage {
            date: served_on.format("%Y-%m-%d").to_string(),
            heading: format!("{}{}", korean_date_fmt(served_on), HEADING_SUFFIX),
            menu,
        }
    }

    pub fn slot_content(&self, slot: MealSlot) -> SlotContent<'_> {
        let dishes = self.menu.slot(slot);
        if dishes.is_empty() {
            SlotContent::Placeholder(format!("{} 정보가 없습니다.", slot.label()))
        } else {
            SlotContent::Dishes(dishes)
        }
    }
}

impl fmt::Display for MenuPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        for slot in MealSlot::ALL {
            writeln!(f, "\n[{}]", slot.label())?;
            match self.slot_content(slot) {
                SlotContent::Dishes(dishes) => {
                    for dish in dishes {
                        writeln!(f, " • {}", dish)?;
                    }
                }
                SlotContent::Placeholder(msg) => writeln!(f, "{}", msg)?,
            }
        }
        Ok(())
    }
}

/// Where the presenter puts things on screen.
pub trait PageSink {
    fn render(&mut self, state: &ViewState);
    /// Blocking notice that does not touch the view state (e.g. no date given).
    fn prompt(&mut self, message: &str);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct TerminalSink<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        TerminalSink { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_text(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            log::warn!("could not write output: {}", e);
        }
    }
}

impl<W: Write> PageSink for TerminalSink<W> {
    fn render(&mut self, state: &ViewState) {
        let text = match (self.format, state) {
            (_, ViewState::Idle) => return,
            (OutputFormat::Text, ViewState::Loading { .. }) => LOADING_MSG.to_string(),
            // keep stdout machine readable
            (OutputFormat::Json, ViewState::Loading { .. }) => return,
            (OutputFormat::Text, ViewState::Result(page)) => page.to_string(),
            (OutputFormat::Json, ViewState::Result(page)) => match serde_json::to_string(page) {
                Ok(json) => json,
                Err(e) => {
                    log::error!("could not serialize menu: {}", e);
                    return;
                }
            },
            (OutputFormat::Text, ViewState::Error) => ERROR_MSG.to_string(),
            (OutputFormat::Json, ViewState::Error) => json!({ "error": ERROR_MSG }).to_string(),
        };
        self.write_text(&text);
    }

    fn prompt(&mut self, message: &str) {
        match self.format {
            OutputFormat::Text => self.write_text(message),
            OutputFormat::Json => self.write_text(&json!({ "prompt": message }).to_string()),
        }
    }
}

/// Owns the view state. Transitions only through the methods below:
/// idle -> loading -> result | error, and any new query restarts at loading.
pub struct Presenter<S: PageSink> {
    sink: S,
    state: ViewState,
    latest: u64,
}

impl<S: PageSink> Presenter<S> {
    pub fn new(sink: S) -> Self {
        Presenter {
            sink,
            state: ViewState::Idle,
            latest: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn visible_region(&self) -> Option<Region> {
        self.state.visible_region()
    }

    pub fn is_visible(&self, region: Region) -> bool {
        self.visible_region() == Some(region)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn begin_query(&mut self, served_on: NaiveDate) -> QueryTicket {
        self.latest += 1;
        self.transition(ViewState::Loading { served_on });
        QueryTicket(self.latest)
    }

    /// Returns false if a newer query has started in the meantime.
    pub fn show_result(
        &mut self,
        ticket: QueryTicket,
        menu: DailyMenu,
        served_on: NaiveDate,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.transition(ViewState::Result(MenuPage::new(menu, served_on)));
        true
    }

    /// Returns false if a newer query has started in the meantime.
    pub fn show_error(&mut self, ticket: QueryTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.transition(ViewState::Error);
        true
    }

    pub fn prompt(&mut self, message: &str) {
        self.sink.prompt(message);
    }

    fn is_current(&self, ticket: QueryTicket) -> bool {
        if ticket.0 != self.latest {
            log::debug!("dropping stale result #{} (latest #{})", ticket.0, self.latest);
            return false;
        }
        true
    }

    fn transition(&mut self, next: ViewState) {
        self.state = next;
        self.sink.render(&self.state);
    }
}
