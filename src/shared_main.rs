use std::env;

use crate::constants::EMPTY_INPUT_MSG;
use crate::data_backend::neis_fetcher::get_daily_menu;
use crate::data_types::{DailyMenu, MenuQuery, SchoolConfig};
use crate::errors::MealError;
use crate::presenter::{PageSink, Presenter, QueryTicket};

pub fn logger_init(module_path: &str) {
    let level = if env::var(pretty_env_logger::env_logger::DEFAULT_FILTER_ENV).unwrap_or_default()
        == "debug"
    {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Info)
        .filter_module(env!("CARGO_CRATE_NAME"), level)
        .filter_module(module_path, level)
        .init();
}

/// Date input -> NEIS request -> parsed menu -> presenter.
pub struct MealLookup<S: PageSink> {
    client: reqwest::Client,
    config: SchoolConfig,
    presenter: Presenter<S>,
}

impl<S: PageSink> MealLookup<S> {
    pub fn new(client: reqwest::Client, config: SchoolConfig, sink: S) -> Self {
        MealLookup {
            client,
            config,
            presenter: Presenter::new(sink),
        }
    }

    pub fn presenter(&self) -> &Presenter<S> {
        &self.presenter
    }

    /// Runs one query to completion. Every failure ends up in the error state;
    /// empty or unreadable input only prompts and sends nothing.
    pub async fn search(&mut self, date_input: &str) {
        if let Some((ticket, query)) = self.begin(date_input) {
            let result = self.fetch(&query).await;
            self.finish(ticket, &query, result);
        }
    }

    /// First half of [`search`](Self::search): validates the input and switches to loading.
    pub fn begin(&mut self, date_input: &str) -> Option<(QueryTicket, MenuQuery)> {
        match MenuQuery::from_date_input(&self.config, date_input) {
            Ok(query) => {
                let ticket = self.presenter.begin_query(query.served_on);
                Some((ticket, query))
            }
            Err(MealError::EmptyInput) => {
                self.presenter.prompt(EMPTY_INPUT_MSG);
                None
            }
            Err(e) => {
                log::warn!("{}", e);
                self.presenter.prompt(&e.to_string());
                None
            }
        }
    }

    /// Second half of [`search`](Self::search). Results of superseded queries are dropped.
    pub fn finish(
        &mut self,
        ticket: QueryTicket,
        query: &MenuQuery,
        result: Result<DailyMenu, MealError>,
    ) {
        match result {
            Ok(menu) => {
                log::info!("menu for {} loaded", query.date);
                self.presenter.show_result(ticket, menu, query.served_on);
            }
            Err(e) if e.is_network() => {
                log::error!("NEIS not reachable for {}: {}", query.date, e);
                self.presenter.show_error(ticket);
            }
            Err(e) => {
                log::error!("급식 정보 조회 중 오류 ({}): {}", query.date, e);
                self.presenter.show_error(ticket);
            }
        }
    }

    pub async fn fetch(&self, query: &MenuQuery) -> Result<DailyMenu, MealError> {
        get_daily_menu(&self.client, &self.config, query).await
    }
}
