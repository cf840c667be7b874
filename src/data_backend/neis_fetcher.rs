use crate::data_backend::neis_parser::parse_menu_xml;
use crate::data_types::{DailyMenu, MenuQuery, SchoolConfig};
use crate::errors::MealError;

use std::time::Instant;

/// Single GET against NEIS (or the relay in front of it). No retries.
pub async fn fetch_menu_xml(
    client: &reqwest::Client,
    config: &SchoolConfig,
    query: &MenuQuery,
) -> Result<String, MealError> {
    let url = query.request_url(config);
    log::debug!(
        "requesting menu for {}/{} on {} (relay: {})",
        query.region_code,
        query.school_code,
        query.date,
        config.relay_url.is_some()
    );

    let now = Instant::now();
    let resp = client.get(url).send().await?;

    let status = resp.status();
    if !status.is_success() {
        log::warn!("NEIS answered {} for {}", status, query.date);
        return Err(MealError::Network(status));
    }

    let xml_text = resp.text().await?;
    log::debug!("NEIS response: {:.2?}", now.elapsed());

    Ok(xml_text)
}

pub async fn get_daily_menu(
    client: &reqwest::Client,
    config: &SchoolConfig,
    query: &MenuQuery,
) -> Result<DailyMenu, MealError> {
    let xml_text = fetch_menu_xml(client, config, query).await?;

    let now = Instant::now();
    let menu = parse_menu_xml(&xml_text)?;
    log::debug!("parsing xml: {:.2?}", now.elapsed());

    Ok(menu)
}
