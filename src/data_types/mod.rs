pub mod neis_data_types;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{DEFAULT_API_URL, DEFAULT_REGION_CODE, DEFAULT_SCHOOL_CODE};
use crate::errors::MealError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    /// MMEAL_SC_CODE as used by NEIS
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        MealSlot::ALL.into_iter().find(|slot| slot.code() == code)
    }

    pub fn code(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "1",
            MealSlot::Lunch => "2",
            MealSlot::Dinner => "3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "조식",
            MealSlot::Lunch => "중식",
            MealSlot::Dinner => "석식",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct DailyMenu {
    pub breakfast: Vec<String>,
    pub lunch: Vec<String>,
    pub dinner: Vec<String>,
}

impl DailyMenu {
    pub fn slot(&self, slot: MealSlot) -> &[String] {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
        }
    }

    pub fn set_slot(&mut self, slot: MealSlot, dishes: Vec<String>) {
        match slot {
            MealSlot::Breakfast => self.breakfast = dishes,
            MealSlot::Lunch => self.lunch = dishes,
            MealSlot::Dinner => self.dinner = dishes,
        }
    }

    pub fn is_empty(&self) -> bool {
        MealSlot::ALL.iter().all(|slot| self.slot(*slot).is_empty())
    }
}

/// Which school to ask for, and where to ask.
#[derive(Debug, Clone)]
pub struct SchoolConfig {
    pub region_code: String,
    pub school_code: String,
    pub api_url: Url,
    pub relay_url: Option<Url>,
    pub api_key: Option<String>,
}

impl SchoolConfig {
    pub fn new(
        region_code: String,
        school_code: String,
        api_url: &str,
        relay_url: Option<&str>,
        api_key: Option<String>,
    ) -> Result<Self, url::ParseError> {
        Ok(SchoolConfig {
            region_code,
            school_code,
            api_url: Url::parse(api_url)?,
            relay_url: relay_url.map(Url::parse).transpose()?,
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }
}

impl Default for SchoolConfig {
    fn default() -> Self {
        SchoolConfig {
            region_code: DEFAULT_REGION_CODE.to_string(),
            school_code: DEFAULT_SCHOOL_CODE.to_string(),
            api_url: Url::parse(DEFAULT_API_URL).expect("default NEIS url is valid"),
            relay_url: None,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuQuery {
    pub region_code: String,
    pub school_code: String,
    /// YYYYMMDD
    pub date: String,
    pub served_on: NaiveDate,
}

impl MenuQuery {
    /// Builds a query from a `YYYY-MM-DD` string as typed by the user.
    pub fn from_date_input(config: &SchoolConfig, input: &str) -> Result<Self, MealError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(MealError::EmptyInput);
        }

        let served_on = NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map_err(|_| MealError::InvalidDate(input.to_string()))?;

        let date = input.replace('-', "");
        if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MealError::InvalidDate(input.to_string()));
        }

        Ok(MenuQuery {
            region_code: config.region_code.clone(),
            school_code: config.school_code.clone(),
            date,
            served_on,
        })
    }

    /// Full request url, wrapped into the relay's `url` parameter if one is configured.
    pub fn request_url(&self, config: &SchoolConfig) -> Url {
        let mut target = config.api_url.clone();
        {
            let mut params = target.query_pairs_mut();
            params
                .append_pair("ATPT_OFCDC_SC_CODE", &self.region_code)
                .append_pair("SD_SCHUL_CODE", &self.school_code)
                .append_pair("MLSV_YMD", &self.date);
            if let Some(key) = config.api_key.as_ref() {
                params.append_pair("KEY", key);
            }
        }

        match config.relay_url.as_ref() {
            Some(relay) => {
                let mut wrapped = relay.clone();
                wrapped
                    .query_pairs_mut()
                    .append_pair(crate::constants::RELAY_URL_PARAM, target.as_str());
                wrapped
            }
            None => target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_token_strips_separators() {
        let config = SchoolConfig::default();
        for input in ["2024-03-15", "1999-12-31", "2024-02-29", " 2030-01-01 "] {
            let query = MenuQuery::from_date_input(&config, input).unwrap();
            assert_eq!(query.date, input.trim().replace('-', ""));
            assert_eq!(query.date.len(), 8);
            assert!(query.date.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn empty_date_is_rejected() {
        let config = SchoolConfig::default();
        assert!(matches!(
            MenuQuery::from_date_input(&config, ""),
            Err(MealError::EmptyInput)
        ));
        assert!(matches!(
            MenuQuery::from_date_input(&config, "   "),
            Err(MealError::EmptyInput)
        ));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let config = SchoolConfig::default();
        for input in ["2024-02-30", "15.03.2024", "2024/03/15", "tomorrow", "2024-3-5"] {
            assert!(
                matches!(
                    MenuQuery::from_date_input(&config, input),
                    Err(MealError::InvalidDate(_))
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn request_url_carries_school_and_date() {
        let config = SchoolConfig::default();
        let query = MenuQuery::from_date_input(&config, "2024-03-15").unwrap();
        let url = query.request_url(&config);

        assert_eq!(
            url.as_str(),
            "https://open.neis.go.kr/hub/mealServiceDietInfo?ATPT_OFCDC_SC_CODE=J10&SD_SCHUL_CODE=7530079&MLSV_YMD=20240315"
        );
    }

    #[test]
    fn relay_wraps_encoded_target() {
        let config = SchoolConfig::new(
            "J10".to_string(),
            "7530079".to_string(),
            "https://open.neis.go.kr/hub/mealServiceDietInfo",
            Some("https://api.allorigins.win/raw"),
            None,
        )
        .unwrap();
        let query = MenuQuery::from_date_input(&config, "2024-03-15").unwrap();
        let url = query.request_url(&config);

        assert_eq!(url.host_str(), Some("api.allorigins.win"));
        let (name, target) = url.query_pairs().next().unwrap();
        assert_eq!(name, "url");
        assert_eq!(
            target,
            "https://open.neis.go.kr/hub/mealServiceDietInfo?ATPT_OFCDC_SC_CODE=J10&SD_SCHUL_CODE=7530079&MLSV_YMD=20240315"
        );
        assert!(url.as_str().contains("https%3A%2F%2Fopen.neis.go.kr"));
    }

    #[test]
    fn api_key_is_only_sent_when_configured() {
        let mut config = SchoolConfig::default();
        let query = MenuQuery::from_date_input(&config, "2024-03-15").unwrap();
        assert!(!query.request_url(&config).as_str().contains("KEY="));

        config.api_key = Some("secret".to_string());
        assert!(query.request_url(&config).as_str().ends_with("&KEY=secret"));
    }

    #[test]
    fn slot_codes_map_to_meals() {
        assert_eq!(MealSlot::from_code("1"), Some(MealSlot::Breakfast));
        assert_eq!(MealSlot::from_code("2"), Some(MealSlot::Lunch));
        assert_eq!(MealSlot::from_code("3"), Some(MealSlot::Dinner));
        assert_eq!(MealSlot::from_code(" 2 "), Some(MealSlot::Lunch));
        assert_eq!(MealSlot::from_code("4"), None);
        assert_eq!(MealSlot::from_code(""), None);
        for slot in MealSlot::ALL {
            assert_eq!(MealSlot::from_code(slot.code()), Some(slot));
        }
    }
}
