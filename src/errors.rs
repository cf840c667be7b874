use thiserror::Error;

#[derive(Debug, Error)]
pub enum MealError {
    #[error("날짜를 선택해주세요.")]
    EmptyInput,
    #[error("날짜 형식이 올바르지 않습니다: {0} (YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("HTTP error! status: {0}")]
    Network(reqwest::StatusCode),
    #[error("NEIS request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("급식 정보가 없습니다. ({code}: {message})")]
    DataUnavailable { code: String, message: String },
    #[error("NEIS response is not valid XML: {0}")]
    Malformed(#[from] quick_xml::Error),
}

impl MealError {
    /// true for failures of the request itself, as opposed to its content
    pub fn is_network(&self) -> bool {
        matches!(self, MealError::Network(_) | MealError::Transport(_))
    }
}
