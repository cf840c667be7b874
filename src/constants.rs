pub const DEFAULT_API_URL: &str = "https://open.neis.go.kr/hub/mealServiceDietInfo";

// 경기도교육청 / 산본고등학교
pub const DEFAULT_REGION_CODE: &str = "J10";
pub const DEFAULT_SCHOOL_CODE: &str = "7530079";

pub const RESULT_CODE_SUCCESS: &str = "INFO-000";

pub const RELAY_URL_PARAM: &str = "url";

pub const EMPTY_INPUT_MSG: &str = "날짜를 선택해주세요.";
pub const LOADING_MSG: &str = "급식 정보를 불러오는 중...";
pub const ERROR_MSG: &str = "급식 정보를 불러올 수 없습니다. 잠시 후 다시 시도해주세요.";
pub const HEADING_SUFFIX: &str = " 급식 정보";
