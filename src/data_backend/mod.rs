use chrono::{Datelike, NaiveDate};

pub mod neis_fetcher;
pub mod neis_parser;

/// Long-form Korean date, e.g. `2024년 3월 15일 금요일`
pub fn korean_date_fmt(date: NaiveDate) -> String {
    let week_days = [
        "월요일", "화요일", "수요일", "목요일", "금요일", "토요일", "일요일",
    ];

    format!(
        "{}년 {}월 {}일 {}",
        date.year(),
        date.month(),
        date.day(),
        week_days[date.weekday().num_days_from_monday() as usize]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_weekday_in_korean() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(korean_date_fmt(date), "2024년 3월 15일 금요일");

        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(korean_date_fmt(date), "2023년 12월 31일 일요일");
    }
}
