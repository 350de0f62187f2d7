use chrono::{Months, NaiveDate};
use serde::Deserialize;

/// Look-back window used by list filters and reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Period {
    #[serde(rename = "7d")]
    LastWeek,
    #[serde(rename = "30d")]
    LastMonth,
    #[serde(rename = "90d")]
    LastQuarter,
    #[serde(rename = "1y")]
    LastYear,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl Period {
    /// First date inside the window, `None` for `All`.
    pub fn since(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::LastWeek => today.checked_sub_days(chrono::Days::new(7)),
            Period::LastMonth => today.checked_sub_days(chrono::Days::new(30)),
            Period::LastQuarter => today.checked_sub_days(chrono::Days::new(90)),
            Period::LastYear => today.checked_sub_months(Months::new(12)),
            Period::All => None,
        }
    }

    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.since(today) {
            Some(since) => date >= since,
            None => true,
        }
    }
}

/// Case-insensitive substring match; an empty or missing needle matches everything.
pub fn matches_search(needle: Option<&str>, haystacks: &[&str]) -> bool {
    let needle = match needle.map(str::trim) {
        None | Some("") => return true,
        Some(needle) => needle.to_lowercase(),
    };
    haystacks
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
}

/// Mean rounded to one decimal, 0 when empty.
pub fn mean_rating(ratings: impl IntoIterator<Item = u8>) -> f64 {
    let (sum, count) = ratings
        .into_iter()
        .fold((0u32, 0u32), |(sum, count), rating| (sum + rating as u32, count + 1));
    if count == 0 {
        return 0.0;
    }
    ((sum as f64 / count as f64) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_windows() {
        let today = date(2024, 3, 31);
        assert!(Period::LastWeek.contains(date(2024, 3, 24), today));
        assert!(!Period::LastWeek.contains(date(2024, 3, 23), today));
        assert!(Period::LastMonth.contains(date(2024, 3, 1), today));
        assert!(!Period::LastMonth.contains(date(2024, 2, 29), today));
        assert!(Period::LastYear.contains(date(2023, 3, 31), today));
        assert!(!Period::LastYear.contains(date(2023, 3, 30), today));
        assert!(Period::All.contains(date(1970, 1, 1), today));
    }

    #[test]
    fn test_period_from_query_value() {
        let period: Period = serde_json::from_str("\"90d\"").unwrap();
        assert_eq!(period, Period::LastQuarter);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        assert!(matches_search(Some("yAr"), &["Toyota", "Yaris"]));
        assert!(matches_search(Some("  "), &["anything"]));
        assert!(matches_search(None, &[]));
        assert!(!matches_search(Some("clio"), &["Toyota", "Yaris"]));
    }

    #[test]
    fn test_mean_rating_rounds_to_one_decimal() {
        assert_eq!(mean_rating([5, 4]), 4.5);
        assert_eq!(mean_rating([5, 4, 4]), 4.3);
        assert_eq!(mean_rating(Vec::new()), 0.0);
    }
}
