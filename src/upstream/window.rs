use chrono::NaiveDate;

/// The reporting window an endpoint asks for, anchored on a calendar day.
///
/// Each endpoint picks its own window; they are deliberately not unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// `date=YYYY-MM-DD`
    Date,
    /// `start=DAYT00:00:00&end=DAYT23:59:59`
    FullDay,
    /// `start=DAYTHH:00:00&end=DAYTHH:59:59`
    Hour(u8),
}

impl TimeWindow {
    pub fn query_pairs(self, day: NaiveDate) -> Vec<(&'static str, String)> {
        let day = day.format("%Y-%m-%d");
        match self {
            Self::Date => vec![("date", day.to_string())],
            Self::FullDay => vec![
                ("start", format!("{day}T00:00:00")),
                ("end", format!("{day}T23:59:59")),
            ],
            Self::Hour(hour) => vec![
                ("start", format!("{day}T{hour:02}:00:00")),
                ("end", format!("{day}T{hour:02}:59:59")),
            ],
        }
    }
}
