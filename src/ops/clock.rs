use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};

/// "Now" as the views see it: the current calendar date plus the UTC offset
/// used to turn stored instants into local calendar days.
///
/// Passed explicitly into filters and aggregation so they stay pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub today: NaiveDate,
    pub offset: FixedOffset,
}

impl Clock {
    /// The system's local date and offset
    pub fn local() -> Self {
        let now = Local::now();
        Clock {
            today: now.date_naive(),
            offset: now.offset().fix(),
        }
    }

    /// A fixed date with UTC day boundaries
    pub fn fixed(today: NaiveDate) -> Self {
        Clock {
            today,
            offset: Utc.fix(),
        }
    }

    /// Local calendar day of a stored instant
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_date_respects_offset() {
        let instant: DateTime<Utc> = "2025-05-01T23:30:00Z".parse().unwrap();
        let utc = Clock::fixed(NaiveDate::from_ymd_opt(2025, 5, 2).unwrap());
        assert_eq!(utc.local_date(instant), NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());

        let berlin = Clock {
            offset: FixedOffset::east_opt(2 * 3600).unwrap(),
            ..utc
        };
        assert_eq!(berlin.local_date(instant), NaiveDate::from_ymd_opt(2025, 5, 2).unwrap());
    }
}
