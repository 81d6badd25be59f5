use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Source of "today" for the handler layer. Everything below the handlers
/// receives the date as a parameter.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    offset: FixedOffset,
}

impl Clock {
    pub fn new(utc_offset_minutes: i32) -> Self {
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::warn!(
                    utc_offset_minutes,
                    "UTC offset out of range, falling back to UTC"
                );
                Utc.fix()
            });
        Self { offset }
    }

    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }

    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }
}
