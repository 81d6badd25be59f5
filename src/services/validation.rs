use chrono::NaiveDate;

use crate::error::{AppError, AppResult};
use crate::models::entry::{EntryContent, UpsertEntryRequest, ValidEntry, MAX_RATING, MIN_RATING};

/// Check an upsert request against `today` and the configured minimum text
/// length. Skipped entries drop any text or rating the client sent.
pub fn validate_entry(
    req: &UpsertEntryRequest,
    today: NaiveDate,
    min_length: usize,
) -> AppResult<ValidEntry> {
    let date = req
        .date
        .ok_or_else(|| AppError::validation("Date is required"))?;

    if date > today {
        return Err(AppError::validation(format!("Date {date} is in the future")));
    }

    let content = if req.skipped {
        EntryContent::Skipped
    } else {
        let text = req.text.as_deref().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(AppError::validation("Text is required unless the day is skipped"));
        }
        if text.chars().count() < min_length {
            return Err(AppError::validation(format!(
                "Text must be at least {min_length} characters"
            )));
        }
        if let Some(rating) = req.rating {
            if !(MIN_RATING..=MAX_RATING).contains(&rating) {
                return Err(AppError::validation(format!(
                    "Rating must be between {MIN_RATING} and {MAX_RATING}"
                )));
            }
        }
        EntryContent::Written {
            text: text.to_string(),
            rating: req.rating,
        }
    };

    Ok(ValidEntry { date, content })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: usize = 10;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    fn written(date: NaiveDate, text: &str, rating: Option<i32>) -> UpsertEntryRequest {
        UpsertEntryRequest {
            date: Some(date),
            text: Some(text.into()),
            rating,
            skipped: false,
        }
    }

    fn assert_validation(result: AppResult<ValidEntry>) {
        assert!(matches!(result, Err(AppError::Validation(_))), "got {result:?}");
    }

    #[test]
    fn test_valid_written_entry() {
        let req = written(today(), "  coffee with a friend  ", Some(3));
        let entry = validate_entry(&req, today(), MIN).unwrap();
        assert_eq!(entry.date, today());
        assert_eq!(
            entry.content,
            EntryContent::Written {
                text: "coffee with a friend".into(),
                rating: Some(3)
            }
        );
    }

    #[test]
    fn test_missing_date_rejected() {
        let mut req = written(today(), "coffee with a friend", None);
        req.date = None;
        assert_validation(validate_entry(&req, today(), MIN));
    }

    #[test]
    fn test_tomorrow_rejected() {
        let tomorrow = today().succ_opt().unwrap();
        let req = written(tomorrow, "coffee with a friend", None);
        assert_validation(validate_entry(&req, today(), MIN));
    }

    #[test]
    fn test_past_date_accepted() {
        let past = NaiveDate::from_ymd_opt(2023, 11, 2).unwrap();
        assert!(validate_entry(&written(past, "coffee with a friend", None), today(), MIN).is_ok());
    }

    #[test]
    fn test_empty_text_rejected() {
        assert_validation(validate_entry(&written(today(), "   ", None), today(), MIN));
    }

    #[test]
    fn test_short_text_rejected() {
        assert_validation(validate_entry(&written(today(), "short", None), today(), MIN));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 10 characters, 20 bytes
        let text = "éééééééééé".chars().take(10).collect::<String>();
        assert!(validate_entry(&written(today(), &text, None), today(), MIN).is_ok());
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        for rating in [0, 4] {
            let req = written(today(), "coffee with a friend", Some(rating));
            assert_validation(validate_entry(&req, today(), MIN));
        }
    }

    #[test]
    fn test_skipped_discards_text_and_rating() {
        let req = UpsertEntryRequest {
            date: Some(today()),
            text: Some("ignored".into()),
            rating: Some(9),
            skipped: true,
        };
        let entry = validate_entry(&req, today(), MIN).unwrap();
        assert_eq!(entry.content, EntryContent::Skipped);
        assert_eq!(entry.content.text(), None);
        assert_eq!(entry.content.rating(), None);
    }

    #[test]
    fn test_skipped_future_date_still_rejected() {
        let req = UpsertEntryRequest {
            date: today().succ_opt(),
            skipped: true,
            ..Default::default()
        };
        assert_validation(validate_entry(&req, today(), MIN));
    }
}
