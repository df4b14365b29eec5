//! Content calendar slot finder

use chrono::{Duration, NaiveDate, Utc};

use crate::entities::ContentIdea;

/// Default number of days scanned ahead
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

/// Current calendar date (UTC)
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// First day after `today` with no pending idea scheduled on it
///
/// Scans `horizon_days` days starting tomorrow. When every day in the window
/// is taken, tomorrow is returned and the conflict accepted.
pub fn next_available_date(
    content: &[ContentIdea],
    today: NaiveDate,
    horizon_days: u32,
) -> NaiveDate {
    let tomorrow = today + Duration::days(1);
    (0..i64::from(horizon_days.max(1)))
        .map(|offset| tomorrow + Duration::days(offset))
        .find(|day| {
            !content
                .iter()
                .any(|idea| idea.is_pending() && idea.post_date == *day)
        })
        .unwrap_or(tomorrow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ContentStatus, NewContentIdea, Platform};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn idea_on(date: NaiveDate, status: ContentStatus) -> ContentIdea {
        NewContentIdea::new("hook", Platform::TikTok, date)
            .with_status(status)
            .into_idea()
    }

    #[test]
    fn test_empty_calendar_gives_tomorrow() {
        assert_eq!(next_available_date(&[], day(1), 30), day(2));
    }

    #[test]
    fn test_skips_taken_days() {
        let content = vec![
            idea_on(day(2), ContentStatus::Idea),
            idea_on(day(3), ContentStatus::Editing),
        ];
        assert_eq!(next_available_date(&content, day(1), 30), day(4));
    }

    #[test]
    fn test_posted_ideas_free_their_slot() {
        let content = vec![idea_on(day(2), ContentStatus::Posted)];
        assert_eq!(next_available_date(&content, day(1), 30), day(2));
    }

    #[test]
    fn test_full_horizon_falls_back_to_tomorrow() {
        let today = day(1);
        let content: Vec<_> = (1..=5)
            .map(|offset| idea_on(today + Duration::days(offset), ContentStatus::Idea))
            .collect();
        assert_eq!(next_available_date(&content, today, 5), day(2));
        assert_eq!(next_available_date(&content, today, 6), day(7));
    }

    #[test]
    fn test_result_never_collides_within_horizon() {
        let today = day(1);
        let content: Vec<_> = [1, 2, 4, 7]
            .iter()
            .map(|offset| idea_on(today + Duration::days(*offset), ContentStatus::Idea))
            .collect();
        let next = next_available_date(&content, today, DEFAULT_HORIZON_DAYS);
        assert!(!content.iter().any(|c| c.post_date == next));
        assert_eq!(next, today + Duration::days(3));
    }
}
