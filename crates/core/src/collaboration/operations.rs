//! Pure read-side operations over already-loaded collaboration data.
//!
//! Nothing here performs I/O; callers pass in slices fetched elsewhere
//! and an explicit reference date where bucketing needs "today".

use chrono::{Datelike, Duration, NaiveDate};

use super::error::CommentError;
use super::types::{CollaborationInvitation, CollaborativeEvent, EventStatus};

/// Status criterion for event filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(EventStatus),
}

/// Date-bucket criterion for event filtering, evaluated against each
/// event's start time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    /// Monday-start week containing the reference date.
    ThisWeek,
    ThisMonth,
}

/// Combined criteria for the event list view.
#[derive(Debug, Clone, Default)]
pub struct EventFilters {
    /// Case-insensitive substring match on title and description.
    pub search_term: Option<String>,
    pub status: StatusFilter,
    pub date: DateFilter,
}

/// Filters events down to those visible to an employee: events they
/// created or joined as a collaborator.
pub fn visible_events_for<'a>(
    employee_id: &str,
    events: &'a [CollaborativeEvent],
) -> Vec<&'a CollaborativeEvent> {
    events
        .iter()
        .filter(|event| event.is_participant(employee_id))
        .collect()
}

/// Filters invitations down to those awaiting a response from an
/// employee.
pub fn pending_invitations_for<'a>(
    employee_id: &str,
    invitations: &'a [CollaborationInvitation],
) -> Vec<&'a CollaborationInvitation> {
    invitations
        .iter()
        .filter(|invitation| {
            invitation.receiver_id == employee_id && invitation.status.is_pending()
        })
        .collect()
}

/// Applies search, status, and date criteria to an event list.
pub fn filter_events<'a>(
    events: &'a [CollaborativeEvent],
    filters: &EventFilters,
    today: NaiveDate,
) -> Vec<&'a CollaborativeEvent> {
    let needle = filters
        .search_term
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    events
        .iter()
        .filter(|event| match &needle {
            Some(needle) => {
                event.title.to_lowercase().contains(needle)
                    || event
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(needle))
            }
            None => true,
        })
        .filter(|event| match filters.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => event.status == status,
        })
        .filter(|event| matches_date(event, filters.date, today))
        .collect()
}

fn matches_date(event: &CollaborativeEvent, filter: DateFilter, today: NaiveDate) -> bool {
    let event_date = event.start_time.date_naive();
    match filter {
        DateFilter::All => true,
        DateFilter::Today => event_date == today,
        DateFilter::ThisWeek => {
            let (monday, sunday) = week_bounds(today);
            event_date >= monday && event_date <= sunday
        }
        DateFilter::ThisMonth => {
            event_date.year() == today.year() && event_date.month() == today.month()
        }
    }
}

/// Returns the Monday and Sunday of the week containing the given date.
fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_from_monday = date.weekday().num_days_from_monday();
    let monday = date - Duration::days(days_from_monday as i64);
    (monday, monday + Duration::days(6))
}

/// Validates comment content, returning the trimmed text.
pub fn validate_comment_content(content: &str) -> Result<&str, CommentError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(CommentError::EmptyContent);
    }
    Ok(trimmed)
}
