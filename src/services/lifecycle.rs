//! Debate lifecycle rules.
//!
//! Everything here is a pure function of a debate row, the caller and the
//! current instant. The database-facing services call into this module
//! before they write anything, so a rejected request never leaves a partial
//! change behind.
//!
//! Status only moves forward: `SCHEDULED -> ACTIVE -> ENDED`. The sweep is
//! the only user-independent path that advances it; administrators can force
//! any status through the admin surface.

use crate::{
    error::{AppError, AppResult},
    models::{ArguModel, ArguStatus},
};
use chrono::NaiveDateTime;

/// Checks a debate window. `start` must be strictly before `end` and
/// strictly in the future.
pub fn validate_schedule(
    start: NaiveDateTime,
    end: NaiveDateTime,
    now: NaiveDateTime,
) -> AppResult<()> {
    validate_window(start, end)?;
    if start <= now {
        return Err(AppError::validation("Start date must be in the future"));
    }
    Ok(())
}

/// Ordering check only. Used by the admin edit path, which may move a
/// window that has already opened.
pub fn validate_window(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<()> {
    if start >= end {
        return Err(AppError::validation("Start date must be before end date"));
    }
    Ok(())
}

/// Hidden debates do not exist as far as the user surface is concerned.
pub fn ensure_visible(argu: &ArguModel) -> AppResult<()> {
    if argu.is_hidden {
        return Err(AppError::not_found("Argu"));
    }
    Ok(())
}

pub fn ensure_owner(argu: &ArguModel, caller_id: i32) -> AppResult<()> {
    if argu.user_id != caller_id {
        return Err(AppError::unauthorized(
            "Only the author can modify this argu",
        ));
    }
    Ok(())
}

pub fn already_started() -> AppError {
    AppError::validation("Argu cannot be modified after it has started")
}

pub fn ensure_scheduled(argu: &ArguModel) -> AppResult<()> {
    if argu.status != ArguStatus::Scheduled {
        return Err(already_started());
    }
    Ok(())
}

/// Order matters: visibility, then ownership, then status.
pub fn authorize_update(argu: &ArguModel, caller_id: i32) -> AppResult<()> {
    ensure_visible(argu)?;
    ensure_owner(argu, caller_id)?;
    ensure_scheduled(argu)
}

/// Same as `authorize_update` minus the visibility check.
///
/// Owners can still delete a hidden debate that has not started.
// TODO: decide with the moderation rules whether hidden debates become
// immutable for their authors.
pub fn authorize_delete(argu: &ArguModel, caller_id: i32) -> AppResult<()> {
    ensure_owner(argu, caller_id)?;
    ensure_scheduled(argu)
}

/// Opinions are accepted only while the debate is ACTIVE and `now` lies in
/// `[start, end]`. Both checks are needed because the sweep runs on an
/// interval and status can lag behind the clock.
pub fn ensure_accepting_opinions(argu: &ArguModel, now: NaiveDateTime) -> AppResult<()> {
    if argu.status != ArguStatus::Active {
        return Err(AppError::validation(
            "Opinions can only be submitted while the argu is active",
        ));
    }
    if now < argu.start_date || now > argu.end_date {
        return Err(AppError::validation("Argu is not within its voting period"));
    }
    Ok(())
}

/// Partial edit of a debate. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ArguChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i32>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

/// The values a debate will hold after an accepted edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i32>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

/// Validates an owner edit against the effective post-update values.
///
/// A supplied title is trimmed; a blank one keeps the current title. The
/// schedule is re-checked with omitted dates filled in from the current row,
/// so sending only `end_date` is validated against the existing `start_date`.
pub fn resolve_changes(
    argu: &ArguModel,
    changes: ArguChanges,
    now: NaiveDateTime,
) -> AppResult<ResolvedChanges> {
    let resolved = resolve_fields(argu, changes);
    validate_schedule(resolved.start_date, resolved.end_date, now)?;
    Ok(resolved)
}

/// Admin variant of `resolve_changes`: only the window ordering is enforced.
pub fn resolve_admin_changes(
    argu: &ArguModel,
    changes: ArguChanges,
) -> AppResult<ResolvedChanges> {
    let resolved = resolve_fields(argu, changes);
    validate_window(resolved.start_date, resolved.end_date)?;
    Ok(resolved)
}

fn resolve_fields(argu: &ArguModel, changes: ArguChanges) -> ResolvedChanges {
    let title = changes
        .title
        .map(|raw| raw.trim().to_string())
        .filter(|t| !t.is_empty());

    ResolvedChanges {
        title,
        content: changes.content,
        category_id: changes.category_id,
        start_date: changes.start_date.unwrap_or(argu.start_date),
        end_date: changes.end_date.unwrap_or(argu.end_date),
    }
}
