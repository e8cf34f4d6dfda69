//! Quiz time extension arithmetic and outcome messages.
//!
//! A percent of 100 is normal time, 200 is double time. The extra minutes
//! granted are always rounded up so a student never gets less than asked for.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::CanvasId;

/// Smallest percent accepted for an extension (normal time).
pub const MIN_PERCENT: i32 = 100;

/// Which Canvas quiz engine a quiz belongs to.
///
/// Classic quizzes take "extensions", New Quizzes take "accommodations".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizKind {
    Classic,
    New,
}

impl QuizKind {
    pub fn label(self) -> &'static str {
        match self {
            QuizKind::Classic => "Classic",
            QuizKind::New => "New",
        }
    }

    pub fn is_new(self) -> bool {
        matches!(self, QuizKind::New)
    }
}

impl fmt::Display for QuizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extra minutes to grant on a quiz with the given time limit.
///
/// Returns `None` when the quiz has no time limit (missing, or under one
/// minute), meaning there is nothing to extend.
pub fn added_minutes(time_limit: Option<f64>, percent: i32) -> Option<i64> {
    let limit = time_limit.filter(|t| *t >= 1.0)?;
    let extra = limit * (f64::from(percent) - 100.0) / 100.0;
    Some(extra.ceil() as i64)
}

/// Parse the `percent` field of an extension request.
///
/// Canvas-side JavaScript posts it as a string (`"200"`), API clients tend to
/// post a number; both are accepted. Missing, empty and zero values are
/// reported as a missing field.
pub fn parse_percent(value: Option<&serde_json::Value>) -> Result<i32, CoreError> {
    let required = || CoreError::Validation("`percent` field required.".into());

    let percent = match value {
        None | Some(serde_json::Value::Null) => return Err(required()),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| CoreError::Validation("`percent` must be a whole number.".into()))?,
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => return Err(required()),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| CoreError::Validation("`percent` must be a whole number.".into()))?,
        Some(_) => {
            return Err(CoreError::Validation(
                "`percent` must be a whole number.".into(),
            ))
        }
    };

    if percent == 0 {
        return Err(required());
    }
    if percent < i64::from(MIN_PERCENT) || percent > i64::from(i32::MAX) {
        return Err(CoreError::Validation(format!(
            "`percent` must be at least {MIN_PERCENT}."
        )));
    }
    Ok(percent as i32)
}

/// Parse the `user_ids` field of an extension request.
///
/// Ids may arrive as strings or numbers; New Quizzes require integer ids so
/// everything is normalised to [`CanvasId`].
pub fn parse_user_ids(value: Option<&serde_json::Value>) -> Result<Vec<CanvasId>, CoreError> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let items = value
        .as_array()
        .ok_or_else(|| CoreError::Validation("`user_ids` must be a list.".into()))?;

    items
        .iter()
        .map(|item| match item {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .map(|id| id.ok_or_else(|| CoreError::Validation(format!("Invalid user id in {value}"))))
        .collect()
}

/// Result of extending one quiz for a set of students.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionOutcome {
    pub success: bool,
    pub message: String,
    /// Minutes added, `None` when nothing was added.
    pub added_time: Option<i64>,
}

impl ExtensionOutcome {
    pub fn no_time_limit(kind: QuizKind, quiz_id: CanvasId) -> Self {
        Self {
            success: true,
            message: format!("{kind} Quiz #{quiz_id} has no time limit, so there is no time to add."),
            added_time: None,
        }
    }

    pub fn added(kind: QuizKind, quiz_id: CanvasId, minutes: i64) -> Self {
        Self {
            success: true,
            message: format!("Successfully added {minutes} minutes to {kind} Quiz #{quiz_id}"),
            added_time: Some(minutes),
        }
    }

    pub fn failed(kind: QuizKind, quiz_id: CanvasId, error: impl fmt::Display) -> Self {
        Self {
            success: false,
            message: format!(
                "Error creating extension for {kind} Quiz #{quiz_id}. Canvas status code: {error}"
            ),
            added_time: None,
        }
    }
}
