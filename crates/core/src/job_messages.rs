//! Job progress metadata and the user-facing messages the worker reports.
//!
//! The instructor page polls `/jobs/{key}/` and renders `status_msg`
//! verbatim, so the wording here is part of the UI.

use serde::{Deserialize, Serialize};

/// Lifecycle phase reported in job metadata.
///
/// This is the business-level outcome shown to instructors. It is distinct
/// from the queue status of the job row: a job that reports `Failed` here
/// still finished normally from the queue's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPhase {
    Started,
    Processing,
    Complete,
    Failed,
}

/// A quiz that received extra time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatedQuiz {
    pub title: String,
    pub added_time: i64,
}

/// A quiz left untouched because it has no time limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnchangedQuiz {
    pub title: String,
}

/// Progress metadata stored on every job and returned by the job status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMeta {
    pub percent: i16,
    pub status: JobPhase,
    pub status_msg: String,
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_list: Option<Vec<UpdatedQuiz>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unchanged_list: Option<Vec<UnchangedQuiz>>,
}

impl JobMeta {
    pub fn new(percent: i16, status_msg: impl Into<String>, status: JobPhase) -> Self {
        Self {
            percent,
            status,
            status_msg: status_msg.into(),
            error: matches!(status, JobPhase::Failed),
            quiz_list: None,
            unchanged_list: None,
        }
    }

    pub fn started() -> Self {
        Self::new(0, "Starting...", JobPhase::Started)
    }

    pub fn processing(percent: i16, status_msg: impl Into<String>) -> Self {
        Self::new(percent, status_msg, JobPhase::Processing)
    }

    pub fn failed(percent: i16, status_msg: impl Into<String>) -> Self {
        Self::new(percent, status_msg, JobPhase::Failed)
    }

    pub fn complete(status_msg: impl Into<String>) -> Self {
        Self::new(100, status_msg, JobPhase::Complete)
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Serializing plain structs of strings and numbers cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

pub const MSG_INVALID_REQUEST: &str = "Invalid Request";
pub const MSG_COURSE_NOT_FOUND: &str = "Course not found.";
pub const MSG_PERCENT_REQUIRED: &str = "`percent` field required.";
pub const MSG_NO_QUIZZES: &str = "Sorry, there are no quizzes for this course.";
pub const MSG_NOTHING_TO_REFRESH: &str = "Complete. No quizzes required updates.";
pub const MSG_GETTING_EXTENSIONS: &str = "Getting past extensions.";
pub const MSG_UNKNOWN_ERROR: &str = "An unknown error occured.";

/// Whole-number completion percentage for item `index` (0-based) of `total`.
pub fn progress_percent(index: usize, total: usize) -> i16 {
    if total == 0 {
        return 0;
    }
    ((index * 100) / total).min(100) as i16
}

fn quizzes_have(count: usize) -> &'static str {
    if count == 1 {
        "quiz has"
    } else {
        "quizzes have"
    }
}

/// `Updating quiz #4 - Quiz 4 [1 of 4]`
pub fn updating_quiz(quiz_id: i64, title: &str, position: usize, total: usize) -> String {
    format!("Updating quiz #{quiz_id} - {title} [{position} of {total}]")
}

/// `Refreshing quiz #4 - Quiz 4 [1 of 4]`
pub fn refreshing_quiz(quiz_id: i64, title: &str, position: usize, total: usize) -> String {
    format!("Refreshing quiz #{quiz_id} - {title} [{position} of {total}]")
}

/// Final message of a successful update job.
pub fn update_summary(updated: usize, students: usize, percent: i32, unchanged: usize) -> String {
    format!(
        "Success! {updated} {} been updated for {students} student(s) to have {percent}% time. \
         {unchanged} {} no time limit and were left unchanged.",
        quizzes_have(updated),
        quizzes_have(unchanged),
    )
}

/// Final message of a successful refresh job.
pub fn refresh_summary(updated: usize) -> String {
    format!("{updated} quizzes have been updated.")
}

/// Message reported by a refresh job when a quiz could not be extended.
pub fn refresh_failure(extension_message: &str) -> String {
    format!("Some quizzes couldn't be updated. {extension_message}")
}

/// Message reported when a course has no active extensions left.
pub fn no_active_extensions<S: AsRef<str>>(inactive_students: &[S]) -> String {
    let mut msg = String::from("No active extensions were found.<br>");
    if !inactive_students.is_empty() {
        let names: Vec<&str> = inactive_students.iter().map(AsRef::as_ref).collect();
        msg.push_str("Extensions for the following students are inactive:<br>");
        msg.push_str(&names.join("<br>"));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_summary_plural() {
        assert_eq!(
            update_summary(2, 3, 200, 2),
            "Success! 2 quizzes have been updated for 3 student(s) to have 200% time. \
             2 quizzes have no time limit and were left unchanged."
        );
    }

    #[test]
    fn update_summary_singular() {
        assert_eq!(
            update_summary(1, 1, 150, 1),
            "Success! 1 quiz has been updated for 1 student(s) to have 150% time. \
             1 quiz has no time limit and were left unchanged."
        );
        assert!(update_summary(0, 1, 150, 0).starts_with("Success! 0 quizzes have"));
    }

    #[test]
    fn no_active_extensions_lists_inactive_students() {
        assert_eq!(
            no_active_extensions(&["Missing User"]),
            "No active extensions were found.<br>Extensions for the following students are inactive:<br>Missing User"
        );
        assert_eq!(
            no_active_extensions::<&str>(&[]),
            "No active extensions were found.<br>"
        );
    }

    #[test]
    fn progress_is_bounded() {
        assert_eq!(progress_percent(0, 4), 0);
        assert_eq!(progress_percent(1, 4), 25);
        assert_eq!(progress_percent(2, 3), 66);
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn meta_serializes_expected_keys() {
        let json = JobMeta::failed(0, MSG_COURSE_NOT_FOUND).to_json();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["status_msg"], "Course not found.");
        assert_eq!(json["percent"], 0);
        assert_eq!(json["error"], true);
        assert!(json.get("quiz_list").is_none());

        let json = JobMeta::started().to_json();
        assert_eq!(json["status"], "started");
        assert_eq!(json["error"], false);
    }
}
