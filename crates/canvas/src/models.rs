//! Canvas API payloads, trimmed to the fields the extension workflow reads.

use quizext_core::extension::QuizKind;
use quizext_core::types::CanvasId;
use serde::{Deserialize, Deserializer, Serialize};

/// Enrollment types that count as "student" for extension purposes.
pub const STUDENT_ENROLLMENT: &str = "StudentEnrollment";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Course {
    pub id: CanvasId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Enrollment {
    #[serde(rename = "type")]
    pub enrollment_type: String,
    pub enrollment_state: String,
}

impl Enrollment {
    /// Active and invited enrollments both count as current.
    pub fn is_current(&self) -> bool {
        matches!(self.enrollment_state.as_str(), "active" | "invited")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CanvasUser {
    pub id: CanvasId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sortable_name: Option<String>,
    #[serde(default)]
    pub sis_user_id: Option<String>,
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
}

impl CanvasUser {
    /// Name stored locally and shown in inactive-extension reports.
    pub fn display_name(&self) -> &str {
        self.sortable_name.as_deref().unwrap_or(&self.name)
    }

    /// Types of the user's current enrollments.
    pub fn current_enrollment_types(&self) -> Vec<&str> {
        self.enrollments
            .iter()
            .filter(|e| e.is_current())
            .map(|e| e.enrollment_type.as_str())
            .collect()
    }

    pub fn is_current_student(&self) -> bool {
        self.current_enrollment_types()
            .iter()
            .any(|t| *t == STUDENT_ENROLLMENT)
    }
}

/// A quiz from either engine, normalised to a time limit in minutes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasQuiz {
    pub id: CanvasId,
    pub title: String,
    pub time_limit: Option<f64>,
    pub kind: QuizKind,
}

/// Classic quiz as returned by `/api/v1/courses/{c}/quizzes`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassicQuizPayload {
    pub id: CanvasId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub time_limit: Option<f64>,
}

impl From<ClassicQuizPayload> for CanvasQuiz {
    fn from(q: ClassicQuizPayload) -> Self {
        Self {
            id: q.id,
            title: q.title,
            time_limit: q.time_limit,
            kind: QuizKind::Classic,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewQuizSettings {
    #[serde(default)]
    pub has_time_limit: bool,
    #[serde(default)]
    pub session_time_limit_in_seconds: Option<f64>,
}

/// New Quiz as returned by `/api/quiz/v1/courses/{c}/quizzes`.
///
/// The New Quizzes API serialises ids as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuizPayload {
    #[serde(deserialize_with = "canvas_id")]
    pub id: CanvasId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub quiz_settings: Option<NewQuizSettings>,
}

impl From<NewQuizPayload> for CanvasQuiz {
    fn from(q: NewQuizPayload) -> Self {
        let settings = q.quiz_settings.unwrap_or_default();
        let time_limit = if settings.has_time_limit {
            settings.session_time_limit_in_seconds.unwrap_or(0.0) / 60.0
        } else {
            0.0
        };
        Self {
            id: q.id,
            title: q.title,
            time_limit: Some(time_limit),
            kind: QuizKind::New,
        }
    }
}

/// Extra time for one student on one quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizExtension {
    pub user_id: CanvasId,
    pub extra_time: i64,
}

fn canvas_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CanvasId, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(CanvasId),
        Text(String),
    }

    match Id::deserialize(deserializer)? {
        Id::Number(n) => Ok(n),
        Id::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
