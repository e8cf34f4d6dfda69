//! In-memory Canvas and job fixtures for worker tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use quizext_canvas::models::{CanvasQuiz, CanvasUser, Course, Enrollment, QuizExtension};
use quizext_canvas::{CanvasError, Lms};
use quizext_core::extension::QuizKind;
use quizext_core::types::{CanvasId, DbId};
use quizext_db::models::job::JobType;
use quizext_db::repositories::JobRepo;
use sqlx::PgPool;

/// One `set_extensions` / `set_accommodations` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionCall {
    pub quiz_id: CanvasId,
    pub kind: QuizKind,
    pub extensions: Vec<QuizExtension>,
}

/// "Student, A" as Canvas shows it in `name`: "A Student".
fn display_name(sortable_name: &str) -> String {
    match sortable_name.split_once(", ") {
        Some((last, first)) => format!("{first} {last}"),
        None => sortable_name.to_string(),
    }
}

#[derive(Default)]
pub struct FakeLms {
    courses: HashMap<CanvasId, Course>,
    users: HashMap<CanvasId, CanvasUser>,
    quizzes: Vec<CanvasQuiz>,
    new_quizzes: Vec<CanvasQuiz>,
    new_quizzes_unsupported: bool,
    rejected_quizzes: HashSet<CanvasId>,
    course_delay: Option<Duration>,
    calls: Mutex<Vec<ExtensionCall>>,
}

impl FakeLms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_course(mut self, id: CanvasId, name: &str) -> Self {
        self.courses.insert(
            id,
            Course {
                id,
                name: name.to_string(),
            },
        );
        self
    }

    pub fn with_user(mut self, id: CanvasId, sortable_name: &str, enrollment_type: &str) -> Self {
        self.users.insert(
            id,
            CanvasUser {
                id,
                name: display_name(sortable_name),
                sortable_name: Some(sortable_name.to_string()),
                sis_user_id: Some(format!("SIS{id}")),
                enrollments: vec![Enrollment {
                    enrollment_type: enrollment_type.to_string(),
                    enrollment_state: "active".to_string(),
                }],
            },
        );
        self
    }

    pub fn with_student(self, id: CanvasId, sortable_name: &str) -> Self {
        self.with_user(id, sortable_name, "StudentEnrollment")
    }

    pub fn with_quiz(mut self, id: CanvasId, title: &str, time_limit: Option<f64>) -> Self {
        self.quizzes.push(CanvasQuiz {
            id,
            title: title.to_string(),
            time_limit,
            kind: QuizKind::Classic,
        });
        self
    }

    pub fn with_new_quiz(mut self, id: CanvasId, title: &str, time_limit: f64) -> Self {
        self.new_quizzes.push(CanvasQuiz {
            id,
            title: title.to_string(),
            time_limit: Some(time_limit),
            kind: QuizKind::New,
        });
        self
    }

    pub fn without_new_quizzes(mut self) -> Self {
        self.new_quizzes_unsupported = true;
        self
    }

    /// Make Canvas answer 404 when extending this quiz.
    pub fn rejecting(mut self, quiz_id: CanvasId) -> Self {
        self.rejected_quizzes.insert(quiz_id);
        self
    }

    /// Make every course lookup take `delay`, standing in for a slow Canvas.
    pub fn with_course_delay(mut self, delay: Duration) -> Self {
        self.course_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<ExtensionCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(
        &self,
        quiz_id: CanvasId,
        kind: QuizKind,
        extensions: &[QuizExtension],
    ) -> Result<(), CanvasError> {
        if self.rejected_quizzes.contains(&quiz_id) {
            return Err(CanvasError::NotFound);
        }
        self.calls.lock().unwrap().push(ExtensionCall {
            quiz_id,
            kind,
            extensions: extensions.to_vec(),
        });
        Ok(())
    }
}

#[async_trait]
impl Lms for FakeLms {
    async fn get_course(&self, course_id: CanvasId) -> Result<Course, CanvasError> {
        if let Some(delay) = self.course_delay {
            tokio::time::sleep(delay).await;
        }
        self.courses.get(&course_id).cloned().ok_or(CanvasError::NotFound)
    }

    async fn get_user(
        &self,
        _course_id: CanvasId,
        user_id: CanvasId,
    ) -> Result<CanvasUser, CanvasError> {
        self.users.get(&user_id).cloned().ok_or(CanvasError::NotFound)
    }

    async fn search_students(
        &self,
        _course_id: CanvasId,
        _query: &str,
    ) -> Result<Vec<CanvasUser>, CanvasError> {
        Ok(self.users.values().cloned().collect())
    }

    async fn list_quizzes(&self, _course_id: CanvasId) -> Result<Vec<CanvasQuiz>, CanvasError> {
        Ok(self.quizzes.clone())
    }

    async fn list_new_quizzes(&self, _course_id: CanvasId) -> Result<Vec<CanvasQuiz>, CanvasError> {
        if self.new_quizzes_unsupported {
            return Err(CanvasError::Api {
                status: 401,
                body: "unauthorized".into(),
            });
        }
        Ok(self.new_quizzes.clone())
    }

    async fn set_extensions(
        &self,
        _course_id: CanvasId,
        quiz_id: CanvasId,
        extensions: &[QuizExtension],
    ) -> Result<(), CanvasError> {
        self.record(quiz_id, QuizKind::Classic, extensions)
    }

    async fn set_accommodations(
        &self,
        _course_id: CanvasId,
        quiz_id: CanvasId,
        extensions: &[QuizExtension],
    ) -> Result<(), CanvasError> {
        self.record(quiz_id, QuizKind::New, extensions)
    }

    async fn get_self(&self) -> Result<CanvasUser, CanvasError> {
        Err(CanvasError::Api {
            status: 401,
            body: String::new(),
        })
    }
}

/// Insert a job row for a handler to report progress on.
pub async fn job_row(pool: &PgPool, job_type: JobType) -> DbId {
    JobRepo::enqueue(pool, job_type, &serde_json::json!({}), None)
        .await
        .expect("job enqueue should succeed")
        .id
}
