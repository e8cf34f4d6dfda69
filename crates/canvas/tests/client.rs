//! Canvas client tests against a mock Canvas server.

use assert_matches::assert_matches;
use httpmock::prelude::*;
use quizext_canvas::models::QuizExtension;
use quizext_canvas::{all_quizzes, CanvasClient, CanvasConfig, CanvasError, Lms};
use quizext_core::extension::QuizKind;
use serde_json::json;

fn client_for(server: &MockServer) -> CanvasClient {
    let config = CanvasConfig::new(server.base_url(), "secret-token", 2);
    CanvasClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_get_course_sends_bearer_token() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/courses/1")
            .header("Authorization", "Bearer secret-token");
        then.status(200)
            .json_body(json!({"id": 1, "name": "Biology 101", "course_code": "BIO"}));
    });

    let course = client_for(&server).get_course(1).await.unwrap();
    mock.assert();
    assert_eq!(course.id, 1);
    assert_eq!(course.name, "Biology 101");
}

#[tokio::test]
async fn test_missing_course_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/courses/9");
        then.status(404)
            .json_body(json!({"errors": [{"message": "The specified resource does not exist."}]}));
    });

    let err = client_for(&server).get_course(9).await.unwrap_err();
    assert_matches!(err, CanvasError::NotFound);
    assert_eq!(err.to_string(), "Not Found");
}

#[tokio::test]
async fn test_get_user_includes_enrollments() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/courses/1/users/11")
            .query_param("include[]", "enrollments");
        then.status(200).json_body(json!({
            "id": 11,
            "name": "Ada Student",
            "sortable_name": "Student, Ada",
            "sis_user_id": "S11",
            "enrollments": [{"type": "StudentEnrollment", "enrollment_state": "active"}]
        }));
    });

    let user = client_for(&server).get_user(1, 11).await.unwrap();
    mock.assert();
    assert!(user.is_current_student());
    assert_eq!(user.sis_user_id.as_deref(), Some("S11"));
}

#[tokio::test]
async fn test_quiz_listing_follows_link_header() {
    let server = MockServer::start();
    let page_two = format!("{}/api/v1/courses/1/quizzes?page=2", server.base_url());

    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/courses/1/quizzes")
            .query_param("per_page", "2");
        then.status(200)
            .header("Link", format!("<{page_two}>; rel=\"next\""))
            .json_body(json!([
                {"id": 1, "title": "Quiz 1", "time_limit": 10},
                {"id": 2, "title": "Quiz 2", "time_limit": null}
            ]));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/courses/1/quizzes")
            .query_param("page", "2");
        then.status(200)
            .json_body(json!([{"id": 3, "title": "Quiz 3", "time_limit": 30.5}]));
    });

    let quizzes = client_for(&server).list_quizzes(1).await.unwrap();
    first.assert();
    second.assert();
    let ids: Vec<i64> = quizzes.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(quizzes[1].time_limit, None);
    assert_eq!(quizzes[2].time_limit, Some(30.5));
    assert!(quizzes.iter().all(|q| q.kind == QuizKind::Classic));
}

#[tokio::test]
async fn test_all_quizzes_tolerates_missing_new_quizzes() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/courses/1/quizzes");
        then.status(200)
            .json_body(json!([{"id": 1, "title": "Quiz 1", "time_limit": 10}]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/quiz/v1/courses/1/quizzes");
        then.status(401).body("unauthorized");
    });

    let client = client_for(&server);
    let quizzes = all_quizzes(&client, 1).await.unwrap();
    assert_eq!(quizzes.len(), 1);
}

#[tokio::test]
async fn test_all_quizzes_appends_new_quizzes() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/courses/1/quizzes");
        then.status(200)
            .json_body(json!([{"id": 1, "title": "Quiz 1", "time_limit": 10}]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/quiz/v1/courses/1/quizzes");
        then.status(200).json_body(json!([{
            "id": "5",
            "title": "New Quiz",
            "quiz_settings": {"has_time_limit": true, "session_time_limit_in_seconds": 1200}
        }]));
    });

    let client = client_for(&server);
    let quizzes = all_quizzes(&client, 1).await.unwrap();
    assert_eq!(quizzes.len(), 2);
    assert_eq!(quizzes[1].kind, QuizKind::New);
    assert_eq!(quizzes[1].time_limit, Some(20.0));
}

#[tokio::test]
async fn test_set_extensions_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/courses/1/quizzes/2/extensions")
            .json_body(json!({"quiz_extensions": [
                {"user_id": 11, "extra_time": 10},
                {"user_id": 12, "extra_time": 10}
            ]}));
        then.status(200).json_body(json!({"quiz_extensions": []}));
    });

    let extensions = vec![
        QuizExtension { user_id: 11, extra_time: 10 },
        QuizExtension { user_id: 12, extra_time: 10 },
    ];
    client_for(&server)
        .set_extensions(1, 2, &extensions)
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn test_set_accommodations_body_and_failure() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/quiz/v1/courses/1/quizzes/5/accommodations")
            .json_body(json!([{"user_id": 11, "extra_time": 20}]));
        then.status(403).body("{\"message\":\"forbidden\"}");
    });

    let err = client_for(&server)
        .set_accommodations(1, 5, &[QuizExtension { user_id: 11, extra_time: 20 }])
        .await
        .unwrap_err();
    mock.assert();
    assert_matches!(err, CanvasError::Api { status: 403, .. });
    assert_eq!(err.to_string(), "Forbidden");
}

#[tokio::test]
async fn test_search_students_filters_enrollments() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/courses/1/users")
            .query_param("search_term", "ada")
            .query_param("enrollment_type[]", "student")
            .query_param("enrollment_state[]", "active")
            .query_param("enrollment_state[]", "invited");
        then.status(200).json_body(json!([
            {"id": 11, "name": "Ada Student", "sortable_name": "Student, Ada"}
        ]));
    });

    let users = client_for(&server).search_students(1, "ada").await.unwrap();
    mock.assert();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].display_name(), "Student, Ada");
}

#[tokio::test]
async fn test_get_self() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/users/self");
        then.status(200).json_body(json!({"id": 1, "name": "Tool Admin"}));
    });

    let me = client_for(&server).get_self().await.unwrap();
    assert_eq!(me.name, "Tool Admin");
}
