//! Session and role extractors.
//!
//! Rejections are small HTML pages because they are rendered inside the
//! Canvas iframe.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::CookieJar;
use quizext_core::roles::LtiRole;
use quizext_core::types::CanvasId;

use super::jwt::{decode_session, SessionClaims};
use super::SESSION_COOKIE;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionRejection {
    #[error("You must use this tool in an LTI context.")]
    NoSession,

    #[error("No roles found.")]
    NoRoles,

    #[error("You must be have the {0} role to use this tool.")]
    MissingRole(LtiRole),

    #[error("This session was not launched from course {0}.")]
    WrongCourse(CanvasId),
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let (status, title) = match self {
            SessionRejection::WrongCourse(_) => (StatusCode::FORBIDDEN, "Forbidden"),
            _ => (StatusCode::UNAUTHORIZED, "Unauthorized"),
        };
        (status, Html(format!("<h2>{title}</h2><p>{self}</p>"))).into_response()
    }
}

/// Any valid session.
#[derive(Debug, Clone)]
pub struct LtiSession(pub SessionClaims);

impl FromRequestParts<AppState> for LtiSession {
    type Rejection = SessionRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_owned())
            .ok_or(SessionRejection::NoSession)?;

        let claims = decode_session(&token, &state.config.session).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session cookie");
            SessionRejection::NoSession
        })?;

        Ok(LtiSession(claims))
    }
}

/// A session whose launch roles include the staff role.
///
/// ```ignore
/// async fn quiz(RequireStaff(session): RequireStaff, Path(course_id): Path<CanvasId>) -> ... {
///     session.ensure_course(course_id)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireStaff(pub SessionClaims);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = SessionRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let LtiSession(claims) = LtiSession::from_request_parts(parts, state).await?;
        claims.require_role(LtiRole::Staff)?;
        Ok(RequireStaff(claims))
    }
}

impl SessionClaims {
    pub fn require_role(&self, role: LtiRole) -> Result<(), SessionRejection> {
        if self.roles.is_empty() {
            return Err(SessionRejection::NoRoles);
        }
        if !role.granted_by(&self.roles) {
            return Err(SessionRejection::MissingRole(role));
        }
        Ok(())
    }

    /// Sessions only grant access to the course they were launched from.
    pub fn ensure_course(&self, course_id: CanvasId) -> Result<(), SessionRejection> {
        if self.course_id != course_id {
            tracing::warn!(
                session_course = self.course_id,
                course_id,
                canvas_user_id = self.canvas_user_id,
                "Session used for another course",
            );
            return Err(SessionRejection::WrongCourse(course_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use quizext_core::roles::{MEMBERSHIP_INSTRUCTOR, MEMBERSHIP_LEARNER};

    use super::*;

    fn claims(roles: &[&str]) -> SessionClaims {
        SessionClaims {
            launch_id: "l".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            course_id: 5,
            canvas_user_id: 9,
            email: None,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn role_checks() {
        assert_eq!(claims(&[]).require_role(LtiRole::Staff), Err(SessionRejection::NoRoles));
        assert_eq!(
            claims(&[MEMBERSHIP_LEARNER]).require_role(LtiRole::Staff),
            Err(SessionRejection::MissingRole(LtiRole::Staff))
        );
        assert!(claims(&[MEMBERSHIP_INSTRUCTOR]).require_role(LtiRole::Staff).is_ok());
    }

    #[test]
    fn course_check() {
        let session = claims(&[MEMBERSHIP_INSTRUCTOR]);
        assert!(session.ensure_course(5).is_ok());
        assert_eq!(session.ensure_course(6), Err(SessionRejection::WrongCourse(6)));
    }

    #[test]
    fn rejection_messages() {
        assert_eq!(
            SessionRejection::MissingRole(LtiRole::Staff).to_string(),
            "You must be have the staff role to use this tool."
        );
    }
}
