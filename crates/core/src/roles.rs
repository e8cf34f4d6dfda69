//! LTI 1.3 role vocabularies.
//!
//! Launch messages carry full IMS role URIs in the
//! `https://purl.imsglobal.org/spec/lti/claim/roles` claim. Each tool-level
//! role is granted by any one of a fixed set of those URIs.

use std::fmt;
use std::str::FromStr;

pub const INSTITUTION_ADMINISTRATOR: &str =
    "http://purl.imsglobal.org/vocab/lis/v2/institution/person#Administrator";
pub const MEMBERSHIP_ADMINISTRATOR: &str =
    "http://purl.imsglobal.org/vocab/lis/v2/membership#Administrator";
pub const MEMBERSHIP_INSTRUCTOR: &str =
    "http://purl.imsglobal.org/vocab/lis/v2/membership#Instructor";
pub const MEMBERSHIP_LEARNER: &str = "http://purl.imsglobal.org/vocab/lis/v2/membership#Learner";

/// Tool-level roles that routes can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LtiRole {
    Admin,
    Staff,
    Student,
}

impl LtiRole {
    /// Role URIs that grant this role.
    pub fn vocabulary(self) -> &'static [&'static str] {
        match self {
            LtiRole::Admin => &[INSTITUTION_ADMINISTRATOR, MEMBERSHIP_ADMINISTRATOR],
            LtiRole::Staff => &[
                INSTITUTION_ADMINISTRATOR,
                MEMBERSHIP_ADMINISTRATOR,
                MEMBERSHIP_INSTRUCTOR,
            ],
            LtiRole::Student => &[MEMBERSHIP_LEARNER],
        }
    }

    /// True when any of the launch roles grants this role.
    pub fn granted_by<S: AsRef<str>>(self, roles: &[S]) -> bool {
        let vocabulary = self.vocabulary();
        roles.iter().any(|r| vocabulary.contains(&r.as_ref()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LtiRole::Admin => "admin",
            LtiRole::Staff => "staff",
            LtiRole::Student => "student",
        }
    }
}

impl fmt::Display for LtiRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LtiRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(LtiRole::Admin),
            "staff" => Ok(LtiRole::Staff),
            "student" => Ok(LtiRole::Student),
            other => Err(format!("Invalid role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructor_is_staff_but_not_admin() {
        let roles = vec![MEMBERSHIP_INSTRUCTOR.to_string()];
        assert!(LtiRole::Staff.granted_by(&roles));
        assert!(!LtiRole::Admin.granted_by(&roles));
        assert!(!LtiRole::Student.granted_by(&roles));
    }

    #[test]
    fn institution_admin_is_staff() {
        assert!(LtiRole::Staff.granted_by(&[INSTITUTION_ADMINISTRATOR]));
        assert!(LtiRole::Admin.granted_by(&[INSTITUTION_ADMINISTRATOR]));
    }

    #[test]
    fn learner_is_only_student() {
        assert!(LtiRole::Student.granted_by(&[MEMBERSHIP_LEARNER]));
        assert!(!LtiRole::Staff.granted_by(&[MEMBERSHIP_LEARNER]));
    }

    #[test]
    fn short_role_names_do_not_match() {
        // LTI 1.1 style short names are not part of the 1.3 vocabulary.
        assert!(!LtiRole::Staff.granted_by(&["Instructor"]));
    }

    #[test]
    fn empty_roles_grant_nothing() {
        let roles: Vec<String> = Vec::new();
        assert!(!LtiRole::Staff.granted_by(&roles));
    }

    #[test]
    fn parse_role_names() {
        assert_eq!("staff".parse::<LtiRole>(), Ok(LtiRole::Staff));
        assert!("teacher".parse::<LtiRole>().is_err());
    }
}
