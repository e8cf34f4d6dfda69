//! Claims of an LTI 1.3 resource link launch id token.

use quizext_core::types::CanvasId;
use serde::{Deserialize, Deserializer};

pub const MESSAGE_TYPE_RESOURCE_LINK: &str = "LtiResourceLinkRequest";
pub const LTI_VERSION: &str = "1.3.0";

#[derive(Debug, Clone, Deserialize)]
pub struct LaunchClaims {
    pub iss: String,
    pub sub: Option<String>,
    pub exp: i64,
    pub nonce: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "https://purl.imsglobal.org/spec/lti/claim/deployment_id")]
    pub deployment_id: Option<String>,
    #[serde(rename = "https://purl.imsglobal.org/spec/lti/claim/message_type")]
    pub message_type: Option<String>,
    #[serde(rename = "https://purl.imsglobal.org/spec/lti/claim/version")]
    pub version: Option<String>,
    #[serde(rename = "https://purl.imsglobal.org/spec/lti/claim/roles", default)]
    pub roles: Vec<String>,
    #[serde(rename = "https://purl.imsglobal.org/spec/lti/claim/custom")]
    pub custom: Option<CanvasCustomClaims>,
}

/// Custom variables the tool configuration asks Canvas to substitute.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CanvasCustomClaims {
    #[serde(deserialize_with = "canvas_id")]
    pub canvas_course_id: CanvasId,
    #[serde(deserialize_with = "canvas_id")]
    pub canvas_user_id: CanvasId,
}

// Canvas substitutes `$Canvas.course.id` as a string.
fn canvas_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CanvasId, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(CanvasId),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(id) => Ok(id),
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
