use serde_json::{json, Value};

/// Canvas developer key JSON for this tool served from `domain`.
pub fn tool_configuration(url_scheme: &str, domain: &str, tool_id: &str) -> Value {
    let base = format!("{url_scheme}://{domain}");
    let launch_url = format!("{base}/launch/");

    json!({
        "title": "Quiz Extensions",
        "description": "Give students extra time on every quiz in a course at once.",
        "oidc_initiation_url": format!("{base}/login/"),
        "target_link_uri": launch_url,
        "public_jwk_url": format!("{base}/jwks/"),
        "scopes": [],
        "extensions": [{
            "domain": domain,
            "tool_id": tool_id,
            "platform": "canvas.instructure.com",
            "privacy_level": "public",
            "settings": {
                "text": "Quiz Extensions",
                "placements": [{
                    "placement": "course_navigation",
                    "message_type": "LtiResourceLinkRequest",
                    "target_link_uri": launch_url,
                    "text": "Quiz Extensions",
                    "default": "disabled",
                    "visibility": "admins",
                    "enabled": true
                }]
            }
        }],
        "custom_fields": {
            "canvas_course_id": "$Canvas.course.id",
            "canvas_user_id": "$Canvas.user.id"
        }
    })
}
