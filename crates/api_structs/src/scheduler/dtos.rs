use serde::{Deserialize, Serialize};

/// Outcome of one scheduler stage.
/// Serialized as `{"success":true}` or `{"success":false,"error":"..."}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_stage_has_no_error_field() {
        let json = serde_json::to_string(&StageResult::ok()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn failed_stage_carries_error() {
        let json = serde_json::to_string(&StageResult::failed("db down")).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"db down"}"#);
    }
}
