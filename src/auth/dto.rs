use serde::{Deserialize, Serialize};

/// Identity payload produced by the (external) OAuth exchange.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_accepts_camel_case() {
        let req: LoginRequest = serde_json::from_str(
            r#"{"openId":"abc","name":"Sample User","email":"s@example.com","loginMethod":"manus"}"#,
        )
        .unwrap();
        assert_eq!(req.open_id, "abc");
        assert_eq!(req.login_method.as_deref(), Some("manus"));
    }

    #[test]
    fn login_request_optional_fields_default_to_none() {
        let req: LoginRequest = serde_json::from_str(r#"{"openId":"abc"}"#).unwrap();
        assert!(req.name.is_none());
        assert!(req.email.is_none());
    }

    #[test]
    fn logout_response_shape() {
        let json = serde_json::to_string(&LogoutResponse { success: true }).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }
}
