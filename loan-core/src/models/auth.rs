use serde::{Deserialize, Serialize};

/// Account role, as spelled by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Borrower,
    Lender,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Borrower => "BORROWER",
            Self::Lender => "LENDER",
        }
    }

    /// Case-insensitive parse of `BORROWER` / `LENDER`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BORROWER" => Some(Self::Borrower),
            "LENDER" => Some(Self::Lender),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerDetails {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderDetails {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub license_number: String,
    pub phone_number: String,
    pub address: String,
}

/// Account creation payload. Only the details matching `role` are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lender: Option<LenderDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrower: Option<BorrowerDetails>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("borrower"), Some(Role::Borrower));
        assert_eq!(Role::parse(" LENDER "), Some(Role::Lender));
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn login_request_uses_camel_case_field_names() {
        let body = serde_json::to_value(LoginRequest {
            user_name: "asha".to_string(),
            password: "secret".to_string(),
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({"userName": "asha", "password": "secret"}));
    }

    #[test]
    fn login_response_reads_uppercase_role() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"token":"abc","role":"LENDER"}"#).unwrap();

        assert_eq!(response.role, Role::Lender);
        assert_eq!(response.token, "abc");
    }

    #[test]
    fn register_request_omits_absent_details() {
        let body = serde_json::to_value(RegisterRequest {
            user_name: "asha".to_string(),
            email: "asha@example.com".to_string(),
            password: "secret".to_string(),
            role: Role::Borrower,
            lender: None,
            borrower: Some(BorrowerDetails::default()),
        })
        .unwrap();

        assert!(body.get("lender").is_none());
        assert_eq!(body["role"], "BORROWER");
        assert!(body["borrower"].get("firstName").is_some());
    }
}
