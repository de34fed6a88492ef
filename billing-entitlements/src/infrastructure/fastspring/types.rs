// src/infrastructure/fastspring/types.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// FastSpring アカウントの連絡先
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AccountContact {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// アカウント作成・更新時に送るペイロード
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AccountOptions {
    #[validate(nested)]
    pub contact: AccountContact,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// ISO 3166-1 alpha-2
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(equal = 2, message = "Country must be a two-letter code"))]
    pub country: Option<String>,
}

/// `POST /accounts` and `POST /accounts/{id}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountActionResponse {
    /// FastSpring account id.
    pub account: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastspringAccount {
    #[serde(alias = "account")]
    pub id: String,
    #[serde(default)]
    pub contact: AccountContact,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub subscriptions: Vec<String>,
    #[serde(default)]
    pub orders: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountManagementLink {
    #[serde(default)]
    pub account: Option<String>,
    pub url: String,
}

/// `GET /accounts/{id}/authenticate` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountManagementResponse {
    #[serde(default)]
    pub accounts: Vec<AccountManagementLink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> AccountOptions {
        AccountOptions {
            contact: AccountContact {
                first: "Ada".to_string(),
                last: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                company: None,
                phone: None,
            },
            language: Some("en".to_string()),
            country: Some("GB".to_string()),
        }
    }

    #[test]
    fn test_valid_options() {
        assert!(options().validate().is_ok());
    }

    #[test]
    fn test_invalid_contact_email_is_reported() {
        let mut options = options();
        options.contact.email = "not-an-email".to_string();
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_country_must_be_two_letters() {
        let mut options = options();
        options.country = Some("GBR".to_string());
        let errors = options.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("country"));

        options.country = None;
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_optional_fields_are_omitted_from_payload() {
        let mut options = options();
        options.language = None;
        let payload = serde_json::to_value(&options).unwrap();

        assert!(payload.get("language").is_none());
        assert!(payload["contact"].get("company").is_none());
        assert_eq!(payload["contact"]["first"], "Ada");
    }

    #[test]
    fn test_account_accepts_id_alias() {
        let account: FastspringAccount =
            serde_json::from_str(r#"{"account":"abc","contact":{"first":"Ada"}}"#).unwrap();
        assert_eq!(account.id, "abc");
        assert_eq!(account.contact.first, "Ada");
        assert!(account.subscriptions.is_empty());
    }
}
