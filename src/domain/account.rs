//! Account identity shared by API keys, webhooks and generation history

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while validating an account identifier
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccountIdError {
    #[error("Account ID cannot be empty")]
    Empty,

    #[error("Account ID exceeds maximum length of {0} characters")]
    TooLong(usize),

    #[error("Account ID contains invalid character: '{0}'")]
    InvalidCharacter(char),
}

const MAX_ACCOUNT_ID_LENGTH: usize = 64;

/// Account identifier - alphanumeric, hyphens and underscores, max 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Create a new AccountId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, AccountIdError> {
        let id = id.into();

        if id.is_empty() {
            return Err(AccountIdError::Empty);
        }

        if id.len() > MAX_ACCOUNT_ID_LENGTH {
            return Err(AccountIdError::TooLong(MAX_ACCOUNT_ID_LENGTH));
        }

        if let Some(c) = id
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
        {
            return Err(AccountIdError::InvalidCharacter(c));
        }

        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_account_ids() {
        assert!(AccountId::new("acct-123").is_ok());
        assert!(AccountId::new("studio_west").is_ok());
        assert!(AccountId::new("A1").is_ok());
    }

    #[test]
    fn test_empty_account_id() {
        assert_eq!(AccountId::new(""), Err(AccountIdError::Empty));
    }

    #[test]
    fn test_too_long_account_id() {
        let id = "a".repeat(65);
        assert_eq!(AccountId::new(id), Err(AccountIdError::TooLong(64)));
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            AccountId::new("acct 1"),
            Err(AccountIdError::InvalidCharacter(' '))
        );
    }
}
