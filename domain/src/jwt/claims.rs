//! Claims carried by the access tokens the relay accepts.
//!
//! Tokens are issued by the upstream application. `exp` is checked by the
//! validator before these claims are read; apart from `user_id` every other
//! claim is ignored.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct AccessClaims {
    // Depending on the issuer's primary key type this is a string or an integer.
    #[serde(default)]
    pub(crate) user_id: Option<Value>,
}

impl AccessClaims {
    /// The identity named by the token, normalized to a string.
    pub(crate) fn identity(&self) -> Option<String> {
        match self.user_id.as_ref()? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) if id.is_u64() || id.is_i64() => Some(id.to_string()),
            _ => None,
        }
    }
}
