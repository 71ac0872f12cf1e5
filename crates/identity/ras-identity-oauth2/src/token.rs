//! Access tokens issued by the token endpoint.

use crate::error::{OAuth2Error, OAuth2Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// `expires` values above this many seconds are absolute unix timestamps,
/// anything below is a lifetime relative to now.
const EXPIRES_TIMESTAMP_THRESHOLD: i64 = 315_360_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    pub refresh_token: Option<String>,
    pub resource_owner_id: Option<String>,
    pub scope: Option<String>,
    /// Fields of the token response not modelled above.
    #[serde(default)]
    pub values: Map<String, Value>,
}

impl AccessToken {
    /// Parse a (already unwrapped) token endpoint response.
    ///
    /// `resource_owner_id_key` names the response field carrying the owner id,
    /// for providers that return one alongside the token.
    pub fn from_response(body: Value, resource_owner_id_key: Option<&str>) -> OAuth2Result<Self> {
        let Value::Object(mut fields) = body else {
            return Err(OAuth2Error::InvalidTokenResponse(
                "expected a JSON object".to_string(),
            ));
        };

        let access_token = match fields.remove("access_token") {
            Some(Value::String(token)) if !token.is_empty() => token,
            _ => {
                return Err(OAuth2Error::InvalidTokenResponse(
                    "missing access_token".to_string(),
                ));
            }
        };

        let now = Utc::now();
        let expires_in = fields.remove("expires_in");
        let expires_at = fields.remove("expires");

        let expires = match (expires_in, expires_at) {
            (Some(lifetime), _) => {
                let seconds = numeric(&lifetime).ok_or_else(|| {
                    OAuth2Error::InvalidTokenResponse("expires_in must be numeric".to_string())
                })?;
                Some(offset(now, seconds)?)
            }
            (None, Some(expires)) => {
                let value = numeric(&expires).ok_or_else(|| {
                    OAuth2Error::InvalidTokenResponse("expires must be numeric".to_string())
                })?;
                if value > EXPIRES_TIMESTAMP_THRESHOLD {
                    Some(DateTime::from_timestamp(value, 0).ok_or_else(|| {
                        OAuth2Error::InvalidTokenResponse("expires is out of range".to_string())
                    })?)
                } else {
                    Some(offset(now, value)?)
                }
            }
            (None, None) => None,
        };

        let resource_owner_id =
            resource_owner_id_key.and_then(|key| take_string(&mut fields, key));

        Ok(Self {
            access_token,
            token_type: take_string(&mut fields, "token_type"),
            expires,
            refresh_token: take_string(&mut fields, "refresh_token"),
            resource_owner_id,
            scope: take_string(&mut fields, "scope"),
            values: fields,
        })
    }

    pub fn has_expired(&self) -> bool {
        self.expires.is_some_and(|expires| expires <= Utc::now())
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.access_token)
    }
}

fn offset(now: DateTime<Utc>, seconds: i64) -> OAuth2Result<DateTime<Utc>> {
    Duration::try_seconds(seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| OAuth2Error::InvalidTokenResponse("expiry is out of range".to_string()))
}

fn numeric(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
