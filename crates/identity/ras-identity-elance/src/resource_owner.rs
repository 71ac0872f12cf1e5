//! Elance resource owner.

use crate::lookup::{lookup_path, string_at};
use ras_identity_core::ResourceOwner;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const PROFILE_PATH: [&str; 2] = ["data", "providerProfile"];

/// Read-only view over the `/api2/profiles/my` response.
///
/// Accessors never fail: a missing or empty-like field reads as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElanceResourceOwner {
    response: Value,
}

impl ElanceResourceOwner {
    pub fn new(response: Value) -> Self {
        Self { response }
    }

    /// The `data.providerProfile` object, if the response has one.
    pub fn profile(&self) -> Option<&Value> {
        lookup_path(&self.response, &PROFILE_PATH)
    }

    /// A `data.providerProfile.<field>` value rendered as a string.
    pub fn profile_field(&self, field: &str) -> Option<String> {
        let [data, profile] = PROFILE_PATH;
        string_at(&self.response, &[data, profile, field])
    }

    /// Borrow the raw response without copying it.
    pub fn as_value(&self) -> &Value {
        &self.response
    }
}

impl Default for ElanceResourceOwner {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

impl ResourceOwner for ElanceResourceOwner {
    fn id(&self) -> Option<String> {
        self.profile_field("userId")
    }

    fn username(&self) -> Option<String> {
        self.profile_field("userName")
    }

    fn avatar_url(&self) -> Option<String> {
        self.profile_field("logo")
    }

    fn to_value(&self) -> Value {
        self.response.clone()
    }
}
