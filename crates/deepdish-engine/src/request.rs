//! Wire format of a query sent to the answer service.

use crate::profile::UserProfile;
use serde::{Deserialize, Serialize};

/// Body of `POST /query`.
///
/// Optional fields are omitted from the JSON when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's text, verbatim.
    pub query: String,

    /// Ingredients to avoid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,

    /// City the user is in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// User's name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl QueryRequest {
    /// A request carrying only the query text.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            allergies: None,
            city: None,
            name: None,
        }
    }

    /// A request enriched with whatever the profile knows.
    pub fn with_profile(query: impl Into<String>, profile: &UserProfile) -> Self {
        let profile = profile.normalized();
        Self {
            query: query.into(),
            allergies: (!profile.allergies.is_empty())
                .then(|| profile.allergies.into_iter().collect()),
            city: profile.city,
            name: (!profile.name.is_empty()).then_some(profile.name),
        }
    }
}
