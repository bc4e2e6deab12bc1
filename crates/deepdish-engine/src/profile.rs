//! User profile sent alongside each query.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Optional personal details that enrich a query.
///
/// None of the fields are validated beyond trimming whitespace and dropping
/// empty entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name, empty when unknown.
    #[serde(default)]
    pub name: String,

    /// Ingredients to avoid.
    #[serde(default)]
    pub allergies: BTreeSet<String>,

    /// City, usually filled in by a reverse-geocoding lookup.
    #[serde(default)]
    pub city: Option<String>,
}

impl UserProfile {
    /// Create a profile, normalising every field.
    pub fn new<I, S>(name: &str, allergies: I, city: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.trim().to_string(),
            allergies: normalize_allergies(allergies),
            city: normalize_city(city),
        }
    }

    /// Return a copy with all fields trimmed and empty entries removed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::new(&self.name, &self.allergies, self.city.as_deref())
    }

    /// Replace the allergy set from a comma-separated list.
    pub fn set_allergies_from_list(&mut self, list: &str) {
        self.allergies = parse_allergy_list(list);
    }

    /// Set or clear the city.
    pub fn set_city(&mut self, city: Option<&str>) {
        self.city = normalize_city(city);
    }

    /// The name, if non-blank.
    pub fn name(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }

    /// Allergies joined for display (e.g. "peanuts, shellfish").
    pub fn allergy_list(&self) -> String {
        self.allergies
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether the profile carries nothing worth sending.
    pub fn is_empty(&self) -> bool {
        self.name().is_none() && self.allergies.is_empty() && self.city.is_none()
    }
}

/// Parse a comma-separated allergy list.
pub fn parse_allergy_list(list: &str) -> BTreeSet<String> {
    normalize_allergies(list.split(','))
}

fn normalize_allergies<I, S>(allergies: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    allergies
        .into_iter()
        .map(|a| a.as_ref().trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

fn normalize_city(city: Option<&str>) -> Option<String> {
    city.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
}
