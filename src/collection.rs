//! The admin collections whose items carry an `order` field, and the REST
//! endpoint each one is served from.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Unknown collection '{0}'. Expected one of: \
     timeline, tech-skills, interests, tech-stack-categories"
)]
pub struct UnknownCollection(pub String);

/// An order-carrying collection managed from the admin dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    Timeline,
    TechSkills,
    Interests,
    TechStackCategories,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Timeline,
        Collection::TechSkills,
        Collection::Interests,
        Collection::TechStackCategories,
    ];

    /// Stable kebab-case name, used in config keys, cache keys and logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Collection::Timeline => "timeline",
            Collection::TechSkills => "tech-skills",
            Collection::Interests => "interests",
            Collection::TechStackCategories => "tech-stack-categories",
        }
    }

    /// Endpoint path relative to the API base URL when no override is configured.
    #[must_use]
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Collection::Timeline => "timeline",
            Collection::TechSkills => "tech-skills",
            Collection::Interests => "interests",
            Collection::TechStackCategories => "tech-stack/categories",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = UnknownCollection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Collection::ALL
            .into_iter()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| UnknownCollection(s.to_string()))
    }
}

/// Endpoint paths per collection, with optional overrides from the user config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    overrides: HashMap<Collection, String>,
}

impl Endpoints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the raw `[endpoints]` table, keyed by collection name.
    ///
    /// Leading and trailing slashes are stripped so paths join cleanly onto the
    /// base URL.
    pub fn from_overrides(raw: &HashMap<String, String>) -> Result<Self, UnknownCollection> {
        let mut overrides = HashMap::with_capacity(raw.len());
        for (name, path) in raw {
            let collection: Collection = name.parse()?;
            overrides.insert(collection, path.trim_matches('/').to_string());
        }
        Ok(Self { overrides })
    }

    #[must_use]
    pub fn with_override(mut self, collection: Collection, path: impl Into<String>) -> Self {
        let path: String = path.into();
        self.overrides
            .insert(collection, path.trim_matches('/').to_string());
        self
    }

    #[must_use]
    pub fn path(&self, collection: Collection) -> &str {
        self.overrides
            .get(&collection)
            .map_or_else(|| collection.default_endpoint(), String::as_str)
    }
}
