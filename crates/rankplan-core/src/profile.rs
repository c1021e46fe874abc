use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Geographic reach the strategy should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LocationScope {
    /// Whole-country reach.
    #[default]
    #[serde(alias = "pan-wide")]
    PanIndia,
    MetroOnly,
    #[serde(rename = "tier-2")]
    Tier2,
    SpecificStates,
    SpecificCities,
}

impl LocationScope {
    /// Human-readable phrase used inside prompts.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            LocationScope::PanIndia => "nationwide (pan-India)",
            LocationScope::MetroOnly => "metro cities only",
            LocationScope::Tier2 => "tier-2 cities",
            LocationScope::SpecificStates => "specific states",
            LocationScope::SpecificCities => "specific cities",
        }
    }
}

impl std::fmt::Display for LocationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialHandles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

impl SocialHandles {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.linkedin.is_none() && self.twitter.is_none() && self.facebook.is_none()
    }
}

/// Brand identity entered by the user. Frozen once a run starts, apart from
/// explicit re-edits before the foundation is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub business_name: String,
    #[serde(default)]
    pub website: Option<String>,
    /// Industry category, e.g. "Healthcare".
    pub business_type: String,
    /// How the business delivers, e.g. "B2C clinic visits".
    #[serde(default)]
    pub service_model: String,
    #[serde(default)]
    pub location_scope: LocationScope,
    #[serde(default)]
    pub specific_locations: String,
    #[serde(default)]
    pub selected_cities: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "SocialHandles::is_empty")]
    pub social_handles: SocialHandles,
}

impl BusinessProfile {
    /// Minimal profile; remaining fields take their defaults.
    #[must_use]
    pub fn new(business_name: &str, business_type: &str) -> Self {
        Self {
            business_name: business_name.to_string(),
            website: None,
            business_type: business_type.to_string(),
            service_model: String::new(),
            location_scope: LocationScope::default(),
            specific_locations: String::new(),
            selected_cities: BTreeSet::new(),
            social_handles: SocialHandles::default(),
        }
    }

    /// URL-safe slug derived from the business name.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.business_name)
    }

    /// Cities, free-text locations and scope collapsed into one phrase.
    #[must_use]
    pub fn location_summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.selected_cities.is_empty() {
            parts.push(
                self.selected_cities
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
        if !self.specific_locations.trim().is_empty() {
            parts.push(self.specific_locations.trim().to_string());
        }
        if parts.is_empty() {
            self.location_scope.describe().to_string()
        } else {
            format!("{} ({})", parts.join("; "), self.location_scope.describe())
        }
    }

    /// Check the invariants every pipeline run relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.business_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "business name must be non-empty".to_string(),
            ));
        }

        if self.business_type.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "business '{}' must declare a business type",
                self.business_name
            )));
        }

        if let Some(website) = &self.website {
            let lower = website.trim().to_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "website '{website}' must start with http:// or https://"
                )));
            }
        }

        if self.location_scope == LocationScope::SpecificCities && self.selected_cities.is_empty()
        {
            return Err(ConfigError::Validation(
                "location scope 'specific-cities' requires at least one selected city".to_string(),
            ));
        }

        if self.selected_cities.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "selected cities must not contain blank names".to_string(),
            ));
        }

        Ok(())
    }
}

/// Generate a URL-safe slug: lowercase ASCII alphanumerics joined by dashes.
#[must_use]
pub fn slugify(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c == ' ' || c == '_' || c == '/' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Load and validate a business profile from a YAML (or JSON) file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profile(path: &Path) -> Result<BusinessProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profile: BusinessProfile = serde_yaml::from_str(&content)?;
    profile.validate()?;

    Ok(profile)
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
