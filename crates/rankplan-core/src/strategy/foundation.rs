use serde::{Deserialize, Serialize};

use crate::profile::BusinessProfile;

/// Business profile enriched with the narrative written in the first stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandFoundation {
    #[serde(flatten)]
    pub profile: BusinessProfile,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_customer: String,
    #[serde(default)]
    pub key_services: String,
}

impl BrandFoundation {
    /// True when every narrative field has content.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.description.trim().is_empty()
            && !self.target_customer.trim().is_empty()
            && !self.key_services.trim().is_empty()
    }
}

/// User edits applied to a foundation before it is confirmed. `None` leaves
/// the field as generated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundationEdit {
    pub description: Option<String>,
    pub target_customer: Option<String>,
    pub key_services: Option<String>,
    pub profile: Option<BusinessProfile>,
}

impl FoundationEdit {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.target_customer.is_none()
            && self.key_services.is_none()
            && self.profile.is_none()
    }

    pub fn apply(self, foundation: &mut BrandFoundation) {
        if let Some(description) = self.description {
            foundation.description = description;
        }
        if let Some(target_customer) = self.target_customer {
            foundation.target_customer = target_customer;
        }
        if let Some(key_services) = self.key_services {
            foundation.key_services = key_services;
        }
        if let Some(profile) = self.profile {
            foundation.profile = profile;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foundation() -> BrandFoundation {
        BrandFoundation {
            profile: BusinessProfile::new("HealthPlus Clinic", "Healthcare"),
            description: "Multi-specialty clinic".to_string(),
            target_customer: "Families".to_string(),
            key_services: "General practice".to_string(),
        }
    }

    #[test]
    fn edit_overrides_only_provided_fields() {
        let mut f = foundation();
        FoundationEdit {
            target_customer: Some("Working professionals".to_string()),
            ..FoundationEdit::default()
        }
        .apply(&mut f);
        assert_eq!(f.target_customer, "Working professionals");
        assert_eq!(f.description, "Multi-specialty clinic");
    }

    #[test]
    fn foundation_flattens_profile_fields() {
        let json = serde_json::to_value(foundation()).unwrap();
        assert_eq!(json["businessName"], "HealthPlus Clinic");
        assert_eq!(json["targetCustomer"], "Families");
        let back: BrandFoundation = serde_json::from_value(json).unwrap();
        assert_eq!(back, foundation());
    }

    #[test]
    fn completeness_requires_all_narrative_fields() {
        let mut f = foundation();
        assert!(f.is_complete());
        f.key_services = "  ".to_string();
        assert!(!f.is_complete());
    }
}
