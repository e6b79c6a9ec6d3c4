//! Role Profiles
//!
//! Closed enumeration of the role profiles the engine supports, with an
//! explicit capability table (drill threshold, block weights, phrase-bank
//! key). Unknown profile tags resolve to [`RoleProfile::Generic`] rather
//! than producing silent empty lookups. The built-in table can be overlaid
//! from a TOML file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Supported role profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleProfile {
    /// Business analyst, anti-fraud domain
    BaAntiFraud,
    /// Data-center operations engineer
    ItDcOps,
    /// Catch-all profile for unknown tags
    Generic,
}

impl RoleProfile {
    /// All supported profiles, generic last.
    pub const ALL: [RoleProfile; 3] = [
        RoleProfile::BaAntiFraud,
        RoleProfile::ItDcOps,
        RoleProfile::Generic,
    ];

    /// Resolve a caller-supplied tag. Unknown or absent tags map to
    /// [`RoleProfile::Generic`].
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("ba_anti_fraud") => RoleProfile::BaAntiFraud,
            Some("it_dc_ops") => RoleProfile::ItDcOps,
            Some(other) => {
                warn!(tag = other, "unknown role profile, using generic");
                RoleProfile::Generic
            }
            None => RoleProfile::Generic,
        }
    }

    /// The wire tag for this profile.
    pub fn tag(&self) -> &'static str {
        match self {
            RoleProfile::BaAntiFraud => "ba_anti_fraud",
            RoleProfile::ItDcOps => "it_dc_ops",
            RoleProfile::Generic => "generic",
        }
    }

    /// Human-readable role name used in generative prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            RoleProfile::BaAntiFraud => "Business Analyst (Anti-Fraud)",
            RoleProfile::ItDcOps => "Data Center Operations Engineer",
            RoleProfile::Generic => "general",
        }
    }
}

impl std::fmt::Display for RoleProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Capabilities of one role profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileCapabilities {
    /// Profile-specific drill threshold; `None` defers to the scenario
    /// policy and the global default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drill_threshold: Option<f64>,
    /// Block weights for overall scoring
    #[serde(default)]
    pub block_weights: HashMap<String, f64>,
}

/// Failures loading a profile override file.
#[derive(Debug, Error)]
pub enum ProfileLoadError {
    #[error("failed to read profile file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse profile file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    profiles: HashMap<String, ProfileCapabilities>,
}

/// Capability lookup table for all supported profiles.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    entries: HashMap<RoleProfile, ProfileCapabilities>,
}

impl ProfileTable {
    /// The built-in table. Thresholds reflect the default interview policy:
    /// anti-fraud analysts are drilled harder, data-center operators
    /// slightly softer, and the generic profile defers to the scenario.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            RoleProfile::BaAntiFraud,
            ProfileCapabilities {
                drill_threshold: Some(0.75),
                block_weights: HashMap::from([
                    ("AntiFraud_Rules".to_string(), 0.95),
                    ("Requirements".to_string(), 0.85),
                    ("Data_Analysis".to_string(), 0.8),
                ]),
            },
        );
        entries.insert(
            RoleProfile::ItDcOps,
            ProfileCapabilities {
                drill_threshold: Some(0.65),
                block_weights: HashMap::from([
                    ("DC_HW_x86_RAID_BMC".to_string(), 0.95),
                    ("DC_Network".to_string(), 0.85),
                    ("DC_Incidents".to_string(), 0.9),
                ]),
            },
        );
        entries.insert(RoleProfile::Generic, ProfileCapabilities::default());
        Self { entries }
    }

    /// Built-in table overlaid with entries from a TOML file. Entries for
    /// unknown profile tags are ignored with a warning.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProfileLoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Built-in table overlaid with entries parsed from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ProfileLoadError> {
        let file: ProfileFile = toml::from_str(text)?;
        let mut table = Self::builtin();
        for (tag, capabilities) in file.profiles {
            match tag.as_str() {
                "ba_anti_fraud" => {
                    table.entries.insert(RoleProfile::BaAntiFraud, capabilities);
                }
                "it_dc_ops" => {
                    table.entries.insert(RoleProfile::ItDcOps, capabilities);
                }
                "generic" => {
                    table.entries.insert(RoleProfile::Generic, capabilities);
                }
                other => warn!(tag = other, "ignoring unknown profile in override file"),
            }
        }
        Ok(table)
    }

    /// Capabilities for a profile. Every supported profile has an entry.
    pub fn capabilities(&self, profile: RoleProfile) -> &ProfileCapabilities {
        self.entries
            .get(&profile)
            .unwrap_or_else(|| &self.entries[&RoleProfile::Generic])
    }

    /// Profile-specific drill threshold, if the profile defines one.
    pub fn drill_threshold(&self, profile: RoleProfile) -> Option<f64> {
        self.capabilities(profile).drill_threshold
    }

    /// Block weights for a profile.
    pub fn block_weights(&self, profile: RoleProfile) -> &HashMap<String, f64> {
        &self.capabilities(profile).block_weights
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::builtin()
    }
}
