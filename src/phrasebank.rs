//! Phrase Bank
//!
//! Role-keyed banks of short conversational phrases, bucketed by score:
//! positive at or above the positive threshold, negative at or below the
//! negative threshold, neutral in between. Used for the immediate
//! backchannel acknowledgment and for canned replies on the heuristic path.
//!
//! Phrase selection goes through an injected [`PhrasePicker`] so production
//! can randomize while tests assert deterministic output.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use hirevox_scenario::RoleProfile;

/// Last-resort reply when every applicable bank is empty.
const DEFAULT_REPLY: &str = "Understood.";

/// Chooses an index into a phrase list.
pub trait PhrasePicker: Send + Sync {
    /// Pick an index in `0..len`. Only called with `len > 0`.
    fn pick_index(&self, len: usize) -> usize;
}

/// Production picker backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl PhrasePicker for RandomPicker {
    fn pick_index(&self, len: usize) -> usize {
        use rand::Rng;
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic picker for tests; clamps to the list bounds.
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl PhrasePicker for FixedPicker {
    fn pick_index(&self, len: usize) -> usize {
        self.0.min(len - 1)
    }
}

/// One role's phrase lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhraseSet {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub neutral: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

impl PhraseSet {
    fn bucket(&self, score: f64, selection: &SelectionThresholds) -> &[String] {
        if score >= selection.positive_threshold {
            &self.positive
        } else if score <= selection.negative_threshold {
            &self.negative
        } else {
            &self.neutral
        }
    }
}

/// Score cutoffs for bucket selection.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionThresholds {
    #[serde(default = "default_positive_threshold")]
    pub positive_threshold: f64,
    #[serde(default = "default_negative_threshold")]
    pub negative_threshold: f64,
}

fn default_positive_threshold() -> f64 {
    0.7
}

fn default_negative_threshold() -> f64 {
    0.3
}

impl Default for SelectionThresholds {
    fn default() -> Self {
        Self {
            positive_threshold: default_positive_threshold(),
            negative_threshold: default_negative_threshold(),
        }
    }
}

/// Failures loading a phrase bank file.
#[derive(Debug, Error)]
pub enum PhraseBankError {
    #[error("failed to read phrase bank file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse phrase bank file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct PhraseBankFile {
    #[serde(default)]
    roles: HashMap<String, PhraseSet>,
    #[serde(default)]
    common: Option<PhraseSet>,
    #[serde(default)]
    selection: Option<SelectionThresholds>,
}

/// Role-keyed phrase banks plus a generic common bank.
#[derive(Debug, Clone)]
pub struct PhraseBank {
    roles: HashMap<String, PhraseSet>,
    common: PhraseSet,
    selection: SelectionThresholds,
}

impl PhraseBank {
    /// Compiled-in default banks.
    pub fn builtin() -> Self {
        let mut roles = HashMap::new();
        roles.insert(
            RoleProfile::BaAntiFraud.tag().to_string(),
            PhraseSet {
                positive: vec![
                    "Good - that's solid rule work.".to_string(),
                    "Clear, the fraud metrics speak for themselves.".to_string(),
                ],
                neutral: vec![
                    "Could you walk me through one rule in detail?".to_string(),
                    "Which metrics did you track for that?".to_string(),
                ],
                negative: vec![
                    "Understood, but I need specifics on the rules you tuned.".to_string(),
                    "Let's slow down - give me one concrete fraud case.".to_string(),
                ],
            },
        );
        roles.insert(
            RoleProfile::ItDcOps.tag().to_string(),
            PhraseSet {
                positive: vec![
                    "Good - that's hands-on hardware experience.".to_string(),
                    "Clear, you've been in the racks.".to_string(),
                ],
                neutral: vec![
                    "Which firmware settings did you touch?".to_string(),
                    "Tell me more about the RAID layout.".to_string(),
                ],
                negative: vec![
                    "Understood, but I need the concrete configuration steps.".to_string(),
                    "Let's dig in - which servers did you actually set up?".to_string(),
                ],
            },
        );

        Self {
            roles,
            common: PhraseSet {
                positive: vec!["I see.".to_string(), "Good, that's clear.".to_string()],
                neutral: vec![
                    "Could you clarify that, please?".to_string(),
                    "Tell me a bit more.".to_string(),
                ],
                negative: vec![
                    "Understood, but I need more detail.".to_string(),
                    "Let's dig into that a little.".to_string(),
                ],
            },
            selection: SelectionThresholds::default(),
        }
    }

    /// Built-in banks overlaid with a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PhraseBankError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Built-in banks overlaid with parsed TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, PhraseBankError> {
        let file: PhraseBankFile = toml::from_str(text)?;
        let mut bank = Self::builtin();
        for (role, set) in file.roles {
            bank.roles.insert(role, set);
        }
        if let Some(common) = file.common {
            bank.common = common;
        }
        if let Some(selection) = file.selection {
            bank.selection = selection;
        }
        Ok(bank)
    }

    /// The score cutoffs used for bucket selection.
    pub fn selection(&self) -> &SelectionThresholds {
        &self.selection
    }

    /// Pick a phrase for a role and score bucket.
    ///
    /// Falls back from the role bank to the common bank, and finally to a
    /// fixed phrase, so this can never come back empty.
    pub fn pick(&self, profile: RoleProfile, score: f64, picker: &dyn PhrasePicker) -> String {
        let role_bucket = self
            .roles
            .get(profile.tag())
            .map(|set| set.bucket(score, &self.selection))
            .unwrap_or(&[]);

        let bucket = if role_bucket.is_empty() {
            self.common.bucket(score, &self.selection)
        } else {
            role_bucket
        };

        if bucket.is_empty() {
            warn!(profile = %profile, score, "phrase bank bucket empty, using default reply");
            return DEFAULT_REPLY.to_string();
        }
        bucket[picker.pick_index(bucket.len())].clone()
    }
}

impl Default for PhraseBank {
    fn default() -> Self {
        Self::builtin()
    }
}
