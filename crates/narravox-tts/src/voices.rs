//! Speaker-to-voice assignment.
//!
//! Two casting policies exist and stay separate because their callers need
//! different shapes: [`RoundRobinCast`] hands out bare voice configs from one
//! flat preset list, [`AlternatingCast`] splits speakers by sort parity over
//! two pools and attaches a delivery-style instruction to each. Both walk
//! speakers in sorted order so repeated runs over the same script cast
//! identically.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::types::{presets_for_language, VoiceConfig};

/// One cast speaker: a voice, optionally with a style instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct CastMember {
    pub voice: VoiceConfig,
    pub style: Option<String>,
}

/// A batch speaker-casting policy.
pub trait CastStrategy {
    fn cast(&self, speakers: &BTreeSet<String>) -> BTreeMap<String, CastMember>;
}

/// Round-robin over one flat preset list, cycling when speakers outnumber
/// presets.
pub struct RoundRobinCast {
    presets: Vec<VoiceConfig>,
}

impl RoundRobinCast {
    pub fn new(presets: Vec<VoiceConfig>) -> Self {
        assert!(!presets.is_empty(), "preset list must not be empty");
        Self { presets }
    }

    pub fn for_language(language_code: &str) -> Self {
        Self::new(presets_for_language(language_code))
    }
}

impl CastStrategy for RoundRobinCast {
    fn cast(&self, speakers: &BTreeSet<String>) -> BTreeMap<String, CastMember> {
        speakers
            .iter()
            .enumerate()
            .map(|(rank, speaker)| {
                let voice = self.presets[rank % self.presets.len()].clone();
                (speaker.clone(), CastMember { voice, style: None })
            })
            .collect()
    }
}

/// Alternate speakers between two pools by sort parity.
///
/// Even ranks draw from the first pool, odd ranks from the second; both pools
/// are indexed by `rank / 2 % pool_len`. Each side carries its own style
/// instruction.
pub struct AlternatingCast {
    even_pool: Vec<VoiceConfig>,
    odd_pool: Vec<VoiceConfig>,
    even_style: String,
    odd_style: String,
}

impl AlternatingCast {
    pub fn new(
        even_pool: Vec<VoiceConfig>,
        odd_pool: Vec<VoiceConfig>,
        even_style: impl Into<String>,
        odd_style: impl Into<String>,
    ) -> Self {
        assert!(
            !even_pool.is_empty() && !odd_pool.is_empty(),
            "voice pools must not be empty"
        );
        Self {
            even_pool,
            odd_pool,
            even_style: even_style.into(),
            odd_style: odd_style.into(),
        }
    }

    /// Expressive female / calm male pairing for Japanese dialogue.
    pub fn japanese_default() -> Self {
        let female = ["Aoede", "Kore", "Leda", "Zephyr"]
            .into_iter()
            .map(|name| VoiceConfig::new(name, "ja-JP"))
            .collect();
        let male = ["Charon", "Puck", "Orus", "Fenrir"]
            .into_iter()
            .map(|name| VoiceConfig::new(name, "ja-JP"))
            .collect();
        Self::new(
            female,
            male,
            "as an expressive young woman speaking Japanese",
            "as a calm knowledgeable expert speaking Japanese",
        )
    }
}

impl CastStrategy for AlternatingCast {
    fn cast(&self, speakers: &BTreeSet<String>) -> BTreeMap<String, CastMember> {
        speakers
            .iter()
            .enumerate()
            .map(|(rank, speaker)| {
                let (pool, style) = if rank % 2 == 0 {
                    (&self.even_pool, &self.even_style)
                } else {
                    (&self.odd_pool, &self.odd_style)
                };
                let voice = pool[rank / 2 % pool.len()].clone();
                (
                    speaker.clone(),
                    CastMember {
                        voice,
                        style: Some(style.clone()),
                    },
                )
            })
            .collect()
    }
}

/// Stateful speaker-to-voice mapping for one run.
///
/// Supports both a one-shot batch pass over a script's speaker set and
/// incremental assignment on first request. Both draw from the same monotonic
/// preset counter, so mixing the modes never hands two speakers inconsistent
/// presets within a run. Explicit assignments are never overwritten.
pub struct VoiceManager {
    default_language: String,
    assignments: BTreeMap<String, VoiceConfig>,
    next_index: usize,
}

impl VoiceManager {
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            assignments: BTreeMap::new(),
            next_index: 0,
        }
    }

    /// Pin a speaker to a specific voice.
    pub fn set_voice(&mut self, speaker: impl Into<String>, voice: VoiceConfig) {
        self.assignments.insert(speaker.into(), voice);
    }

    /// Voice for a speaker, auto-assigning on first request.
    pub fn voice_for(&mut self, speaker: &str) -> VoiceConfig {
        if !self.assignments.contains_key(speaker) {
            self.auto_assign(speaker.to_string());
        }
        self.assignments[speaker].clone()
    }

    /// Assign voices to every unassigned speaker, in sorted order.
    pub fn assign_all(&mut self, speakers: &BTreeSet<String>) -> &BTreeMap<String, VoiceConfig> {
        for speaker in speakers {
            if !self.assignments.contains_key(speaker) {
                self.auto_assign(speaker.clone());
            }
        }
        &self.assignments
    }

    pub fn assignments(&self) -> &BTreeMap<String, VoiceConfig> {
        &self.assignments
    }

    fn auto_assign(&mut self, speaker: String) {
        let presets = presets_for_language(&self.default_language);
        let voice = presets[self.next_index % presets.len()].clone();
        debug!(speaker = %speaker, voice = %voice.name, "auto-assigned voice");
        self.assignments.insert(speaker, voice);
        self.next_index += 1;
    }
}
