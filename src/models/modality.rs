//! Modalities: named scale structures independent of a root
//!
//! A modality is a sequence of incremental intervals whose sum is exactly one
//! octave (seven letter steps, twelve semitones). The built-in set covers the
//! major/minor family, the church modes, whole tone, pentatonic, octatonic and
//! blues scales. Additional modalities can be registered at runtime and are
//! addressed through `ModalityType::Custom`.
//!
//! A `modal_index` rotates the interval sequence so the scale starts on a
//! different degree (Major with modal index 1 is Dorian).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::diatonic_tone::DiatonicTone;
use super::interval::Interval;
use crate::error::{TonalError, TonalResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModalityType {
    Major,
    NaturalMinor,
    MelodicMinor,
    HarmonicMinor,
    HarmonicMajor,
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
    WholeTone,
    MajorPentatonic,
    EgyptianPentatonic,
    MinorBluesPentatonic,
    MajorBluesPentatonic,
    MinorPentatonic,
    HWOctatonic,
    WHOctatonic,
    MajorBlues,
    MinorBlues,
    /// Registered through `ModalityFactory::register`
    Custom(u32),
}

impl ModalityType {
    pub const BUILT_IN: [ModalityType; 22] = [
        ModalityType::Major,
        ModalityType::NaturalMinor,
        ModalityType::MelodicMinor,
        ModalityType::HarmonicMinor,
        ModalityType::HarmonicMajor,
        ModalityType::Ionian,
        ModalityType::Dorian,
        ModalityType::Phrygian,
        ModalityType::Lydian,
        ModalityType::Mixolydian,
        ModalityType::Aeolian,
        ModalityType::Locrian,
        ModalityType::WholeTone,
        ModalityType::MajorPentatonic,
        ModalityType::EgyptianPentatonic,
        ModalityType::MinorBluesPentatonic,
        ModalityType::MajorBluesPentatonic,
        ModalityType::MinorPentatonic,
        ModalityType::HWOctatonic,
        ModalityType::WHOctatonic,
        ModalityType::MajorBlues,
        ModalityType::MinorBlues,
    ];

    /// Interval text for a built-in modality
    fn built_in_intervals(&self) -> Option<&'static [&'static str]> {
        let intervals: &'static [&'static str] = match self {
            ModalityType::Major | ModalityType::Ionian => {
                &["M:2", "M:2", "m:2", "M:2", "M:2", "M:2", "m:2"]
            }
            ModalityType::NaturalMinor | ModalityType::Aeolian => {
                &["M:2", "m:2", "M:2", "M:2", "m:2", "M:2", "M:2"]
            }
            ModalityType::MelodicMinor => &["M:2", "m:2", "M:2", "M:2", "M:2", "M:2", "m:2"],
            ModalityType::HarmonicMinor => &["M:2", "m:2", "M:2", "M:2", "m:2", "A:2", "m:2"],
            ModalityType::HarmonicMajor => &["M:2", "M:2", "m:2", "M:2", "m:2", "A:2", "m:2"],
            ModalityType::Dorian => &["M:2", "m:2", "M:2", "M:2", "M:2", "m:2", "M:2"],
            ModalityType::Phrygian => &["m:2", "M:2", "M:2", "M:2", "m:2", "M:2", "M:2"],
            ModalityType::Lydian => &["M:2", "M:2", "M:2", "m:2", "M:2", "M:2", "m:2"],
            ModalityType::Mixolydian => &["M:2", "M:2", "m:2", "M:2", "M:2", "m:2", "M:2"],
            ModalityType::Locrian => &["m:2", "M:2", "M:2", "m:2", "M:2", "M:2", "M:2"],
            ModalityType::WholeTone => &["M:2", "M:2", "M:2", "M:2", "M:2", "d:3"],
            ModalityType::MajorPentatonic => &["M:2", "M:2", "m:3", "M:2", "m:3"],
            ModalityType::EgyptianPentatonic => &["M:2", "m:3", "M:2", "m:3", "M:2"],
            ModalityType::MinorBluesPentatonic => &["m:3", "M:2", "m:3", "M:2", "M:2"],
            ModalityType::MajorBluesPentatonic => &["M:2", "m:3", "M:2", "M:2", "m:3"],
            ModalityType::MinorPentatonic => &["m:3", "M:2", "M:2", "m:3", "M:2"],
            ModalityType::HWOctatonic => &["m:2", "M:2", "A:1", "M:2", "m:2", "M:2", "m:2", "M:2"],
            ModalityType::WHOctatonic => &["M:2", "m:2", "M:2", "m:2", "M:2", "A:1", "M:2", "m:2"],
            ModalityType::MajorBlues => &["M:2", "m:2", "A:1", "m:3", "M:2", "m:3"],
            ModalityType::MinorBlues => &["m:3", "M:2", "A:1", "m:2", "m:3", "M:2"],
            ModalityType::Custom(_) => return None,
        };
        Some(intervals)
    }

    pub fn name(&self) -> String {
        match self {
            ModalityType::Custom(id) => ModalityFactory::custom_name(*id)
                .unwrap_or_else(|| format!("Custom({})", id)),
            other => format!("{:?}", other),
        }
    }
}

impl fmt::Display for ModalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ModalityType {
    type Err = TonalError;

    /// Case-insensitive built-in names ("Major", "harmonicminor", "Minor"),
    /// then registered custom names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '_', '-'], "");
        if wanted == "minor" {
            return Ok(ModalityType::NaturalMinor);
        }
        if let Some(found) = ModalityType::BUILT_IN
            .iter()
            .find(|t| format!("{:?}", t).to_lowercase() == wanted)
        {
            return Ok(*found);
        }
        ModalityFactory::lookup(s.trim()).ok_or_else(|| TonalError::UndefinedModality(s.to_string()))
    }
}

/// A modality type realized as its (possibly rotated) interval sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modality {
    modality_type: ModalityType,
    base_intervals: Vec<Interval>,
    modal_index: usize,
}

impl Modality {
    pub fn modality_type(&self) -> ModalityType {
        self.modality_type
    }

    pub fn modal_index(&self) -> usize {
        self.modal_index
    }

    /// Number of distinct tones in the scale
    pub fn cardinality(&self) -> usize {
        self.base_intervals.len()
    }

    /// Intervals of the unrotated modality
    pub fn base_intervals(&self) -> &[Interval] {
        &self.base_intervals
    }

    /// Intervals starting at the modal index
    pub fn incremental_intervals(&self) -> Vec<Interval> {
        let mut rotated = self.base_intervals.clone();
        rotated.rotate_left(self.modal_index % self.cardinality());
        rotated
    }

    /// The closed tone sequence starting at `root`; the root is repeated last
    pub fn tonal_scale(&self, root: DiatonicTone) -> TonalResult<Vec<DiatonicTone>> {
        let mut tones = Vec::with_capacity(self.cardinality() + 1);
        tones.push(root);
        let mut current = root;
        for interval in self.incremental_intervals() {
            current = interval.end_tone(&current)?;
            tones.push(current);
        }
        Ok(tones)
    }
}

/// Interval specification of a registered modality
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalitySpec {
    pub name: String,
    pub intervals: Vec<Interval>,
}

#[derive(Default)]
struct ModalityRegistry {
    specs: Vec<ModalitySpec>,
    by_name: HashMap<String, u32>,
}

static REGISTRY: Lazy<RwLock<ModalityRegistry>> =
    Lazy::new(|| RwLock::new(ModalityRegistry::default()));

fn check_octave_span(name: &str, intervals: &[Interval]) -> TonalResult<()> {
    let steps: i32 = intervals.iter().map(|i| i.letter_steps()).sum();
    let semitones: i32 = intervals.iter().map(|i| i.semitones()).sum();
    if intervals.is_empty() || steps != 7 || semitones != 12 {
        return Err(TonalError::UndefinedModality(format!(
            "{} spans {} letter steps and {} semitones, not an octave",
            name, steps, semitones
        )));
    }
    if intervals.iter().any(|i| i.is_descending() || i.semitones() == 0) {
        return Err(TonalError::UndefinedModality(format!(
            "{} has a non-ascending interval",
            name
        )));
    }
    Ok(())
}

/// Creates modalities from their types and holds the custom registry
pub struct ModalityFactory;

impl ModalityFactory {
    pub fn create(modality_type: ModalityType, modal_index: usize) -> TonalResult<Modality> {
        let base_intervals = match modality_type.built_in_intervals() {
            Some(text) => text
                .iter()
                .map(|s| Interval::parse(s))
                .collect::<TonalResult<Vec<_>>>()?,
            None => Self::custom_intervals(modality_type)?,
        };
        if modal_index >= base_intervals.len() {
            return Err(TonalError::UndefinedModality(format!(
                "modal index {} out of range for {}",
                modal_index, modality_type
            )));
        }
        Ok(Modality {
            modality_type,
            base_intervals,
            modal_index,
        })
    }

    /// Register (or replace) a named modality and return its type
    pub fn register(name: &str, intervals: Vec<Interval>) -> TonalResult<ModalityType> {
        check_octave_span(name, &intervals)?;
        let mut registry = REGISTRY
            .write()
            .map_err(|_| TonalError::UndefinedModality("modality registry poisoned".into()))?;
        if let Some(&id) = registry.by_name.get(name) {
            log::warn!("Replacing registered modality '{}'", name);
            registry.specs[id as usize].intervals = intervals;
            return Ok(ModalityType::Custom(id));
        }
        let id = registry.specs.len() as u32;
        registry.specs.push(ModalitySpec {
            name: name.to_string(),
            intervals,
        });
        registry.by_name.insert(name.to_string(), id);
        log::info!("Registered modality '{}' as Custom({})", name, id);
        Ok(ModalityType::Custom(id))
    }

    /// Register a modality from interval text such as ["M:2", "m:3", ...]
    pub fn register_text(name: &str, intervals: &[&str]) -> TonalResult<ModalityType> {
        let parsed = intervals
            .iter()
            .map(|s| Interval::parse(s))
            .collect::<TonalResult<Vec<_>>>()?;
        Self::register(name, parsed)
    }

    pub fn lookup(name: &str) -> Option<ModalityType> {
        let registry = REGISTRY.read().ok()?;
        registry.by_name.get(name).map(|&id| ModalityType::Custom(id))
    }

    fn custom_name(id: u32) -> Option<String> {
        let registry = REGISTRY.read().ok()?;
        registry.specs.get(id as usize).map(|spec| spec.name.clone())
    }

    fn custom_intervals(modality_type: ModalityType) -> TonalResult<Vec<Interval>> {
        let undefined = || TonalError::UndefinedModality(format!("{:?}", modality_type));
        let ModalityType::Custom(id) = modality_type else {
            return Err(undefined());
        };
        let registry = REGISTRY.read().map_err(|_| undefined())?;
        registry
            .specs
            .get(id as usize)
            .map(|spec| spec.intervals.clone())
            .ok_or_else(undefined)
    }
}
