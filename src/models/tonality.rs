//! Tonalities: a modality rooted on a diatonic tone
//!
//! The annotation is the closed tone sequence of the key, for example
//! G A B C D E F# G for G major. Spellings follow the letter progression of
//! the modality's intervals.

use std::fmt;

use super::diatonic_tone::DiatonicTone;
use super::interval::Interval;
use super::modality::{Modality, ModalityFactory, ModalityType};
use crate::error::TonalResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tonality {
    modality: Modality,
    root: DiatonicTone,
    annotation: Vec<DiatonicTone>,
}

impl Tonality {
    /// Tonality whose scale starts on `root`
    pub fn new(modality_type: ModalityType, root: DiatonicTone) -> TonalResult<Self> {
        Self::from_modality(ModalityFactory::create(modality_type, 0)?, root)
    }

    /// Parse the root tone, then build the tonality
    pub fn create(modality_type: ModalityType, root: &str) -> TonalResult<Self> {
        Self::new(modality_type, DiatonicTone::parse(root)?)
    }

    /// Tonality of a rotated modality, named by the basis tone of the
    /// unrotated scale: (Major, 1, C) is D dorian
    pub fn with_modal_index(
        modality_type: ModalityType,
        modal_index: usize,
        basis_tone: DiatonicTone,
    ) -> TonalResult<Self> {
        let modality = ModalityFactory::create(modality_type, modal_index)?;
        let mut root = basis_tone;
        for interval in modality.base_intervals().iter().take(modal_index) {
            root = interval.end_tone(&root)?;
        }
        Self::from_modality(modality, root)
    }

    pub fn from_modality(modality: Modality, root: DiatonicTone) -> TonalResult<Self> {
        let annotation = modality.tonal_scale(root)?;
        Ok(Self {
            modality,
            root,
            annotation,
        })
    }

    pub fn modality(&self) -> &Modality {
        &self.modality
    }

    pub fn modality_type(&self) -> ModalityType {
        self.modality.modality_type()
    }

    pub fn modal_index(&self) -> usize {
        self.modality.modal_index()
    }

    /// First tone of the annotation
    pub fn root_tone(&self) -> DiatonicTone {
        self.root
    }

    /// First tone of the unrotated modality's scale
    pub fn basis_tone(&self) -> TonalResult<DiatonicTone> {
        let mut basis = self.root;
        let base = self.modality.base_intervals();
        for interval in base.iter().take(self.modal_index()).rev() {
            basis = (-*interval).end_tone(&basis)?;
        }
        Ok(basis)
    }

    /// Closed tone sequence, root repeated at the end
    pub fn annotation(&self) -> &[DiatonicTone] {
        &self.annotation
    }

    /// Distinct tones of the key in scale order
    pub fn tones(&self) -> &[DiatonicTone] {
        &self.annotation[..self.cardinality()]
    }

    pub fn cardinality(&self) -> usize {
        self.modality.cardinality()
    }

    /// Intervals between consecutive annotation tones
    pub fn incremental_intervals(&self) -> Vec<Interval> {
        self.modality.incremental_intervals()
    }

    /// Scale degree index (0-based) of a tone by exact spelling
    pub fn degree_of(&self, tone: &DiatonicTone) -> Option<usize> {
        self.tones().iter().position(|t| t == tone)
    }

    /// Scale degree index (0-based) of any spelling of the tone's placement
    pub fn degree_of_placement(&self, placement: i32) -> Option<usize> {
        self.tones().iter().position(|t| t.placement() == placement)
    }

    /// The key's own spelling of the tone's placement, when it has one
    pub fn enharmonic_in_key(&self, tone: &DiatonicTone) -> Option<DiatonicTone> {
        self.degree_of_placement(tone.placement())
            .map(|degree| self.tones()[degree])
    }

    pub fn contains_placement(&self, placement: i32) -> bool {
        self.degree_of_placement(placement).is_some()
    }
}

impl fmt::Display for Tonality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.root, self.modality_type())?;
        if self.modal_index() != 0 {
            write!(f, "({})", self.modal_index())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(text: &str) -> DiatonicTone {
        DiatonicTone::parse(text).unwrap()
    }

    #[test]
    fn test_annotation_is_closed() {
        let g_major = Tonality::create(ModalityType::Major, "G").unwrap();
        let annotation: Vec<String> = g_major.annotation().iter().map(|t| t.to_string()).collect();
        assert_eq!(annotation, vec!["G", "A", "B", "C", "D", "E", "F#", "G"]);
        assert_eq!(g_major.cardinality(), 7);
        assert_eq!(g_major.tones().len(), 7);
    }

    #[test]
    fn test_modal_index_basis() {
        let d_dorian = Tonality::with_modal_index(ModalityType::Major, 1, tone("C")).unwrap();
        assert_eq!(d_dorian.root_tone(), tone("D"));
        assert_eq!(d_dorian.basis_tone().unwrap(), tone("C"));
        assert_eq!(d_dorian.tones()[6], tone("C"));
    }

    #[test]
    fn test_enharmonic_in_key() {
        let c_major = Tonality::create(ModalityType::Major, "C").unwrap();
        assert_eq!(c_major.enharmonic_in_key(&tone("Bbb")), Some(tone("A")));
        assert_eq!(c_major.enharmonic_in_key(&tone("Ab")), None);
        assert_eq!(c_major.degree_of(&tone("G")), Some(4));
    }

    #[test]
    fn test_whole_tone_cardinality() {
        let whole_tone = Tonality::create(ModalityType::WholeTone, "C").unwrap();
        assert_eq!(whole_tone.cardinality(), 6);
        assert_eq!(whole_tone.to_string(), "C-WholeTone");
    }
}
