//! In-scale pitches of a tonality over a pitch range
//!
//! The walk starts at the lowest in-range pitch carrying any tone of the key
//! and then applies the key's incremental intervals cyclically until the
//! range end is passed. Spellings are always the key's own.

use super::diatonic_pitch::DiatonicPitch;
use super::pitch_range::PitchRange;
use super::tonality::Tonality;
use crate::error::TonalResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchScale {
    tonality: Tonality,
    pitch_range: PitchRange,
    pitches: Vec<DiatonicPitch>,
}

impl PitchScale {
    pub fn new(tonality: &Tonality, pitch_range: &PitchRange) -> TonalResult<Self> {
        let pitches = compute_scale_pitches(tonality, pitch_range)?;
        Ok(Self {
            tonality: tonality.clone(),
            pitch_range: *pitch_range,
            pitches,
        })
    }

    pub fn tonality(&self) -> &Tonality {
        &self.tonality
    }

    pub fn pitch_range(&self) -> &PitchRange {
        &self.pitch_range
    }

    /// Ascending in-scale pitches
    pub fn pitches(&self) -> &[DiatonicPitch] {
        &self.pitches
    }

    pub fn into_pitches(self) -> Vec<DiatonicPitch> {
        self.pitches
    }
}

/// Ascending list of the tonality's pitches that lie within the range
pub fn compute_scale_pitches(
    tonality: &Tonality,
    pitch_range: &PitchRange,
) -> TonalResult<Vec<DiatonicPitch>> {
    let start = tonality
        .tones()
        .iter()
        .enumerate()
        .filter_map(|(degree, tone)| {
            pitch_range
                .find_lowest_placement_in_range(tone.placement())
                .map(|index| (index, degree))
        })
        .min_by_key(|&(index, _)| index);

    let Some((start_index, start_degree)) = start else {
        return Ok(Vec::new());
    };

    let intervals = tonality.incremental_intervals();
    let mut pitch = DiatonicPitch::from_chromatic(start_index, tonality.tones()[start_degree])?;
    let mut degree = start_degree;
    let mut pitches = Vec::new();
    while pitch.chromatic_distance() <= pitch_range.end_index() {
        pitches.push(pitch);
        pitch = intervals[degree].end_pitch(&pitch)?;
        degree = (degree + 1) % intervals.len();
    }
    Ok(pitches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::modality::ModalityType;

    fn names(pitches: &[DiatonicPitch]) -> Vec<String> {
        pitches.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_g_major_over_two_octaves() {
        let g_major = Tonality::create(ModalityType::Major, "G").unwrap();
        let range = PitchRange::from_pitches("C:4", "C:6").unwrap();
        let scale = PitchScale::new(&g_major, &range).unwrap();
        assert_eq!(scale.pitches().len(), 15);
        assert_eq!(scale.pitches()[0].to_string(), "C:4");
        assert_eq!(scale.pitches().last().unwrap().to_string(), "C:6");
        assert!(names(scale.pitches()).contains(&"F#:5".to_string()));
    }

    #[test]
    fn test_spelling_crossing_octave() {
        // Cb:5 sounds at index 59, below C:5
        let gb_major = Tonality::create(ModalityType::Major, "Gb").unwrap();
        let range = PitchRange::from_pitches("Bb:4", "Db:5").unwrap();
        let scale = PitchScale::new(&gb_major, &range).unwrap();
        assert_eq!(names(scale.pitches()), vec!["Bb:4", "Cb:5", "Db:5"]);
    }

    #[test]
    fn test_pentatonic_and_empty() {
        let pentatonic = Tonality::create(ModalityType::MajorPentatonic, "C").unwrap();
        let range = PitchRange::from_pitches("C:4", "C:5").unwrap();
        let scale = compute_scale_pitches(&pentatonic, &range).unwrap();
        assert_eq!(names(&scale), vec!["C:4", "D:4", "E:4", "G:4", "A:4", "C:5"]);

        let narrow = PitchRange::new(61, 61).unwrap();
        assert!(compute_scale_pitches(&pentatonic, &narrow).unwrap().is_empty());
    }

    #[test]
    fn test_ascending_order() {
        let tonality = Tonality::create(ModalityType::HWOctatonic, "C").unwrap();
        let scale = compute_scale_pitches(&tonality, &PitchRange::full()).unwrap();
        assert!(scale
            .windows(2)
            .all(|w| w[0].chromatic_distance() < w[1].chromatic_distance()));
    }
}
