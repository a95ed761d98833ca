/// Scale-step motion inside a tonality
///
/// Steps walk the tonality's annotation rather than semitones. A pitch is
/// first anchored in the key by placement (G#:4 in Ab major anchors as Ab:4,
/// degree 0), then each step applies the incremental interval between
/// neighbouring degrees, so the result is spelled the way the key spells it.
/// Pitches whose placement is foreign to the key have no anchor and no steps.

use crate::error::TonalResult;
use crate::models::{DiatonicPitch, Tonality};

use super::spelling::respell_pitch_in_key;

/// The pitch respelled into `tonality`, with its 0-based scale degree
pub fn anchor_in_key(pitch: DiatonicPitch, tonality: &Tonality) -> Option<(DiatonicPitch, usize)> {
    let degree = tonality.degree_of_placement(pitch.tone().placement())?;
    Some((respell_pitch_in_key(pitch, tonality), degree))
}

/// Move `steps` scale steps from `pitch` (negative moves down)
///
/// Returns `Ok(None)` when the pitch cannot be anchored in the tonality.
pub fn scale_step(
    pitch: DiatonicPitch,
    steps: i32,
    tonality: &Tonality,
) -> TonalResult<Option<DiatonicPitch>> {
    let Some((mut current, mut degree)) = anchor_in_key(pitch, tonality) else {
        return Ok(None);
    };
    let intervals = tonality.incremental_intervals();
    let cardinality = intervals.len();

    if steps >= 0 {
        for _ in 0..steps {
            current = intervals[degree].end_pitch(&current)?;
            degree = (degree + 1) % cardinality;
        }
    } else {
        for _ in 0..steps.unsigned_abs() {
            degree = (degree + cardinality - 1) % cardinality;
            current = (-intervals[degree]).end_pitch(&current)?;
        }
    }
    Ok(Some(current))
}

/// Position of a pitch on the key's infinite ladder of scale tones
///
/// Position 0 is the root in octave 0's ladder segment; consecutive scale
/// tones differ by one.
pub fn scale_position(pitch: DiatonicPitch, tonality: &Tonality) -> Option<i32> {
    let (anchored, degree) = anchor_in_key(pitch, tonality)?;
    let intervals = tonality.incremental_intervals();
    let above_root: i32 = intervals.iter().take(degree).map(|i| i.semitones()).sum();
    let root_index = anchored.chromatic_distance() - above_root;
    let segment = (root_index - tonality.root_tone().tonal_offset()).div_euclid(12);
    Some(segment * intervals.len() as i32 + degree as i32)
}

/// Signed scale steps from `from` to `to`, measured in `tonality`
pub fn scale_steps_between(
    from: DiatonicPitch,
    to: DiatonicPitch,
    tonality: &Tonality,
) -> Option<i32> {
    Some(scale_position(to, tonality)? - scale_position(from, tonality)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModalityType;

    fn p(text: &str) -> DiatonicPitch {
        DiatonicPitch::parse(text).unwrap()
    }

    fn key(root: &str, modality: ModalityType) -> Tonality {
        Tonality::create(modality, root).unwrap()
    }

    #[test]
    fn test_steps_up_and_down() {
        let g_major = key("G", ModalityType::Major);
        assert_eq!(scale_step(p("E:5"), 2, &g_major).unwrap(), Some(p("G:5")));
        assert_eq!(scale_step(p("E:5"), 1, &g_major).unwrap(), Some(p("F#:5")));
        assert_eq!(scale_step(p("G:5"), -3, &g_major).unwrap(), Some(p("D:5")));
        assert_eq!(scale_step(p("D:5"), 0, &g_major).unwrap(), Some(p("D:5")));
        assert_eq!(scale_step(p("B:4"), 7, &g_major).unwrap(), Some(p("B:5")));
    }

    #[test]
    fn test_steps_cross_octave_boundary() {
        let c_major = key("C", ModalityType::Major);
        assert_eq!(scale_step(p("B:4"), 1, &c_major).unwrap(), Some(p("C:5")));
        assert_eq!(scale_step(p("C:5"), -1, &c_major).unwrap(), Some(p("B:4")));
    }

    #[test]
    fn test_anchor_respells_into_key() {
        let ab_major = key("Ab", ModalityType::Major);
        assert_eq!(scale_step(p("G#:4"), 1, &ab_major).unwrap(), Some(p("Bb:4")));
        let c_major = key("C", ModalityType::Major);
        assert_eq!(scale_step(p("F#:4"), 1, &c_major).unwrap(), None);
    }

    #[test]
    fn test_pentatonic_skips() {
        let pentatonic = key("C", ModalityType::MajorPentatonic);
        assert_eq!(scale_step(p("E:4"), 1, &pentatonic).unwrap(), Some(p("G:4")));
        assert_eq!(scale_step(p("C:5"), -1, &pentatonic).unwrap(), Some(p("A:4")));
    }

    #[test]
    fn test_steps_between() {
        let c_major = key("C", ModalityType::Major);
        assert_eq!(scale_steps_between(p("C:5"), p("E:5"), &c_major), Some(2));
        assert_eq!(scale_steps_between(p("D:5"), p("B:4"), &c_major), Some(-2));
        assert_eq!(scale_steps_between(p("C:4"), p("C:5"), &c_major), Some(7));
        assert_eq!(scale_steps_between(p("C:5"), p("C#:5"), &c_major), None);

        // Cb:5 sounds as B:4
        let cb_major = key("Cb", ModalityType::Major);
        assert_eq!(scale_steps_between(p("Bb:4"), p("Cb:5"), &cb_major), Some(1));
    }
}
