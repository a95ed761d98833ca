/// Key-aware spelling of tones and pitches
///
/// When a constraint dictates a tone or pitch, the note it produces should be
/// spelled the way the local key spells it: Bbb inside C major is written A.
/// Tones with no enharmonic in the key keep their own spelling.

use crate::models::{DiatonicPitch, DiatonicTone, Tonality};

/// The key's spelling of `tone`'s placement, or `tone` itself
pub fn respell_tone_in_key(tone: DiatonicTone, tonality: &Tonality) -> DiatonicTone {
    tonality.enharmonic_in_key(&tone).unwrap_or(tone)
}

/// `pitch` with the key's spelling, sounding at the same chromatic index
pub fn respell_pitch_in_key(pitch: DiatonicPitch, tonality: &Tonality) -> DiatonicPitch {
    let tone = respell_tone_in_key(pitch.tone(), tonality);
    if tone == pitch.tone() {
        return pitch;
    }
    DiatonicPitch::from_chromatic(pitch.chromatic_distance(), tone).unwrap_or(pitch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModalityType;

    #[test]
    fn test_respell_into_c_major() {
        let c_major = Tonality::create(ModalityType::Major, "C").unwrap();
        let bbb = DiatonicTone::parse("Bbb").unwrap();
        assert_eq!(respell_tone_in_key(bbb, &c_major).to_string(), "A");

        // Ab has no spelling in C major and stays as written
        let ab = DiatonicTone::parse("Ab").unwrap();
        assert_eq!(respell_tone_in_key(ab, &c_major), ab);
    }

    #[test]
    fn test_respell_pitch_keeps_sound() {
        let c_sharp_major = Tonality::create(ModalityType::Major, "C#").unwrap();
        let c5 = DiatonicPitch::parse("C:5").unwrap();
        let respelled = respell_pitch_in_key(c5, &c_sharp_major);
        assert_eq!(respelled.to_string(), "B#:4");
        assert_eq!(respelled.chromatic_distance(), c5.chromatic_distance());
    }
}
