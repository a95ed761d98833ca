//! Twelve-tone equal temperament
//!
//! A chromatic location is a `(partition, offset)` pair: the partition is the
//! octave number and the offset the semitone within it, C = 0. Locations map
//! one-to-one onto chromatic indices `12 * partition + offset`.

/// Frequency of A:0, the lowest pitch of the scale
pub const A0_FREQUENCY: f64 = 27.5;

/// Ratio between two adjacent semitones
pub const SEMITONE_RATIO: f64 = 1.059_463_094_359_295_3;

pub const SEMITONES_PER_OCTAVE: i32 = 12;

/// A:0
pub const CHROMATIC_START: (i32, i32) = (0, 9);

/// C:8
pub const CHROMATIC_END: (i32, i32) = (8, 0);

pub const CHROMATIC_START_INDEX: i32 = 9;

pub const CHROMATIC_END_INDEX: i32 = 96;

/// Largest octave magnitude accepted from pitch text
pub const MAX_OCTAVE: i32 = 100;

/// Convert a `(partition, offset)` location to its chromatic index
pub fn location_to_index(location: (i32, i32)) -> i32 {
    SEMITONES_PER_OCTAVE * location.0 + location.1
}

/// Convert a chromatic index back to its `(partition, offset)` location
pub fn index_to_location(index: i32) -> (i32, i32) {
    (
        index.div_euclid(SEMITONES_PER_OCTAVE),
        index.rem_euclid(SEMITONES_PER_OCTAVE),
    )
}

/// True when the index lies within A:0..=C:8
pub fn is_index_in_scale(index: i32) -> bool {
    (CHROMATIC_START_INDEX..=CHROMATIC_END_INDEX).contains(&index)
}

/// Frequency in Hz of the pitch at a chromatic index
pub fn index_to_frequency(index: i32) -> f64 {
    A0_FREQUENCY * SEMITONE_RATIO.powi(index - CHROMATIC_START_INDEX)
}

pub fn location_to_frequency(location: (i32, i32)) -> f64 {
    index_to_frequency(location_to_index(location))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_index_bijection() {
        assert_eq!(location_to_index(CHROMATIC_START), CHROMATIC_START_INDEX);
        assert_eq!(location_to_index(CHROMATIC_END), CHROMATIC_END_INDEX);
        for index in 0..=CHROMATIC_END_INDEX {
            assert_eq!(location_to_index(index_to_location(index)), index);
        }
    }

    #[test]
    fn test_frequencies() {
        assert!((index_to_frequency(CHROMATIC_START_INDEX) - 27.5).abs() < 1e-9);
        // A:4 = 440 Hz
        assert!((location_to_frequency((4, 9)) - 440.0).abs() < 1e-6);
        // C:5 is about 523.25 Hz
        assert!((location_to_frequency((5, 0)) - 523.251).abs() < 1e-2);
    }

    #[test]
    fn test_scale_bounds() {
        assert!(!is_index_in_scale(8));
        assert!(is_index_in_scale(9));
        assert!(is_index_in_scale(96));
        assert!(!is_index_in_scale(97));
    }
}
