pub mod scale_step;
pub mod spelling;

pub use scale_step::{anchor_in_key, scale_position, scale_step, scale_steps_between};
pub use spelling::{respell_pitch_in_key, respell_tone_in_key};
