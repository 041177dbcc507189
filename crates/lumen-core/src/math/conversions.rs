//! Unit conversion functions
//!
//! Conversions from optical loss figures (dB) to field amplitudes and from
//! wavelength to frequency.

use crate::constants::SPEED_OF_LIGHT;

/// Convert a field-amplitude level in dB to magnitude (10^(dB/20))
pub fn db_2_magnitude(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Amplitude transmission of a propagation loss given in dB per metre
///
/// A positive `db_per_m` attenuates; the amplitude factor over `length`
/// metres is `10^(-db_per_m * length / 20)`.
pub fn propagation_loss_2_magnitude(db_per_m: f64, length: f64) -> f64 {
    db_2_magnitude(-db_per_m * length)
}

/// Vacuum wavelength (m) to frequency (Hz)
pub fn wavelength_2_frequency(wavelength: f64) -> f64 {
    SPEED_OF_LIGHT / wavelength
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_db_2_magnitude() {
        assert_relative_eq!(db_2_magnitude(-20.0), 0.1, epsilon = 1e-12);
        assert_relative_eq!(db_2_magnitude(0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(db_2_magnitude(-3.0).powi(2), 0.501_187_233_627_272_2, epsilon = 1e-12);
    }

    #[test]
    fn test_propagation_loss() {
        // 100 dB/m over 1 cm = 1 dB of amplitude loss
        let m = propagation_loss_2_magnitude(100.0, 0.01);
        assert_relative_eq!(m, db_2_magnitude(-1.0), epsilon = 1e-15);
        assert_relative_eq!(propagation_loss_2_magnitude(0.0, 5.0), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_wavelength_2_frequency() {
        let f = wavelength_2_frequency(1550e-9);
        assert_relative_eq!(f, 1.934_144_890_322_580_6e14, max_relative = 1e-12);
    }
}
