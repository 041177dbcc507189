//! Built-in component library
//!
//! Port conventions:
//! - 2-port devices: port 0 is the input side, port 1 the output side.
//! - 4-port devices: ports 0 and 1 are inputs, ports 2 and 3 outputs.
//!   Port 0 passes straight to port 2 and crosses to port 3.
//!
//! Propagation phases use the `exp(-i phi)` convention.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI};
use std::fmt;
use std::sync::Arc;

use ndarray::Array2;
use num_complex::Complex64;

use super::model::ScatteringModel;
use crate::error::Result;
use crate::math::conversions::{db_2_magnitude, propagation_loss_2_magnitude};

/// 2x2 Jones matrix, row = output polarization, column = input polarization
pub type Jones2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

fn real(m: [[f64; 2]; 2]) -> Jones2 {
    [
        [Complex64::new(m[0][0], 0.0), Complex64::new(m[0][1], 0.0)],
        [Complex64::new(m[1][0], 0.0), Complex64::new(m[1][1], 0.0)],
    ]
}

fn diag(h: Complex64, v: Complex64) -> Jones2 {
    [[h, ZERO], [ZERO, v]]
}

fn transpose(m: &Jones2) -> Jones2 {
    [[m[0][0], m[1][0]], [m[0][1], m[1][1]]]
}

/// Assemble a 2-port MSM from its forward (port 0 -> 1) and backward
/// (port 1 -> 0) Jones matrices; no reflection
pub fn two_port(forward: &Jones2, backward: &Jones2) -> Array2<Complex64> {
    let mut m = Array2::<Complex64>::zeros((4, 4));
    for p in 0..2 {
        for q in 0..2 {
            m[[2 + p, q]] = forward[p][q];
            m[[p, 2 + q]] = backward[p][q];
        }
    }
    m
}

/// Reciprocal 2-port: backward matrix is the transpose of the forward one
pub fn reciprocal_two_port(forward: &Jones2) -> Array2<Complex64> {
    two_port(forward, &transpose(forward))
}

/// Assemble a polarization-preserving, reciprocal 4-port MSM
///
/// `through[p]` couples 0<->2 and 1<->3, `cross[p]` couples 0<->3 and 1<->2,
/// for polarization `p`.
pub fn four_port(through: [Complex64; 2], cross: [Complex64; 2]) -> Array2<Complex64> {
    let mut m = Array2::<Complex64>::zeros((8, 8));
    for p in 0..2 {
        let pairs = [(0, 2, through[p]), (1, 3, through[p]), (0, 3, cross[p]), (1, 2, cross[p])];
        for (a, b, value) in pairs {
            m[[2 * b + p, 2 * a + p]] = value;
            m[[2 * a + p, 2 * b + p]] = value;
        }
    }
    m
}

/// Linear index model `n(lambda) = n0 + gradient * (lambda - lambda_c)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dispersion {
    pub gradient_h: f64,
    pub gradient_v: f64,
    pub central_wavelength: f64,
}

impl Dispersion {
    fn shift(&self, gradient: f64, wavelength: f64) -> f64 {
        gradient * (wavelength - self.central_wavelength)
    }
}

// ============================================================================
// Phase shifter / waveguide
// ============================================================================

/// Time-dependent extra phase (radians) applied by a modulated phase shifter
#[derive(Clone)]
pub struct Modulation(Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl Modulation {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn phase(&self, time: f64) -> f64 {
        (self.0)(time)
    }
}

impl fmt::Debug for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Modulation(..)")
    }
}

/// Birefringent waveguide section or phase shifter (2 ports)
///
/// Per polarization the transmission is `a * exp(-i phi)` with
/// `phi = 2 pi n(lambda) L / lambda + offset + modulation(t)`, where
/// `n(lambda) = n - gradient * (lambda - lambda_c)` and `a` follows from
/// the propagation loss in dB/m.
#[derive(Debug, Clone)]
pub struct PhaseShifter {
    n_h: f64,
    n_v: f64,
    length: f64,
    dispersion: Option<Dispersion>,
    loss_h_db_per_m: f64,
    loss_v_db_per_m: f64,
    phase_offset: f64,
    modulation: Option<Modulation>,
}

impl PhaseShifter {
    /// Waveguide of effective indices `n_h`, `n_v` and length `length` (m)
    pub fn waveguide(n_h: f64, n_v: f64, length: f64) -> Self {
        Self {
            n_h,
            n_v,
            length,
            dispersion: None,
            loss_h_db_per_m: 0.0,
            loss_v_db_per_m: 0.0,
            phase_offset: 0.0,
            modulation: None,
        }
    }

    /// Lossless, wavelength-independent shifter applying `phase` to both
    /// polarizations
    pub fn ideal(phase: f64) -> Self {
        Self::waveguide(0.0, 0.0, 0.0).with_phase_offset(phase)
    }

    pub fn with_dispersion(mut self, gradient_h: f64, gradient_v: f64, central_wavelength: f64) -> Self {
        self.dispersion = Some(Dispersion {
            gradient_h,
            gradient_v,
            central_wavelength,
        });
        self
    }

    /// Propagation loss in dB per metre for each polarization
    pub fn with_loss(mut self, loss_h_db_per_m: f64, loss_v_db_per_m: f64) -> Self {
        self.loss_h_db_per_m = loss_h_db_per_m;
        self.loss_v_db_per_m = loss_v_db_per_m;
        self
    }

    pub fn with_phase_offset(mut self, phase: f64) -> Self {
        self.phase_offset = phase;
        self
    }

    /// Add a time-dependent phase, e.g. an electro-optic drive signal
    pub fn with_modulation<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.modulation = Some(Modulation::new(f));
        self
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Accumulated phase `(phi_h, phi_v)` at time `t` and `wavelength`
    pub fn phases(&self, time: f64, wavelength: f64) -> (f64, f64) {
        let (mut n_h, mut n_v) = (self.n_h, self.n_v);
        if let Some(d) = &self.dispersion {
            n_h -= d.shift(d.gradient_h, wavelength);
            n_v -= d.shift(d.gradient_v, wavelength);
        }
        let extra = self.phase_offset + self.modulation.as_ref().map_or(0.0, |m| m.phase(time));
        let k0 = 2.0 * PI * self.length / wavelength;
        (k0 * n_h + extra, k0 * n_v + extra)
    }
}

impl ScatteringModel for PhaseShifter {
    fn port_count(&self) -> usize {
        2
    }

    fn matrix(&self, time: f64, wavelength: f64) -> Result<Array2<Complex64>> {
        let (phi_h, phi_v) = self.phases(time, wavelength);
        let a_h = propagation_loss_2_magnitude(self.loss_h_db_per_m, self.length);
        let a_v = propagation_loss_2_magnitude(self.loss_v_db_per_m, self.length);
        let t = diag(Complex64::from_polar(a_h, -phi_h), Complex64::from_polar(a_v, -phi_v));
        Ok(reciprocal_two_port(&t))
    }
}

// ============================================================================
// Splitters and couplers
// ============================================================================

/// Ideal lossless 50/50 beam splitter (4 ports)
///
/// Through paths keep their phase, cross paths pick up `-i`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BeamSplitter;

impl ScatteringModel for BeamSplitter {
    fn port_count(&self) -> usize {
        4
    }

    fn matrix(&self, _time: f64, _wavelength: f64) -> Result<Array2<Complex64>> {
        let t = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let k = Complex64::new(0.0, -FRAC_1_SQRT_2);
        Ok(four_port([t, t], [k, k]))
    }
}

/// Evanescent directional coupler (4 ports)
///
/// With coupling strength `k(lambda) = k0 + gradient * (lambda - lambda_c)`
/// the through amplitude is `alpha cos(k L)` and the cross amplitude
/// `i alpha sin(k L)`, `alpha` being the insertion loss.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalCoupler {
    coupling_h: f64,
    coupling_v: f64,
    length: f64,
    dispersion: Option<Dispersion>,
    insertion_loss_db: f64,
}

impl DirectionalCoupler {
    /// Coupling strengths in rad/m and interaction length in m
    pub fn new(coupling_h: f64, coupling_v: f64, length: f64) -> Self {
        Self {
            coupling_h,
            coupling_v,
            length,
            dispersion: None,
            insertion_loss_db: 0.0,
        }
    }

    /// Coupler with the given power coupling ratio for both polarizations
    ///
    /// `ratio` is clamped to `[0, 1]`; unit length.
    pub fn with_ratio(ratio: f64) -> Self {
        let k = ratio.clamp(0.0, 1.0).sqrt().asin();
        Self::new(k, k, 1.0)
    }

    pub fn with_dispersion(mut self, gradient_h: f64, gradient_v: f64, central_wavelength: f64) -> Self {
        self.dispersion = Some(Dispersion {
            gradient_h,
            gradient_v,
            central_wavelength,
        });
        self
    }

    pub fn with_insertion_loss(mut self, loss_db: f64) -> Self {
        self.insertion_loss_db = loss_db;
        self
    }
}

impl ScatteringModel for DirectionalCoupler {
    fn port_count(&self) -> usize {
        4
    }

    fn matrix(&self, _time: f64, wavelength: f64) -> Result<Array2<Complex64>> {
        let alpha = db_2_magnitude(-self.insertion_loss_db);
        let (mut k_h, mut k_v) = (self.coupling_h, self.coupling_v);
        if let Some(d) = &self.dispersion {
            k_h += d.shift(d.gradient_h, wavelength);
            k_v += d.shift(d.gradient_v, wavelength);
        }
        let through = [
            Complex64::new(alpha * (k_h * self.length).cos(), 0.0),
            Complex64::new(alpha * (k_v * self.length).cos(), 0.0),
        ];
        let cross = [
            Complex64::new(0.0, alpha * (k_h * self.length).sin()),
            Complex64::new(0.0, alpha * (k_v * self.length).sin()),
        ];
        Ok(four_port(through, cross))
    }
}

/// Polarization beam splitter (4 ports)
///
/// Ideally H at port 0 goes to port 2 and V at port 0 to port 3; port 1
/// sends H to port 3 and V to port 2. A finite extinction ratio leaks an
/// amplitude `e` into the orthogonal polarization of the same output.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarizationBeamSplitter {
    extinction_ratio_db: Option<f64>,
    insertion_loss_db: f64,
    phase_t: f64,
    phase_e: f64,
}

impl Default for PolarizationBeamSplitter {
    fn default() -> Self {
        Self::ideal()
    }
}

impl PolarizationBeamSplitter {
    /// Infinite extinction ratio, no loss
    pub fn ideal() -> Self {
        Self {
            extinction_ratio_db: None,
            insertion_loss_db: 0.0,
            phase_t: 0.0,
            phase_e: FRAC_PI_2,
        }
    }

    /// Finite extinction ratio in dB
    pub fn new(extinction_ratio_db: f64) -> Self {
        Self {
            extinction_ratio_db: Some(extinction_ratio_db),
            ..Self::ideal()
        }
    }

    pub fn with_insertion_loss(mut self, loss_db: f64) -> Self {
        self.insertion_loss_db = loss_db;
        self
    }

    /// Phases of the transmitted and leaked amplitudes
    pub fn with_phases(mut self, phase_t: f64, phase_e: f64) -> Self {
        self.phase_t = phase_t;
        self.phase_e = phase_e;
        self
    }

    /// Magnitudes `(|t|, |e|)` with `|t|^2 + |e|^2 = alpha^2`
    fn magnitudes(&self) -> (f64, f64) {
        let alpha = db_2_magnitude(-self.insertion_loss_db);
        match self.extinction_ratio_db {
            None => (alpha, 0.0),
            Some(er) => {
                let ratio = db_2_magnitude(er);
                let e = alpha / (ratio * ratio + 1.0).sqrt();
                ((alpha * alpha - e * e).max(0.0).sqrt(), e)
            }
        }
    }
}

impl ScatteringModel for PolarizationBeamSplitter {
    fn port_count(&self) -> usize {
        4
    }

    fn matrix(&self, _time: f64, _wavelength: f64) -> Result<Array2<Complex64>> {
        let (mag_t, mag_e) = self.magnitudes();
        let t = Complex64::from_polar(mag_t, self.phase_t);
        let e = Complex64::from_polar(mag_e, self.phase_e);

        // (row, col) pairs of the upper triangle; the matrix is symmetric
        let entries = [(0, 4, t), (0, 5, e), (1, 6, e), (1, 7, t), (2, 6, t), (2, 7, e), (3, 4, e), (3, 5, t)];
        let mut m = Array2::<Complex64>::zeros((8, 8));
        for (r, c, value) in entries {
            m[[r, c]] = value;
            m[[c, r]] = value;
        }
        Ok(m)
    }
}

// ============================================================================
// Polarization optics (2 ports)
// ============================================================================

/// Linear polarizer with transmission axis at `angle` (rad) from horizontal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polarizer {
    angle: f64,
}

impl Polarizer {
    pub fn new(angle: f64) -> Self {
        Self { angle }
    }

    pub fn horizontal() -> Self {
        Self::new(0.0)
    }

    pub fn vertical() -> Self {
        Self::new(FRAC_PI_2)
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }
}

impl ScatteringModel for Polarizer {
    fn port_count(&self) -> usize {
        2
    }

    fn matrix(&self, _time: f64, _wavelength: f64) -> Result<Array2<Complex64>> {
        let (s, c) = self.angle.sin_cos();
        Ok(reciprocal_two_port(&real([[c * c, s * c], [s * c, s * s]])))
    }
}

/// Half-wave plate with fast axis at `angle` (rad)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfWavePlate {
    angle: f64,
}

impl HalfWavePlate {
    pub fn new(angle: f64) -> Self {
        Self { angle }
    }
}

impl ScatteringModel for HalfWavePlate {
    fn port_count(&self) -> usize {
        2
    }

    fn matrix(&self, _time: f64, _wavelength: f64) -> Result<Array2<Complex64>> {
        let (s, c) = (2.0 * self.angle).sin_cos();
        Ok(reciprocal_two_port(&real([[c, s], [s, -c]])))
    }
}

/// Orientation of a quarter-wave plate's fast axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FastAxis {
    #[default]
    Horizontal,
    Vertical,
}

/// Quarter-wave plate: the slow polarization is retarded by a quarter wave
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuarterWavePlate {
    fast_axis: FastAxis,
}

impl QuarterWavePlate {
    pub fn new(fast_axis: FastAxis) -> Self {
        Self { fast_axis }
    }
}

impl ScatteringModel for QuarterWavePlate {
    fn port_count(&self) -> usize {
        2
    }

    fn matrix(&self, _time: f64, _wavelength: f64) -> Result<Array2<Complex64>> {
        let minus_i = Complex64::new(0.0, -1.0);
        let t = match self.fast_axis {
            FastAxis::Horizontal => diag(ONE, minus_i),
            FastAxis::Vertical => diag(minus_i, ONE),
        };
        Ok(reciprocal_two_port(&t))
    }
}

/// Fixed 90 degree mode converter: swaps H and V
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolarizationRotator;

impl ScatteringModel for PolarizationRotator {
    fn port_count(&self) -> usize {
        2
    }

    fn matrix(&self, _time: f64, _wavelength: f64) -> Result<Array2<Complex64>> {
        Ok(reciprocal_two_port(&real([[0.0, 1.0], [1.0, 0.0]])))
    }
}

/// Faraday rotator: rotates the polarization by `angle` (rad)
///
/// The rotation sense is fixed in the lab frame, so light travelling
/// backwards is rotated the same way and the device is non-reciprocal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaradayRotator {
    angle: f64,
}

impl FaradayRotator {
    pub fn new(angle: f64) -> Self {
        Self { angle }
    }
}

impl ScatteringModel for FaradayRotator {
    fn port_count(&self) -> usize {
        2
    }

    fn matrix(&self, _time: f64, _wavelength: f64) -> Result<Array2<Complex64>> {
        let (s, c) = self.angle.sin_cos();
        let rotation = real([[c, -s], [s, c]]);
        Ok(two_port(&rotation, &rotation))
    }
}

/// Lumped, balanced Mach-Zehnder interferometer reduced to a 2-port
///
/// The arm imbalance `phi = 2 pi n(lambda) L / lambda` sets the bar
/// transmission `i exp(i phi/2) cos(phi/2)` per polarization, with
/// `n(lambda) = n + gradient * (lambda - lambda_c)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MachZehnderInterferometer {
    n_h: f64,
    n_v: f64,
    arm_length: f64,
    dispersion: Option<Dispersion>,
}

impl MachZehnderInterferometer {
    pub fn new(n_h: f64, n_v: f64, arm_length: f64) -> Self {
        Self {
            n_h,
            n_v,
            arm_length,
            dispersion: None,
        }
    }

    pub fn with_dispersion(mut self, gradient_h: f64, gradient_v: f64, central_wavelength: f64) -> Self {
        self.dispersion = Some(Dispersion {
            gradient_h,
            gradient_v,
            central_wavelength,
        });
        self
    }

    /// Arm phase imbalance `(phi_h, phi_v)`
    pub fn phases(&self, wavelength: f64) -> (f64, f64) {
        let (mut n_h, mut n_v) = (self.n_h, self.n_v);
        if let Some(d) = &self.dispersion {
            n_h += d.shift(d.gradient_h, wavelength);
            n_v += d.shift(d.gradient_v, wavelength);
        }
        let k0 = 2.0 * PI * self.arm_length / wavelength;
        (k0 * n_h, k0 * n_v)
    }
}

impl ScatteringModel for MachZehnderInterferometer {
    fn port_count(&self) -> usize {
        2
    }

    fn matrix(&self, _time: f64, wavelength: f64) -> Result<Array2<Complex64>> {
        let (phi_h, phi_v) = self.phases(wavelength);
        let bar = |phi: f64| Complex64::i() * Complex64::from_polar((phi / 2.0).cos(), phi / 2.0);
        Ok(reciprocal_two_port(&diag(bar(phi_h), bar(phi_v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::properties::{is_lossless, is_passive, is_reciprocal};
    use approx::assert_relative_eq;

    const WL: f64 = 1550e-9;

    fn eval(model: &dyn ScatteringModel) -> Array2<Complex64> {
        model.matrix(0.0, WL).unwrap()
    }

    #[test]
    fn test_dimensions() {
        let models: Vec<Box<dyn ScatteringModel>> = vec![
            Box::new(PhaseShifter::waveguide(2.4, 2.3, 1e-3)),
            Box::new(BeamSplitter),
            Box::new(DirectionalCoupler::with_ratio(0.3)),
            Box::new(PolarizationBeamSplitter::new(25.0)),
            Box::new(Polarizer::new(0.4)),
            Box::new(HalfWavePlate::new(0.2)),
            Box::new(QuarterWavePlate::new(FastAxis::Vertical)),
            Box::new(PolarizationRotator),
            Box::new(FaradayRotator::new(0.7)),
            Box::new(MachZehnderInterferometer::new(2.0, 2.1, 5e-6)),
        ];
        for model in models {
            let m = eval(model.as_ref());
            assert_eq!(m.dim(), (2 * model.port_count(), 2 * model.port_count()));
        }
    }

    #[test]
    fn test_beam_splitter_unitary() {
        let m = eval(&BeamSplitter);
        assert!(is_lossless(&m, None));
        assert!(is_reciprocal(&m, None));
        assert_relative_eq!(m[[4, 0]].re, FRAC_1_SQRT_2, epsilon = 1e-15);
        assert_relative_eq!(m[[6, 0]].im, -FRAC_1_SQRT_2, epsilon = 1e-15);
    }

    #[test]
    fn test_ideal_phase_shifter() {
        let m = eval(&PhaseShifter::ideal(FRAC_PI_2));
        assert_relative_eq!(m[[2, 0]].im, -1.0, epsilon = 1e-15);
        assert_relative_eq!(m[[3, 1]].im, -1.0, epsilon = 1e-15);
        assert_relative_eq!(m[[0, 2]].im, -1.0, epsilon = 1e-15);
        assert!(is_lossless(&m, None));
    }

    #[test]
    fn test_waveguide_phase_and_loss() {
        // 2 pi n L / lambda with n L = lambda / 4 gives a quarter wave
        let length = WL / (4.0 * 2.0);
        let ps = PhaseShifter::waveguide(2.0, 2.0, length).with_loss(1000.0, 0.0);
        let m = eval(&ps);
        let expected_amp = db_2_magnitude(-1000.0 * length);
        assert_relative_eq!(m[[2, 0]].norm(), expected_amp, epsilon = 1e-12);
        assert_relative_eq!(m[[2, 0]].arg(), -FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(m[[3, 1]].norm(), 1.0, epsilon = 1e-12);
        assert!(is_passive(&m, None));
        assert!(!is_lossless(&m, None));
    }

    #[test]
    fn test_phase_shifter_dispersion_and_modulation() {
        let ps = PhaseShifter::waveguide(2.0, 2.0, 1e-4)
            .with_dispersion(1e5, 0.0, WL)
            .with_modulation(|t| 10.0 * t);
        let (h0, v0) = ps.phases(0.0, WL);
        assert_relative_eq!(h0, v0, epsilon = 1e-9);
        let (h1, _) = ps.phases(0.5, WL);
        assert_relative_eq!(h1 - h0, 5.0, epsilon = 1e-9);

        let (h_long, v_long) = ps.phases(0.0, WL + 1e-9);
        let k0 = 2.0 * PI * 1e-4 / (WL + 1e-9);
        assert_relative_eq!(v_long - h_long, k0 * 1e5 * 1e-9, epsilon = 1e-9);
    }

    #[test]
    fn test_coupler_ratio() {
        let m = eval(&DirectionalCoupler::with_ratio(0.25));
        assert_relative_eq!(m[[6, 0]].norm_sqr(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(m[[4, 0]].norm_sqr(), 0.75, epsilon = 1e-12);
        assert!(is_lossless(&m, Some(1e-10)));
    }

    #[test]
    fn test_coupler_insertion_loss() {
        let m = eval(&DirectionalCoupler::new(1.0, 2.0, 0.5).with_insertion_loss(3.0));
        let total = m[[4, 0]].norm_sqr() + m[[6, 0]].norm_sqr();
        assert_relative_eq!(total, db_2_magnitude(-3.0).powi(2), epsilon = 1e-12);
        assert!(is_passive(&m, None));
    }

    #[test]
    fn test_polarizer_projects() {
        let m = eval(&Polarizer::vertical());
        assert_relative_eq!(m[[3, 1]].re, 1.0, epsilon = 1e-15);
        assert_relative_eq!(m[[2, 0]].norm(), 0.0, epsilon = 1e-15);
        assert!(is_passive(&m, None));
    }

    #[test]
    fn test_half_wave_plate_rotates_linear_light() {
        // Fast axis at 22.5 degrees turns H into diagonal
        let m = eval(&HalfWavePlate::new(PI / 8.0));
        assert_relative_eq!(m[[2, 0]].re, FRAC_1_SQRT_2, epsilon = 1e-15);
        assert_relative_eq!(m[[3, 0]].re, FRAC_1_SQRT_2, epsilon = 1e-15);
        assert!(is_lossless(&m, None));
    }

    #[test]
    fn test_faraday_rotator_is_non_reciprocal() {
        let m = eval(&FaradayRotator::new(PI / 4.0));
        assert!(is_lossless(&m, None));
        assert!(!is_reciprocal(&m, None));
        assert!(is_reciprocal(&eval(&FaradayRotator::new(0.0)), None));
    }

    #[test]
    fn test_polarization_beam_splitter() {
        let ideal = eval(&PolarizationBeamSplitter::ideal());
        assert!(is_lossless(&ideal, None));
        assert_relative_eq!(ideal[[4, 0]].re, 1.0, epsilon = 1e-15);
        assert_relative_eq!(ideal[[7, 1]].re, 1.0, epsilon = 1e-15);

        let leaky = eval(&PolarizationBeamSplitter::new(20.0));
        assert!(is_lossless(&leaky, Some(1e-10)));
        let leak = leaky[[5, 0]].norm_sqr() / leaky[[4, 0]].norm_sqr();
        assert_relative_eq!(leak, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_mach_zehnder_transmission() {
        let mzi = MachZehnderInterferometer::new(1.0, 1.0, WL / 2.0);
        // phi = pi: the bar port is dark
        let m = eval(&mzi);
        assert_relative_eq!(m[[2, 0]].norm(), 0.0, epsilon = 1e-12);

        let m = eval(&MachZehnderInterferometer::new(1.0, 1.0, WL));
        assert_relative_eq!(m[[2, 0]].norm(), 1.0, epsilon = 1e-12);
        assert!(is_reciprocal(&m, None));
    }
}
