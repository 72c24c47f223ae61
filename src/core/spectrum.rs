use std::ops::{Add, AddAssign, Mul, MulAssign, Div, DivAssign, Index, IndexMut};
use crate::core::common::Float;

pub const N_WAVELENGTHS: usize = 4;
pub const WAVELENGTH_LOW: Float = 360.0;
pub const WAVELENGTH_HIGH: Float = 830.0;
pub const CIE_Y_INTEGRAL: Float = 106.856895;

/// Set once a dispersive event commits the walk to a single wavelength.
pub const LAMBDA_IS_SELECTED: u16 = 0x01;

/// Spectral values carried at the `N_WAVELENGTHS` wavelengths of a
/// `WavelengthSamples`.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct SampledSpectrum {
    pub c: [Float; N_WAVELENGTHS]
}

impl SampledSpectrum {
    pub fn new(v: Float) -> Self {
        Self { c: [v; N_WAVELENGTHS] }
    }

    pub fn from_values(c: [Float; N_WAVELENGTHS]) -> Self {
        Self { c }
    }

    pub fn zero() -> Self {
        Self::new(0.0)
    }

    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0)
    }

    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    pub fn has_infs(&self) -> bool {
        self.c.iter().any(|v| v.is_infinite())
    }

    pub fn has_negative(&self) -> bool {
        self.c.iter().any(|v| *v < 0.0)
    }

    pub fn max_component(&self) -> Float {
        self.c.iter().fold(Float::MIN, |a, b| a.max(*b))
    }

    /// Scalar used for Russian roulette decisions.
    pub fn importance(&self) -> Float {
        self.c.iter().sum::<Float>() / N_WAVELENGTHS as Float
    }

    /// Keeps only component `idx`.
    pub fn select(&self, idx: usize) -> Self {
        let mut s = Self::zero();
        s.c[idx] = self.c[idx];

        s
    }

    /// CIE XYZ of the estimate, honoring hero-wavelength selection.
    pub fn to_xyz(&self, wls: &WavelengthSamples) -> [Float; 3] {
        let mut xyz = [0.0; 3];

        for i in 0..N_WAVELENGTHS {
            if wls.lambda_selected() && i != wls.selected { continue; }
            let cmf = cie_xyz(wls.lambdas[i]);

            for j in 0..3 {
                xyz[j] += self.c[i] * cmf[j] / CIE_Y_INTEGRAL;
            }
        }

        xyz
    }
}

impl Add for SampledSpectrum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut c = self.c;
        for i in 0..N_WAVELENGTHS { c[i] += rhs.c[i]; }

        Self { c }
    }
}

impl AddAssign for SampledSpectrum {
    fn add_assign(&mut self, rhs: Self) {
        for i in 0..N_WAVELENGTHS { self.c[i] += rhs.c[i]; }
    }
}

impl Mul for SampledSpectrum {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut c = self.c;
        for i in 0..N_WAVELENGTHS { c[i] *= rhs.c[i]; }

        Self { c }
    }
}

impl MulAssign for SampledSpectrum {
    fn mul_assign(&mut self, rhs: Self) {
        for i in 0..N_WAVELENGTHS { self.c[i] *= rhs.c[i]; }
    }
}

impl Mul<Float> for SampledSpectrum {
    type Output = Self;

    fn mul(self, rhs: Float) -> Self {
        let mut c = self.c;
        for v in c.iter_mut() { *v *= rhs; }

        Self { c }
    }
}

impl MulAssign<Float> for SampledSpectrum {
    fn mul_assign(&mut self, rhs: Float) {
        for v in self.c.iter_mut() { *v *= rhs; }
    }
}

impl Div<Float> for SampledSpectrum {
    type Output = Self;

    fn div(self, rhs: Float) -> Self {
        let mut c = self.c;
        for v in c.iter_mut() { *v /= rhs; }

        Self { c }
    }
}

impl DivAssign<Float> for SampledSpectrum {
    fn div_assign(&mut self, rhs: Float) {
        for v in self.c.iter_mut() { *v /= rhs; }
    }
}

impl Index<usize> for SampledSpectrum {
    type Output = Float;

    fn index(&self, i: usize) -> &Float { &self.c[i] }
}

impl IndexMut<usize> for SampledSpectrum {
    fn index_mut(&mut self, i: usize) -> &mut Float { &mut self.c[i] }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct WavelengthSamples {
    pub lambdas : [Float; N_WAVELENGTHS],
    pub selected: usize,
    pub flags   : u16
}

impl WavelengthSamples {
    /// Stratifies the wavelengths over the visible range with a shared
    /// `offset` and picks the hero index from `u_select`. Returns the samples
    /// and the density of each wavelength.
    pub fn with_equal_offsets(offset: Float, u_select: Float) -> (Self, Float) {
        let range = WAVELENGTH_HIGH - WAVELENGTH_LOW;
        let mut lambdas = [0.0; N_WAVELENGTHS];

        for (i, l) in lambdas.iter_mut().enumerate() {
            *l = WAVELENGTH_LOW + range * (i as Float + offset) / N_WAVELENGTHS as Float;
        }

        let selected = std::cmp::min((u_select * N_WAVELENGTHS as Float) as usize, N_WAVELENGTHS - 1);
        let wls = Self { lambdas, selected, flags: 0 };

        (wls, N_WAVELENGTHS as Float / range)
    }

    pub fn lambda_selected(&self) -> bool {
        self.flags & LAMBDA_IS_SELECTED != 0
    }

    pub fn selected_lambda(&self) -> Float {
        self.lambdas[self.selected]
    }
}

/// Smooth RGB upsampling for reflectances and emitters. Grey inputs map to
/// flat spectra.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RgbSpectrum {
    pub rgb: [Float; 3]
}

impl RgbSpectrum {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { rgb: [r, g, b] }
    }

    pub fn grey(v: Float) -> Self {
        Self::new(v, v, v)
    }

    pub fn evaluate(&self, lambda: Float) -> Float {
        let [r, g, b] = self.rgb;

        if lambda < 480.0 {
            b
        } else if lambda < 510.0 {
            let t = (lambda - 480.0) / 30.0;
            (1.0 - t) * b + t * g
        } else if lambda < 570.0 {
            g
        } else if lambda < 600.0 {
            let t = (lambda - 570.0) / 30.0;
            (1.0 - t) * g + t * r
        } else {
            r
        }
    }

    pub fn sample(&self, wls: &WavelengthSamples) -> SampledSpectrum {
        let mut s = SampledSpectrum::zero();
        for i in 0..N_WAVELENGTHS { s.c[i] = self.evaluate(wls.lambdas[i]); }

        s
    }

    pub fn is_black(&self) -> bool {
        self.rgb.iter().all(|v| *v == 0.0)
    }

    pub fn luminance(&self) -> Float {
        0.212671 * self.rgb[0] + 0.715160 * self.rgb[1] + 0.072169 * self.rgb[2]
    }
}

fn piecewise_gaussian(x: Float, mu: Float, sigma1: Float, sigma2: Float) -> Float {
    let t = (x - mu) / if x < mu { sigma1 } else { sigma2 };

    (-0.5 * t * t).exp()
}

/// Multi-lobe fit of the CIE 1931 2-degree matching functions
/// (Wyman, Sloan and Shirley 2013).
pub fn cie_xyz(lambda: Float) -> [Float; 3] {
    let x = 1.056 * piecewise_gaussian(lambda, 599.8, 37.9, 31.0)
        + 0.362 * piecewise_gaussian(lambda, 442.0, 16.0, 26.7)
        - 0.065 * piecewise_gaussian(lambda, 501.1, 20.4, 26.2);
    let y = 0.821 * piecewise_gaussian(lambda, 568.8, 46.9, 40.5)
        + 0.286 * piecewise_gaussian(lambda, 530.9, 16.3, 31.1);
    let z = 1.217 * piecewise_gaussian(lambda, 437.0, 11.8, 36.0)
        + 0.681 * piecewise_gaussian(lambda, 459.0, 26.0, 13.8);

    [x, y, z]
}

pub fn xyz_to_rgb(xyz: &[Float; 3]) -> [Float; 3] {
    [
        3.240479 * xyz[0] - 1.537150 * xyz[1] - 0.498535 * xyz[2],
        -0.969256 * xyz[0] + 1.875991 * xyz[1] + 0.041556 * xyz[2],
        0.055648 * xyz[0] - 0.204043 * xyz[1] + 1.057311 * xyz[2]
    ]
}
