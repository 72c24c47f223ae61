use crate::core::common::{Float, PI, INV_PI, INV4_PI, clamp};
use crate::core::geometry::vector::Vector3f;
use crate::core::geometry::point::Point2f;

/// Piecewise-constant distribution over `func.len()` buckets.
#[derive(Debug, Clone, Default)]
pub struct Distribution1D {
    pub func        : Vec<Float>,
    pub cdf         : Vec<Float>,
    pub func_int    : Float
}

impl Distribution1D {
    pub fn new(func: Vec<Float>) -> Self {
        let n = func.len();
        let mut cdf = vec![0.0; n + 1];

        // Compute integral of step function
        for i in 1..n + 1 {
            cdf[i] = cdf[i - 1] + func[i - 1] / n as Float;
        }

        // Transform step function integral into CDF
        let func_int = cdf[n];

        if func_int == 0.0 {
            for (i, c) in cdf.iter_mut().enumerate().skip(1) { *c = i as Float / n as Float; }
        } else {
            for c in cdf.iter_mut().skip(1) { *c /= func_int; }
        }

        Self { func, cdf, func_int }
    }

    pub fn count(&self) -> usize { self.func.len() }

    /// Picks a bucket. Returns its index, its probability and `u` remapped
    /// to [0, 1) inside the bucket.
    pub fn sample_discrete(&self, u: Float) -> (usize, Float, Float) {
        let offset = find_interval(self.cdf.len(), |i| self.cdf[i] <= u);
        let pdf = self.discrete_pdf(offset);
        let width = self.cdf[offset + 1] - self.cdf[offset];
        let remapped = if width > 0.0 { (u - self.cdf[offset]) / width } else { 0.0 };

        (offset, pdf, clamp(remapped, 0.0, 1.0))
    }

    pub fn discrete_pdf(&self, index: usize) -> Float {
        if self.func_int == 0.0 || index >= self.count() { return 0.0; }

        self.func[index] / (self.func_int * self.count() as Float)
    }
}

/// Largest index `i` in `[0, size - 2]` with `pred(i)` true, assuming `pred`
/// is true then false over the range.
pub fn find_interval<F: Fn(usize) -> bool>(size: usize, pred: F) -> usize {
    let mut first = 0;
    let mut len = size;

    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    clamp(first as isize - 1, 0, size as isize - 2) as usize
}

pub fn concentric_sample_disk(u: &[Float; 2]) -> Point2f {
    // Map uniform random numbers to [-1, 1]^2
    let ux = 2.0 * u[0] - 1.0;
    let uy = 2.0 * u[1] - 1.0;

    // Handle degeneracy at the origin
    if ux == 0.0 && uy == 0.0 {
        return Point2f::new(0.0, 0.0);
    }

    let (r, theta) = if ux.abs() > uy.abs() {
        (ux, PI / 4.0 * (uy / ux))
    } else {
        (uy, PI / 2.0 - PI / 4.0 * (ux / uy))
    };

    Point2f::new(r * theta.cos(), r * theta.sin())
}

pub fn cosine_sample_hemisphere(u: &[Float; 2]) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = ((0.0 as Float).max(1.0 - d.x * d.x - d.y * d.y)).sqrt();

    Vector3f::new(d.x, d.y, z)
}

pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

pub fn uniform_sample_sphere(u: &[Float; 2]) -> Vector3f {
    let z = 1.0 - 2.0 * u[0];
    let r = ((1.0 - z * z).max(0.0)).sqrt();
    let phi = 2.0 * PI * u[1];

    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

pub fn uniform_sphere_pdf() -> Float { INV4_PI }
