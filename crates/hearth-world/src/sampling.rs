//! Distribution samplers over the deterministic RNG.
//!
//! Three samplers cover everything the environment and the spawner
//! need: Box–Muller normals, log-Gaussian multipliers, and
//! Marsaglia–Tsang gamma draws. All of them consume uniforms from the
//! caller's [`DeterministicRng`], so draws are reproducible and the
//! run's single RNG stream stays intact.

use crate::rng::DeterministicRng;

/// Smallest value the first Box–Muller uniform is clamped to, keeping
/// `ln(u1)` finite.
const UNIFORM_FLOOR: f64 = 1e-12;

/// Draw a standard normal via Box–Muller.
pub fn standard_normal(rng: &mut DeterministicRng) -> f64 {
    let u1 = rng.next().max(UNIFORM_FLOOR);
    let u2 = rng.next();
    (-2.0 * u1.ln()).sqrt() * (2.0 * core::f64::consts::PI * u2).cos()
}

/// Draw a normal with the given mean and standard deviation.
pub fn normal(rng: &mut DeterministicRng, mean: f64, std: f64) -> f64 {
    mean + std * standard_normal(rng)
}

/// Draw a log-Gaussian value: `exp(mean + sqrt(variance) * z)`.
///
/// Negative variances are treated as zero (a degenerate point mass at
/// `exp(mean)`), though a draw is still consumed to keep the stream
/// aligned.
pub fn log_gaussian(rng: &mut DeterministicRng, mean: f64, variance: f64) -> f64 {
    let z = standard_normal(rng);
    (mean + variance.max(0.0).sqrt() * z).exp()
}

/// Draw from a gamma distribution via Marsaglia–Tsang.
///
/// For `shape < 1` the sampler recurses on `shape + 1` and multiplies by
/// `u^(1/shape)`. Non-positive shapes yield 0.0 (degenerate), and
/// non-positive scales simply scale the draw as given.
pub fn gamma(rng: &mut DeterministicRng, shape: f64, scale: f64) -> f64 {
    if shape <= 0.0 {
        return 0.0;
    }
    if shape < 1.0 {
        let u = rng.next();
        return gamma(rng, shape + 1.0, scale) * u.powf(1.0 / shape);
    }

    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    loop {
        let x = standard_normal(rng);
        let v = (1.0 + c * x).powi(3);
        if v <= 0.0 {
            continue;
        }
        let u = rng.next();
        if u < 1.0 - 0.0331 * x.powi(4) {
            return d * v * scale;
        }
        if u.ln() < 0.5 * x * x + d * (1.0 - v + v.ln()) {
            return d * v * scale;
        }
    }
}
