
use rand::Rng;

/// Dimensionality of every generated vector unless configured otherwise
pub const DEFAULT_DIMENSION: usize = 3;

/// Euclidean length of a vector
#[inline]
pub fn magnitude(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Cosine of the angle between two equal-length vectors.
///
/// The result is NaN when either vector has zero magnitude; callers should
/// read that as "no meaningful similarity".
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (magnitude(a) * magnitude(b))
}

/// Draw `dimension` values independently and uniformly from [-1, 1].
///
/// These vectors carry no meaning; they only have the right shape.
#[inline]
pub fn generate_vector<R: Rng + ?Sized>(rng: &mut R, dimension: usize) -> Vec<f64> {
    (0..dimension).map(|_| rng.gen_range(-1.0..=1.0)).collect()
}
