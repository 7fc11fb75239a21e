/// Millimeters per centimeter, the unit of the gait metrics.
pub const MM_PER_CM: f64 = 10.;

/// Convert a position from millimeters to centimeters.
pub fn to_cm([x, y]: [f64; 2]) -> [f64; 2] {
    [x / MM_PER_CM, y / MM_PER_CM]
}

// Unresolved samples are skipped, not counted as zero.
fn max_by<F>(samples: &[Option<[f64; 2]>], f: F) -> Option<f64>
where
    F: Fn([f64; 2]) -> f64,
{
    let defined = samples.iter().flatten().copied();
    defined.clone().nth(1)?;
    Some(defined.map(f).fold(f64::NEG_INFINITY, f64::max))
}

/// Step length in centimeters: the horizontal extent of the resolved
/// samples.
///
/// Return `None` if fewer than two samples are resolved.
///
/// ```
/// use jansen::step_length;
///
/// let samples = [Some([10., 0.]), None, Some([-20., 5.])];
/// assert_eq!(step_length(&samples), Some(3.));
/// assert_eq!(step_length(&samples[..2]), None);
/// ```
pub fn step_length(samples: &[Option<[f64; 2]>]) -> Option<f64> {
    let max = max_by(samples, |[x, _]| x)?;
    let neg_min = max_by(samples, |[x, _]| -x)?;
    Some((max + neg_min) / MM_PER_CM)
}

/// Step height in centimeters: the highest resolved sample.
///
/// Return `None` if fewer than two samples are resolved.
pub fn step_height(samples: &[Option<[f64; 2]>]) -> Option<f64> {
    max_by(samples, |[_, y]| y).map(|y| y / MM_PER_CM)
}

/// Gait metrics of a foot trajectory.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Gait {
    /// Step length in centimeters
    pub step_length: Option<f64>,
    /// Step height in centimeters
    pub step_height: Option<f64>,
}

impl Gait {
    /// Measure the gait from the samples.
    pub fn from_samples(samples: &[Option<[f64; 2]>]) -> Self {
        Self { step_length: step_length(samples), step_height: step_height(samples) }
    }

    /// Return true if both metrics are defined.
    pub fn is_defined(&self) -> bool {
        self.step_length.is_some() && self.step_height.is_some()
    }
}
