use crate::{Gait, JointSnapshot, Lengths, Solver};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::f64::consts::TAU;

/// Default number of samples per revolution.
pub const DEFAULT_RES: usize = 360;

/// Evenly spaced crank angles over one revolution, `0` included and `TAU`
/// excluded.
///
/// ```
/// let t = jansen::angles(4).collect::<Vec<_>>();
/// assert_eq!(t.len(), 4);
/// assert_eq!(t[0], 0.);
/// assert_eq!(t[2], std::f64::consts::PI);
/// ```
pub fn angles(res: usize) -> impl ExactSizeIterator<Item = f64> + Clone {
    let step = TAU / res as f64;
    (0..res).map(move |n| n as f64 * step)
}

/// Foot positions over one crank revolution, in increasing angle order.
///
/// Unresolved samples are `None` and keep their place, so the index of a
/// sample always maps to its angle by [`angles()`].
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    samples: Vec<Option<[f64; 2]>>,
}

impl From<Vec<Option<[f64; 2]>>> for Trajectory {
    fn from(samples: Vec<Option<[f64; 2]>>) -> Self {
        Self { samples }
    }
}

impl Trajectory {
    /// Sample the foot trajectory with the default solver.
    ///
    /// ```
    /// use jansen::{Lengths, Trajectory};
    ///
    /// let path = Trajectory::sample(&Lengths::CANONICAL, 360);
    /// assert_eq!(path.len(), 360);
    /// assert_eq!(path.gaps(), 0);
    /// ```
    pub fn sample(lengths: &Lengths, res: usize) -> Self {
        Solver::default().sample(lengths, res)
    }

    /// The samples.
    pub fn samples(&self) -> &[Option<[f64; 2]>] {
        &self.samples
    }

    /// Consume and return the samples.
    pub fn into_samples(self) -> Vec<Option<[f64; 2]>> {
        self.samples
    }

    /// Number of samples, resolved or not.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Return true if there is no sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate over the samples with their crank angles.
    pub fn iter(&self) -> impl Iterator<Item = (f64, Option<[f64; 2]>)> + '_ {
        angles(self.len()).zip(self.samples.iter().copied())
    }

    /// Iterate over the resolved samples.
    pub fn defined(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.samples.iter().flatten().copied()
    }

    /// Number of unresolved samples.
    pub fn gaps(&self) -> usize {
        self.samples.iter().filter(|p| p.is_none()).count()
    }

    /// Split the curve at the unresolved samples.
    ///
    /// Each run of consecutive resolved samples is a separate segment, for
    /// drawing the curve with gaps.
    pub fn segments(&self) -> Vec<Vec<[f64; 2]>> {
        self.samples
            .split(Option::is_none)
            .filter(|s| !s.is_empty())
            .map(|s| s.iter().flatten().copied().collect())
            .collect()
    }

    /// Step length and step height of the trajectory.
    pub fn gait(&self) -> Gait {
        Gait::from_samples(&self.samples)
    }
}

impl Solver {
    /// Sample the foot trajectory over one crank revolution.
    ///
    /// Every sample is solved independently from the fixed guesses. A
    /// failed sample is recorded as `None` and the sweep goes on.
    ///
    /// Neighboring samples may land on different crossings of a circle pair,
    /// so the drawn curve can jump between two branches. The canonical
    /// linkage jumps by up to 89 mm at scale 1. Use
    /// [`Solver::sample_continuous()`] for a curve on a single branch.
    pub fn sample(&self, lengths: &Lengths, res: usize) -> Trajectory {
        #[cfg(feature = "rayon")]
        let iter = (0..res).into_par_iter().map(|n| n as f64 * (TAU / res as f64));
        #[cfg(not(feature = "rayon"))]
        let iter = angles(res);
        let samples = iter
            .map(|t| self.solve(lengths, t).foot())
            .collect::<Vec<_>>();
        log_sweep(&samples);
        Trajectory { samples }
    }

    /// Sample the foot trajectory over one crank revolution, starting each
    /// sample from the joints of the previous one.
    ///
    /// The curve follows a single crossing of every circle pair as long as
    /// the joints stay resolved, see [`Solver::solve_from()`].
    pub fn sample_continuous(&self, lengths: &Lengths, res: usize) -> Trajectory {
        let mut prev: Option<JointSnapshot> = None;
        let samples = angles(res)
            .map(|t| {
                let joints = match &prev {
                    Some(prev) => self.solve_from(lengths, t, prev),
                    None => self.solve(lengths, t),
                };
                prev = Some(joints);
                joints.foot()
            })
            .collect::<Vec<_>>();
        log_sweep(&samples);
        Trajectory { samples }
    }
}

fn log_sweep(samples: &[Option<[f64; 2]>]) {
    let gaps = samples.iter().filter(|p| p.is_none()).count();
    tracing::debug!(res = samples.len(), gaps, "trajectory sampled");
}
