//! Jansen is a kinematic solver for the Theo Jansen eight-bar leg linkage.
//!
//! A [`Linkage`] holds the link lengths and a uniform scale factor. For a
//! crank angle, the [`Solver`] locates every joint by chaining circle-circle
//! intersections, each one found by an iterative least squares root finder.
//! Sweeping the crank over a full turn gives the foot [`Trajectory`], from
//! which the [`Gait`] metrics are measured.
//!
//! ```
//! use jansen::Linkage;
//!
//! let linkage = Linkage::canonical();
//! let joints = linkage.solve(0.);
//! assert!(joints.is_complete());
//! let gait = linkage.sample_trajectory(360).gait();
//! assert!(gait.step_length.is_some());
//! ```
//!
//! Joints that cannot be resolved are not errors, they are reported as
//! `None` and skipped by the metrics.
#![cfg_attr(doc_cfg, feature(doc_cfg))]
#![warn(missing_docs)]
pub use crate::{gait::*, joint::*, linkage::*, solver::*, trajectory::*};

#[cfg(feature = "csv")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "csv")))]
pub mod csv;
mod gait;
mod joint;
mod linkage;
#[cfg(feature = "plot")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "plot")))]
pub mod plot;
mod solver;
#[cfg(test)]
mod tests;
mod trajectory;
