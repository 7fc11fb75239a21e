//! Joint solver of the leg linkage.
//!
//! Each moving joint is the intersection of two circles centered on joints
//! solved before it. The intersections are found numerically with a damped
//! least squares (Levenberg-Marquardt) iteration started from an initial
//! guess. Two circles usually cross twice, and the joint lands on whichever
//! crossing the iteration reaches from its guess. The fixed guesses do not
//! hold one crossing over a full turn, even for the canonical linkage, so
//! [`Solver::solve()`] may switch branches between nearby angles.
//! [`Solver::solve_from()`] seeds from the previous joints and stays on one.
use crate::{JointName, JointSnapshot, Lengths};
use nalgebra::{Matrix2, Point2, Vector2};
use std::f64::consts::TAU;

const MIN_DAMPING: f64 = 1e-12;

/// Solve all joint positions with the default solver.
///
/// ```
/// use jansen::{solve, Lengths};
///
/// let joints = solve(&Lengths::CANONICAL, 0.);
/// assert_eq!(joints.c, [38., 0.]);
/// assert!(joints.foot().is_some());
/// ```
pub fn solve(lengths: &Lengths, theta: f64) -> JointSnapshot {
    Solver::default().solve(lengths, theta)
}

/// Iteration budget and tolerances of the root finder.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct SolverCfg {
    /// Maximum number of iterations per joint
    pub max_iter: usize,
    /// Accepted distance error, relative to the larger radius
    pub residual_tol: f64,
    /// Initial damping factor
    pub damping: f64,
    /// The iteration stalls when the damping grows over this value
    pub max_damping: f64,
    /// Relative reduction of the squared error that stops the iteration
    pub ftol: f64,
    /// Relative step size that stops the iteration
    pub xtol: f64,
}

impl Default for SolverCfg {
    fn default() -> Self {
        Self {
            max_iter: 100,
            residual_tol: 1e-6,
            damping: 1e-3,
            max_damping: 1e12,
            ftol: 1e-12,
            xtol: 1e-12,
        }
    }
}

/// Joint solver.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Solver {
    cfg: SolverCfg,
}

impl Solver {
    /// Create a new solver with the given configuration.
    pub const fn new(cfg: SolverCfg) -> Self {
        Self { cfg }
    }

    /// The solver configuration.
    pub fn cfg(&self) -> &SolverCfg {
        &self.cfg
    }

    /// Solve all joint positions at the crank angle (radians).
    ///
    /// Every joint starts from a fixed guess placed relative to its first
    /// anchor, so the result only depends on the lengths and the angle.
    pub fn solve(&self, lengths: &Lengths, theta: f64) -> JointSnapshot {
        self.solve_seeded(lengths, theta, None)
    }

    /// Solve all joint positions, starting each joint from its position in
    /// a previous snapshot.
    ///
    /// Consecutive frames of an animation stay on the same crossing this
    /// way. Unresolved joints of `prev` fall back to the fixed guesses.
    pub fn solve_from(&self, lengths: &Lengths, theta: f64, prev: &JointSnapshot) -> JointSnapshot {
        self.solve_seeded(lengths, theta, Some(prev))
    }

    fn solve_seeded(
        &self,
        lengths: &Lengths,
        theta: f64,
        prev: Option<&JointSnapshot>,
    ) -> JointSnapshot {
        let Lengths {
            crank,
            coupler1,
            coupler2,
            coupler3,
            rocker1,
            rocker2,
            ternary1,
            offset_x,
            offset_y,
            ..
        } = *lengths;
        let seed = |name, guess| prev.and_then(|p| p.get(name)).unwrap_or(guess);
        let theta = theta.rem_euclid(TAU);
        let a = [0., 0.];
        let b = [offset_x, offset_y];
        let c = [crank * theta.cos(), crank * theta.sin()];
        let d = {
            let guess = seed(JointName::D, [c[0] + coupler1, c[1]]);
            self.joint(JointName::D, [c, b], [coupler1, coupler2], guess)
        };
        let e = d.and_then(|d| {
            let guess = seed(JointName::E, [d[0] + coupler3, d[1] - coupler3 / 2.]);
            self.joint(JointName::E, [d, b], [coupler3, rocker1], guess)
        });
        let f = d.zip(e).and_then(|(d, e)| {
            let guess = seed(JointName::F, [e[0] + rocker2, e[1] - rocker2]);
            self.joint(JointName::F, [e, d], [rocker2, ternary1], guess)
        });
        JointSnapshot { a, b, c, d, e, f }
    }

    fn joint(
        &self,
        name: JointName,
        centers: [[f64; 2]; 2],
        radii: [f64; 2],
        guess: [f64; 2],
    ) -> Option<[f64; 2]> {
        let [c1, c2] = centers;
        let [d1, d2] = radii;
        let p = self.pllp(c1, d1, c2, d2, guess);
        if p.is_none() {
            tracing::trace!(joint = %name, ?centers, ?radii, "joint unresolved");
        }
        p
    }

    /// Find a point at distance `d1` from `c1` and `d2` from `c2`, starting
    /// the iteration at `guess`.
    ///
    /// Return `None` if the iteration ends with a distance error over the
    /// tolerance, including when the circles do not cross at all.
    ///
    /// ```
    /// use jansen::Solver;
    ///
    /// let solver = Solver::default();
    /// let [x, y] = solver.pllp([0., 0.], 5., [8., 0.], 5., [4., 1.]).unwrap();
    /// assert!((x - 4.).abs() < 1e-6 && (y - 3.).abs() < 1e-6);
    /// assert!(solver.pllp([0., 0.], 1., [8., 0.], 1., [4., 1.]).is_none());
    /// ```
    pub fn pllp(
        &self,
        c1: [f64; 2],
        d1: f64,
        c2: [f64; 2],
        d2: f64,
        guess: [f64; 2],
    ) -> Option<[f64; 2]> {
        let SolverCfg { max_iter, residual_tol, damping, max_damping, ftol, xtol } = self.cfg;
        let c1 = Point2::from(c1);
        let c2 = Point2::from(c2);
        let residual = |p: &Point2<f64>| {
            Vector2::new(nalgebra::distance(p, &c1) - d1, nalgebra::distance(p, &c2) - d2)
        };
        let mut p = Point2::from(guess);
        let mut r = residual(&p);
        let mut cost = r.norm_squared() / 2.;
        let mut lambda = damping;
        for _ in 0..max_iter {
            let (u1, u2) = (p - c1, p - c2);
            let (n1, n2) = (u1.norm(), u2.norm());
            // The gradient is undefined on a center
            if !(n1 > 0. && n2 > 0. && cost.is_finite()) {
                break;
            }
            let jac = Matrix2::from_rows(&[(u1 / n1).transpose(), (u2 / n2).transpose()]);
            let grad = jac.tr_mul(&r);
            let hess = jac.tr_mul(&jac);
            let done = loop {
                let Some(inv) = (hess + Matrix2::identity() * lambda).try_inverse() else {
                    break true;
                };
                let step = -(inv * grad);
                let q = p + step;
                let rq = residual(&q);
                let cost_q = rq.norm_squared() / 2.;
                if cost_q < cost {
                    let converged = cost - cost_q <= ftol * cost
                        || step.norm() <= xtol * (q.coords.norm() + xtol);
                    (p, r, cost) = (q, rq, cost_q);
                    lambda = (lambda * 0.1).max(MIN_DAMPING);
                    break converged;
                }
                lambda *= 10.;
                if lambda > max_damping {
                    break true;
                }
            };
            if done {
                break;
            }
        }
        let tol = residual_tol * d1.max(d2);
        (r.x.abs() <= tol && r.y.abs() <= tol).then_some([p.x, p.y])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn dist(p: [f64; 2], q: [f64; 2]) -> f64 {
        (p[0] - q[0]).hypot(p[1] - q[1])
    }

    #[test]
    fn pllp_reaches_the_crossing_near_the_guess() {
        let solver = Solver::default();
        let up = solver.pllp([0., 0.], 5., [8., 0.], 5., [4., 2.]).unwrap();
        let down = solver.pllp([0., 0.], 5., [8., 0.], 5., [4., -2.]).unwrap();
        assert_abs_diff_eq!(up[0], 4., epsilon = 1e-9);
        assert_abs_diff_eq!(up[1], 3., epsilon = 1e-9);
        assert_abs_diff_eq!(down[0], 4., epsilon = 1e-9);
        assert_abs_diff_eq!(down[1], -3., epsilon = 1e-9);
    }

    #[test]
    fn pllp_tangent_circles() {
        let solver = Solver::default();
        let [x, y] = solver.pllp([0., 0.], 3., [5., 0.], 2., [3., 1.]).unwrap();
        assert_abs_diff_eq!(dist([x, y], [0., 0.]), 3., epsilon = 1e-5);
        assert_abs_diff_eq!(dist([x, y], [5., 0.]), 2., epsilon = 1e-5);
    }

    #[test]
    fn pllp_rejects_disjoint_and_nested_circles() {
        let solver = Solver::default();
        assert!(solver.pllp([0., 0.], 2., [10., 0.], 3., [2., 2.]).is_none());
        assert!(solver.pllp([0., 0.], 10., [1., 0.], 2., [2., 2.]).is_none());
    }

    #[test]
    fn pllp_guess_on_a_center() {
        let solver = Solver::default();
        assert!(solver.pllp([0., 0.], 5., [8., 0.], 5., [0., 0.]).is_none());
    }

    #[test]
    fn pllp_never_panics_on_bad_input() {
        let solver = Solver::default();
        assert!(solver.pllp([0., 0.], f64::NAN, [8., 0.], 5., [4., 1.]).is_none());
        assert!(solver.pllp([f64::INFINITY, 0.], 5., [8., 0.], 5., [4., 1.]).is_none());
        assert!(solver.pllp([0., 0.], 5., [8., 0.], 5., [f64::NAN, 1.]).is_none());
    }

    #[test]
    fn tight_budget_fails_to_converge() {
        let cfg = SolverCfg { max_iter: 1, ..SolverCfg::default() };
        let solver = Solver::new(cfg);
        assert!(solver.pllp([0., 0.], 5., [8., 0.], 5., [40., 30.]).is_none());
    }
}
