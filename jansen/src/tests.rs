use crate::*;
use approx::{assert_abs_diff_eq, assert_relative_eq};
use std::f64::consts::TAU;

fn dist(p: [f64; 2], q: [f64; 2]) -> f64 {
    (p[0] - q[0]).hypot(p[1] - q[1])
}

fn assert_closed(joints: &JointSnapshot, lengths: &Lengths) {
    for (p, q, id) in LINKS {
        let (Some(p), Some(q)) = (joints.get(p), joints.get(q)) else {
            panic!("unresolved bar {id}: {joints:?}");
        };
        assert_relative_eq!(dist(p, q), lengths.get(id), max_relative = 1e-4);
    }
}

fn assert_point_eq(p: [f64; 2], q: [f64; 2], epsilon: f64) {
    assert_abs_diff_eq!(p[0], q[0], epsilon = epsilon);
    assert_abs_diff_eq!(p[1], q[1], epsilon = epsilon);
}

fn assert_snapshot_eq(lhs: &JointSnapshot, rhs: &JointSnapshot, epsilon: f64) {
    for ((name, p), (_, q)) in lhs.iter().zip(rhs.iter()) {
        match (p, q) {
            (Some(p), Some(q)) => assert_point_eq(p, q, epsilon),
            (None, None) => (),
            _ => panic!("joint {name} differs: {p:?} vs {q:?}"),
        }
    }
}

#[test]
fn canonical_mechanism_closes() {
    let lengths = Linkage::canonical().scaled_lengths();
    let joints = solve(&lengths, 0.);
    assert!(joints.is_complete());
    assert_eq!(joints.a, [0., 0.]);
    assert_eq!(joints.b, [7.8, 25.]);
    assert_eq!(joints.c, [38., 0.]);
    assert_closed(&joints, &lengths);
    assert_eq!(joints.bars().count(), LINKS.len());
}

#[test]
fn canonical_mechanism_closes_at_every_sample() {
    let lengths = Lengths::CANONICAL;
    for t in angles(72) {
        assert_closed(&solve(&lengths, t), &lengths);
    }
}

#[test]
fn regression_baseline() {
    let joints = Linkage::canonical().solve(0.);
    assert_point_eq(joints.d.unwrap(), [43.64435, 41.11437], 1e-4);
    assert_point_eq(joints.e.unwrap(), [59.63456, 4.34043], 1e-4);
    assert_point_eq(joints.f.unwrap(), [80.20706, 37.94299], 1e-4);
    // Default linkage at scale 5
    let joints = Linkage::default().solve(0.);
    assert_point_eq(joints.f.unwrap(), [401.03532, 189.71495], 1e-4);
}

#[test]
fn periodic_in_crank_angle() {
    let lengths = Lengths::CANONICAL;
    for t in angles(36) {
        let lhs = solve(&lengths, t);
        assert_snapshot_eq(&lhs, &solve(&lengths, t + TAU), 1e-9);
        assert_snapshot_eq(&lhs, &solve(&lengths, t - TAU), 1e-9);
    }
}

#[test]
fn scale_invariance() {
    for k in [0.5, 2., 5., 7.3] {
        let mut scaled = Linkage::canonical();
        scaled.set_scale(k).unwrap();
        let stretched = Linkage::new(Lengths::CANONICAL.scaled(k), 1.).unwrap();
        let unit = Linkage::canonical();
        for t in angles(24) {
            let lhs = scaled.solve(t);
            // Same scaled lengths, same snapshot
            assert_eq!(lhs, stretched.solve(t));
            // Uniform scale of the unit linkage
            let rhs = unit.solve(t);
            for ((_, p), (_, q)) in lhs.iter().zip(rhs.iter()) {
                let (p, q) = (p.unwrap(), q.unwrap());
                assert_relative_eq!(p[0], k * q[0], epsilon = 1e-9 * k, max_relative = 1e-9);
                assert_relative_eq!(p[1], k * q[1], epsilon = 1e-9 * k, max_relative = 1e-9);
            }
        }
    }
}

#[test]
fn sampling_is_deterministic() {
    let linkage = Linkage::default();
    let lhs = linkage.sample_trajectory(DEFAULT_RES);
    let rhs = linkage.sample_trajectory(DEFAULT_RES);
    assert_eq!(lhs.len(), DEFAULT_RES);
    assert_eq!(lhs, rhs);
}

#[test]
fn sample_matches_solve() {
    let lengths = Lengths::CANONICAL;
    let path = Trajectory::sample(&lengths, 90);
    for (t, p) in path.iter() {
        assert_eq!(p, solve(&lengths, t).foot());
    }
    assert!(Trajectory::sample(&lengths, 0).is_empty());
}

#[test]
fn canonical_gait() {
    let path = Linkage::canonical().sample_trajectory(DEFAULT_RES);
    assert_eq!(path.gaps(), 0);
    let gait = path.gait();
    assert!(gait.is_defined());
    assert_abs_diff_eq!(gait.step_length.unwrap(), 8.573, epsilon = 1e-3);
    assert_abs_diff_eq!(gait.step_height.unwrap(), 6.347, epsilon = 1e-3);
}

#[test]
fn unreachable_crank_resolves_nothing() {
    // The crank tip is always farther from B than both couplers can reach
    let mut linkage = Linkage::canonical();
    linkage.set_length(LinkId::Crank, 200.).unwrap();
    let joints = linkage.solve(0.);
    assert_eq!((joints.d, joints.e, joints.f), (None, None, None));
    assert_eq!(joints.c, [200., 0.]);
    assert_eq!(joints.bars().count(), 1);
    let path = linkage.sample_trajectory(DEFAULT_RES);
    assert_eq!(path.len(), DEFAULT_RES);
    assert_eq!(path.gaps(), DEFAULT_RES);
    assert_eq!(path.gait(), Gait { step_length: None, step_height: None });
}

#[test]
fn unreachable_foot_keeps_upstream_joints() {
    let mut linkage = Linkage::canonical();
    linkage.set_length(LinkId::Ternary1, 200.).unwrap();
    let joints = linkage.solve(0.);
    assert!(joints.d.is_some() && joints.e.is_some());
    assert_eq!(joints.foot(), None);
    assert!(!joints.is_complete());
    assert_eq!(joints.iter().count(), 6);
    assert!(linkage.sample_trajectory(60).defined().next().is_none());
}

#[test]
fn partially_feasible_sweep_skips_gaps() {
    // A long crank pulls coupler 1 out of reach over part of the turn
    let mut linkage = Linkage::canonical();
    linkage.set_length(LinkId::Crank, 60.).unwrap();
    let path = linkage.sample_trajectory(DEFAULT_RES);
    assert_eq!(path.len(), DEFAULT_RES);
    assert!(path.gaps() > 0 && path.gaps() < DEFAULT_RES);
    assert!(!path.segments().is_empty());
    for (t, p) in path.iter() {
        let joints = linkage.solve(t);
        assert_eq!(p, joints.foot());
        if joints.d.is_none() {
            assert_eq!((joints.e, joints.f), (None, None));
        }
    }
    let xs = path.defined().map(|[x, _]| x).collect::<Vec<_>>();
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let gait = path.gait();
    assert!(gait.is_defined());
    assert_abs_diff_eq!(gait.step_length.unwrap(), (max - min) / 10., epsilon = 1e-12);
}

#[test]
fn metrics_ignore_unresolved_samples() {
    let samples = [None, Some([10., -5.]), None, Some([30., 20.]), Some([-10., 0.]), None];
    assert_eq!(step_length(&samples), Some(4.));
    assert_eq!(step_height(&samples), Some(2.));
    assert_eq!(step_length(&[None, Some([1., 1.]), None]), None);
    assert_eq!(step_height(&[]), None);
    let path = Trajectory::from(samples.to_vec());
    assert_eq!(path.gaps(), 3);
    assert_eq!(path.segments(), [vec![[10., -5.]], vec![[30., 20.], [-10., 0.]]]);
    assert_eq!(to_cm([125., -30.]), [12.5, -3.]);
}

#[test]
fn continuous_sampling_is_smooth() {
    let lengths = Lengths::CANONICAL;
    let solver = Solver::default();
    let path = solver.sample_continuous(&lengths, DEFAULT_RES);
    assert_eq!(path.gaps(), 0);
    let curve = path.defined().collect::<Vec<_>>();
    let max_jump = curve
        .iter()
        .zip(curve.iter().cycle().skip(1))
        .map(|(p, q)| dist(*p, *q))
        .fold(0., f64::max);
    assert!(max_jump < 10., "jump of {max_jump}");
    // The first sample has no previous joints
    assert_eq!(path.samples()[0], solve(&lengths, 0.).foot());
}

#[test]
fn fixed_guess_sampling_switches_branches() {
    let lengths = Lengths::CANONICAL;
    let solver = Solver::default();
    let max_jump = |path: &Trajectory| {
        let curve = path.defined().collect::<Vec<_>>();
        curve
            .iter()
            .zip(curve.iter().cycle().skip(1))
            .map(|(p, q)| dist(*p, *q))
            .fold(0., f64::max)
    };
    let fixed = solver.sample(&lengths, DEFAULT_RES);
    let continuous = solver.sample_continuous(&lengths, DEFAULT_RES);
    assert_eq!(fixed.gaps(), 0);
    assert!(max_jump(&fixed) > 50.);
    assert!(max_jump(&continuous) < 10.);
    assert_ne!(fixed, continuous);
}

#[test]
fn solve_from_falls_back_to_fixed_guesses() {
    let lengths = Lengths::CANONICAL;
    let solver = Solver::default();
    let empty = JointSnapshot { d: None, e: None, f: None, ..solve(&lengths, 0.) };
    assert_eq!(solver.solve_from(&lengths, 1., &empty), solver.solve(&lengths, 1.));
}

#[cfg(feature = "serde")]
#[test]
fn linkage_config_validates() {
    let linkage = ron::from_str::<Linkage>("(lengths: (crank: 40.0), scale: 2.0)").unwrap();
    assert_eq!(linkage.length(LinkId::Crank), 40.);
    assert_eq!(linkage.length(LinkId::Coupler1), 41.5);
    assert_eq!(linkage.scaled_lengths().crank, 80.);
    let linkage = ron::from_str::<Linkage>("()").unwrap();
    assert_eq!(linkage, Linkage::default());
    assert!(ron::from_str::<Linkage>("(scale: -1.0)").is_err());
    assert!(ron::from_str::<Linkage>("(lengths: (offset_x: 0.0))").is_err());
    let s = ron::to_string(&Linkage::canonical()).unwrap();
    assert_eq!(ron::from_str::<Linkage>(&s).unwrap(), Linkage::canonical());
}
