use super::AnyResult;
use indicatif::ProgressBar;
use jansen::{plot::*, JointSnapshot, Linkage, Solver, DEFAULT_RES};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct PlotArgs {
    /// Output path of the figure (in SVG format)
    file: PathBuf,
    /// Crank angle in degrees
    #[clap(short, long, default_value_t = 0.)]
    angle: f64,
    /// Number of trajectory samples per revolution
    #[clap(long, default_value_t = DEFAULT_RES)]
    res: usize,
    /// Figure size in pixels
    #[clap(long, default_value_t = 800)]
    size: u32,
}

#[derive(clap::Args)]
pub(super) struct FramesArgs {
    /// Output directory of the frames
    dir: PathBuf,
    /// Crank increment per frame in degrees
    #[clap(long, default_value_t = 2.)]
    step: f64,
    /// Number of trajectory samples per revolution
    #[clap(long, default_value_t = DEFAULT_RES)]
    res: usize,
    /// Figure size in pixels
    #[clap(long, default_value_t = 600)]
    size: u32,
}

/// Smallest crank increment per frame in degrees.
const MIN_STEP: f64 = 0.01;

fn frame_count(step: f64) -> Result<usize, String> {
    if step.is_finite() && step >= MIN_STEP {
        Ok((360. / step).ceil() as usize)
    } else {
        Err(format!("invalid frame step: {step}, expect a number from {MIN_STEP}"))
    }
}

fn title(angle: f64) -> String {
    format!("Theo Jansen linkage - {angle:.1}°")
}

pub(super) fn plot(linkage: &Linkage, args: PlotArgs) -> AnyResult {
    let PlotArgs { file, angle, res, size } = args;
    Figure::new()
        .title(title(angle))
        .joints(linkage.solve(angle.to_radians()))
        .trajectory(linkage.sample_trajectory(res))
        .plot(SVGBackend::new(&file, (size, size)))?;
    println!("Saved to: {}", file.display());
    Ok(())
}

pub(super) fn frames(linkage: &Linkage, args: FramesArgs) -> AnyResult {
    let FramesArgs { dir, step, res, size } = args;
    let n = frame_count(step)?;
    std::fs::create_dir_all(&dir)?;
    let lengths = linkage.scaled_lengths();
    let solver = Solver::default();
    let path = solver.sample(&lengths, res);
    println!("Generate to: {}", dir.display());
    println!("frames={n}, step={step}, res={res}");
    let pb = ProgressBar::new(n as u64);
    let mut prev: Option<JointSnapshot> = None;
    for i in 0..n {
        let angle = i as f64 * step;
        let t = angle.to_radians();
        let joints = match &prev {
            Some(prev) => solver.solve_from(&lengths, t, prev),
            None => solver.solve(&lengths, t),
        };
        prev = Some(joints);
        let file = dir.join(format!("frame{i:04}.svg"));
        Figure::new()
            .title(title(angle))
            .joints(joints)
            .trajectory(path.clone())
            .plot(SVGBackend::new(&file, (size, size)))?;
        pb.inc(1);
    }
    pb.finish_and_clear();
    println!("Done");
    Ok(())
}
