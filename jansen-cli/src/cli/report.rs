use super::AnyResult;
use jansen::{to_cm, Gait, Linkage, Solver, DEFAULT_RES};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct SweepArgs {
    /// Number of samples per revolution
    #[clap(long, default_value_t = DEFAULT_RES)]
    res: usize,
    /// Start each sample from the joints of the previous one
    #[clap(long)]
    continuous: bool,
    /// Write the samples to a CSV file
    #[clap(long)]
    csv: Option<PathBuf>,
}

fn fmt_cm(v: Option<f64>) -> String {
    v.map_or_else(|| "undefined".to_string(), |v| format!("{v:.2} cm"))
}

pub(super) fn solve(linkage: &Linkage, angle: f64) -> AnyResult {
    let joints = linkage.solve(angle.to_radians());
    println!("angle={angle}, scale={}", linkage.scale());
    for (name, p) in joints.iter() {
        match p {
            Some([x, y]) => println!("{name}=({x:.4}, {y:.4})"),
            None => println!("{name}=--"),
        }
    }
    if let Some(foot) = joints.foot() {
        let [x, y] = to_cm(foot);
        println!("foot=({x:.2}, {y:.2}) cm");
    } else {
        tracing::warn!("the linkage cannot be assembled at {angle} degrees");
    }
    Ok(())
}

pub(super) fn sweep(linkage: &Linkage, args: SweepArgs) -> AnyResult {
    let SweepArgs { res, continuous, csv } = args;
    let lengths = linkage.scaled_lengths();
    let solver = Solver::default();
    let path = if continuous {
        solver.sample_continuous(&lengths, res)
    } else {
        solver.sample(&lengths, res)
    };
    if path.gaps() > 0 {
        tracing::warn!("{} of {res} samples are unresolved", path.gaps());
    }
    let Gait { step_length, step_height } = path.gait();
    println!("res={res}, gaps={}", path.gaps());
    println!("step_length={}", fmt_cm(step_length));
    println!("step_height={}", fmt_cm(step_height));
    if let Some(file) = csv {
        let w = std::io::BufWriter::new(std::fs::File::create(&file)?);
        jansen::csv::write_csv(w, &path)?;
        println!("Saved to: {}", file.display());
    }
    Ok(())
}
