use jansen::{LinkId, Linkage};
use std::path::PathBuf;

mod draw;
mod report;

type AnyResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(clap::Parser)]
#[clap(name = "jansen", version, author, about)]
pub(crate) struct Entry {
    #[clap(flatten)]
    cfg: LinkageArgs,
    /// Show debug messages, `RUST_LOG` takes precedence
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(clap::Subcommand)]
enum Cmd {
    /// Solve the joint positions at a crank angle
    Solve {
        /// Crank angle in degrees
        #[clap(short, long, default_value_t = 0.)]
        angle: f64,
    },
    /// Sample the foot trajectory and measure the gait
    Sweep(report::SweepArgs),
    /// Draw the linkage and its foot trajectory
    Plot(draw::PlotArgs),
    /// Render one figure per animation frame over a revolution
    Frames(draw::FramesArgs),
    /// Print the effective configuration in RON format
    DumpCfg,
}

#[derive(clap::Args)]
struct LinkageArgs {
    /// Linkage configuration file in RON format, default to the canonical
    /// proportions
    #[clap(long, global = true)]
    cfg: Option<PathBuf>,
    /// Override the scale factor
    #[clap(long, global = true)]
    scale: Option<f64>,
    /// Override a raw length in millimeters, e.g. `--set crank=40`
    #[clap(long = "set", value_name = "ID=VALUE", value_parser = parse_assign, global = true)]
    set: Vec<(LinkId, f64)>,
}

impl Entry {
    pub(crate) fn main() {
        let entry = <Self as clap::Parser>::parse_from(wild::args());
        init_logger(entry.verbose);
        if let Err(e) = entry.run() {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }

    fn run(self) -> AnyResult {
        let linkage = self.cfg.load()?;
        match self.cmd {
            Cmd::Solve { angle } => report::solve(&linkage, angle),
            Cmd::Sweep(args) => report::sweep(&linkage, args),
            Cmd::Plot(args) => draw::plot(&linkage, args),
            Cmd::Frames(args) => draw::frames(&linkage, args),
            Cmd::DumpCfg => {
                let pretty = ron::ser::PrettyConfig::default();
                println!("{}", ron::ser::to_string_pretty(&linkage, pretty)?);
                Ok(())
            }
        }
    }
}

impl LinkageArgs {
    fn load(&self) -> AnyResult<Linkage> {
        let mut linkage = match &self.cfg {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                ron::from_str(&std::fs::read_to_string(path)?)?
            }
            None => Linkage::default(),
        };
        if let Some(scale) = self.scale {
            linkage.set_scale(scale)?;
        }
        for &(id, value) in &self.set {
            linkage.set_length(id, value)?;
        }
        Ok(linkage)
    }
}

fn parse_assign(s: &str) -> Result<(LinkId, f64), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got `{s}`"))?;
    let id = id.parse::<LinkId>().map_err(|e| e.to_string())?;
    let value = value.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((id, value))
}

fn init_logger(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
