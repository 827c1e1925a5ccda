pub mod params;
pub mod polar;
pub mod scene;
pub mod verify;
pub mod visibility;

use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};
use params::{Params, DEFAULT_PARAMS};
use scene::{Point, Scene};
use visibility::Method;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Counts the most points a rotating camera can see at once.")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Count the points visible from a scene file's observer
    Count {
        /// Path to the scene file (observer on the first line, then one point per line)
        #[arg(short, long)]
        file: PathBuf,
        /// Field of view of the camera (radians unless --degrees)
        #[arg(short, long, allow_negative_numbers = true)]
        angle: f64,
        /// Interpret the angle in degrees
        #[arg(short, long)]
        degrees: bool,
        /// Override the observer x coordinate from the file
        #[arg(long, allow_negative_numbers = true)]
        x0: Option<f64>,
        /// Override the observer y coordinate from the file
        #[arg(long, allow_negative_numbers = true)]
        y0: Option<f64>,
        #[arg(short, long, value_enum, default_value_t = Method::TwoPointer)]
        method: Method,
    },
    /// Cross-check all counting methods on random scenes
    Verify {
        #[arg(short, long)]
        trials: Option<usize>,
        #[arg(long)]
        threads: Option<usize>,
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::builder()
        .filter(None, log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match args.command {
        Command::Count { file, angle, degrees, x0, y0, method } => {
            let angle = if degrees { angle.to_radians() } else { angle };
            if !angle.is_finite() {
                bail!("angle must be finite, got {angle}");
            }
            let mut scene = Scene::from_file(&file)?;
            scene.observer = Point::new(x0.unwrap_or(scene.observer.x), y0.unwrap_or(scene.observer.y));
            if !(scene.observer.x.is_finite() && scene.observer.y.is_finite()) {
                bail!("observer must be finite, got {}", scene.observer);
            }

            log::info!(
                "Counting {} points of {} from {} with angle {:.6} rad ({method})",
                scene.points.len(),
                scene.name,
                scene.observer,
                angle
            );
            let res = method.count(&scene.points, angle, scene.observer);
            println!("{res}");
        }
        Command::Verify { trials, threads, seed } => {
            let params = Params {
                n_trials: trials.unwrap_or(DEFAULT_PARAMS.n_trials),
                n_threads: threads.unwrap_or(DEFAULT_PARAMS.n_threads),
                seed: seed.unwrap_or(DEFAULT_PARAMS.seed),
                ..*DEFAULT_PARAMS
            };
            log::info!("{}", params);

            let report = verify::run(&params);
            for m in report.mismatches.iter() {
                log::error!(
                    "Trial {} ({} points, observer {}, angle {}): {}",
                    m.trial,
                    m.scene.points.len(),
                    m.scene.observer,
                    m.angle,
                    m.reason
                );
            }
            if !report.mismatches.is_empty() {
                bail!("{} of {} trials failed", report.mismatches.len(), report.trials);
            }
            println!("{} trials passed", report.trials);
        }
    }
    Ok(())
}
