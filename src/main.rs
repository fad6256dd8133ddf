use std::env;
use std::process::ExitCode;

use boids_heading::{BoidsError, Flock, Frame, FrameSink, RunConfig};

/// Logs agent 0 every `every` steps.
struct ProgressLog {
    every: u64,
}

impl FrameSink for ProgressLog {
    fn frame(&mut self, frame: Frame<'_>) {
        if self.every == 0 || frame.step % self.every != 0 {
            return;
        }
        if let (Some(p), Some(v)) = (frame.positions.first(), frame.velocities.first()) {
            log::debug!(
                "step {}: agent 0 at ({:.3}, {:.3}) heading ({:.3}, {:.3})",
                frame.step, p.x, p.y, v.x, v.y
            );
        }
    }
}

fn run() -> Result<(), BoidsError> {
    let config = match env::args_os().nth(1) {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    config.validate()?;

    if config.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global()?;
    }

    log::info!(
        "{} agents, {} steps, {} worker threads",
        config.agent_count,
        config.steps,
        rayon::current_num_threads()
    );

    let mut flock = Flock::seeded(config.agent_count, config.parameters, config.seed);
    let mut progress = ProgressLog { every: config.progress_every };
    flock.run(config.steps, &mut progress);

    log::info!("finished after {} steps", flock.steps_taken());
    if let Some(p) = flock.positions().first() {
        println!("{:.6}, {:.6}", p.x, p.y);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
