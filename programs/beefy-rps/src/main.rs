//! Beefy RPS - command-line runner
//!
//! Plays a fictitious-play agent against a Q-learner (or any pairing of the
//! two) on stateful Rock-Paper-Scissors and prints what each one learned.

mod cli;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rayon::prelude::*;
use rps_logic::{run_simulation, run_simulation_with, SimulationReport};

use cli::Args;

fn run_single(args: &Args) -> Result<()> {
    let config = args.config(0);
    let report = if args.quiet || args.json {
        run_simulation(&config)
    } else {
        run_simulation_with(&config, |record| println!("Iteration: {}", record.round))
    }
    .context("simulation aborted")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report::describe(&report));
    }
    Ok(())
}

fn run_sweep(args: &Args) -> Result<()> {
    info!("sweeping {} runs on {} threads", args.runs, rayon::current_num_threads());
    let reports = (0..args.runs)
        .into_par_iter()
        .map(|run_index| {
            run_simulation(&args.config(run_index))
                .with_context(|| format!("run {} aborted", run_index))
        })
        .collect::<Result<Vec<SimulationReport>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("{}", report::describe_sweep(&reports));
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    // validate once up front so a bad flag fails before any work starts
    args.config(0).validate().context("invalid arguments")?;

    if args.runs > 1 {
        run_sweep(&args)
    } else {
        run_single(&args)
    }
}
