use anyhow::{Context, Result};
use crossterm::{
    style::{self, Colorize, Styler},
    QueueableCommand,
};
use log::info;
use std::{
    fs,
    io::{stdout, Write},
    path::PathBuf,
    process,
};
use structopt::StructOpt;

use backends::{DockerBackend, EngineError};
use ids::UuidGenerator;
use runner::TestRunner;
use state::FileStateStore;

mod backends;
mod ids;
mod models;
mod runner;
mod services;
mod state;

#[derive(Debug, StructOpt)]
#[structopt(name = "run-docker-test", about = "Run a service test in Docker")]
struct Opt {
    /// Path of the service test directory
    #[structopt(parse(from_os_str))]
    service_test_dir: PathBuf,
}

fn main() {
    pretty_env_logger::init_custom_env("LOG");

    let opt = Opt::from_args();

    if let Err(err) = run(opt) {
        eprintln!("Error: {:?}", err);
        process::exit(exit_code(&err));
    }
}

fn run(opt: Opt) -> Result<()> {
    let mut stdout = stdout();

    if !opt.service_test_dir.is_dir() {
        info!("{:?} is not a directory", opt.service_test_dir);
        stdout
            .queue(style::PrintStyledContent("INFO: ".cyan().bold()))?
            .queue(style::Print("No service tests found\n"))?
            .flush()?;
        return Ok(());
    }

    let test_dir = fs::canonicalize(&opt.service_test_dir)
        .with_context(|| format!("couldn't resolve {:?}", opt.service_test_dir))?;
    info!("found service test directory {:?}", test_dir);

    let backend = DockerBackend::from_env()?;
    info!("using container engine `{}`", backend.command_line());

    let store = FileStateStore::in_dir(&test_dir);
    let mut runner = TestRunner::init(test_dir, backend, store, UuidGenerator);
    let outcome = runner.run()?;

    match outcome.removed_image {
        Some(removed_image) => info!(
            "kept image {}, removed previous image {}",
            outcome.image_id, removed_image
        ),
        None => info!("kept image {}", outcome.image_id),
    }

    Ok(())
}

/// Engine failures exit with the engine's own code, anything else with 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<EngineError>())
        .map(EngineError::exit_code)
        .unwrap_or(1)
}
