use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::{
    env,
    path::Path,
    process::{Command, ExitStatus},
};
use thiserror::Error;

use crate::{
    models::{ContainerName, ContainerSpec, ImageBuildSpec, ImageId},
    services::ContainerBackend,
};

pub const DEFAULT_ENGINE: &str = "docker";
pub const ENGINE_ENV: &str = "DOCKER_TEST_ENGINE";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("`{command}` exited with code {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("`{command}` was terminated by a signal")]
    Terminated { command: String },
}

impl EngineError {
    fn from_status(command: String, status: ExitStatus) -> EngineError {
        match status.code() {
            Some(code) => EngineError::CommandFailed { command, code },
            None => EngineError::Terminated { command },
        }
    }

    /// The exit code this process should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::CommandFailed { code, .. } => *code,
            EngineError::Terminated { .. } => 1,
        }
    }
}

/// Drives a docker compatible command line client. Every command inherits
/// the standard streams of this process and is waited on to completion.
pub struct DockerBackend {
    program: String,
    base_args: Vec<String>,
}

impl DockerBackend {
    pub fn new<P: Into<String>>(program: P) -> DockerBackend {
        DockerBackend {
            program: program.into(),
            base_args: Vec::new(),
        }
    }

    /// Parses an engine command line such as `podman` or `sudo docker`.
    pub fn from_command_line(command_line: &str) -> Result<DockerBackend> {
        let mut words = shell_words::split(command_line)
            .with_context(|| format!("invalid engine command line {:?}", command_line))?
            .into_iter();

        let program = words
            .next()
            .ok_or_else(|| anyhow!("the engine command line is empty"))?;

        Ok(DockerBackend {
            program,
            base_args: words.collect(),
        })
    }

    /// Uses `$DOCKER_TEST_ENGINE` if it is set and not blank, `docker` otherwise.
    pub fn from_env() -> Result<DockerBackend> {
        match env::var(ENGINE_ENV) {
            Ok(command_line) if !command_line.trim().is_empty() => {
                DockerBackend::from_command_line(&command_line)
                    .with_context(|| format!("couldn't use ${}", ENGINE_ENV))
            }
            _ => Ok(DockerBackend::new(DEFAULT_ENGINE)),
        }
    }

    pub fn command_line(&self) -> String {
        let mut words = vec![self.program.clone()];
        words.extend(self.base_args.iter().cloned());
        shell_words::join(words)
    }

    fn execute(&self, args: Vec<String>, work_dir: Option<&Path>) -> Result<()> {
        let command_line = format!("{} {}", self.command_line(), shell_words::join(&args));
        info!("running {}", command_line);

        let mut command = Command::new(&self.program);
        command.args(&self.base_args).args(&args);
        if let Some(work_dir) = work_dir {
            debug!("in directory {:?}", work_dir);
            command.current_dir(work_dir);
        }

        let status = command.status().with_context(|| {
            format!(
                "failed to invoke `{}`, is it installed and on PATH?",
                self.program
            )
        })?;

        if !status.success() {
            return Err(EngineError::from_status(command_line, status).into());
        }

        Ok(())
    }
}

impl ContainerBackend for DockerBackend {
    fn build_image(&mut self, spec: &ImageBuildSpec) -> Result<()> {
        self.execute(build_args(spec), Some(&spec.context))
    }

    fn run_container(&mut self, spec: &ContainerSpec) -> Result<()> {
        self.execute(run_args(spec)?, None)
    }

    fn remove_container(&mut self, name: &ContainerName) -> Result<()> {
        self.execute(vec!["rm".into(), name.0.clone()], None)
    }

    fn remove_image(&mut self, id: &ImageId) -> Result<()> {
        self.execute(vec!["rmi".into(), id.0.clone()], None)
    }
}

/// The build runs inside the context directory, so the context argument is `.`.
fn build_args(spec: &ImageBuildSpec) -> Vec<String> {
    vec![
        "build".into(),
        "-t".into(),
        spec.image_id.0.clone(),
        ".".into(),
    ]
}

fn run_args(spec: &ContainerSpec) -> Result<Vec<String>> {
    let mut args = vec!["run".to_owned(), "--name".into(), spec.name.0.clone()];

    for volume in spec.volumes.iter() {
        let host_path = volume
            .host_path
            .to_str()
            .ok_or_else(|| anyhow!("the volume path {:?} is not valid utf-8", volume.host_path))?;
        args.push("-v".into());
        args.push(format!("{}:{}", host_path, volume.container_path));
    }

    if spec.tty {
        args.push("-t".into());
    }

    args.push(spec.image_id.0.clone());

    Ok(args)
}
