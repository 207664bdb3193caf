use anyhow::Result;

use crate::models::{ContainerName, ContainerSpec, ImageBuildSpec, ImageId};

pub trait ContainerBackend {
    fn build_image(&mut self, spec: &ImageBuildSpec) -> Result<()>;

    /// Runs the container attached, blocking until it exits.
    fn run_container(&mut self, spec: &ContainerSpec) -> Result<()>;

    fn remove_container(&mut self, name: &ContainerName) -> Result<()>;

    fn remove_image(&mut self, id: &ImageId) -> Result<()>;
}

/// A single durable slot holding the image built by the previous run.
pub trait ImageStateStore {
    fn read_previous(&mut self) -> Result<Option<ImageId>>;

    fn write_previous(&mut self, id: &ImageId) -> Result<()>;
}

pub trait IdGenerator {
    fn image_id(&mut self) -> ImageId;

    fn container_name(&mut self) -> ContainerName;
}
