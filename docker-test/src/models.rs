use std::{fmt, path::PathBuf};

#[derive(Clone, Debug, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct ImageId(pub String);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct ContainerName(pub String);

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An image build using `context` as both the working directory and the
/// build context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuildSpec {
    pub image_id: ImageId,
    pub context: PathBuf,
}

/// A host directory bind-mounted into the container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VolumeSpec {
    pub host_path: PathBuf,
    pub container_path: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: ContainerName,
    pub image_id: ImageId,
    pub volumes: Vec<VolumeSpec>,
    pub tty: bool,
}
