use anyhow::Result;
use log::{info, warn};
use std::path::PathBuf;

use crate::{
    models::{ContainerName, ContainerSpec, ImageBuildSpec, ImageId, VolumeSpec},
    services::{ContainerBackend, IdGenerator, ImageStateStore},
};

const LOG_DIR: &str = "log";
const CONTAINER_LOG_DIR: &str = "/log";

/// What a successful run built and removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub image_id: ImageId,
    pub container_name: ContainerName,
    pub removed_image: Option<ImageId>,
}

/// Builds and runs the service test in one directory, then removes the
/// container and the image built by the previous run.
///
/// The image built now is left in place and recorded; the next run removes it.
pub struct TestRunner {
    backend: Box<dyn ContainerBackend>,
    store: Box<dyn ImageStateStore>,
    ids: Box<dyn IdGenerator>,
    test_dir: PathBuf,
}

impl TestRunner {
    /// `test_dir` is expected to be absolute, it ends up in a bind mount.
    pub fn init<P, B, S, G>(test_dir: P, backend: B, store: S, ids: G) -> TestRunner
    where
        P: Into<PathBuf>,
        B: 'static + ContainerBackend,
        S: 'static + ImageStateStore,
        G: 'static + IdGenerator,
    {
        TestRunner {
            backend: Box::new(backend),
            store: Box::new(store),
            ids: Box::new(ids),
            test_dir: test_dir.into(),
        }
    }

    pub fn run(&mut self) -> Result<RunOutcome> {
        let image_id = self.ids.image_id();
        let container_name = self.ids.container_name();
        info!("image {}, container {}", image_id, container_name);

        let previous_image = self.store.read_previous()?;
        match &previous_image {
            Some(previous_image) => info!("found previous image {}", previous_image),
            None => info!("found no previous image"),
        }

        // Recorded before building, a failed build still leaves this id behind.
        self.store.write_previous(&image_id)?;

        let result = self.build_and_run(&image_id, &container_name);

        if let Err(err) = self.cleanup(&container_name, previous_image.as_ref()) {
            if let Err(masked) = &result {
                warn!("cleanup failed after an earlier error: {:#}", masked);
            }
            return Err(err);
        }
        result?;

        Ok(RunOutcome {
            image_id,
            container_name,
            removed_image: previous_image,
        })
    }

    fn build_and_run(&mut self, image_id: &ImageId, container_name: &ContainerName) -> Result<()> {
        let build_spec = ImageBuildSpec {
            image_id: image_id.clone(),
            context: self.test_dir.clone(),
        };
        self.backend.build_image(&build_spec)?;
        info!("built image {}", image_id);

        let container_spec = ContainerSpec {
            name: container_name.clone(),
            image_id: image_id.clone(),
            volumes: vec![VolumeSpec {
                host_path: self.test_dir.join(LOG_DIR),
                container_path: CONTAINER_LOG_DIR.into(),
            }],
            tty: true,
        };
        self.backend.run_container(&container_spec)?;
        info!("container {} finished", container_name);

        Ok(())
    }

    fn cleanup(
        &mut self,
        container_name: &ContainerName,
        previous_image: Option<&ImageId>,
    ) -> Result<()> {
        info!("removing container {}", container_name);
        self.backend.remove_container(container_name)?;

        if let Some(previous_image) = previous_image {
            info!("removing previous image {}", previous_image);
            self.backend.remove_image(previous_image)?;
        }

        Ok(())
    }
}
