use anyhow::{Context, Result};
use log::{debug, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{models::ImageId, services::ImageStateStore};

pub const PREVIOUS_IMAGE_ID_FILE: &str = "previous_image_id";

/// Keeps the previous image id in `previous_image_id` inside the test directory.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> FileStateStore {
        FileStateStore {
            path: dir.as_ref().join(PREVIOUS_IMAGE_ID_FILE),
        }
    }
}

impl ImageStateStore for FileStateStore {
    fn read_previous(&mut self) -> Result<Option<ImageId>> {
        if !self.path.exists() {
            debug!("no previous image id at {:?}", self.path);
            return Ok(None);
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!("couldn't read {:?}, ignoring it: {}", self.path, err);
                return Ok(None);
            }
        };

        let id = contents.trim();
        if id.is_empty() {
            debug!("{:?} is empty", self.path);
            return Ok(None);
        }

        Ok(Some(ImageId(id.to_owned())))
    }

    fn write_previous(&mut self, id: &ImageId) -> Result<()> {
        fs::write(&self.path, id.0.trim())
            .with_context(|| format!("couldn't write the image id to {:?}", self.path))
    }
}
