use uuid::Uuid;

use crate::{
    models::{ContainerName, ImageId},
    services::IdGenerator,
};

/// Hands out random v4 UUIDs in their hyphenated form.
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn image_id(&mut self) -> ImageId {
        ImageId(Uuid::new_v4().to_string())
    }

    fn container_name(&mut self) -> ContainerName {
        ContainerName(Uuid::new_v4().to_string())
    }
}
