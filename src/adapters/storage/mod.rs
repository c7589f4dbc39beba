//! Photo storage adapters.

mod in_memory_photo_storage;
mod local_photo_storage;

pub use in_memory_photo_storage::InMemoryPhotoStorage;
pub use local_photo_storage::LocalPhotoStorage;
