pub mod memory;
pub mod schema;
pub mod sqlite;

use std::path::Path;

use crate::domain::{Catalog, Image, NewImage, UserId};
use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence for catalogs and images.
///
/// Every listing preserves insertion order. Creating a catalog whose name the
/// user already has fails with `Error::CatalogAlreadyExists`; deleting a
/// catalog removes its images.
pub trait Store {
    fn create_catalog(&self, user: UserId, name: &str) -> Result<Catalog>;

    fn find_catalog(&self, user: UserId, name: &str) -> Result<Option<Catalog>>;

    fn list_catalogs(&self, user: UserId) -> Result<Vec<Catalog>>;

    /// Delete a catalog and its images. Returns the number of images removed.
    fn delete_catalog(&self, catalog_id: i64) -> Result<usize>;

    fn create_image(&self, image: &NewImage) -> Result<Image>;

    fn get_image(&self, id: i64) -> Result<Option<Image>>;

    fn list_images_for_user(&self, user: UserId) -> Result<Vec<Image>>;

    fn list_images_in_catalog(&self, catalog_id: i64) -> Result<Vec<Image>>;

    /// Returns false when no row had that id.
    fn delete_image(&self, id: i64) -> Result<bool>;

    /// How many image rows point at the given blob.
    fn count_images_with_file(&self, file: &Path) -> Result<usize>;

    fn set_config(&self, key: &str, value: &str) -> Result<()>;

    fn get_config(&self, key: &str) -> Result<Option<String>>;
}
