use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use super::Store;
use crate::domain::{Catalog, Image, NewImage, UserId};
use crate::error::{Error, Result};

#[derive(Default)]
struct State {
    next_catalog_id: i64,
    next_image_id: i64,
    catalogs: Vec<Catalog>,
    images: Vec<Image>,
    config: HashMap<String, String>,
}

/// In-process store with the same semantics as [`super::SqliteStore`].
/// Not thread-safe; each request-per-call test gets its own instance.
#[derive(Default)]
pub struct MemoryStore {
    state: RefCell<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn create_catalog(&self, user: UserId, name: &str) -> Result<Catalog> {
        let mut state = self.state.borrow_mut();
        if state
            .catalogs
            .iter()
            .any(|c| c.user == user && c.name == name)
        {
            return Err(Error::CatalogAlreadyExists(name.to_string()));
        }
        state.next_catalog_id += 1;
        let catalog = Catalog {
            id: state.next_catalog_id,
            user,
            name: name.to_string(),
            created_at: chrono::Utc::now().timestamp(),
        };
        state.catalogs.push(catalog.clone());
        Ok(catalog)
    }

    fn find_catalog(&self, user: UserId, name: &str) -> Result<Option<Catalog>> {
        let state = self.state.borrow();
        Ok(state
            .catalogs
            .iter()
            .find(|c| c.user == user && c.name == name)
            .cloned())
    }

    fn list_catalogs(&self, user: UserId) -> Result<Vec<Catalog>> {
        let state = self.state.borrow();
        Ok(state
            .catalogs
            .iter()
            .filter(|c| c.user == user)
            .cloned()
            .collect())
    }

    fn delete_catalog(&self, catalog_id: i64) -> Result<usize> {
        let mut state = self.state.borrow_mut();
        let before = state.catalogs.len();
        state.catalogs.retain(|c| c.id != catalog_id);
        if state.catalogs.len() == before {
            return Err(Error::CatalogNotFound(catalog_id.to_string()));
        }
        let images_before = state.images.len();
        state.images.retain(|i| i.catalog_id != catalog_id);
        Ok(images_before - state.images.len())
    }

    fn create_image(&self, image: &NewImage) -> Result<Image> {
        let mut state = self.state.borrow_mut();
        if !state.catalogs.iter().any(|c| c.id == image.catalog_id) {
            return Err(Error::CatalogNotFound(image.catalog_id.to_string()));
        }
        state.next_image_id += 1;
        let created = Image {
            id: state.next_image_id,
            user: image.user,
            catalog_id: image.catalog_id,
            name: image.name.clone(),
            file: image.file.clone(),
            description: image.description.clone(),
            created_at: chrono::Utc::now().timestamp(),
        };
        state.images.push(created.clone());
        Ok(created)
    }

    fn get_image(&self, id: i64) -> Result<Option<Image>> {
        let state = self.state.borrow();
        Ok(state.images.iter().find(|i| i.id == id).cloned())
    }

    fn list_images_for_user(&self, user: UserId) -> Result<Vec<Image>> {
        let state = self.state.borrow();
        Ok(state
            .images
            .iter()
            .filter(|i| i.user == user)
            .cloned()
            .collect())
    }

    fn list_images_in_catalog(&self, catalog_id: i64) -> Result<Vec<Image>> {
        let state = self.state.borrow();
        Ok(state
            .images
            .iter()
            .filter(|i| i.catalog_id == catalog_id)
            .cloned()
            .collect())
    }

    fn delete_image(&self, id: i64) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        let before = state.images.len();
        state.images.retain(|i| i.id != id);
        Ok(state.images.len() != before)
    }

    fn count_images_with_file(&self, file: &Path) -> Result<usize> {
        let state = self.state.borrow();
        Ok(state.images.iter().filter(|i| i.file == file).count())
    }

    fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .config
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_config(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.borrow().config.get(key).cloned())
    }
}
