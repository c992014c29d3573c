use crate::domain::{Catalog, Image, UserId, ALL_CATALOGS};
use crate::error::{Error, Result};
use crate::store::Store;

/// Images selected by `selector`: every image of the user for `"All"`,
/// otherwise the images of that one catalog. Insertion order either way.
pub fn list_images<S: Store + ?Sized>(store: &S, user: UserId, selector: &str) -> Result<Vec<Image>> {
    if selector == ALL_CATALOGS {
        return store.list_images_for_user(user);
    }
    let catalog = require_catalog(store, user, selector)?;
    store.list_images_in_catalog(catalog.id)
}

pub fn list_image_names<S: Store + ?Sized>(
    store: &S,
    user: UserId,
    selector: &str,
) -> Result<Vec<String>> {
    Ok(list_images(store, user, selector)?
        .into_iter()
        .map(|image| image.name)
        .collect())
}

pub fn list_catalog_names<S: Store + ?Sized>(store: &S, user: UserId) -> Result<Vec<String>> {
    Ok(store
        .list_catalogs(user)?
        .into_iter()
        .map(|catalog| catalog.name)
        .collect())
}

/// Delete the user's catalog `name` together with its images.
pub fn delete_catalog<S: Store + ?Sized>(store: &S, user: UserId, name: &str) -> Result<Catalog> {
    let catalog = require_catalog(store, user, name)?;
    let removed = store.delete_catalog(catalog.id)?;
    tracing::info!(user = %user, catalog = %name, images = removed, "deleted catalog");
    Ok(catalog)
}

pub fn require_catalog<S: Store + ?Sized>(store: &S, user: UserId, name: &str) -> Result<Catalog> {
    store
        .find_catalog(user, name)?
        .ok_or_else(|| Error::CatalogNotFound(name.to_string()))
}
