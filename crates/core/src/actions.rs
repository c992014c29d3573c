use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::Path;

use crate::domain::{
    Catalog, FormData, Image, NewImage, RequestContext, UploadedFile, UserId, ALL_CATALOGS,
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN,
};
use crate::error::{Error, Result};
use crate::media::MediaStore;
use crate::query;
use crate::store::Store;

/// Posted value that marks the image to delete.
pub const DELETE_VALUE: &str = "Delete";

pub const EMPTY_NAME_MESSAGE: &str = "Name field can not be empty.";
pub const EMPTY_IMAGE_MESSAGE: &str = "Image field can not be empty.";
pub const NO_CATALOG_MESSAGE: &str = "Choose catalog";

/// The fields of an image upload.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub name: String,
    pub catalog: Option<String>,
    pub description: String,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    pub fn from_request(ctx: &RequestContext) -> Self {
        Self {
            name: ctx.form.get("name").unwrap_or_default().to_string(),
            catalog: ctx
                .form
                .get("catalog")
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            description: ctx.form.get("description").unwrap_or_default().to_string(),
            file: ctx.upload.clone(),
        }
    }

    /// The problem to report for a missing field, if any.
    ///
    /// Checks run in the order name, image, catalog and a later failure
    /// replaces an earlier one, so only the last problem is reported.
    /// Bytes that do not decode as a supported image count as no image.
    pub fn problem(&self) -> Option<&'static str> {
        let mut problem = None;
        if self.name.is_empty() {
            problem = Some(EMPTY_NAME_MESSAGE);
        }
        if !self.file.as_ref().is_some_and(|f| is_readable_image(&f.bytes)) {
            problem = Some(EMPTY_IMAGE_MESSAGE);
        }
        if self.catalog.is_none() {
            problem = Some(NO_CATALOG_MESSAGE);
        }
        problem
    }
}

/// Whether `bytes` hold an image in a format this build can decode.
fn is_readable_image(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    let reader = match image::ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
        Ok(reader) => reader,
        Err(_) => return false,
    };
    match reader.into_dimensions() {
        Ok(_) => true,
        Err(err) => {
            tracing::debug!(error = %err, "upload is not a readable image");
            false
        }
    }
}

pub fn create_catalog<S: Store + ?Sized>(store: &S, user: UserId, name: &str) -> Result<Catalog> {
    if name.is_empty() {
        return Err(Error::EmptyCatalogName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::NameTooLong {
            field: "catalog name",
        });
    }
    if name == ALL_CATALOGS {
        return Err(Error::ReservedCatalogName(name.to_string()));
    }
    let catalog = store.create_catalog(user, name)?;
    tracing::info!(user = %user, catalog = %name, "created catalog");
    Ok(catalog)
}

/// Store the uploaded bytes and record the image in its catalog.
pub fn create_image<S: Store + ?Sized>(
    store: &S,
    media: &MediaStore,
    user: UserId,
    form: &UploadForm,
) -> Result<Image> {
    if let Some(problem) = form.problem() {
        return Err(Error::InvalidUpload(problem.to_string()));
    }
    let (Some(file), Some(catalog_name)) = (&form.file, &form.catalog) else {
        return Err(Error::InvalidUpload(NO_CATALOG_MESSAGE.to_string()));
    };
    if form.name.chars().count() > MAX_NAME_LEN {
        return Err(Error::NameTooLong { field: "image name" });
    }
    if form.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(Error::DescriptionTooLong {
            max: MAX_DESCRIPTION_LEN,
        });
    }

    let catalog = query::require_catalog(store, user, catalog_name)?;
    let stored = media.save(&file.file_name, &file.bytes)?;

    let created = store.create_image(&NewImage {
        user,
        catalog_id: catalog.id,
        name: form.name.clone(),
        file: stored.clone(),
        description: form.description.clone(),
    });
    match created {
        Ok(image) => {
            tracing::info!(user = %user, catalog = %catalog.name, image = %image.name, "uploaded image");
            Ok(image)
        }
        Err(err) => {
            release_blob(store, media, &stored)?;
            Err(err)
        }
    }
}

/// Delete the first posted image whose value is `Delete`, then stop.
/// Returns `None` when the form marks nothing for deletion.
pub fn delete_posted_image<S: Store + ?Sized>(
    store: &S,
    media: &MediaStore,
    user: UserId,
    form: &FormData,
) -> Result<Option<Image>> {
    let Some(id) = form
        .pairs()
        .filter(|(_, value)| *value == DELETE_VALUE)
        .find_map(|(key, _)| key.parse::<i64>().ok())
    else {
        return Ok(None);
    };

    let image = store
        .get_image(id)?
        .filter(|image| image.user == user)
        .ok_or(Error::ImageNotFound(id))?;
    store.delete_image(image.id)?;
    release_blob(store, media, &image.file)?;
    tracing::info!(user = %user, image = %image.name, id, "deleted image");
    Ok(Some(image))
}

/// Delete a catalog, its images and any blobs nothing else references.
/// The `All` selector is not a catalog and can not be deleted.
pub fn delete_catalog<S: Store + ?Sized>(
    store: &S,
    media: &MediaStore,
    user: UserId,
    name: &str,
) -> Result<Catalog> {
    if name == ALL_CATALOGS {
        return Err(Error::ReservedCatalogName(name.to_string()));
    }
    let files: BTreeSet<_> = query::list_images(store, user, name)?
        .into_iter()
        .map(|image| image.file)
        .collect();
    let catalog = query::delete_catalog(store, user, name)?;
    for file in &files {
        release_blob(store, media, file)?;
    }
    Ok(catalog)
}

fn release_blob<S: Store + ?Sized>(store: &S, media: &MediaStore, file: &Path) -> Result<()> {
    if store.count_images_with_file(file)? == 0 {
        media.remove(file)?;
    }
    Ok(())
}
