//! Request-level flows: the gallery page, the upload page and the
//! per-image metadata page.

use serde::Serialize;

use crate::actions::{self, UploadForm, DELETE_VALUE};
use crate::domain::{Image, Notice, RequestContext, UserId, ALL_CATALOGS};
use crate::error::{Error, Result};
use crate::exif::{metadata_listing, MetadataListing};
use crate::query;
use crate::sort::{self, SortKey};
use crate::store::Store;
use crate::view::{self, ViewEntry, DEFAULT_SELECTOR};
use crate::Gallery;

pub const CATALOG_SELECT_FIELD: &str = "Catalogs";
pub const DELETE_CATALOG_FIELD: &str = "DeleteCatalog";
pub const SORT_FIELD: &str = "Metadata-sort";
pub const UPLOAD_FIELD: &str = "Upload";
pub const ADD_CATALOG_FIELD: &str = "AddCatalog";
pub const CATALOG_NAME_FIELD: &str = "catalog_name";

#[derive(Debug, Clone, Serialize)]
pub struct BrowsePage {
    pub entries: Vec<ViewEntry>,
    pub catalogs: Vec<String>,
    pub selected: String,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadPage {
    pub catalogs: Vec<String>,
    pub selected_catalog: Option<String>,
    pub uploaded: Option<Image>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageDetails {
    pub image: Image,
    pub listing: MetadataListing,
}

/// The gallery page.
///
/// A POST may, in this order, delete a marked image, delete the selected
/// catalog and sort the listing. Rejected mutations become notices.
pub fn browse<S: Store>(gallery: &Gallery<S>, ctx: &RequestContext) -> Result<BrowsePage> {
    let store = gallery.store();
    let media = gallery.media();
    let mut notices = Vec::new();

    if !ctx.is_post() {
        return Ok(BrowsePage {
            entries: view::build_view_list(store, media, ctx, DEFAULT_SELECTOR)?,
            catalogs: query::list_catalog_names(store, ctx.user)?,
            selected: DEFAULT_SELECTOR.to_string(),
            notices,
        });
    }

    let mut selected = ctx
        .form
        .get(CATALOG_SELECT_FIELD)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SELECTOR)
        .to_string();

    if ctx.form.contains_value(DELETE_VALUE) {
        match actions::delete_posted_image(store, media, ctx.user, &ctx.form) {
            Ok(Some(image)) => {
                notices.push(Notice::info(format!("Image {} has been deleted", image.name)))
            }
            Ok(None) => {}
            Err(err) => notices.push(notice_for(err)?),
        }
    }

    if ctx.form.is_truthy(DELETE_CATALOG_FIELD) {
        if selected == ALL_CATALOGS {
            notices.push(Notice::info(format!("Catalog {ALL_CATALOGS} can not be deleted")));
        } else {
            match actions::delete_catalog(store, media, ctx.user, &selected) {
                Ok(catalog) => {
                    notices.push(Notice::info(format!(
                        "Catalog {} has been deleted",
                        catalog.name
                    )));
                    selected = DEFAULT_SELECTOR.to_string();
                }
                Err(err) => {
                    notices.push(notice_for(err)?);
                    // The selected catalog may not exist; show everything instead.
                    selected = DEFAULT_SELECTOR.to_string();
                }
            }
        }
    }

    let mut entries = view::build_view_list(store, media, ctx, &selected)?;

    if let Some(label) = ctx.form.get(SORT_FIELD).filter(|s| !s.is_empty()) {
        match label.parse::<SortKey>() {
            Ok(key) => entries = sort::sort_entries(entries, key),
            Err(err) => notices.push(notice_for(err)?),
        }
    }

    Ok(BrowsePage {
        entries,
        catalogs: query::list_catalog_names(store, ctx.user)?,
        selected,
        notices,
    })
}

/// The upload page: adds an image (`Upload`) or a catalog (`AddCatalog`).
pub fn upload<S: Store>(gallery: &Gallery<S>, ctx: &RequestContext) -> Result<UploadPage> {
    let store = gallery.store();
    let mut notices = Vec::new();
    let mut selected_catalog = None;
    let mut uploaded = None;

    if ctx.is_post() && ctx.form.is_truthy(UPLOAD_FIELD) {
        let form = UploadForm::from_request(ctx);
        match actions::create_image(store, gallery.media(), ctx.user, &form) {
            Ok(image) => {
                notices.push(Notice::success("Your picture has been uploaded successfully!"));
                selected_catalog = form.catalog.clone();
                uploaded = Some(image);
            }
            Err(err) => notices.push(notice_for(err)?),
        }
    }

    if ctx.is_post() && ctx.form.is_truthy(ADD_CATALOG_FIELD) {
        let name = ctx.form.get(CATALOG_NAME_FIELD).unwrap_or_default();
        match actions::create_catalog(store, ctx.user, name) {
            Ok(_) => notices.push(Notice::info("Catalog added")),
            Err(Error::EmptyCatalogName) => {
                notices.push(Notice::info("Catalog name field cannot be empty!"))
            }
            Err(Error::CatalogAlreadyExists(_)) => {
                notices.push(Notice::info("Catalog name must be unique!"))
            }
            Err(err) => notices.push(notice_for(err)?),
        }
    }

    Ok(UploadPage {
        catalogs: query::list_catalog_names(store, ctx.user)?,
        selected_catalog,
        uploaded,
        notices,
    })
}

/// Every tag of one of the user's images.
pub fn image_details<S: Store>(
    gallery: &Gallery<S>,
    user: UserId,
    image_id: i64,
) -> Result<ImageDetails> {
    let image = gallery
        .store()
        .get_image(image_id)?
        .filter(|image| image.user == user)
        .ok_or(Error::ImageNotFound(image_id))?;
    let listing = metadata_listing(&gallery.media().resolve(&image.file))?;
    Ok(ImageDetails { image, listing })
}

/// Turn a user-facing error into a notice; anything else aborts the request.
fn notice_for(err: Error) -> Result<Notice> {
    if err.is_user_facing() {
        tracing::debug!(error = %err, "request rejected");
        Ok(Notice::info(err.to_string()))
    } else {
        Err(err)
    }
}
