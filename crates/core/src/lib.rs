pub mod actions;
pub mod config;
pub mod domain;
pub mod error;
pub mod exif;
pub mod handlers;
pub mod media;
pub mod query;
pub mod sort;
pub mod store;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;

use config::Config;
use domain::*;
use error::Result;
use media::MediaStore;
use store::{SqliteStore, Store};
use view::ViewEntry;

pub use handlers::{BrowsePage, ImageDetails, UploadPage};

const MEDIA_ROOT_KEY: &str = "media_root";

/// The main entry point: a store plus the media directory its images live in.
pub struct Gallery<S: Store = SqliteStore> {
    store: S,
    media: MediaStore,
}

impl Gallery<SqliteStore> {
    /// Open or create the gallery described by `config`.
    pub fn open(config: &Config) -> Result<Self> {
        let store = SqliteStore::open(&config.database)?;
        std::fs::create_dir_all(&config.media_root)?;

        let root = config.media_root.to_string_lossy();
        match store.get_config(MEDIA_ROOT_KEY)? {
            None => store.set_config(MEDIA_ROOT_KEY, &root)?,
            Some(recorded) if recorded != root => {
                tracing::warn!(%recorded, current = %root, "media root differs from the one recorded");
            }
            Some(_) => {}
        }

        Ok(Self::new(store, MediaStore::new(config.media_root.clone())))
    }
}

impl<S: Store> Gallery<S> {
    pub fn new(store: S, media: MediaStore) -> Self {
        Self { store, media }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn media(&self) -> &MediaStore {
        &self.media
    }

    /// The media root recorded when this gallery was first opened.
    pub fn media_root_record(&self) -> Result<Option<String>> {
        self.store.get_config(MEDIA_ROOT_KEY)
    }

    pub fn catalog_names(&self, user: UserId) -> Result<Vec<String>> {
        query::list_catalog_names(&self.store, user)
    }

    pub fn image_names(&self, user: UserId, selector: &str) -> Result<Vec<String>> {
        query::list_image_names(&self.store, user, selector)
    }

    pub fn create_catalog(&self, user: UserId, name: &str) -> Result<Catalog> {
        actions::create_catalog(&self.store, user, name)
    }

    pub fn delete_catalog(&self, user: UserId, name: &str) -> Result<Catalog> {
        actions::delete_catalog(&self.store, &self.media, user, name)
    }

    pub fn create_image(&self, user: UserId, form: &actions::UploadForm) -> Result<Image> {
        actions::create_image(&self.store, &self.media, user, form)
    }

    /// Metadata-joined listing for the request, optionally sorted by a label.
    pub fn view(
        &self,
        ctx: &RequestContext,
        selector: &str,
        sort_label: Option<&str>,
    ) -> Result<Vec<ViewEntry>> {
        let entries = view::build_view_list(&self.store, &self.media, ctx, selector)?;
        match sort_label {
            Some(label) => sort::sort_by_label(entries, label),
            None => Ok(entries),
        }
    }

    pub fn browse(&self, ctx: &RequestContext) -> Result<BrowsePage> {
        handlers::browse(self, ctx)
    }

    pub fn upload(&self, ctx: &RequestContext) -> Result<UploadPage> {
        handlers::upload(self, ctx)
    }

    pub fn image_details(&self, user: UserId, image_id: i64) -> Result<ImageDetails> {
        handlers::image_details(self, user, image_id)
    }
}
