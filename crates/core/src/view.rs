use serde::Serialize;

use crate::domain::{Image, RequestContext, ALL_CATALOGS};
use crate::error::Result;
use crate::exif::ImageMetadata;
use crate::media::MediaStore;
use crate::query;
use crate::store::Store;

pub const DEFAULT_SELECTOR: &str = ALL_CATALOGS;

/// Form field that keeps every image visible when submitted.
pub const SELECT_FIELD: &str = "Select";
/// Repeated form field naming the images to keep visible.
pub const SHOW_FIELD: &str = "show_checkbox";

/// One row of the gallery: an image joined with its freshly read metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewEntry {
    pub image: Image,
    pub metadata: ImageMetadata,
}

/// Join the selected images with their metadata, in query order.
///
/// On a POST without a `Select` field, only images named in `show_checkbox`
/// stay visible. Any other request leaves every entry visible.
pub fn build_view_list<S: Store + ?Sized>(
    store: &S,
    media: &MediaStore,
    ctx: &RequestContext,
    selector: &str,
) -> Result<Vec<ViewEntry>> {
    let images = query::list_images(store, ctx.user, selector)?;
    let shown = visibility_filter(ctx);
    tracing::debug!(user = %ctx.user, selector, count = images.len(), "building view list");

    images
        .into_iter()
        .map(|image| {
            let metadata = ImageMetadata::from_image_path(&media.resolve(&image.file))?;
            let visible = shown
                .as_ref()
                .map_or(true, |names| names.contains(&image.name.as_str()));
            Ok(ViewEntry {
                image,
                metadata: metadata.with_visibility(visible),
            })
        })
        .collect()
}

/// Names to keep visible, or `None` when the request does not filter.
fn visibility_filter(ctx: &RequestContext) -> Option<Vec<&str>> {
    if ctx.is_post() && !ctx.form.is_truthy(SELECT_FIELD) {
        Some(ctx.form.get_list(SHOW_FIELD))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Catalog, FormData, NewImage, UserId};
    use crate::store::MemoryStore;
    use crate::test_helpers::{canon_fields, write_jpeg_with_exif, write_plain_png};

    struct Fixture {
        store: MemoryStore,
        media: MediaStore,
        user: UserId,
        _tmp: tempfile::TempDir,
    }

    fn add(fx: &Fixture, catalog: &Catalog, name: &str, file: &str) {
        fx.store
            .create_image(&NewImage {
                user: fx.user,
                catalog_id: catalog.id,
                name: name.to_string(),
                file: file.into(),
                description: String::new(),
            })
            .unwrap();
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaStore::new(tmp.path());
        std::fs::create_dir_all(tmp.path().join("images")).unwrap();
        write_plain_png(&tmp.path().join("images/plain.png"));
        write_jpeg_with_exif(&tmp.path().join("images/canon.jpg"), &canon_fields());

        let fx = Fixture {
            store: MemoryStore::new(),
            media,
            user: UserId(1),
            _tmp: tmp,
        };
        fx.store.create_catalog(fx.user, "name0").unwrap();
        let c1 = fx.store.create_catalog(fx.user, "name1").unwrap();
        let c2 = fx.store.create_catalog(fx.user, "name2").unwrap();
        add(&fx, &c1, "name11", "images/plain.png");
        add(&fx, &c1, "name12", "images/canon.jpg");
        add(&fx, &c2, "name21", "images/plain.png");
        fx
    }

    fn post_showing(user: UserId, names: &[&str]) -> RequestContext {
        let form: FormData = names.iter().map(|n| (SHOW_FIELD, *n)).collect();
        RequestContext::post(user, form)
    }

    #[test]
    fn test_empty_catalog() {
        let fx = fixture();
        let ctx = post_showing(fx.user, &[]);
        let entries = build_view_list(&fx.store, &fx.media, &ctx, "name0").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_one_catalog() {
        let fx = fixture();
        let ctx = post_showing(fx.user, &["name11", "name12"]);
        let entries = build_view_list(&fx.store, &fx.media, &ctx, "name1").unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].image.name, "name11");
        assert_eq!(entries[0].metadata.model, None);
        assert!(entries[0].metadata.visible);
        assert_eq!(entries[1].image.name, "name12");
        assert_eq!(entries[1].metadata.model.as_deref(), Some("Canon EOS 77D"));
        assert!(entries[1].metadata.visible);
    }

    #[test]
    fn test_all_catalogs_hides_unchecked() {
        let fx = fixture();
        let ctx = post_showing(fx.user, &["name11", "name12"]);
        let entries = build_view_list(&fx.store, &fx.media, &ctx, DEFAULT_SELECTOR).unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.image.name.as_str()).collect();
        assert_eq!(names, vec!["name11", "name12", "name21"]);
        assert!(entries[0].metadata.visible);
        assert!(entries[1].metadata.visible);
        assert!(!entries[2].metadata.visible);
        assert_eq!(entries[2].metadata.model, None);
    }

    #[test]
    fn test_select_keeps_everything_visible() {
        let fx = fixture();
        let form = FormData::new().with(SELECT_FIELD, "Select").with(SHOW_FIELD, "name11");
        let ctx = RequestContext::post(fx.user, form);
        let entries = build_view_list(&fx.store, &fx.media, &ctx, "All").unwrap();
        assert!(entries.iter().all(|e| e.metadata.visible));
    }

    #[test]
    fn test_get_keeps_everything_visible() {
        let fx = fixture();
        let ctx = RequestContext::get(fx.user);
        let entries = build_view_list(&fx.store, &fx.media, &ctx, "All").unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.metadata.visible));
    }

    #[test]
    fn test_visibility_is_exact_match() {
        let fx = fixture();
        let ctx = post_showing(fx.user, &["name1", "NAME11"]);
        let entries = build_view_list(&fx.store, &fx.media, &ctx, "name1").unwrap();
        assert!(entries.iter().all(|e| !e.metadata.visible));
    }

    #[test]
    fn test_unknown_catalog_fails() {
        let fx = fixture();
        let ctx = RequestContext::get(fx.user);
        assert!(build_view_list(&fx.store, &fx.media, &ctx, "missing").is_err());
    }

    #[test]
    fn test_unreadable_blob_is_reported() {
        let fx = fixture();
        let catalog = fx.store.find_catalog(fx.user, "name0").unwrap().unwrap();
        add(&fx, &catalog, "ghost", "images/ghost.jpg");

        let ctx = RequestContext::get(fx.user);
        let err = build_view_list(&fx.store, &fx.media, &ctx, "name0").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ReadFailure);
    }
}
