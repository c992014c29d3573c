use std::path::PathBuf;

use crate::domain::MAX_NAME_LEN;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read image {}: {source}", .path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("catalog not found: {0}")]
    CatalogNotFound(String),

    #[error("image not found: {0}")]
    ImageNotFound(i64),

    #[error("catalog already exists: {0}")]
    CatalogAlreadyExists(String),

    #[error("catalog name can not be empty")]
    EmptyCatalogName,

    #[error("catalog name `{0}` is reserved")]
    ReservedCatalogName(String),

    #[error("{field} is longer than {max} characters", max = MAX_NAME_LEN)]
    NameTooLong { field: &'static str },

    #[error("description is longer than {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("unknown sort label: {0}")]
    UnknownSortLabel(String),

    #[error("{0}")]
    InvalidUpload(String),
}

/// Coarse classification used at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidArgument,
    ReadFailure,
    Storage,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CatalogNotFound(_) | Error::ImageNotFound(_) => ErrorKind::NotFound,
            Error::CatalogAlreadyExists(_) => ErrorKind::Conflict,
            Error::EmptyCatalogName
            | Error::ReservedCatalogName(_)
            | Error::NameTooLong { .. }
            | Error::DescriptionTooLong { .. }
            | Error::UnknownSortLabel(_)
            | Error::InvalidUpload(_) => ErrorKind::InvalidArgument,
            Error::ImageRead { .. } => ErrorKind::ReadFailure,
            Error::Database(_) | Error::Io(_) => ErrorKind::Storage,
        }
    }

    /// Whether this error should be shown to the user as a notice rather
    /// than aborting the request.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NotFound | ErrorKind::Conflict | ErrorKind::InvalidArgument
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
