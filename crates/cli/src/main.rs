mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gallery_core::config::Config;
use gallery_core::domain::UserId;
use gallery_core::Gallery;

/// Gallery: catalogs of images with their EXIF metadata
#[derive(Parser)]
#[command(name = "gallery", version, about)]
struct Cli {
    /// Path to the catalog database
    #[arg(long, env = "GALLERY_DATABASE")]
    database: Option<PathBuf>,

    /// Directory holding uploaded image files
    #[arg(long, env = "GALLERY_MEDIA_ROOT")]
    media_root: Option<PathBuf>,

    /// Id of the user acting on the gallery
    #[arg(long, env = "GALLERY_USER")]
    user: i64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalogs, or add and remove them
    Catalogs {
        #[command(subcommand)]
        action: Option<CatalogsAction>,
    },
    /// Upload an image file into a catalog
    Upload {
        /// Path to the image file
        file: PathBuf,
        /// Display name of the image
        #[arg(long)]
        name: String,
        /// Target catalog
        #[arg(long)]
        catalog: String,
        /// Free-text description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List images with their metadata
    Ls {
        /// Catalog to list (defaults to every catalog)
        #[arg(long, default_value = "All")]
        catalog: String,
        /// Sort by Name, DateTimeOriginal, Model, ExposureTime, FNumber, ISOSpeedRatings or LensModel
        #[arg(long)]
        sort: Option<String>,
        /// Only mark these image names as shown
        #[arg(long)]
        show: Vec<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Delete an image by id
    Rm {
        /// Image ID
        id: i64,
    },
    /// Show every EXIF tag of an image
    Exif {
        /// Image ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum CatalogsAction {
    /// Create a catalog
    Add {
        /// Catalog name
        name: String,
    },
    /// Delete a catalog and its images
    Rm {
        /// Catalog name
        name: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let defaults = Config::default_paths();
    let config = Config::new(
        cli.database.unwrap_or(defaults.database),
        cli.media_root.unwrap_or(defaults.media_root),
    );
    tracing::debug!(
        database = %config.database.display(),
        media_root = %config.media_root.display(),
        "opening gallery"
    );
    let gallery = Gallery::open(&config)?;
    let user = UserId(cli.user);

    match cli.command {
        Commands::Catalogs { action } => match action {
            None => commands::catalogs::list(&gallery, user)?,
            Some(CatalogsAction::Add { name }) => commands::catalogs::add(&gallery, user, &name)?,
            Some(CatalogsAction::Rm { name }) => commands::catalogs::rm(&gallery, user, &name)?,
        },
        Commands::Upload {
            file,
            name,
            catalog,
            description,
        } => commands::images::upload(&gallery, user, &file, name, catalog, description)?,
        Commands::Ls {
            catalog,
            sort,
            show,
            json,
        } => commands::images::ls(&gallery, user, &catalog, sort.as_deref(), &show, json)?,
        Commands::Rm { id } => commands::images::rm(&gallery, user, id)?,
        Commands::Exif { id } => commands::images::exif(&gallery, user, id)?,
    }

    Ok(())
}
