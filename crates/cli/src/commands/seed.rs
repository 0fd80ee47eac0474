//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! products:
//!   - name: Widget
//!     price: 9.99
//!     description: A very useful widget
//!     image: widget.png   # optional, file name inside the upload directory
//! ```
//!
//! Products whose name is already in the catalog are skipped, so running
//! the command twice doesn't duplicate anything.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use corner_shop_core::Product;
use corner_shop_storefront::db::{
    self, FindQuery, RecordStore, RepositoryError, find_documents, insert_document,
    postgres::PgRecordStore,
};

use super::database_url;

/// Contents of a catalog seed file.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub products: Vec<Product>,
}

/// Outcome of a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Insert products, skipping names that already exist.
///
/// # Errors
///
/// Returns the store's error if a lookup or insert fails.
pub async fn seed_products(
    store: &dyn RecordStore,
    products: &[Product],
) -> Result<SeedSummary, RepositoryError> {
    let mut summary = SeedSummary::default();

    for product in products {
        let existing =
            find_documents::<Product>(store, &FindQuery::all().eq("name", product.name.as_str()))
                .await?;
        if existing.is_empty() {
            let id = insert_document(store, product).await?;
            info!(product_id = %id, name = %product.name, "Inserted product");
            summary.inserted += 1;
        } else {
            info!(name = %product.name, "Product already exists, skipping");
            summary.skipped += 1;
        }
    }

    Ok(summary)
}

/// Seed catalog products from a YAML file.
///
/// # Errors
///
/// Returns an error if the file can't be read or parsed, the database URL is
/// missing, or database operations fail.
pub async fn products(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    // Parse before connecting so a bad file fails fast
    let content = tokio::fs::read_to_string(path).await?;
    let catalog: CatalogFile = serde_yaml::from_str(&content)?;
    info!(path = %file_path, products = catalog.products.len(), "Parsed catalog");

    let pool = db::create_pool(&database_url()?).await?;
    let store = PgRecordStore::new(pool);

    let summary = seed_products(&store, &catalog.products).await?;
    info!("Seeding complete!");
    info!("  Products inserted: {}", summary.inserted);
    info!("  Products skipped (already exist): {}", summary.skipped);

    Ok(())
}
