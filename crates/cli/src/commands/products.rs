//! Catalog inspection.

use hbr_pharmacy_storefront::db::ProductRepository;

use super::{CommandError, connect};

/// Print one line per product: id, price, name and image file.
pub async fn list() -> Result<(), CommandError> {
    let pool = connect().await?;
    let products = ProductRepository::new(&pool).list_all().await?;

    if products.is_empty() {
        tracing::warn!("Catalog is empty; run `hbr-cli db seed`");
        return Ok(());
    }

    #[allow(clippy::print_stdout)]
    {
        for product in &products {
            println!(
                "{:>4}  {:>12}  {}  ({})",
                product.id.to_string(),
                product.price.display(),
                product.name,
                product.image
            );
        }
    }
    Ok(())
}
