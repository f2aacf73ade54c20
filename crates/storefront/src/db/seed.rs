//! Demo catalog seeding.

use sqlx::PgPool;

use hbr_pharmacy_core::Price;

use super::RepositoryError;

/// A product inserted by [`seed_catalog`].
#[derive(Debug, Clone, Copy)]
pub struct SeedProduct {
    pub name: &'static str,
    pub price_cents: u32,
    pub image: &'static str,
}

/// The six products every fresh install starts with.
pub const SEED_PRODUCTS: [SeedProduct; 6] = [
    SeedProduct {
        name: "Paracetamol 750mg",
        price_cents: 1250,
        image: "remedio1.webp",
    },
    SeedProduct {
        name: "Vitamina C",
        price_cents: 3590,
        image: "remedio2.webp",
    },
    SeedProduct {
        name: "Dipirona Mono",
        price_cents: 820,
        image: "remedio3.webp",
    },
    SeedProduct {
        name: "Protetor Solar",
        price_cents: 6500,
        image: "remedio4.webp",
    },
    SeedProduct {
        name: "Dorflex 30cp",
        price_cents: 2290,
        image: "remedio5.webp",
    },
    SeedProduct {
        name: "Ômega 3",
        price_cents: 8990,
        image: "remedio6.webp",
    },
];

/// Insert [`SEED_PRODUCTS`] if the catalog is empty.
///
/// Runs in a single transaction; the emptiness check and the inserts commit
/// together. Returns the number of products inserted (0 when the catalog
/// already had rows).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any statement fails.
pub async fn seed_catalog(pool: &PgPool) -> Result<u64, RepositoryError> {
    let mut tx = pool.begin().await?;

    // Serialize concurrent seeders so two fresh instances can't both insert.
    sqlx::query("LOCK TABLE pharmacy.products IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut *tx)
        .await?;

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pharmacy.products")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        tx.rollback().await?;
        return Ok(0);
    }

    let mut inserted = 0;
    for product in &SEED_PRODUCTS {
        inserted += sqlx::query(
            "INSERT INTO pharmacy.products (name, price, image) VALUES ($1, $2, $3)",
        )
        .bind(product.name)
        .bind(Price::from_cents(product.price_cents))
        .bind(product.image)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;
    tracing::info!(count = inserted, "Seeded product catalog");
    Ok(inserted)
}
