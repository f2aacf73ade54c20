//! Catalog product.

use serde::{Deserialize, Serialize};

use hbr_pharmacy_core::{Price, ProductId};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in BRL.
    pub price: Price,
    /// File name under `/static/images/`.
    pub image: String,
}

impl Product {
    /// Path the image is served from.
    #[must_use]
    pub fn image_url(&self) -> String {
        format!("/static/images/{}", self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url() {
        let product = Product {
            id: ProductId::new(1),
            name: "Paracetamol 750mg".to_string(),
            price: Price::from_cents(1250),
            image: "remedio1.webp".to_string(),
        };
        assert_eq!(product.image_url(), "/static/images/remedio1.webp");
    }
}
