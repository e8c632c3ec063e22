use serde::{Deserialize, Serialize};

use crate::cart::{clamp_quantity, CartItem};

/// Response body of `GET /product-detail/{id}`.
///
/// Only `id`, `name` and `price` are required; catalog feeds frequently omit
/// the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub id: String,
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub seller: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub available_on_cod: bool,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ProductDetail {
    /// Builds a cart line for this product; the quantity is clamped.
    #[must_use]
    pub fn to_cart_item(&self, quantity: u32) -> CartItem {
        CartItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price.clone(),
            seller: self.seller.clone(),
            image: self.image.clone(),
            quantity: clamp_quantity(quantity),
            available_on_cod: self.available_on_cod,
            provider_id: self.provider_id.clone(),
            location_id: self.location_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_cart_item_copies_fields_and_clamps() {
        let detail: ProductDetail = serde_json::from_value(serde_json::json!({
            "id": "sku-9",
            "name": "Basmati Rice 5kg",
            "price": "₹649",
            "seller": "Fresh Mart",
            "available_on_cod": true,
            "provider_id": "P1",
            "location_id": "L1"
        }))
        .unwrap();
        let item = detail.to_cart_item(0);
        assert_eq!(item.id, "sku-9");
        assert_eq!(item.quantity, 1);
        assert!(item.available_on_cod);
        assert_eq!(item.provider_id.as_deref(), Some("P1"));
        assert_eq!(item.image, "");
    }
}
