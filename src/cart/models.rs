//! Shopping Cart Domain Models
//!
//! This module contains the cart line type and the request bodies accepted
//! by the cart REST endpoints.

use crate::catalog::CatalogItem;
use crate::money::Money;
use serde::{Deserialize, Serialize};

// =============================================================================
// Cart Domain Models
// =============================================================================

/// A catalog item together with the quantity the shopper selected
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartLine {
    /// Catalog fields are flattened next to `quantity` on the wire
    #[serde(flatten)]
    pub item: CatalogItem,

    /// Always at least 1
    pub quantity: u32,
}

impl CartLine {
    pub(crate) fn new(item: CatalogItem) -> Self {
        Self { item, quantity: 1 }
    }

    pub fn id(&self) -> &'static str {
        self.item.id
    }

    /// `price × quantity` for this line
    pub fn subtotal(&self) -> Money {
        self.item.price * self.quantity
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Body for `POST /cart/items`
#[derive(Debug, Deserialize)]
pub struct AddItemInput {
    /// Catalog id of the item to add
    pub id: String,
}

/// Body for `PUT /cart/items/:id`
#[derive(Debug, Deserialize)]
pub struct SetQuantityInput {
    /// New absolute quantity; zero or below removes the line
    pub quantity: i64,
}
