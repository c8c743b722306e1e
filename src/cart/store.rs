//! Cart Store
//!
//! Ordered, in-memory cart lines. Every operation here is pure state
//! manipulation; notifications are left to the caller.

use super::models::CartLine;
use crate::catalog::CatalogItem;
use crate::money::Money;

/// A shopper's in-progress selection, one line per catalog id in the order
/// items were first added.
///
/// No line ever holds a quantity of zero: reducing a quantity to zero or
/// below removes the line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `item`.
    ///
    /// An existing line for the same id has its quantity incremented;
    /// otherwise a new line with quantity 1 is appended.
    pub fn add_item(&mut self, item: &CatalogItem) -> &CartLine {
        let index = match self.position(item.id) {
            Some(index) => {
                let line = &mut self.lines[index];
                line.quantity = line.quantity.saturating_add(1);
                index
            }
            None => {
                self.lines.push(CartLine::new(*item));
                self.lines.len() - 1
            }
        };
        &self.lines[index]
    }

    /// Removes the line for `id`. Returns `false` when there was none.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|line| line.id() != id);
        self.lines.len() < len_before
    }

    /// Sets the quantity of the line for `id` to exactly `quantity`.
    ///
    /// A quantity of zero or below removes the line. Returns `false` when no
    /// line exists for `id`.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(id);
        }

        match self.position(id) {
            Some(index) => {
                self.lines[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price × quantity` over all lines.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities across all lines (the cart badge number).
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.id() == id)
    }
}
