//! Catalog Domain Models
//!
//! The catalog is defined at compile time and never changes while the
//! process runs. Item ids are unique.

use crate::money::Money;
use serde::Serialize;

/// A purchasable item shown on the landing page
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Unique identifier
    pub id: &'static str,

    /// Display name
    pub name: &'static str,

    /// Display category (Hardware, Software, Services)
    pub category: &'static str,

    /// Short marketing copy
    pub description: &'static str,

    /// Unit price
    pub price: Money,

    /// Display asset URL
    pub image: &'static str,

    /// Availability flag; shown on the page, does not block adding to cart
    pub in_stock: bool,
}

static CATALOG: [CatalogItem; 6] = [
    CatalogItem {
        id: "1",
        name: "Field Tablet Pro",
        category: "Hardware",
        description: "Rugged 10-inch tablet preloaded with job tracking and digital sign-off.",
        price: Money::from_cents(45_000),
        image: "/images/catalog/field-tablet-pro.png",
        in_stock: true,
    },
    CatalogItem {
        id: "2",
        name: "Smart Time Clock",
        category: "Hardware",
        description: "Wall-mounted badge and PIN clock that syncs shifts in real time.",
        price: Money::from_cents(32_000),
        image: "/images/catalog/smart-time-clock.png",
        in_stock: true,
    },
    CatalogItem {
        id: "3",
        name: "Job Barcode Scanner",
        category: "Hardware",
        description: "Bluetooth scanner for checking parts and work orders in and out.",
        price: Money::from_cents(12_999),
        image: "/images/catalog/job-barcode-scanner.png",
        in_stock: true,
    },
    CatalogItem {
        id: "4",
        name: "PDF Automation Pack",
        category: "Software",
        description: "Templates that turn completed jobs into invoices and reports automatically.",
        price: Money::from_cents(18_575),
        image: "/images/catalog/pdf-automation-pack.png",
        in_stock: true,
    },
    CatalogItem {
        id: "5",
        name: "Thermal Label Printer",
        category: "Hardware",
        description: "Prints job tickets and asset labels straight from the dispatch board.",
        price: Money::from_cents(24_950),
        image: "/images/catalog/thermal-label-printer.png",
        in_stock: false,
    },
    CatalogItem {
        id: "6",
        name: "Onboarding Workshop",
        category: "Services",
        description: "Half-day remote session to import crews, customers and job templates.",
        price: Money::from_cents(60_000),
        image: "/images/catalog/onboarding-workshop.png",
        in_stock: true,
    },
];

/// Returns every catalog item in display order
pub fn catalog() -> &'static [CatalogItem] {
    &CATALOG
}

/// Looks up a catalog item by id
pub fn find_item(id: &str) -> Option<&'static CatalogItem> {
    CATALOG.iter().find(|item| item.id == id)
}
