//! Entities served by the shared search engine.
mod draft_purchase_invoice;
mod product;

pub use draft_purchase_invoice::DraftPurchaseInvoice;
pub use product::Product;
