use crate::registry::{FieldRegistry, Searchable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static REGISTRY: OnceLock<FieldRegistry> = OnceLock::new();

/// Purchase invoice still being prepared, before it is sent to the ERP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DraftPurchaseInvoice {
    pub id: i64,
    pub number: Option<String>,
    pub concept: Option<String>,
    pub fk_provider: Option<i64>,
    pub fk_invoice_service: Option<i64>,
    pub service_month: Option<NaiveDate>,
    pub awb: Option<String>,
    pub kg: Option<f64>,
    pub items: Option<i64>,
    pub unit_price: Option<f64>,
    pub currency: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub receipt_date: Option<NaiveDate>,
    pub fk_invoice: Option<i64>,
    pub state: Option<String>,
}

impl Searchable for DraftPurchaseInvoice {
    fn registry() -> &'static FieldRegistry {
        REGISTRY.get_or_init(|| {
            FieldRegistry::builder("DraftPurchaseInvoice", "draft_purchase_invoice")
                .max_limit(100)
                .integer("id")
                .text("number")
                .text("concept")
                .integer("fk_provider")
                .integer("fk_invoice_service")
                .date("service_month")
                .text("awb")
                .float("kg")
                .integer("items")
                .float("unit_price")
                .text("currency")
                .date("issue_date")
                .date("receipt_date")
                .integer("fk_invoice")
                .text("state")
                .build()
                .expect("draft purchase invoice registry is valid")
        })
    }
}
