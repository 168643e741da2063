use crate::registry::{FieldRegistry, Searchable};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static REGISTRY: OnceLock<FieldRegistry> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub barcode: Option<String>,
    pub cost_price: f64,
    pub sale_price: f64,
    pub quantity_on_hand: i64,
    pub quantity_reserved: i64,
    pub unit_of_measure: String,
    pub is_active: bool,
}

impl Searchable for Product {
    fn registry() -> &'static FieldRegistry {
        REGISTRY.get_or_init(|| {
            FieldRegistry::builder("Product", "product")
                .max_limit(5000)
                .integer("id")
                .text("sku")
                .text("name")
                .text("description")
                .text("category")
                .text("barcode")
                .float("cost_price")
                .float("sale_price")
                .integer("quantity_on_hand")
                .integer("quantity_reserved")
                .text("unit_of_measure")
                .boolean("is_active")
                .build()
                .expect("product registry is valid")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::setup_test_db;
    use crate::types::{FilterCriterion, SearchRequest};
    use crate::{Database, Operator};

    async fn insert_product(db: &Database, sku: &str, name: &str, price: f64, active: bool) {
        sqlx::query(
            "INSERT INTO product (sku, name, category, sale_price, quantity_on_hand, quantity_reserved, is_active) VALUES (?, ?, 'tools', ?, 5, 2, ?)",
        )
        .bind(sku)
        .bind(name)
        .bind(price)
        .bind(active)
        .execute(db.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_smart_search_ignores_accents_and_case() {
        let db = setup_test_db().await;
        insert_product(&db, "SKU-1", "Martillo de Acero Pequeño", 10.0, true).await;
        insert_product(&db, "SKU-2", "Destornillador pequeno", 5.0, true).await;
        insert_product(&db, "SKU-3", "Martillo grande", 25.0, true).await;

        let request = SearchRequest::new(
            vec![FilterCriterion::new("name", Operator::SmartSearch, "PEQUEÑO")],
            20,
            0,
        );
        let result = db.search::<Product>(&request).await.unwrap();
        let skus: Vec<_> = result.items.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["SKU-1", "SKU-2"]);

        let request = SearchRequest::new(
            vec![FilterCriterion::new("name", Operator::SmartSearch, "martillo pequeno")],
            20,
            0,
        );
        let result = db.search::<Product>(&request).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].sku, "SKU-1");
    }

    #[tokio::test]
    async fn test_boolean_and_price_filters() {
        let db = setup_test_db().await;
        insert_product(&db, "SKU-1", "Hammer", 10.0, true).await;
        insert_product(&db, "SKU-2", "Saw", 30.0, false).await;
        insert_product(&db, "SKU-3", "Drill", 80.0, true).await;

        let request = SearchRequest::new(
            vec![
                FilterCriterion::new("is_active", Operator::Eq, true),
                FilterCriterion::new("sale_price", Operator::Lt, 50.0),
            ],
            20,
            0,
        );
        let result = db.search::<Product>(&request).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].name, "Hammer");
        assert_eq!(result.items[0].quantity_reserved, 2);
    }

    #[tokio::test]
    async fn test_contains_on_boolean_column() {
        let db = setup_test_db().await;
        insert_product(&db, "SKU-1", "Hammer", 10.0, true).await;
        insert_product(&db, "SKU-2", "Saw", 30.0, false).await;

        let request = SearchRequest::new(
            vec![FilterCriterion::new("is_active", Operator::Contains, true)],
            20,
            0,
        );
        let result = db.search::<Product>(&request).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].sku, "SKU-1");

        let request = SearchRequest::new(
            vec![FilterCriterion::new("is_active", Operator::NotContains, true)],
            20,
            0,
        );
        let result = db.search::<Product>(&request).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].sku, "SKU-2");
    }

    #[tokio::test]
    async fn test_large_page_size_allowed_for_products() {
        let db = setup_test_db().await;
        let request = SearchRequest::new(vec![], 5000, 0);
        let result = db.search::<Product>(&request).await.unwrap();
        assert_eq!(result.total, 0);
        assert!(result.items.is_empty());
    }
}
