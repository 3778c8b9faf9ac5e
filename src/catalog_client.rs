use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};

/// One menu entry as the catalog currently advertises it. Prices always come
/// from here, never from the client's cart.
#[derive(Debug, Deserialize, FromRow, Clone)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    pub price: BigDecimal,
    pub available: bool,
}

/// Read-only gateway to the menu catalog owned by the menu management
/// service. Lookups are always scoped to a single restaurant.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn lookup_items(
        &self,
        restaurant_id: i64,
        item_ids: &[i64],
    ) -> Result<Vec<CatalogItem>, anyhow::Error>;
}

pub struct PgCatalogService {
    pool: PgPool,
}

impl PgCatalogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    #[tracing::instrument(name = "Lookup catalog items", skip(self))]
    async fn lookup_items(
        &self,
        restaurant_id: i64,
        item_ids: &[i64],
    ) -> Result<Vec<CatalogItem>, anyhow::Error> {
        let rows = sqlx::query_as::<_, CatalogItem>(
            r#"
            SELECT id, name, price, available
            FROM menu_items
            WHERE id = ANY($1) AND restaurant_id = $2
            "#,
        )
        .bind(item_ids)
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e)
                .context("A database failure occurred while fetching catalog items")
        })?;

        Ok(rows)
    }
}
