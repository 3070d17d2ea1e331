//! Read-only access to inventory and classification rows.
//!
//! Both tables belong to the inventory subsystem; review pages only need a
//! vehicle lookup by id and the classification list for the navigation menu.

use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::{error, info_span, Instrument};

#[derive(Debug, Clone)]
pub struct InventoryItem {
    pub inv_id: i32,
    pub inv_year: String,
    pub inv_make: String,
    pub inv_model: String,
    pub inv_description: String,
    pub inv_thumbnail: String,
    pub inv_price: f64,
    pub inv_miles: i32,
    pub inv_color: String,
}

impl InventoryItem {
    /// "2019 Jeep Wrangler"
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.inv_year.trim(), self.inv_make, self.inv_model)
    }

    /// Price with thousands separators, "$25,000".
    #[must_use]
    pub fn price_label(&self) -> String {
        let whole = format!("{:.0}", self.inv_price.abs());
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (index, digit) in whole.chars().enumerate() {
            if index > 0 && (whole.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        format!("${grouped}")
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            inv_id: row.try_get("inv_id")?,
            inv_year: row.try_get("inv_year")?,
            inv_make: row.try_get("inv_make")?,
            inv_model: row.try_get("inv_model")?,
            inv_description: row.try_get("inv_description")?,
            inv_thumbnail: row.try_get("inv_thumbnail")?,
            inv_price: row.try_get("inv_price")?,
            inv_miles: row.try_get("inv_miles")?,
            inv_color: row.try_get("inv_color")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NavItem {
    pub classification_id: i32,
    pub classification_name: String,
}

/// Look up a vehicle by id.
pub async fn find_inventory(
    pool: &PgPool,
    inv_id: i32,
) -> Result<Option<InventoryItem>, sqlx::Error> {
    let query = r"
        SELECT inv_id, inv_year, inv_make, inv_model, inv_description,
               inv_thumbnail, inv_price::float8 AS inv_price, inv_miles, inv_color
        FROM inventory
        WHERE inv_id = $1
    ";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(inv_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .map_err(|err| {
            error!("Error getting inventory item {inv_id}: {err}");
            err
        })?;

    row.as_ref().map(InventoryItem::from_row).transpose()
}

/// Classifications for the navigation menu, alphabetical.
pub async fn fetch_nav(pool: &PgPool) -> Result<Vec<NavItem>, sqlx::Error> {
    let query = r"
        SELECT classification_id, classification_name
        FROM classification
        ORDER BY classification_name
    ";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .map_err(|err| {
            error!("Error getting classifications: {err}");
            err
        })?;

    rows.iter()
        .map(|row| {
            Ok(NavItem {
                classification_id: row.try_get("classification_id")?,
                classification_name: row.try_get("classification_name")?,
            })
        })
        .collect()
}
