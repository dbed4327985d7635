//! Per-user farm stock inventory.

use super::{get_json, require_user, set_json, KeyValueStore, StoreError, StoreResult};
use crate::models::{NewStockItem, StockCategory, StockItem};

pub const STOCK_PREFIX: &str = "stockItems-";

/// Stock items owned by one user, in insertion order.
pub struct StockLedger<'a> {
    kv: &'a dyn KeyValueStore,
}

impl<'a> StockLedger<'a> {
    pub fn new(kv: &'a dyn KeyValueStore) -> Self {
        Self { kv }
    }

    fn key(user_id: &str) -> StoreResult<String> {
        Ok(format!("{}{}", STOCK_PREFIX, require_user(user_id)?))
    }

    fn load(&self, key: &str) -> StoreResult<Vec<StockItem>> {
        Ok(get_json(self.kv, key)?.unwrap_or_default())
    }

    /// Add an item for a user.
    pub fn add(&self, user_id: &str, item: NewStockItem) -> StoreResult<StockItem> {
        validate(&item.name, &item.unit, item.quantity)?;
        let key = Self::key(user_id)?;

        let item = StockItem::from_new(user_id.trim(), item);
        let mut items = self.load(&key)?;
        items.push(item.clone());
        set_json(self.kv, &key, &items)?;

        tracing::info!(user = user_id, item = %item.id, category = item.category.key(), "Added stock item");
        Ok(item)
    }

    /// Replace an item's editable fields. Returns whether it existed.
    pub fn update(&self, user_id: &str, item: &StockItem) -> StoreResult<bool> {
        validate(&item.name, &item.unit, item.quantity)?;
        let key = Self::key(user_id)?;
        let mut items = self.load(&key)?;

        let Some(existing) = items.iter_mut().find(|i| i.id == item.id) else {
            return Ok(false);
        };
        existing.category = item.category;
        existing.name = item.name.trim().to_string();
        existing.quantity = item.quantity;
        existing.unit = item.unit.trim().to_string();
        existing.touch();

        set_json(self.kv, &key, &items)?;
        Ok(true)
    }

    /// Delete an item. Missing IDs are a no-op.
    pub fn remove(&self, user_id: &str, item_id: &str) -> StoreResult<bool> {
        let key = Self::key(user_id)?;
        let mut items = self.load(&key)?;
        let before = items.len();
        items.retain(|i| i.id != item_id);
        if items.len() == before {
            return Ok(false);
        }
        set_json(self.kv, &key, &items)?;
        Ok(true)
    }

    /// Items, optionally restricted to one category.
    pub fn list(&self, user_id: &str, category: Option<StockCategory>) -> StoreResult<Vec<StockItem>> {
        let key = Self::key(user_id)?;
        let items = self.load(&key)?;
        Ok(match category {
            Some(c) => items.into_iter().filter(|i| i.category == c).collect(),
            None => items,
        })
    }
}

fn validate(name: &str, unit: &str, quantity: f64) -> StoreResult<()> {
    if name.trim().is_empty() || unit.trim().is_empty() {
        return Err(StoreError::InvalidInput("name and unit are required".into()));
    }
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(StoreError::InvalidInput(format!("invalid quantity: {}", quantity)));
    }
    Ok(())
}
