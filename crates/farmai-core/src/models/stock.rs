//! Farm stock inventory models.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stock category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockCategory {
    Crops,
    Livestock,
    Poultry,
    Equipment,
    Supplies,
}

impl StockCategory {
    pub const ALL: [StockCategory; 5] = [
        Self::Crops,
        Self::Livestock,
        Self::Poultry,
        Self::Equipment,
        Self::Supplies,
    ];

    /// Stable key (e.g., "poultry").
    pub fn key(&self) -> &'static str {
        match self {
            Self::Crops => "crops",
            Self::Livestock => "livestock",
            Self::Poultry => "poultry",
            Self::Equipment => "equipment",
            Self::Supplies => "supplies",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// Fields supplied when adding a stock item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStockItem {
    pub category: StockCategory,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// A tracked stock item owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockItem {
    pub id: String,
    pub user_id: String,
    pub category: StockCategory,
    pub name: String,
    pub quantity: f64,
    /// Unit (e.g., "kg", "animals", "birds")
    pub unit: String,
    pub last_updated: NaiveDate,
}

impl StockItem {
    /// Build a stored item from user input.
    pub fn from_new(user_id: &str, item: NewStockItem) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            category: item.category,
            name: item.name.trim().to_string(),
            quantity: item.quantity,
            unit: item.unit.trim().to_string(),
            last_updated: Utc::now().date_naive(),
        }
    }

    /// Refresh the last-updated date.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now().date_naive();
    }
}
