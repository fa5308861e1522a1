//! Recipe bookmarks: one row per (customer, dish) pair.

use homechef_shared::CategoryTags;
use rusqlite::params;

use crate::database::{now_rfc3339, timestamp_at, Database};
use crate::error::{Result, StoreError};
use crate::models::SavedRecipe;

impl Database {
    /// Bookmark a dish for a customer.
    ///
    /// An existing pair is rejected with [`StoreError::Conflict`] rather than
    /// overwritten. The unique index backs the pre-check, so a racing
    /// duplicate fails the same way.
    pub fn save_recipe(&self, customer_id: i64, dish_id: i64) -> Result<i64> {
        let exists: bool = self.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM saved_recipes WHERE customer_id = ?1 AND dish_id = ?2)",
            params![customer_id, dish_id],
            |row| row.get(0),
        )?;
        if exists {
            return Err(StoreError::Conflict("recipe already saved".to_string()));
        }

        self.conn().execute(
            "INSERT INTO saved_recipes (customer_id, dish_id, saved_at) VALUES (?1, ?2, ?3)",
            params![customer_id, dish_id, now_rfc3339()],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    /// A customer's saved dishes, most recently saved first.
    pub fn list_saved_recipes(&self, customer_id: i64) -> Result<Vec<SavedRecipe>> {
        let mut stmt = self.conn().prepare(
            "SELECT d.id, d.name, d.price, d.category, d.description, d.image_path,
                    c.name, s.saved_at
             FROM saved_recipes s
             JOIN dishes d ON d.id = s.dish_id
             JOIN chefs c ON c.id = d.chef_id
             WHERE s.customer_id = ?1
             ORDER BY s.saved_at DESC, s.id DESC",
        )?;

        let rows = stmt.query_map(params![customer_id], |row| {
            let category: String = row.get(3)?;
            Ok(SavedRecipe {
                dish_id: row.get(0)?,
                name: row.get(1)?,
                price: row.get(2)?,
                category: CategoryTags::from_stored(&category),
                description: row.get(4)?,
                image_path: row.get(5)?,
                chef_name: row.get(6)?,
                saved_at: timestamp_at(row, 7)?,
            })
        })?;

        let mut saved = Vec::new();
        for row in rows {
            saved.push(row?);
        }
        Ok(saved)
    }
}
