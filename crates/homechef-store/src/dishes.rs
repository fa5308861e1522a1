//! Catalog queries for [`Dish`] records.

use homechef_shared::CategoryTags;
use rusqlite::params;

use crate::database::{now_rfc3339, timestamp_at, Database};
use crate::error::{Result, StoreError};
use crate::models::{Dish, DishWithChef, Feedback, NewDish, SellerDish};

/// Dish columns in the order [`row_to_dish`] reads them. Queries alias
/// the dishes table as `d`.
pub(crate) const DISH_COLUMNS: &str = "d.id, d.name, d.price, d.category, d.description, \
                                       d.ingredients, d.instructions, d.image_path, d.chef_id, \
                                       d.created_at";
const DISH_COLUMN_COUNT: usize = 10;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a dish. An unknown `chef_id` fails with [`StoreError::ForeignKey`].
    pub fn insert_dish(&self, dish: &NewDish) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO dishes (name, price, category, description, ingredients, instructions,
                                 image_path, chef_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                dish.name,
                dish.price,
                dish.category.to_stored(),
                dish.description,
                dish.ingredients,
                dish.instructions,
                dish.image_path,
                dish.chef_id,
                now_rfc3339(),
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Every dish with its chef, newest first.
    pub fn list_dishes(&self) -> Result<Vec<DishWithChef>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {DISH_COLUMNS}, c.name, c.image_path
             FROM dishes d
             JOIN chefs c ON c.id = d.chef_id
             ORDER BY d.created_at DESC, d.id DESC"
        ))?;
        let rows = stmt.query_map([], row_to_dish_with_chef)?;

        let mut dishes = Vec::new();
        for row in rows {
            dishes.push(row?);
        }
        Ok(dishes)
    }

    pub fn get_dish(&self, id: i64) -> Result<DishWithChef> {
        let dish = self.conn().query_row(
            &format!(
                "SELECT {DISH_COLUMNS}, c.name, c.image_path
                 FROM dishes d
                 JOIN chefs c ON c.id = d.chef_id
                 WHERE d.id = ?1"
            ),
            params![id],
            row_to_dish_with_chef,
        )?;
        Ok(dish)
    }

    /// A seller's own dishes, each with its aggregated feedback.
    pub fn list_seller_dishes(&self, chef_id: i64) -> Result<Vec<SellerDish>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {DISH_COLUMNS}, f.id, f.customer_id, f.rating, f.comment, f.created_at
             FROM dishes d
             LEFT JOIN feedback f ON f.dish_id = d.id
             WHERE d.chef_id = ?1
             ORDER BY d.created_at DESC, d.id DESC, f.created_at ASC, f.id ASC"
        ))?;

        let mut rows = stmt.query(params![chef_id])?;
        let mut dishes: Vec<SellerDish> = Vec::new();

        while let Some(row) = rows.next()? {
            let dish_id: i64 = row.get(0)?;

            // rows arrive grouped by dish; start a new entry on each change
            if dishes.last().map(|d| d.dish.id) != Some(dish_id) {
                dishes.push(SellerDish {
                    dish: row_to_dish(row)?,
                    feedback: Vec::new(),
                    average_rating: None,
                });
            }

            let feedback_id: Option<i64> = row.get(DISH_COLUMN_COUNT)?;
            if let (Some(id), Some(entry)) = (feedback_id, dishes.last_mut()) {
                entry.feedback.push(Feedback {
                    id,
                    dish_id,
                    customer_id: row.get(DISH_COLUMN_COUNT + 1)?,
                    rating: row.get(DISH_COLUMN_COUNT + 2)?,
                    comment: row.get(DISH_COLUMN_COUNT + 3)?,
                    created_at: timestamp_at(row, DISH_COLUMN_COUNT + 4)?,
                });
            }
        }

        for entry in &mut dishes {
            entry.average_rating = average_rating(&entry.feedback);
        }

        Ok(dishes)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a dish by id. Returns `true` if a row was deleted.
    ///
    /// Saved recipes and feedback go with it; a dish that appears in any
    /// order is kept and the call fails with [`StoreError::Conflict`].
    pub fn delete_dish(&self, id: i64) -> Result<bool> {
        match self
            .conn()
            .execute("DELETE FROM dishes WHERE id = ?1", params![id])
            .map_err(StoreError::from)
        {
            Ok(affected) => Ok(affected > 0),
            Err(StoreError::ForeignKey) => Err(StoreError::Conflict(
                "dish is referenced by existing orders".to_string(),
            )),
            Err(e) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn average_rating(feedback: &[Feedback]) -> Option<f64> {
    if feedback.is_empty() {
        return None;
    }
    let total: i64 = feedback.iter().map(|f| f.rating).sum();
    Some(total as f64 / feedback.len() as f64)
}

/// Map the leading [`DISH_COLUMNS`] of a row to a [`Dish`].
pub(crate) fn row_to_dish(row: &rusqlite::Row<'_>) -> rusqlite::Result<Dish> {
    let category: String = row.get(3)?;

    Ok(Dish {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        category: CategoryTags::from_stored(&category),
        description: row.get(4)?,
        ingredients: row.get(5)?,
        instructions: row.get(6)?,
        image_path: row.get(7)?,
        chef_id: row.get(8)?,
        created_at: timestamp_at(row, 9)?,
    })
}

fn row_to_dish_with_chef(row: &rusqlite::Row<'_>) -> rusqlite::Result<DishWithChef> {
    Ok(DishWithChef {
        dish: row_to_dish(row)?,
        chef_name: row.get(DISH_COLUMN_COUNT)?,
        chef_image_path: row.get(DISH_COLUMN_COUNT + 1)?,
    })
}
