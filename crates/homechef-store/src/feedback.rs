use rusqlite::params;

use crate::database::{now_rfc3339, Database};
use crate::error::{Result, StoreError};
use crate::models::NewFeedback;

impl Database {
    /// Record feedback for a dish. Unknown dish is [`StoreError::NotFound`];
    /// unknown customer is [`StoreError::ForeignKey`].
    pub fn insert_feedback(&self, feedback: &NewFeedback) -> Result<i64> {
        if !self.dish_exists(feedback.dish_id)? {
            return Err(StoreError::NotFound);
        }

        self.conn().execute(
            "INSERT INTO feedback (dish_id, customer_id, rating, comment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                feedback.dish_id,
                feedback.customer_id,
                feedback.rating,
                feedback.comment,
                now_rfc3339(),
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn dish_exists(&self, dish_id: i64) -> Result<bool> {
        let exists = self.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM dishes WHERE id = ?1)",
            params![dish_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}
