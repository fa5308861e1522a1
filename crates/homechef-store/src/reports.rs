//! Read-only aggregate views for the admin surface.

use crate::database::{parsed_at, timestamp_at, Database};
use crate::error::Result;
use crate::models::AdminOrderRow;

/// ASCII unit separator; cannot appear in a dish name typed into a form.
const NAME_SEPARATOR: char = '\u{1f}';

impl Database {
    /// All orders, one row per (order, chef) pair, with the names of that
    /// chef's dishes in the order.
    pub fn admin_order_rows(&self) -> Result<Vec<AdminOrderRow>> {
        let mut stmt = self.conn().prepare(
            "SELECT o.id, o.customer_id, c.name, ch.id, ch.name,
                    group_concat(d.name, char(31)),
                    o.total_amount, o.status, o.created_at
             FROM orders o
             JOIN customers c ON c.id = o.customer_id
             JOIN order_items oi ON oi.order_id = o.id
             JOIN dishes d ON d.id = oi.dish_id
             JOIN chefs ch ON ch.id = d.chef_id
             GROUP BY o.id, ch.id
             ORDER BY o.created_at DESC, o.id DESC, ch.id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let names: String = row.get(5)?;
            Ok(AdminOrderRow {
                order_id: row.get(0)?,
                customer_id: row.get(1)?,
                customer_name: row.get(2)?,
                chef_id: row.get(3)?,
                chef_name: row.get(4)?,
                dish_names: names.split(NAME_SEPARATOR).map(str::to_string).collect(),
                total_amount: row.get(6)?,
                status: parsed_at(row, 7)?,
                created_at: timestamp_at(row, 8)?,
            })
        })?;

        let mut report = Vec::new();
        for row in rows {
            report.push(row?);
        }
        Ok(report)
    }
}
