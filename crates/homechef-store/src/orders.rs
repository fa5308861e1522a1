//! Order workflow persistence.
//!
//! An order and its line items are written in one transaction: either the
//! order row and every item row commit together, or nothing is written.
//! After creation the only mutation is a status change.
//!
//! Seller order listings fetch the items of every matching order with a
//! single `IN (...)` query and attach them by order id, so item attribution
//! never depends on row arrival order.

use std::collections::HashMap;

use homechef_shared::OrderStatus;
use rusqlite::{params, params_from_iter};

use crate::database::{now_rfc3339, parsed_at, timestamp_at, Database};
use crate::error::{Result, StoreError};
use crate::models::{NewOrder, Order, OrderDetail, OrderItem};

const ORDER_COLUMNS: &str = "o.id, o.customer_id, o.total_amount, o.delivery_address, \
                             o.delivery_time, o.payment_method, o.status, o.created_at";

const ITEM_SELECT: &str = "SELECT oi.id, oi.order_id, oi.dish_id, d.name, d.image_path, \
                                  oi.quantity, oi.price
                           FROM order_items oi
                           JOIN dishes d ON d.id = oi.dish_id";

/// Order ids bound per `IN (...)` query.
const ID_BATCH: usize = 500;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Place an order with its line items and return the new order id.
    ///
    /// The order starts as [`OrderStatus::InProgress`]. An unknown customer
    /// or dish fails with [`StoreError::ForeignKey`] and rolls back the
    /// whole order.
    pub fn place_order(&mut self, order: &NewOrder) -> Result<i64> {
        if order.items.is_empty() {
            return Err(StoreError::InvalidInput(
                "an order needs at least one item".to_string(),
            ));
        }

        let tx = self.conn_mut().transaction()?;

        tx.execute(
            "INSERT INTO orders (customer_id, total_amount, delivery_address, delivery_time,
                                 payment_method, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                order.customer_id,
                order.total_amount,
                order.delivery_address,
                order.delivery_time,
                order.payment_method,
                OrderStatus::InProgress.as_str(),
                now_rfc3339(),
            ],
        )?;
        let order_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO order_items (order_id, dish_id, quantity, price)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for item in &order.items {
                stmt.execute(params![order_id, item.dish_id, item.quantity, item.price])?;
            }
        }

        // dropping an uncommitted transaction rolls it back
        tx.commit()?;

        tracing::info!(
            order_id,
            customer_id = order.customer_id,
            items = order.items.len(),
            "order placed"
        );

        Ok(order_id)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_order(&self, id: i64) -> Result<Order> {
        let order = self.conn().query_row(
            &format!("SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = ?1"),
            params![id],
            row_to_order,
        )?;
        Ok(order)
    }

    /// The order row plus every line item, joined with dish name and image.
    pub fn get_order_detail(&self, id: i64) -> Result<OrderDetail> {
        let order = self.get_order(id)?;
        let items = self.list_order_items(id)?;
        Ok(OrderDetail { order, items })
    }

    pub fn list_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{ITEM_SELECT} WHERE oi.order_id = ?1 ORDER BY oi.id ASC"))?;
        let rows = stmt.query_map(params![order_id], row_to_item)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /// Every order that contains at least one of the chef's dishes, newest
    /// first, each with its full item list.
    ///
    /// Returns an empty list when the chef has no orders.
    pub fn list_seller_orders(&self, chef_id: i64) -> Result<Vec<OrderDetail>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM orders o
             WHERE o.id IN (
                 SELECT oi.order_id
                 FROM order_items oi
                 JOIN dishes d ON d.id = oi.dish_id
                 WHERE d.chef_id = ?1
             )
             ORDER BY o.created_at DESC, o.id DESC"
        ))?;
        let orders = stmt
            .query_map(params![chef_id], row_to_order)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let mut items_by_order = self.items_for_orders(&order_ids)?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                OrderDetail { order, items }
            })
            .collect())
    }

    /// Fetch the items of many orders, grouped by order id.
    ///
    /// Ids are bound in batches of [`ID_BATCH`] so the statement stays under
    /// SQLite's host-parameter limit however many orders a chef has.
    pub fn items_for_orders(&self, order_ids: &[i64]) -> Result<HashMap<i64, Vec<OrderItem>>> {
        let mut grouped: HashMap<i64, Vec<OrderItem>> = HashMap::new();

        for batch in order_ids.chunks(ID_BATCH) {
            let placeholders = vec!["?"; batch.len()].join(", ");
            let mut stmt = self.conn().prepare_cached(&format!(
                "{ITEM_SELECT} WHERE oi.order_id IN ({placeholders}) ORDER BY oi.order_id, oi.id"
            ))?;
            let rows = stmt.query_map(params_from_iter(batch.iter()), row_to_item)?;

            for row in rows {
                let item = row?;
                grouped.entry(item.order_id).or_default().push(item);
            }
        }
        Ok(grouped)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Move an order to `status`. Any state may follow any other, and
    /// re-applying the current state succeeds.
    pub fn update_order_status(&self, id: i64, status: OrderStatus) -> Result<()> {
        let affected = self.conn().execute(
            "UPDATE orders SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }

        tracing::info!(order_id = id, status = %status, "order status updated");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn row_to_order(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        total_amount: row.get(2)?,
        delivery_address: row.get(3)?,
        delivery_time: row.get(4)?,
        payment_method: row.get(5)?,
        status: parsed_at(row, 6)?,
        created_at: timestamp_at(row, 7)?,
    })
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderItem> {
    Ok(OrderItem {
        id: row.get(0)?,
        order_id: row.get(1)?,
        dish_id: row.get(2)?,
        dish_name: row.get(3)?,
        dish_image_path: row.get(4)?,
        quantity: row.get(5)?,
        price: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewOrderItem;
    use crate::testing::{new_chef, new_customer, new_dish};

    struct Fixture {
        db: Database,
        customer_id: i64,
        chef_a: i64,
        chef_b: i64,
        dishes_a: Vec<i64>,
        dish_b: i64,
    }

    fn fixture() -> Fixture {
        let db = Database::open_in_memory().unwrap();
        let customer_id = db.insert_customer(&new_customer("alice")).unwrap();
        let chef_a = db.insert_chef(&new_chef("amara")).unwrap();
        let chef_b = db.insert_chef(&new_chef("marco")).unwrap();
        let dishes_a = vec![
            db.insert_dish(&new_dish(chef_a, "Jollof", 12.0)).unwrap(),
            db.insert_dish(&new_dish(chef_a, "Suya", 8.0)).unwrap(),
        ];
        let dish_b = db.insert_dish(&new_dish(chef_b, "Risotto", 15.0)).unwrap();
        Fixture {
            db,
            customer_id,
            chef_a,
            chef_b,
            dishes_a,
            dish_b,
        }
    }

    fn order(customer_id: i64, items: Vec<NewOrderItem>) -> NewOrder {
        let total = items.iter().map(|i| i.price * i.quantity as f64).sum();
        NewOrder {
            customer_id,
            total_amount: total,
            delivery_address: "12 Harbour Rd".into(),
            delivery_time: "2025-03-01T18:30".into(),
            payment_method: "card".into(),
            items,
        }
    }

    fn item(dish_id: i64, quantity: i64, price: f64) -> NewOrderItem {
        NewOrderItem {
            dish_id,
            quantity,
            price,
        }
    }

    #[test]
    fn place_creates_one_order_and_n_items() {
        let mut f = fixture();
        let items = vec![
            item(f.dishes_a[0], 2, 12.0),
            item(f.dishes_a[1], 1, 8.0),
            item(f.dish_b, 3, 15.0),
        ];

        let id = f.db.place_order(&order(f.customer_id, items.clone())).unwrap();

        assert_eq!(f.db.count_rows("orders").unwrap(), 1);
        assert_eq!(f.db.count_rows("order_items").unwrap(), 3);

        let detail = f.db.get_order_detail(id).unwrap();
        assert_eq!(detail.order.status, OrderStatus::InProgress);
        assert_eq!(detail.order.total_amount, 77.0);

        let mut got: Vec<(i64, i64, f64)> = detail
            .items
            .iter()
            .map(|i| (i.dish_id, i.quantity, i.price))
            .collect();
        let mut want: Vec<(i64, i64, f64)> =
            items.iter().map(|i| (i.dish_id, i.quantity, i.price)).collect();
        got.sort_by_key(|t| t.0);
        want.sort_by_key(|t| t.0);
        assert_eq!(got, want);
        assert_eq!(detail.items[0].dish_name, "Jollof");
    }

    #[test]
    fn empty_order_writes_nothing() {
        let mut f = fixture();
        let err = f.db.place_order(&order(f.customer_id, vec![])).unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert_eq!(f.db.count_rows("orders").unwrap(), 0);
    }

    #[test]
    fn bad_item_rolls_back_order_row() {
        let mut f = fixture();
        let items = vec![item(f.dishes_a[0], 1, 12.0), item(9_999, 1, 1.0)];

        let err = f.db.place_order(&order(f.customer_id, items)).unwrap_err();

        assert!(matches!(err, StoreError::ForeignKey));
        assert_eq!(f.db.count_rows("orders").unwrap(), 0);
        assert_eq!(f.db.count_rows("order_items").unwrap(), 0);
    }

    #[test]
    fn unknown_customer_rolls_back() {
        let mut f = fixture();
        let err = f
            .db
            .place_order(&order(4_242, vec![item(f.dish_b, 1, 15.0)]))
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey));
        assert_eq!(f.db.count_rows("orders").unwrap(), 0);
    }

    #[test]
    fn captured_price_survives_catalog_change() {
        let mut f = fixture();
        let id = f
            .db
            .place_order(&order(f.customer_id, vec![item(f.dish_b, 1, 15.0)]))
            .unwrap();

        f.db.conn()
            .execute("UPDATE dishes SET price = 99.0 WHERE id = ?1", params![f.dish_b])
            .unwrap();

        let detail = f.db.get_order_detail(id).unwrap();
        assert_eq!(detail.items[0].price, 15.0);
    }

    #[test]
    fn detail_of_missing_order_is_not_found() {
        let f = fixture();
        assert!(matches!(f.db.get_order_detail(1), Err(StoreError::NotFound)));
    }

    #[test]
    fn seller_orders_attribute_items_by_order_id() {
        let mut f = fixture();
        let o1 = f
            .db
            .place_order(&order(f.customer_id, vec![item(f.dishes_a[0], 1, 12.0)]))
            .unwrap();
        let o2 = f
            .db
            .place_order(&order(
                f.customer_id,
                vec![item(f.dish_b, 2, 15.0), item(f.dishes_a[1], 4, 8.0)],
            ))
            .unwrap();
        let o3 = f
            .db
            .place_order(&order(
                f.customer_id,
                vec![item(f.dishes_a[1], 1, 8.0), item(f.dishes_a[0], 5, 12.0)],
            ))
            .unwrap();
        // chef A has nothing in this one
        f.db.place_order(&order(f.customer_id, vec![item(f.dish_b, 1, 15.0)]))
            .unwrap();

        let orders = f.db.list_seller_orders(f.chef_a).unwrap();
        assert_eq!(orders.len(), 3);

        let ids: Vec<i64> = orders.iter().map(|o| o.order.id).collect();
        assert_eq!(ids, vec![o3, o2, o1]);

        for detail in &orders {
            assert!(detail.items.iter().all(|i| i.order_id == detail.order.id));
        }

        let by_id: HashMap<i64, &OrderDetail> = orders.iter().map(|o| (o.order.id, o)).collect();
        assert_eq!(by_id[&o1].items.len(), 1);
        // full item list, including the other chef's dish
        assert_eq!(by_id[&o2].items.len(), 2);
        assert!(by_id[&o2].items.iter().any(|i| i.dish_id == f.dish_b));
        assert_eq!(
            by_id[&o3].items.iter().map(|i| i.quantity).collect::<Vec<_>>(),
            vec![1, 5]
        );
    }

    #[test]
    fn seller_orders_beyond_parameter_limit() {
        let f = fixture();
        // more orders than SQLite accepts bound parameters in one statement
        let order_count: i64 = 33_000;
        let dish = f.dishes_a[0];
        let created_at = now_rfc3339();
        {
            let conn = f.db.conn();
            conn.execute_batch("BEGIN").unwrap();
            let mut insert_order = conn
                .prepare(
                    "INSERT INTO orders (customer_id, total_amount, delivery_address, delivery_time,
                                         payment_method, status, created_at)
                     VALUES (?1, 12.0, 'x', 'y', 'cash', 'In Progress', ?2)",
                )
                .unwrap();
            let mut insert_item = conn
                .prepare(
                    "INSERT INTO order_items (order_id, dish_id, quantity, price)
                     VALUES (?1, ?2, 1, 12.0)",
                )
                .unwrap();
            for _ in 0..order_count {
                insert_order
                    .execute(params![f.customer_id, created_at])
                    .unwrap();
                insert_item
                    .execute(params![conn.last_insert_rowid(), dish])
                    .unwrap();
            }
            conn.execute_batch("COMMIT").unwrap();
        }

        let orders = f.db.list_seller_orders(f.chef_a).unwrap();
        assert_eq!(orders.len() as i64, order_count);
        assert!(orders
            .iter()
            .all(|d| d.items.len() == 1 && d.items[0].order_id == d.order.id));
    }

    #[test]
    fn seller_without_orders_is_empty() {
        let f = fixture();
        assert!(f.db.list_seller_orders(f.chef_b).unwrap().is_empty());
        assert!(f.db.items_for_orders(&[]).unwrap().is_empty());
    }

    #[test]
    fn status_any_to_any_and_idempotent() {
        let mut f = fixture();
        let id = f
            .db
            .place_order(&order(f.customer_id, vec![item(f.dish_b, 1, 15.0)]))
            .unwrap();

        for status in [
            OrderStatus::Delivered,
            OrderStatus::Delivered,
            OrderStatus::InProgress,
            OrderStatus::OutForDelivery,
            OrderStatus::Ready,
        ] {
            f.db.update_order_status(id, status).unwrap();
            assert_eq!(f.db.get_order(id).unwrap().status, status);
        }
    }

    #[test]
    fn status_of_missing_order_is_not_found() {
        let f = fixture();
        assert!(matches!(
            f.db.update_order_status(31, OrderStatus::Ready),
            Err(StoreError::NotFound)
        ));
    }
}
