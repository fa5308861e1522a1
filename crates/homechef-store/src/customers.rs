//! Queries for [`Customer`] records.

use homechef_shared::Role;
use rusqlite::{params, OptionalExtension};

use crate::database::{now_rfc3339, timestamp_at, Database};
use crate::error::Result;
use crate::models::{Credentials, Customer, CustomerUpdate, NewCustomer};

const CUSTOMER_COLUMNS: &str = "id, name, email, phone, joined_at";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a customer and return the generated id.
    ///
    /// No duplicate pre-check: a reused email is rejected by the unique
    /// index and surfaces as [`StoreError::Conflict`](crate::StoreError::Conflict).
    pub fn insert_customer(&self, customer: &NewCustomer) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO customers (name, password_digest, email, phone, joined_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                customer.name,
                customer.password_digest,
                customer.email,
                customer.phone,
                now_rfc3339(),
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_customer(&self, id: i64) -> Result<Customer> {
        let customer = self.conn().query_row(
            &format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"),
            params![id],
            row_to_customer,
        )?;
        Ok(customer)
    }

    pub fn list_customers(&self) -> Result<Vec<Customer>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map([], row_to_customer)?;

        let mut customers = Vec::new();
        for row in rows {
            customers.push(row?);
        }
        Ok(customers)
    }

    /// Look up login material by customer name or email.
    pub fn find_customer_credentials(&self, username: &str) -> Result<Option<Credentials>> {
        let found = self
            .conn()
            .query_row(
                "SELECT id, password_digest FROM customers
                 WHERE name = ?1 OR email = ?1
                 ORDER BY id ASC LIMIT 1",
                params![username],
                |row| {
                    Ok(Credentials {
                        id: row.get(0)?,
                        role: Role::Customer,
                        password_digest: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(found)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Apply the provided fields and return the updated profile.
    pub fn update_customer(&self, id: i64, update: &CustomerUpdate) -> Result<Customer> {
        let affected = self.conn().execute(
            "UPDATE customers
             SET name = COALESCE(?1, name),
                 email = COALESCE(?2, email),
                 phone = COALESCE(?3, phone)
             WHERE id = ?4",
            params![update.name, update.email, update.phone, id],
        )?;
        if affected == 0 {
            return Err(crate::StoreError::NotFound);
        }
        self.get_customer(id)
    }
}

fn row_to_customer(row: &rusqlite::Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        joined_at: timestamp_at(row, 4)?,
    })
}
