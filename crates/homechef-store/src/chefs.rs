//! Queries for [`Chef`] (seller) records.

use homechef_shared::Role;
use rusqlite::{params, OptionalExtension};

use crate::database::{now_rfc3339, timestamp_at, Database};
use crate::error::{Result, StoreError};
use crate::models::{Chef, ChefUpdate, Credentials, NewChef};

const CHEF_COLUMNS: &str = "id, name, email, phone, address, bio, cuisine_type, image_path, \
                            working_hours_from, working_hours_to, created_at";

impl Database {
    /// Insert a chef and return the generated id.
    ///
    /// A reused email is rejected by the unique index with
    /// [`StoreError::Conflict`] and nothing is written.
    pub fn insert_chef(&self, chef: &NewChef) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO chefs (name, email, password_digest, phone, address, bio, cuisine_type,
                                image_path, working_hours_from, working_hours_to, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                chef.name,
                chef.email,
                chef.password_digest,
                chef.phone,
                chef.address,
                chef.bio,
                chef.cuisine_type,
                chef.image_path,
                chef.working_hours_from,
                chef.working_hours_to,
                now_rfc3339(),
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn get_chef(&self, id: i64) -> Result<Chef> {
        let chef = self.conn().query_row(
            &format!("SELECT {CHEF_COLUMNS} FROM chefs WHERE id = ?1"),
            params![id],
            row_to_chef,
        )?;
        Ok(chef)
    }

    pub fn list_chefs(&self) -> Result<Vec<Chef>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("SELECT {CHEF_COLUMNS} FROM chefs ORDER BY id ASC"))?;
        let rows = stmt.query_map([], row_to_chef)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }

    /// Look up login material by chef name or email.
    pub fn find_chef_credentials(&self, username: &str) -> Result<Option<Credentials>> {
        let found = self
            .conn()
            .query_row(
                "SELECT id, password_digest FROM chefs
                 WHERE email = ?1 OR name = ?1
                 ORDER BY id ASC LIMIT 1",
                params![username],
                |row| {
                    Ok(Credentials {
                        id: row.get(0)?,
                        role: Role::Chef,
                        password_digest: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(found)
    }

    pub fn update_chef(&self, id: i64, update: &ChefUpdate) -> Result<Chef> {
        let affected = self.conn().execute(
            "UPDATE chefs
             SET phone = COALESCE(?1, phone),
                 address = COALESCE(?2, address),
                 bio = COALESCE(?3, bio),
                 cuisine_type = COALESCE(?4, cuisine_type),
                 working_hours_from = COALESCE(?5, working_hours_from),
                 working_hours_to = COALESCE(?6, working_hours_to)
             WHERE id = ?7",
            params![
                update.phone,
                update.address,
                update.bio,
                update.cuisine_type,
                update.working_hours_from,
                update.working_hours_to,
                id,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_chef(id)
    }
}

fn row_to_chef(row: &rusqlite::Row<'_>) -> rusqlite::Result<Chef> {
    Ok(Chef {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        bio: row.get(5)?,
        cuisine_type: row.get(6)?,
        image_path: row.get(7)?,
        working_hours_from: row.get(8)?,
        working_hours_to: row.get(9)?,
        created_at: timestamp_at(row, 10)?,
    })
}
