//! v001 -- Initial schema creation.
//!
//! Creates the marketplace tables: `customers`, `chefs`, `dishes`, `orders`,
//! `order_items` and `saved_recipes`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Customers
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS customers (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    password_digest TEXT NOT NULL,              -- argon2id PHC string
    email           TEXT NOT NULL UNIQUE,
    phone           TEXT NOT NULL,
    joined_at       TEXT NOT NULL               -- RFC-3339
);

CREATE INDEX IF NOT EXISTS idx_customers_name ON customers(name);

-- ----------------------------------------------------------------
-- Chefs (sellers)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS chefs (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    name               TEXT NOT NULL,
    email              TEXT NOT NULL UNIQUE,
    password_digest    TEXT NOT NULL,
    phone              TEXT,
    address            TEXT,
    bio                TEXT,
    cuisine_type       TEXT,
    image_path         TEXT,                    -- relative, e.g. uploads/<uuid>.png
    working_hours_from TEXT,
    working_hours_to   TEXT,
    created_at         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chefs_name ON chefs(name);

-- ----------------------------------------------------------------
-- Dishes
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS dishes (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    price        REAL NOT NULL CHECK (price >= 0),
    category     TEXT NOT NULL DEFAULT '',      -- tags joined with ", "
    description  TEXT,
    ingredients  TEXT,
    instructions TEXT,
    image_path   TEXT,
    chef_id      INTEGER NOT NULL,
    created_at   TEXT NOT NULL,

    FOREIGN KEY (chef_id) REFERENCES chefs(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_dishes_chef_id ON dishes(chef_id);

-- ----------------------------------------------------------------
-- Orders
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS orders (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id      INTEGER NOT NULL,
    total_amount     REAL NOT NULL CHECK (total_amount >= 0),
    delivery_address TEXT NOT NULL,
    delivery_time    TEXT NOT NULL,
    payment_method   TEXT NOT NULL,
    status           TEXT NOT NULL DEFAULT 'In Progress'
                     CHECK (status IN ('In Progress', 'Ready', 'Out for Delivery', 'Delivered')),
    created_at       TEXT NOT NULL,

    FOREIGN KEY (customer_id) REFERENCES customers(id)
);

CREATE INDEX IF NOT EXISTS idx_orders_customer_id ON orders(customer_id);

-- ----------------------------------------------------------------
-- Order items (price captured at order time)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS order_items (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id INTEGER NOT NULL,
    dish_id  INTEGER NOT NULL,
    quantity INTEGER NOT NULL CHECK (quantity > 0),
    price    REAL NOT NULL CHECK (price >= 0),

    FOREIGN KEY (order_id) REFERENCES orders(id) ON DELETE CASCADE,
    FOREIGN KEY (dish_id) REFERENCES dishes(id) ON DELETE RESTRICT
);

CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items(order_id);
CREATE INDEX IF NOT EXISTS idx_order_items_dish_id ON order_items(dish_id);

-- ----------------------------------------------------------------
-- Saved recipes (bookmarks)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS saved_recipes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id INTEGER NOT NULL,
    dish_id     INTEGER NOT NULL,
    saved_at    TEXT NOT NULL,

    FOREIGN KEY (customer_id) REFERENCES customers(id) ON DELETE CASCADE,
    FOREIGN KEY (dish_id) REFERENCES dishes(id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_saved_recipes_unique
    ON saved_recipes(customer_id, dish_id);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
