//! Fixtures shared by the store unit tests.

use homechef_shared::CategoryTags;

use crate::models::{NewChef, NewCustomer, NewDish};

pub(crate) fn new_customer(name: &str) -> NewCustomer {
    NewCustomer {
        name: name.to_string(),
        password_digest: format!("digest-of-{name}"),
        email: format!("{name}@example.com"),
        phone: "555-0100".to_string(),
    }
}

pub(crate) fn new_chef(name: &str) -> NewChef {
    NewChef {
        name: name.to_string(),
        email: format!("{name}@kitchen.example"),
        password_digest: format!("digest-of-{name}"),
        cuisine_type: Some("Home cooking".to_string()),
        ..Default::default()
    }
}

pub(crate) fn new_dish(chef_id: i64, name: &str, price: f64) -> NewDish {
    NewDish {
        name: name.to_string(),
        price,
        category: CategoryTags::from_inputs(["Main"]),
        description: Some(format!("{name}, freshly made")),
        ingredients: None,
        instructions: None,
        image_path: None,
        chef_id,
    }
}
