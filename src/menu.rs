//! Menu catalog
//!
//! Read-only item catalog the engine resolves ids and names against. The
//! catalog is external to the engine (spec-wise it could be a database); the
//! built-in default menu doubles as the test fixture and the demo menu for
//! the REPL binary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Portion size of a size-specific catalog item.
///
/// Items that only come one way (burgers) carry no size at all, which is
/// modelled as `Option<Size>` on [`MenuItem`] and order lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Regular,
    Large,
}

impl Size {
    /// Parse a spoken size word. Anything else is "no size given".
    pub fn from_spoken(s: &str) -> Option<Size> {
        match s.trim().to_lowercase().as_str() {
            "small" => Some(Size::Small),
            "regular" | "medium" => Some(Size::Regular),
            "large" => Some(Size::Large),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Small => "Small",
            Size::Regular => "Regular",
            Size::Large => "Large",
        }
    }
}

/// One orderable catalog entry.
///
/// Size-specific items (fries, drinks) appear once per size with distinct
/// ids; `toppings` lists what the kitchen puts on by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub category: String,
    #[serde(default)]
    pub size: Option<Size>,
    pub price: f64,
    #[serde(default)]
    pub toppings: Option<Vec<String>>,
}

/// Read-only catalog seam. The engine only ever reads the full id-keyed map
/// and does id lookups; where the items come from is the caller's business.
pub trait MenuCatalog {
    fn items(&self) -> &BTreeMap<u32, MenuItem>;

    fn get(&self, id: u32) -> Option<&MenuItem> {
        self.items().get(&id)
    }
}

/// In-memory catalog, either the built-in default menu or one supplied by
/// configuration.
#[derive(Debug, Clone)]
pub struct StaticMenuCatalog {
    items: BTreeMap<u32, MenuItem>,
}

impl StaticMenuCatalog {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self {
            items: items.into_iter().map(|m| (m.id, m)).collect(),
        }
    }
}

impl Default for StaticMenuCatalog {
    fn default() -> Self {
        Self::new(default_menu())
    }
}

impl MenuCatalog for StaticMenuCatalog {
    fn items(&self) -> &BTreeMap<u32, MenuItem> {
        &self.items
    }
}

fn burger(id: u32, name: &str, price: f64, toppings: &[&str]) -> MenuItem {
    MenuItem {
        id,
        name: name.to_string(),
        item_type: "burger".to_string(),
        category: "food".to_string(),
        size: None,
        price,
        toppings: Some(toppings.iter().map(|t| t.to_string()).collect()),
    }
}

fn sized(id: u32, name: &str, item_type: &str, category: &str, size: Size, price: f64) -> MenuItem {
    MenuItem {
        id,
        name: name.to_string(),
        item_type: item_type.to_string(),
        category: category.to_string(),
        size: Some(size),
        price,
        toppings: None,
    }
}

/// The built-in demo menu: burgers 1-12, sides 13-36 (Regular/Large pairs),
/// drinks 37-52 (Regular/Large pairs).
pub fn default_menu() -> Vec<MenuItem> {
    use Size::{Large, Regular};

    let mut items = vec![
        burger(1, "Classic Hamburger", 5.99, &["Beef Patty", "Lettuce", "Tomato", "Onion", "Pickles"]),
        burger(2, "Cheeseburger", 6.49, &["Beef Patty", "Cheddar Cheese", "Lettuce", "Tomato", "Onion", "Pickles"]),
        burger(3, "Bacon Burger", 7.49, &["Beef Patty", "Bacon", "Cheddar Cheese", "BBQ Sauce"]),
        burger(4, "Mushroom Swiss Burger", 7.29, &["Beef Patty", "Swiss Cheese", "Grilled Mushrooms"]),
        burger(5, "BBQ Burger", 7.59, &["Beef Patty", "Onion Rings", "BBQ Sauce", "Cheddar Cheese"]),
        burger(6, "Double Cheeseburger", 8.49, &["2 Beef Patties", "American Cheese", "Lettuce", "Tomato"]),
        burger(7, "Veggie Burger", 6.99, &["Veggie Patty", "Lettuce", "Tomato", "Onion", "Avocado"]),
        burger(8, "Spicy Jalapeño Burger", 7.19, &["Beef Patty", "Pepper Jack Cheese", "Jalapeños", "Chipotle Mayo"]),
        burger(9, "Blue Cheese Burger", 7.39, &["Beef Patty", "Blue Cheese Crumbles", "Caramelized Onions"]),
        burger(10, "Quarter Pound Burger", 6.79, &["Quarter Pound Beef Patty", "Lettuce", "Tomato", "Onion"]),
        burger(11, "BBQ Bacon Burger", 7.79, &["Beef Patty", "Bacon", "BBQ Sauce", "Cheddar Cheese"]),
        burger(12, "Classic Double", 8.19, &["2 Beef Patties", "Lettuce", "Tomato", "Pickles", "Onion"]),
    ];

    // Sides come in Regular/Large pairs with consecutive ids
    let sides: &[(&str, f64, f64)] = &[
        ("Chili Cheese Fries", 5.49, 6.49),
        ("Coleslaw", 2.49, 3.49),
        ("Curly Fries", 3.49, 4.49),
        ("French Fries", 2.99, 3.99),
        ("Garlic Parmesan Fries", 4.49, 5.49),
        ("Mac & Cheese Bites", 4.29, 5.29),
        ("Mozzarella Sticks", 4.99, 5.99),
        ("Onion Rings", 3.99, 4.99),
        ("Pickle Chips", 2.79, 3.79),
        ("Side Salad", 3.49, 4.49),
        ("Sweet Potato Fries", 3.99, 4.99),
        ("Tater Tots", 3.29, 4.29),
    ];
    let mut id = 13;
    for (name, regular_price, large_price) in sides {
        items.push(sized(id, name, "side", "food", Regular, *regular_price));
        items.push(sized(id + 1, name, "side", "food", Large, *large_price));
        id += 2;
    }

    let drinks: &[(&str, f64, f64)] = &[
        ("Chocolate Milkshake", 3.49, 4.49),
        ("Coca-Cola", 1.99, 2.49),
        ("Diet Coke", 1.99, 2.49),
        ("Iced Tea", 1.79, 2.29),
        ("Lemonade", 1.99, 2.49),
        ("Root Beer", 1.99, 2.49),
        ("Sprite", 1.99, 2.49),
        ("Vanilla Milkshake", 3.49, 4.49),
    ];
    for (name, regular_price, large_price) in drinks {
        items.push(sized(id, name, "drink", "drink", Regular, *regular_price));
        items.push(sized(id + 1, name, "drink", "drink", Large, *large_price));
        id += 2;
    }

    items
}
