// core/src/cart.rs

//! The cart value object.
//!
//! The cart is client-held state: it has no persisted counterpart, and the
//! server only sees its line items at checkout. `add`, `remove` and `clear`
//! are pure operations returning a new cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a single cart line purchases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineItemKind {
  Domain,
  Service,
  Hosting,
}

/// One purchasable unit in a cart.
///
/// For `Domain` items, `title` carries the fully-qualified domain name.
/// For `Service` and `Hosting` items, `reference` carries the catalog id
/// of the chosen package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
  pub id: String,
  #[serde(rename = "type")]
  pub kind: LineItemKind,
  pub title: String,
  #[serde(default)]
  pub subtitle: String,
  pub price: Decimal,
  #[serde(default)]
  pub options: String,
  #[serde(default)]
  pub renewal_price: Option<Decimal>,
  #[serde(default)]
  pub reference: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
  items: Vec<CartLineItem>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_items(items: Vec<CartLineItem>) -> Self {
    Self { items }
  }

  /// Returns a new cart with `item` appended.
  pub fn add(&self, item: CartLineItem) -> Cart {
    let mut items = self.items.clone();
    items.push(item);
    Cart { items }
  }

  /// Returns a new cart without the line item whose id is `item_id`.
  pub fn remove(&self, item_id: &str) -> Cart {
    Cart {
      items: self.items.iter().filter(|i| i.id != item_id).cloned().collect(),
    }
  }

  /// Returns an empty cart.
  pub fn clear(&self) -> Cart {
    Cart::new()
  }

  pub fn items(&self) -> &[CartLineItem] {
    &self.items
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn total(&self) -> Decimal {
    self.items.iter().map(|i| i.price).sum()
  }
}
