//! Validation of item edits coming from an editor before they reach the tree.
//!
//! Errors here are non-fatal: they are returned per field so the editor can
//! show them inline and keep the commit action blocked until corrected.

use std::fmt;

use crate::domain::{normalize_str, normalize_text, Importance, Item, ItemUrl};

/// Lowest cost accepted; anything below is treated as "unknown".
pub const MIN_COST: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Name,
    Cost,
    Quantity,
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemField::Name => "name",
            ItemField::Cost => "cost",
            ItemField::Quantity => "quantity",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: ItemField,
    pub message: String,
}

impl FieldError {
    fn new(field: ItemField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Raw editor state, one string per text input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub cost: String,
    pub quantity: String,
    pub info: String,
    pub urls: Vec<(String, String)>,
    pub importance: i64,
    pub incart: bool,
    pub paid: bool,
}

/// Field values that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidItem {
    pub name: String,
    pub cost: i64,
    pub quantity: u32,
    pub info: String,
    pub urls: Vec<ItemUrl>,
    pub importance: Importance,
    pub incart: bool,
    pub paid: bool,
}

impl ItemDraft {
    /// Pre-fills a draft from an existing item.
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            cost: item.cost.to_string(),
            quantity: item.quantity.to_string(),
            info: item.info.clone(),
            urls: item
                .urls
                .iter()
                .map(|url| (url.address.clone(), url.label.clone()))
                .collect(),
            importance: item.importance.level(),
            incart: item.incart,
            paid: item.paid,
        }
    }

    /// Checks every field and reports all failures at once.
    pub fn validate(&self) -> Result<ValidItem, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = normalize_str(&self.name);
        if name.is_empty() {
            errors.push(FieldError::new(ItemField::Name, "value is required"));
        }

        let cost = parse_cost(&self.cost);
        if cost.is_none() {
            errors.push(FieldError::new(ItemField::Cost, "not a number"));
        }

        let quantity = parse_quantity(&self.quantity);
        if quantity.is_none() {
            errors.push(FieldError::new(
                ItemField::Quantity,
                "must be a non-negative integer",
            ));
        }

        match (cost, quantity) {
            (Some(cost), Some(quantity)) if errors.is_empty() => Ok(ValidItem {
                name,
                cost,
                quantity,
                info: normalize_text(&self.info),
                urls: normalize_urls(&self.urls),
                importance: Importance::from_level(self.importance),
                incart: self.incart,
                paid: self.incart && self.paid,
            }),
            _ => Err(errors),
        }
    }
}

impl ValidItem {
    /// Builds a fresh tree node from the validated values.
    pub fn into_item(self) -> Item {
        let mut item = Item::new(String::new(), self.cost);
        self.apply_to(&mut item);
        item
    }

    /// Overwrites the persisted fields of `item`, keeping id and children.
    pub fn apply_to(self, item: &mut Item) {
        item.name = self.name;
        item.cost = self.cost;
        item.quantity = self.quantity;
        item.info = self.info;
        item.urls = self.urls;
        item.importance = self.importance;
        item.set_in_cart(self.incart);
        item.set_paid(self.paid);
    }
}

/// Parses a price: blank means 0, decimals are rounded, values below
/// [`MIN_COST`] are clamped. `None` for non-numeric text.
pub fn parse_cost(text: &str) -> Option<i64> {
    let text = normalize_str(text);
    if text.is_empty() {
        return Some(0);
    }
    let value: f64 = text.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((value.round() as i64).max(MIN_COST))
}

/// Parses a quantity; blank means 1.
pub fn parse_quantity(text: &str) -> Option<u32> {
    let text = normalize_str(text);
    if text.is_empty() {
        return Some(1);
    }
    text.parse().ok()
}

/// Parses a cash amount for the available/refill inputs; negatives become 0.
pub fn parse_cash(text: &str) -> Option<i64> {
    normalize_str(text).parse::<i64>().ok().map(|cash| cash.max(0))
}

/// Normalizes URL pairs and drops entries with an empty address.
pub fn normalize_urls(urls: &[(String, String)]) -> Vec<ItemUrl> {
    urls.iter()
        .map(|(address, label)| ItemUrl::new(normalize_str(address), normalize_str(label)))
        .filter(|url| !url.address.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, cost: &str) -> ItemDraft {
        ItemDraft {
            name: name.into(),
            cost: cost.into(),
            quantity: "1".into(),
            ..ItemDraft::default()
        }
    }

    #[test]
    fn cost_parsing_follows_editor_rules() {
        assert_eq!(parse_cost(""), Some(0));
        assert_eq!(parse_cost(" 12.6 "), Some(13));
        assert_eq!(parse_cost("-40"), Some(-1));
        assert_eq!(parse_cost("12abc"), None);
        assert_eq!(parse_cost("NaN"), None);
    }

    #[test]
    fn cash_parsing_clamps_negatives() {
        assert_eq!(parse_cash(" 300 "), Some(300));
        assert_eq!(parse_cash("-5"), Some(0));
        assert_eq!(parse_cash("lots"), None);
    }

    #[test]
    fn validate_collects_all_field_errors() {
        let mut bad = draft("   ", "twelve");
        bad.quantity = "-2".into();
        let errors = bad.validate().expect_err("draft is invalid");
        let fields: Vec<_> = errors.iter().map(|err| err.field).collect();
        assert_eq!(
            fields,
            vec![ItemField::Name, ItemField::Cost, ItemField::Quantity]
        );
    }

    #[test]
    fn validate_normalizes_and_clamps() {
        let mut input = draft("  Coffee   grinder ", "89.5");
        input.info = "burr\n\n  conical  ".into();
        input.urls = vec![
            ("https://shop.example/grinder".into(), " shop ".into()),
            ("   ".into(), "ignored".into()),
        ];
        input.importance = 9;
        input.paid = true;

        let valid = input.validate().expect("draft is valid");
        assert_eq!(valid.name, "Coffee grinder");
        assert_eq!(valid.cost, 90);
        assert_eq!(valid.info, "burr\nconical");
        assert_eq!(valid.urls, vec![ItemUrl::new("https://shop.example/grinder", "shop")]);
        assert_eq!(valid.importance, Importance::Highest);
        assert!(!valid.paid, "paid is cleared when not in cart");
    }

    #[test]
    fn apply_keeps_identity_and_children() {
        let mut group = Item::group("Old", vec![Item::new("Child", 5)]);
        let id = group.id;
        draft("New", "0").validate().unwrap().apply_to(&mut group);
        assert_eq!(group.id, id);
        assert_eq!(group.name, "New");
        assert_eq!(group.children.len(), 1);
    }
}
