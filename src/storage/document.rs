//! The persisted JSON document and its conversion to and from the domain.
//!
//! Deserialization is typed; a single validation step then turns records
//! into domain items. Derived values never appear in the document.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::core::validation::{normalize_urls, MIN_COST};
use crate::domain::{normalize_str, normalize_text, Importance, Item, ItemUrl, WishList};
use crate::errors::{Result, WishError};

/// Default limit on item nesting.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Structural limits applied while reading documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentLimits {
    pub max_depth: usize,
}

impl Default for DocumentLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Top-level document. `wishlist` entries stay untyped until each one is
/// validated so errors can name the failing index.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WishListDocument {
    #[serde(default)]
    pub available: i64,
    #[serde(default)]
    pub refill: i64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub wishlist: Vec<Value>,
}

/// `url` accepts the legacy single-string form as well as address/label pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UrlField {
    Legacy(String),
    Pairs(Vec<(String, String)>),
}

impl Default for UrlField {
    fn default() -> Self {
        UrlField::Pairs(Vec::new())
    }
}

impl UrlField {
    pub fn is_empty(&self) -> bool {
        match self {
            UrlField::Legacy(address) => address.trim().is_empty(),
            UrlField::Pairs(pairs) => pairs.is_empty(),
        }
    }

    fn into_urls(self) -> Vec<ItemUrl> {
        match self {
            UrlField::Legacy(address) => normalize_urls(&[(address, String::new())]),
            UrlField::Pairs(pairs) => normalize_urls(&pairs),
        }
    }
}

/// One persisted item, recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(default, skip_serializing_if = "UrlField::is_empty")]
    pub url: UrlField,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub importance: i64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub incart: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemRecord>,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ItemRecord {
    pub fn from_item(item: &Item) -> Self {
        let urls: Vec<(String, String)> = item
            .urls
            .iter()
            .filter(|url| !url.address.trim().is_empty())
            .map(|url| (url.address.clone(), url.label.clone()))
            .collect();
        Self {
            name: item.name.clone(),
            cost: Some(item.cost),
            quantity: (item.quantity != 1).then_some(i64::from(item.quantity)),
            info: item.info.clone(),
            url: UrlField::Pairs(urls),
            importance: item.importance.level(),
            incart: item.incart,
            paid: item.incart && item.paid,
            items: item.children.iter().map(ItemRecord::from_item).collect(),
        }
    }

    /// Validates the record and builds the domain item. `level` is 0 for
    /// top-level entries; `path` names the record in error messages.
    pub fn into_item(self, path: &str, level: usize, limits: DocumentLimits) -> Result<Item> {
        if level >= limits.max_depth {
            return Err(WishError::document(path, "too many nesting levels"));
        }

        let name = normalize_str(&self.name);
        if name.is_empty() {
            return Err(WishError::document(
                format!("{path}.name"),
                "value must not be empty",
            ));
        }

        let cost = match self.cost {
            Some(cost) if cost < MIN_COST => {
                warn!(%path, cost, "cost below the unknown-cost sentinel clamped");
                MIN_COST
            }
            Some(cost) => cost,
            None if !self.items.is_empty() => 0,
            None => {
                return Err(WishError::document(
                    format!("{path}.cost"),
                    "field is required",
                ))
            }
        };

        let quantity = match self.quantity {
            None => 1,
            Some(quantity) => u32::try_from(quantity).map_err(|_| {
                WishError::document(format!("{path}.quantity"), "value out of range")
            })?,
        };

        let importance = Importance::from_level(self.importance);
        if importance.level() != self.importance {
            warn!(%path, importance = self.importance, "importance clamped into range");
        }

        let mut item = Item::new(name, cost).with_quantity(quantity);
        item.info = normalize_text(&self.info);
        item.urls = self.url.into_urls();
        item.importance = importance;
        item.set_in_cart(self.incart);
        item.set_paid(self.paid);

        for (index, child) in self.items.into_iter().enumerate() {
            let child_path = format!("{path}.items[{index}]");
            item.children.push(child.into_item(&child_path, level + 1, limits)?);
        }
        Ok(item)
    }
}

impl WishListDocument {
    pub fn from_wishlist(list: &WishList) -> Result<Self> {
        let wishlist = list
            .items
            .iter()
            .map(|item| serde_json::to_value(ItemRecord::from_item(item)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            available: list.total_cash,
            refill: list.refill_cash,
            comment: list.comment.clone(),
            wishlist,
        })
    }

    /// Validates the whole document. Any failure rejects it entirely.
    pub fn into_wishlist(self, limits: DocumentLimits) -> Result<WishList> {
        if self.available < 0 {
            return Err(WishError::document("available", "value out of range"));
        }
        if self.refill < 0 {
            return Err(WishError::document("refill", "value out of range"));
        }

        let mut list = WishList::with_cash(self.available, self.refill);
        list.comment = normalize_str(&self.comment);

        for (index, value) in self.wishlist.into_iter().enumerate() {
            let path = format!("wishlist[{index}]");
            let record = parse_record(value, &path)?;
            list.items.push(record.into_item(&path, 0, limits)?);
        }
        Ok(list)
    }
}

/// Typed conversion of one untyped entry, with the entry's path in errors.
pub fn parse_record(value: Value, path: &str) -> Result<ItemRecord> {
    if !value.is_object() {
        return Err(WishError::document(path, "expected an item object"));
    }
    serde_json::from_value(value).map_err(|err| WishError::document(path, err.to_string()))
}

/// Parses and validates document text.
pub fn parse_document(text: &str, limits: DocumentLimits) -> Result<WishList> {
    let document: WishListDocument = serde_json::from_str(text)?;
    document.into_wishlist(limits)
}

/// Renders the persisted subset of `list` as pretty-printed JSON.
pub fn render_document(list: &WishList) -> Result<String> {
    let document = WishListDocument::from_wishlist(list)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<WishList> {
        parse_document(&value.to_string(), DocumentLimits::default())
    }

    #[test]
    fn applies_defaults_for_optional_fields() {
        let list = parse(json!({
            "available": 300,
            "comment": "  summer   plans ",
            "wishlist": [{ "name": "Tent", "cost": 250 }]
        }))
        .expect("valid document");

        assert_eq!(list.total_cash, 300);
        assert_eq!(list.refill_cash, 0);
        assert_eq!(list.comment, "summer plans");
        let tent = &list.items[0];
        assert_eq!(tent.quantity, 1);
        assert_eq!(tent.importance, Importance::Unset);
        assert!(tent.urls.is_empty());
        assert!(!tent.incart && !tent.paid);
    }

    #[test]
    fn accepts_legacy_url_string() {
        let list = parse(json!({
            "wishlist": [{ "name": "Tent", "cost": 1, "url": "https://camp.example" }]
        }))
        .unwrap();
        assert_eq!(list.items[0].urls, vec![ItemUrl::new("https://camp.example", "")]);
    }

    #[test]
    fn clamps_importance_and_clears_paid_without_cart() {
        let list = parse(json!({
            "wishlist": [{ "name": "Kayak", "cost": 900, "importance": 17, "paid": true }]
        }))
        .unwrap();
        assert_eq!(list.items[0].importance, Importance::Highest);
        assert!(!list.items[0].paid);
    }

    #[test]
    fn rejects_missing_leaf_cost_with_location() {
        let err = parse(json!({
            "wishlist": [
                { "name": "Ok", "cost": 1 },
                { "name": "Group", "items": [{ "name": "Broken" }] }
            ]
        }))
        .expect_err("cost is required for leaves");
        let message = err.to_string();
        assert!(message.contains("wishlist[1].items[0].cost"), "{message}");
    }

    #[test]
    fn rejects_wrong_types_and_ranges() {
        let err = parse(json!({ "wishlist": [{ "name": "X", "cost": "cheap" }] })).unwrap_err();
        assert!(err.to_string().contains("wishlist[0]"));

        let err = parse(json!({ "wishlist": [{ "name": "X", "cost": 1, "quantity": -1 }] })).unwrap_err();
        assert!(err.to_string().contains("quantity"));

        let err = parse(json!({ "available": -10 })).unwrap_err();
        assert!(err.to_string().contains("available"));

        let err = parse(json!({ "wishlist": [{ "name": "  ", "cost": 1 }] })).unwrap_err();
        assert!(err.to_string().contains("name"));

        let err = parse(json!({ "wishlist": [42] })).unwrap_err();
        assert!(err.to_string().contains("wishlist[0]"));
    }

    #[test]
    fn enforces_nesting_limit() {
        let document = json!({
            "wishlist": [{ "name": "L0", "items": [{ "name": "L1", "items": [{ "name": "L2", "cost": 1 }] }] }]
        });
        let limits = DocumentLimits { max_depth: 2 };
        let err = parse_document(&document.to_string(), limits).expect_err("too deep");
        assert!(err.to_string().contains("nesting"));
        assert!(parse_document(&document.to_string(), DocumentLimits { max_depth: 3 }).is_ok());
    }

    #[test]
    fn extreme_costs_load_and_recalculate() {
        let mut list = parse(json!({
            "available": 1,
            "refill": 1,
            "wishlist": [{ "name": "Moon", "cost": i64::MAX, "quantity": 2 }]
        }))
        .expect("valid document");
        let totals = crate::core::AllocationEngine::recalculate(&mut list);
        assert_eq!(list.items[0].derived.sum, i64::MAX);
        assert_eq!(list.items[0].derived.need_months, Some(i64::MAX - 1));
        assert_eq!(totals.total_remain, 0);
    }

    #[test]
    fn low_costs_clamp_to_sentinel() {
        let list = parse(json!({ "wishlist": [{ "name": "X", "cost": -50 }] })).unwrap();
        assert_eq!(list.items[0].cost, -1);
    }

    #[test]
    fn rendering_omits_defaults_and_derived_fields() {
        let mut list = WishList::with_cash(10, 5);
        list.items.push(
            Item::new("Plain", 7).with_url(ItemUrl::new("", "dropped")),
        );
        list.items[0].derived.need_cash = Some(3);
        let text = render_document(&list).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["wishlist"][0], json!({ "name": "Plain", "cost": 7 }));
        assert!(!text.contains("need"));
        assert!(!text.contains("sum"));
    }
}
