//! Clipboard exchange format: a JSON object keyed by [`CLIPBOARD_MARKER`]
//! holding one item record or an array of them.

use serde_json::{Map, Value};

use crate::domain::Item;
use crate::errors::{Result, WishError};

use super::document::{parse_record, DocumentLimits, ItemRecord};

pub const CLIPBOARD_MARKER: &str = "wishcalc-items";

/// Serializes copied subtrees. A single item is stored as an object, several
/// as an array.
pub fn encode_clipboard(items: &[Item]) -> Result<String> {
    let mut records = items
        .iter()
        .map(|item| serde_json::to_value(ItemRecord::from_item(item)))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let payload = if records.len() == 1 {
        records.remove(0)
    } else {
        Value::Array(records)
    };
    let mut root = Map::new();
    root.insert(CLIPBOARD_MARKER.to_string(), payload);
    Ok(serde_json::to_string_pretty(&Value::Object(root))?)
}

/// Reads clipboard text. Text that is not ours yields `Ok(None)`; a marked
/// payload with invalid items is an error. Pasted items get fresh ids.
pub fn decode_clipboard(text: &str, limits: DocumentLimits) -> Result<Option<Vec<Item>>> {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return Ok(None);
    };
    let Some(payload) = value.get(CLIPBOARD_MARKER) else {
        return Ok(None);
    };

    let entries = match payload {
        Value::Object(_) => vec![payload.clone()],
        Value::Array(values) => values.clone(),
        _ => {
            return Err(WishError::document(
                CLIPBOARD_MARKER,
                "expected an item or a list of items",
            ))
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let path = format!("{CLIPBOARD_MARKER}[{index}]");
            parse_record(entry, &path)?.into_item(&path, 0, limits)
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_item_is_stored_as_object() {
        let text = encode_clipboard(&[Item::new("Lamp", 30)]).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert!(value[CLIPBOARD_MARKER].is_object());

        let pasted = decode_clipboard(&text, DocumentLimits::default())
            .unwrap()
            .expect("marked payload");
        assert_eq!(pasted.len(), 1);
        assert_eq!(pasted[0].name, "Lamp");
    }

    #[test]
    fn foreign_text_is_ignored() {
        let limits = DocumentLimits::default();
        assert!(decode_clipboard("just some words", limits).unwrap().is_none());
        assert!(decode_clipboard(r#"{"other": 1}"#, limits).unwrap().is_none());
        assert!(decode_clipboard("[1, 2]", limits).unwrap().is_none());
    }

    #[test]
    fn marked_but_invalid_payload_is_an_error() {
        let text = format!(r#"{{"{CLIPBOARD_MARKER}": [{{"name": "No cost"}}]}}"#);
        let err = decode_clipboard(&text, DocumentLimits::default()).expect_err("missing cost");
        assert!(err.to_string().contains("cost"));
    }
}
