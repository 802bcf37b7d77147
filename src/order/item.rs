use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field names owned by the store or the ordering protocol.
pub const RESERVED_FIELDS: [&str; 3] = ["_id", "id", "order"];

/// An item of an ordered collection as the content API returns it.
///
/// Only `id` and `order` are interpreted. Every other field is kept verbatim
/// so a replace call can send the full resource back unchanged.
///
/// The id is read from `_id`, or from `id` when `_id` is absent. When a
/// document carries both, `_id` wins and `id` stays among the fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderableItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub order: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Wire shape of an item before the id keys are reconciled.
#[derive(Deserialize)]
struct RawItem {
    #[serde(rename = "_id", default)]
    document_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    order: i64,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl<'de> Deserialize<'de> for OrderableItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let RawItem {
            document_id,
            id: plain_id,
            order,
            mut fields,
        } = RawItem::deserialize(deserializer)?;

        let id = match (document_id, plain_id) {
            (Some(primary), Some(alias)) => {
                fields.insert("id".to_string(), Value::String(alias));
                primary
            }
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => return Err(de::Error::missing_field("_id")),
        };

        Ok(Self { id, order, fields })
    }
}

impl OrderableItem {
    #[must_use]
    pub fn new(id: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            order,
            fields: Map::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Copy of this item carrying a different order value.
    #[must_use]
    pub fn with_order(&self, order: i64) -> Self {
        Self {
            order,
            ..self.clone()
        }
    }
}

/// Payload of an item that does not exist yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub order: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// One planned write: item `id` moves from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: String,
    pub from: i64,
    pub to: i64,
}

impl OrderUpdate {
    #[must_use]
    pub fn new(id: impl Into<String>, from: i64, to: i64) -> Self {
        Self {
            id: id.into(),
            from,
            to,
        }
    }
}

impl fmt::Display for OrderUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.id, self.from, self.to)
    }
}

/// Sort a snapshot by order. Items sharing an order keep their snapshot position.
pub fn sort_by_order(items: &mut [OrderableItem]) {
    items.sort_by_key(|item| item.order);
}
