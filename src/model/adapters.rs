//! Entity → [`BarcodeItem`] adapters.
//!
//! The warehouse API hands us loosely-typed records: ids may be numbers or
//! strings, most fields may be missing. Entities deserialize tolerantly and
//! keep unknown fields so the full record ends up in `metadata`.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::{BarcodeItem, ItemKind};

/// Numeric or textual record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub location_code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A picking or receiving task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub inbound_number: Option<String>,
    #[serde(default)]
    pub outbound_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub lot_number: String,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Serial {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub serial_number: String,
}

/// Task flavour, derived from which document number the task carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    Receiving,
    Picking,
    Generic,
}

impl TaskType {
    pub fn of(task: &Task) -> Self {
        if task.inbound_number.is_some() {
            TaskType::Receiving
        } else if task.outbound_number.is_some() {
            TaskType::Picking
        } else {
            TaskType::Generic
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskType::Receiving => "Receiving",
            TaskType::Picking => "Picking",
            TaskType::Generic => "Task",
        }
    }
}

fn metadata_of<T: Serialize>(entity: &T) -> Value {
    serde_json::to_value(entity).unwrap_or(Value::Null)
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|v| !v.is_empty())
}

pub fn from_articles(articles: &[Article]) -> Vec<BarcodeItem> {
    articles
        .iter()
        .map(|article| {
            let id = match &article.id {
                Some(id) => id.to_string(),
                None => article.sku.clone(),
            };
            let mut item = BarcodeItem::new(
                format!("sku-{}", id),
                &article.sku,
                &article.name,
                ItemKind::Sku,
            )
            .with_metadata(metadata_of(article));
            item.description = non_empty(&article.description).map(str::to_string);
            item
        })
        .collect()
}

pub fn from_locations(locations: &[Location]) -> Vec<BarcodeItem> {
    locations
        .iter()
        .map(|location| {
            let code = &location.location_code;
            let name = match non_empty(&location.zone) {
                Some(zone) => format!("{} - {}", code, zone),
                None => code.clone(),
            };
            let description = non_empty(&location.description)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Location: {}", code));
            BarcodeItem::new(
                format!("location-{}", display_id(&location.id)),
                code,
                name,
                ItemKind::Location,
            )
            .with_description(description)
            .with_metadata(metadata_of(location))
        })
        .collect()
}

pub fn from_tasks(tasks: &[Task]) -> Vec<BarcodeItem> {
    tasks
        .iter()
        .map(|task| {
            let task_type = TaskType::of(task);
            let number = non_empty(&task.inbound_number)
                .or(non_empty(&task.outbound_number))
                .unwrap_or(&task.task_id);
            let description = match non_empty(&task.notes) {
                Some(notes) => format!("{} - {}", number, notes),
                None => number.to_string(),
            };

            let mut metadata = metadata_of(task);
            if let Value::Object(map) = &mut metadata {
                map.insert("task_type".into(), Value::String(task_type.label().into()));
            }

            BarcodeItem::new(
                format!("task-{}", display_id(&task.id)),
                &task.task_id,
                format!("{} - {}", task_type.label(), task.task_id),
                ItemKind::Task,
            )
            .with_description(description)
            .with_metadata(metadata)
        })
        .collect()
}

pub fn from_lots(lots: &[Lot], sku: &str) -> Vec<BarcodeItem> {
    lots.iter()
        .map(|lot| {
            let expires = non_empty(&lot.expiration_date)
                .map(format_date)
                .unwrap_or_else(|| "N/A".to_string());
            let quantity = lot.quantity.unwrap_or(0.0);
            BarcodeItem::new(
                format!("lot-{}", display_id(&lot.id)),
                format!("{}-LOT{}", sku, lot.lot_number),
                format!("{} - Lot {}", sku, lot.lot_number),
                ItemKind::Sku,
            )
            .with_description(format!("Exp: {} | Qty: {}", expires, quantity))
            .with_metadata(metadata_of(lot))
        })
        .collect()
}

pub fn from_serials(serials: &[Serial], sku: &str) -> Vec<BarcodeItem> {
    serials
        .iter()
        .map(|serial| {
            let id = if serial.serial_number.is_empty() {
                display_id(&serial.id)
            } else {
                serial.serial_number.clone()
            };
            BarcodeItem::new(
                format!("serial-{}", id),
                format!("{}-SN{}", sku, serial.serial_number),
                format!("{} - Serial {}", sku, serial.serial_number),
                ItemKind::Sku,
            )
            .with_metadata(metadata_of(serial))
        })
        .collect()
}

fn display_id(id: &Option<EntityId>) -> String {
    id.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Render an API date (RFC 3339 or plain `YYYY-MM-DD`) as `dd/mm/yyyy`.
/// Unparseable input is shown as-is.
fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d/%m/%Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    raw.to_string()
}
