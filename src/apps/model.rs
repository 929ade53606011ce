//! App model

use crate::core::entity::{Model, Record, RecordId};
use crate::core::error::Result;
use crate::core::field::FieldValue;
use crate::core::sort::FieldRef;
use serde::Serialize;
use serde_json::Value;

/// One application definition as returned by `GET /v2/apps`
///
/// Only `id` is required. The typed accessors cover the attributes the
/// dashboard lists; everything else stays reachable through [`App::record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct App {
    record: Record,
}

impl App {
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn cmd(&self) -> Option<&str> {
        self.record.get("cmd").and_then(Value::as_str)
    }

    pub fn instances(&self) -> Option<u64> {
        self.record.get("instances").and_then(Value::as_u64)
    }

    pub fn cpus(&self) -> Option<f64> {
        self.record.get("cpus").and_then(Value::as_f64)
    }

    pub fn mem(&self) -> Option<f64> {
        self.record.get("mem").and_then(Value::as_f64)
    }

    pub fn tasks_running(&self) -> Option<u64> {
        self.record.get("tasksRunning").and_then(Value::as_u64)
    }
}

impl From<Record> for App {
    fn from(record: Record) -> Self {
        Self { record }
    }
}

impl Model for App {
    fn id(&self) -> &RecordId {
        self.record.id()
    }

    fn field_value(&self, field: &FieldRef) -> FieldValue {
        self.record.field_value(field)
    }

    fn from_raw(raw: Value) -> Result<Self> {
        Record::from_raw(raw).map(App::from)
    }
}
