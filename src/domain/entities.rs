//! Domain entities: concrete record types

use serde::{Deserialize, Serialize};

use crate::domain::record::Record;

/// A menu row as stored in a flat table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRecord {
    pub id: i64,
    /// Parent menu id; `0` or the record's own id marks a top-level entry
    #[serde(alias = "father_id", alias = "parentId")]
    pub parent_id: i64,
    pub name: String,
    /// Page route, e.g. `/asset`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl MenuRecord {
    pub fn new(id: i64, parent_id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            route: None,
            icon: None,
        }
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

impl Record for MenuRecord {
    type Id = i64;
    type Payload = MenuRecord;

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> i64 {
        self.parent_id
    }

    fn is_root(&self) -> bool {
        self.parent_id == 0 || self.parent_id == self.id
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn payload(&self) -> &MenuRecord {
        self
    }
}
