use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A name/color tag that can be attached to any number of issues
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct Label {
    pub id: i32,
    pub name: String,
    pub color: String,
}

impl Label {
    pub fn new(id: i32, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
        }
    }
}
