//! The contact record shared by the CSV and vCard formats

use serde::{Deserialize, Serialize};

/// One contact: a display name and its phone numbers, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: String,
    pub phones: Vec<String>,
}

impl ContactRecord {
    /// Create a new contact record
    pub fn new<I, S>(name: impl Into<String>, phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            phones: phones.into_iter().map(Into::into).collect(),
        }
    }

    /// A record is complete when it has a name and at least one phone number
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.phones.is_empty()
    }
}
