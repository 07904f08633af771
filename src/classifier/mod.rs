//! Email classification.
//!
//! The gateway prefers a remote LLM and always falls back to the keyword
//! classifier, so callers get a valid [`ClassificationResult`] no matter
//! what the remote service does.

pub mod fallback;
pub mod gateway;

pub use fallback::{PRODUCTIVE_KEYWORDS, mock_classify};
pub use gateway::{ClassifierGateway, RemoteClassifier};

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two classification categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Work-relevant: needs action or a reply.
    Productive,
    /// Not work-relevant: greetings, thanks, noise.
    Improductive,
}

impl Category {
    /// The literal wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Productive => "Productive",
            Self::Improductive => "Improductive",
        }
    }

    /// Parse the exact wire value. Any other spelling is rejected.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "Productive" => Some(Self::Productive),
            "Improductive" => Some(Self::Improductive),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one email plus a suggested reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    /// Always finite and within `[0, 1]`.
    pub confidence: f64,
    pub summary: String,
    pub suggested_response: String,
}
