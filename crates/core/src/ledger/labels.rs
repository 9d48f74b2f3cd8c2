//! Member code/name labelling of transaction items.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::Member;

/// How the item column is rendered in exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemLabelMode {
    /// Member names are replaced by codes.
    #[default]
    Codes,
    /// Member codes are replaced by names.
    Names,
}

impl FromStr for ItemLabelMode {
    type Err = Infallible;

    /// Anything other than `names` (any case) means codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("names") {
            Ok(Self::Names)
        } else {
            Ok(Self::Codes)
        }
    }
}

impl fmt::Display for ItemLabelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codes => write!(f, "codes"),
            Self::Names => write!(f, "names"),
        }
    }
}

/// Lookup between member codes and names, keyed on trimmed values.
#[derive(Debug, Clone, Default)]
pub struct ItemLabeler {
    code_to_name: HashMap<String, String>,
    name_to_code: HashMap<String, String>,
}

impl ItemLabeler {
    /// Builds the lookup from a roster. Later duplicates win.
    #[must_use]
    pub fn new(roster: &[Member]) -> Self {
        let mut labeler = Self::default();
        for member in roster {
            let code = member.code_key().to_string();
            let name = member.name.trim().to_string();
            labeler.code_to_name.insert(code.clone(), name.clone());
            labeler.name_to_code.insert(name, code);
        }
        labeler
    }

    /// Renders `item` for `mode`. Items that match no member pass through trimmed.
    #[must_use]
    pub fn label(&self, item: &str, mode: ItemLabelMode) -> String {
        let key = item.trim();
        let lookup = match mode {
            ItemLabelMode::Names => &self.code_to_name,
            ItemLabelMode::Codes => &self.name_to_code,
        };
        lookup
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Name of the member with `code`.
    #[must_use]
    pub fn member_name(&self, code: &str) -> Option<&str> {
        self.code_to_name.get(code.trim()).map(String::as_str)
    }
}
