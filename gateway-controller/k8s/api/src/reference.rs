use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// References an object in the same namespace as the referrer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalObjectReference {
    pub group: Option<String>,
    pub kind: Option<String>,
    pub name: String,
}

impl LocalObjectReference {
    /// Whether this reference targets the given group and kind. Unset or
    /// empty fields are treated as the expected defaults.
    pub fn targets(&self, group: &str, kind: &str) -> bool {
        empty_or_equal(self.group.as_deref(), group) && empty_or_equal(self.kind.as_deref(), kind)
    }
}

pub(crate) fn empty_or_equal(have: Option<&str>, expected: &str) -> bool {
    match have {
        None | Some("") => true,
        Some(v) => v == expected,
    }
}
