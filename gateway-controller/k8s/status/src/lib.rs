#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod conditions;
mod resource_id;

pub use self::{
    conditions::{condition, reconcile, STATUS_FALSE, STATUS_TRUE},
    resource_id::ResourceId,
};

use serde::Serialize;

/// A recomputed status for one resource, to be persisted by the caller.
///
/// The engine never writes statuses itself; it hands these back so that
/// the surrounding controller can apply them with its own client and
/// retry policy.
#[derive(Debug, PartialEq)]
pub struct Update {
    pub id: ResourceId,
    pub patch: kube::api::Patch<serde_json::Value>,
}

pub fn make_patch<S: Serialize>(
    api_version: &str,
    kind: &str,
    name: &str,
    status: &S,
) -> kube::api::Patch<serde_json::Value> {
    let value = serde_json::json!({
        "apiVersion": api_version,
        "kind": kind,
        "name": name,
        "status": status,
    });
    kube::api::Patch::Merge(value)
}
