use crate::{reference::empty_or_equal, LocalObjectReference};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Attaches client TLS trust settings to one or more backend services.
#[derive(Clone, Debug, PartialEq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "networking.x-k8s.io",
    version = "v1alpha1",
    kind = "BackendPolicy",
    status = "BackendPolicyStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct BackendPolicySpec {
    #[serde(default)]
    pub backend_refs: Vec<BackendRef>,
    pub tls: Option<BackendPolicyTls>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackendRef {
    pub group: Option<String>,
    pub kind: Option<String>,
    pub name: String,
    pub port: Option<u16>,
}

impl BackendRef {
    /// Whether this ref targets the given group and kind, treating unset
    /// or empty fields as the expected defaults.
    pub fn targets(&self, group: &str, kind: &str) -> bool {
        empty_or_equal(self.group.as_deref(), group) && empty_or_equal(self.kind.as_deref(), kind)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackendPolicyTls {
    pub certificate_authority_ref: Option<LocalObjectReference>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackendPolicyStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}
