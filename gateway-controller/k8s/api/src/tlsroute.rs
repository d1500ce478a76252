use crate::{
    route::{RouteForwardTo, RouteGateways, RouteStatus},
    LocalObjectReference,
};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Forwards TLS connections by SNI to weighted backends, without
/// terminating TLS.
#[derive(Clone, Debug, PartialEq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "networking.x-k8s.io",
    version = "v1alpha1",
    kind = "TLSRoute",
    root = "TlsRoute",
    status = "RouteStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct TlsRouteSpec {
    pub gateways: Option<RouteGateways>,
    #[serde(default)]
    pub rules: Vec<TlsRouteRule>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsRouteRule {
    #[serde(default)]
    pub matches: Vec<TlsRouteMatch>,
    #[serde(default)]
    pub forward_to: Vec<RouteForwardTo>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsRouteMatch {
    #[serde(default)]
    pub snis: Vec<String>,
    pub extension_ref: Option<LocalObjectReference>,
}
