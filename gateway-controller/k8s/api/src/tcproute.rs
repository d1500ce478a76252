use crate::{
    route::{RouteForwardTo, RouteGateways, RouteStatus},
    LocalObjectReference,
};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Forwards TCP connections to weighted backends. The schema defines no
/// useful per-connection match criteria at this level.
#[derive(Clone, Debug, PartialEq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "networking.x-k8s.io",
    version = "v1alpha1",
    kind = "TCPRoute",
    root = "TcpRoute",
    status = "RouteStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct TcpRouteSpec {
    pub gateways: Option<RouteGateways>,
    #[serde(default)]
    pub rules: Vec<TcpRouteRule>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TcpRouteRule {
    #[serde(default)]
    pub matches: Vec<TcpRouteMatch>,
    #[serde(default)]
    pub forward_to: Vec<RouteForwardTo>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TcpRouteMatch {
    pub extension_ref: Option<LocalObjectReference>,
}
