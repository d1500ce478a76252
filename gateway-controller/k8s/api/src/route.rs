use crate::LocalObjectReference;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Condition;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition type reported on a route for each gateway that admitted it.
pub const ROUTE_CONDITION_ADMITTED: &str = "Admitted";

/// Restricts which Gateways may bind a route. When unset, only gateways
/// in the route's own namespace are allowed.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteGateways {
    pub allow: Option<GatewayAllowType>,
    #[serde(default)]
    pub gateway_refs: Vec<GatewayReference>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum GatewayAllowType {
    All,
    FromList,
    SameNamespace,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GatewayReference {
    pub namespace: String,
    pub name: String,
}

/// A forwarding target shared by the TCP and TLS route kinds. A zero
/// weight means "no preference expressed", not "drop".
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteForwardTo {
    pub service_name: Option<String>,
    pub backend_ref: Option<LocalObjectReference>,
    pub port: Option<u16>,
    #[serde(default)]
    pub weight: u32,
}

/// Status shared by every route kind: one entry per gateway that bound
/// the route.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteStatus {
    #[serde(default)]
    pub gateways: Vec<RouteGatewayStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteGatewayStatus {
    pub gateway_ref: GatewayReference,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}
