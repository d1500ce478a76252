#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod destination;
pub mod gateway;
pub mod routing;

/// Controller identity recorded on GatewayClass resources that this
/// controller owns.
pub const GATEWAY_CONTROLLER_NAME: &str = "mesh.io/gateway-controller";

/// Reserved gateway name routes may reference to request direct
/// service-to-service (sidecar) routing with no physical listener.
pub const MESH_GATEWAY_NAME: &str = "mesh";

/// Suffix appended to every generated configuration name so that derived
/// resources are distinguishable from hand-written mesh configuration and
/// repeated conversions produce identical identities.
pub const GENERATED_NAME_SUFFIX: &str = "k8s-gateway";

/// Workload label used to select the ingress gateway deployment that
/// generated gateway configs are bound to.
pub const GATEWAY_WORKLOAD_LABEL: (&str, &str) = ("mesh.io/gateway", "ingress-gateway");

/// A piece of derived mesh configuration with its deterministic identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config<T> {
    pub name: String,
    pub namespace: String,
    pub spec: T,
}
