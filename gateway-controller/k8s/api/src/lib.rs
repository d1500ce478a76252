#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod backend_policy;
pub mod gateway;
pub mod httproute;
pub mod labels;
mod reference;
pub mod route;
pub mod tcproute;
pub mod tlsroute;

pub use self::{
    backend_policy::BackendPolicy,
    gateway::{Gateway, GatewayClass},
    httproute::HttpRoute,
    reference::LocalObjectReference,
    tcproute::TcpRoute,
    tlsroute::TlsRoute,
};
pub use k8s_openapi::{
    api::core::v1::Namespace,
    apimachinery::pkg::apis::meta::v1::{Condition, Time},
};
pub use kube::api::{ObjectMeta, ResourceExt};

/// API group shared by every Gateway API resource, and the default group
/// assumed when a reference or binding selector leaves it unset.
pub const API_GROUP: &str = "networking.x-k8s.io";

pub const API_VERSION: &str = "networking.x-k8s.io/v1alpha1";
