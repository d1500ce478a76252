use ahash::AHashMap as HashMap;
use mesh_gateway_controller_core::{
    destination::DestinationPolicy, gateway::MeshGateway, routing::RouteSet, Config,
};
use mesh_gateway_controller_k8s_api as k8s;
use mesh_gateway_controller_k8s_status::Update;

/// One conversion pass's view of the cluster. Built by the watch layer;
/// read-only here.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub gateway_classes: Vec<k8s::GatewayClass>,
    pub gateways: Vec<k8s::Gateway>,
    pub http_routes: Vec<k8s::HttpRoute>,
    pub tcp_routes: Vec<k8s::TcpRoute>,
    pub tls_routes: Vec<k8s::TlsRoute>,
    pub backend_policies: Vec<k8s::BackendPolicy>,

    /// Namespace metadata, for namespace-selector evaluation.
    pub namespaces: HashMap<String, k8s::Namespace>,

    /// Suffix for fully-qualified service hostnames, typically
    /// `cluster.local`.
    pub cluster_domain: String,
}

/// The derived configuration, in deterministic order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Output {
    pub gateways: Vec<Config<MeshGateway>>,
    pub routes: Vec<Config<RouteSet>>,
    pub destinations: Vec<Config<DestinationPolicy>>,
}

#[derive(Debug, PartialEq)]
pub struct Outcome {
    pub output: Output,
    pub updates: Vec<Update>,
}
