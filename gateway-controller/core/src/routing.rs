use std::collections::BTreeMap;

/// A set of routing rules attached to one or more gateways.
///
/// Gateways are referenced by `<namespace>/<name>`, or by the reserved
/// mesh gateway name for sidecar-to-sidecar routing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteSet {
    pub hosts: Vec<String>,
    pub gateways: Vec<String>,
    pub http: Vec<HttpRule>,
    pub tcp: Vec<TcpRule>,
    pub tls: Vec<TlsRule>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRule {
    pub matches: Vec<HttpMatch>,
    pub headers: Option<HeaderModifier>,
    pub route: Vec<HttpDestination>,
}

/// An empty match set matches every request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpMatch {
    pub uri: Option<StringMatch>,
    pub headers: BTreeMap<String, StringMatch>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StringMatch {
    Exact(String),
    Regex(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpDestination {
    pub destination: Destination,
    pub weight: u32,
    pub headers: Option<HeaderModifier>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderModifier {
    pub set: BTreeMap<String, String>,
    pub add: BTreeMap<String, String>,
    pub remove: Vec<String>,
}

/// TCP rules carry no match criteria; a rule applies to every connection
/// reaching the gateways it is attached to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TcpRule {
    pub route: Vec<WeightedDestination>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlsRule {
    pub matches: Vec<TlsMatch>,
    pub route: Vec<WeightedDestination>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlsMatch {
    pub sni_hosts: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedDestination {
    pub destination: Destination,
    pub weight: u32,
}

/// A fully-qualified backend service, optionally pinned to a port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Destination {
    pub host: String,
    pub port: Option<u32>,
}
