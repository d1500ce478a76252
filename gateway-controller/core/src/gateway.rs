use std::collections::BTreeMap;

/// A set of listeners exposed by one ingress gateway workload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeshGateway {
    pub servers: Vec<Server>,
    pub workload_selector: BTreeMap<String, String>,
}

/// One listener: the hosts it claims, the port it binds, and how (or
/// whether) it terminates TLS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Server {
    pub hosts: Vec<String>,
    pub port: ServerPort,
    pub tls: Option<ServerTls>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerPort {
    pub number: u32,
    pub protocol: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerTls {
    /// Terminate TLS with the certificate stored under the named
    /// credential.
    Simple { credential_name: String },
    /// Pass TLS through to the backend without terminating.
    Passthrough,
}
