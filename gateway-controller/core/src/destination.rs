/// Client-side TLS policy for connections to one backend host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestinationPolicy {
    pub host: String,
    pub tls: Option<ClientTls>,
    pub port_tls: Vec<PortClientTls>,
}

/// Only simple (server-authenticated) TLS is expressible; the credential
/// names the secret holding the certificate authority bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientTls {
    pub credential_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortClientTls {
    pub port: u32,
    pub tls: ClientTls,
}
