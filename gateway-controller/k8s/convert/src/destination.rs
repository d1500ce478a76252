use crate::{gateway::secret_name, resources::Snapshot};
use mesh_gateway_controller_core::{
    destination::{ClientTls, DestinationPolicy, PortClientTls},
    Config, GENERATED_NAME_SUFFIX,
};

/// Emits one destination policy per backend ref of every BackendPolicy.
///
/// No status is written: the only condition the upstream schema defines
/// is "no such backend", and the synthesized hosts are opaque here.
pub(crate) fn convert_destinations(snapshot: &Snapshot) -> Vec<Config<DestinationPolicy>> {
    let mut result = Vec::new();
    for policy in &snapshot.backend_policies {
        let namespace = policy.metadata.namespace.as_deref().unwrap_or_default();
        let policy_name = policy.metadata.name.as_deref().unwrap_or_default();

        for (i, backend_ref) in policy.spec.backend_refs.iter().enumerate() {
            if !backend_ref.targets("", "Service") {
                tracing::warn!(?backend_ref, "unsupported backend ref");
                continue;
            }
            let host = format!(
                "{}.{}.svc.{}",
                backend_ref.name, namespace, snapshot.cluster_domain
            );

            let tls = policy
                .spec
                .tls
                .as_ref()
                .and_then(|tls| tls.certificate_authority_ref.as_ref())
                .map(|ca_ref| ClientTls {
                    credential_name: secret_name(ca_ref),
                });
            // A ref with an explicit port scopes the TLS settings to
            // that port.
            let (tls, port_tls) = match (tls, backend_ref.port) {
                (Some(tls), Some(port)) => (
                    None,
                    vec![PortClientTls {
                        port: port.into(),
                        tls,
                    }],
                ),
                (tls, _) => (tls, Vec::new()),
            };

            result.push(Config {
                name: format!("{}-{}-{}", policy_name, i, GENERATED_NAME_SUFFIX),
                namespace: namespace.to_string(),
                spec: DestinationPolicy { host, tls, port_tls },
            });
        }
    }
    result
}
