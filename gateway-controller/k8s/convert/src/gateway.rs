use crate::{
    binding::{self, GatewayId, RouteOwners, RouteView},
    resources::Snapshot,
};
use ahash::AHashSet as HashSet;
use chrono::{DateTime, Utc};
use mesh_gateway_controller_core::{
    gateway::{MeshGateway, Server, ServerPort, ServerTls},
    Config, GATEWAY_CONTROLLER_NAME, GATEWAY_WORKLOAD_LABEL, GENERATED_NAME_SUFFIX,
};
use mesh_gateway_controller_k8s_api::{
    self as k8s,
    gateway::{
        GatewayTlsConfig, Listener, ListenerStatus, TlsMode, GATEWAY_CLASS_CONDITION_ADMITTED,
        GATEWAY_CONDITION_READY, GATEWAY_CONDITION_SCHEDULED, LISTENER_CONDITION_READY,
    },
};
use mesh_gateway_controller_k8s_status::{condition, make_patch, reconcile, ResourceId, Update};
use std::collections::BTreeMap;

/// Walks admitted gateways, emitting one gateway config per Gateway and
/// recording, per listener, which routes each gateway owns.
pub(crate) fn convert_gateways(
    snapshot: &Snapshot,
    now: DateTime<Utc>,
) -> (Vec<Config<MeshGateway>>, RouteOwners, Vec<Update>) {
    let mut result = Vec::new();
    let mut owners = RouteOwners::default();
    let mut updates = Vec::new();

    let classes = admitted_classes(snapshot, now, &mut updates);

    for gw in &snapshot.gateways {
        if !classes.contains(&gw.spec.gateway_class_name) {
            // The class belongs to another controller; not ours to
            // process.
            continue;
        }

        let namespace = gw.metadata.namespace.as_deref().unwrap_or_default();
        let gateway_name = gw.metadata.name.as_deref().unwrap_or_default();
        let generation = gw.metadata.generation;
        let name = format!("{}-{}", gateway_name, GENERATED_NAME_SUFFIX);

        let mut status = gw.status.clone().unwrap_or_default();
        // Address programming is deferred; report none rather than
        // stale values.
        status.addresses = Vec::new();
        // One status entry per listener, same order as the spec.
        if status.listeners.len() != gw.spec.listeners.len() {
            status.listeners = vec![ListenerStatus::default(); gw.spec.listeners.len()];
        }

        let owner = GatewayId::Gateway {
            namespace: namespace.to_string(),
            name: name.clone(),
        };

        let mut servers = Vec::with_capacity(gw.spec.listeners.len());
        for (i, listener) in gw.spec.listeners.iter().enumerate() {
            let mut conditions = std::mem::take(&mut status.listeners[i].conditions);
            reconcile(
                &mut conditions,
                condition(
                    LISTENER_CONDITION_READY,
                    true,
                    "ListenerReady",
                    "No error found",
                    generation,
                    now,
                ),
            );
            status.listeners[i] = ListenerStatus {
                port: listener.port,
                protocol: listener.protocol.clone(),
                hostname: listener.hostname.clone(),
                conditions,
            };

            servers.push(build_server(listener, gateway_name, namespace));

            let views = snapshot
                .http_routes
                .iter()
                .map(RouteView::http)
                .chain(snapshot.tcp_routes.iter().map(RouteView::tcp))
                .chain(snapshot.tls_routes.iter().map(RouteView::tls));
            for view in views {
                if binding::route_matches(
                    &view,
                    namespace,
                    gateway_name,
                    &listener.routes,
                    &snapshot.namespaces,
                ) {
                    owners.entry(view.id()).or_default().push(owner.clone());
                }
            }
        }

        reconcile(
            &mut status.conditions,
            condition(
                GATEWAY_CONDITION_READY,
                true,
                "ListenersValid",
                "Listeners valid",
                generation,
                now,
            ),
        );
        reconcile(
            &mut status.conditions,
            condition(
                GATEWAY_CONDITION_SCHEDULED,
                true,
                "ResourcesAvailable",
                "Resources available",
                generation,
                now,
            ),
        );
        updates.push(Update {
            id: ResourceId::new("Gateway", namespace.to_string(), gateway_name.to_string()),
            patch: make_patch(k8s::API_VERSION, "Gateway", gateway_name, &status),
        });

        result.push(Config {
            name,
            namespace: namespace.to_string(),
            spec: MeshGateway {
                servers,
                workload_selector: workload_selector(),
            },
        });
    }

    for key in binding::mesh_routes(&snapshot.http_routes) {
        owners.entry(key).or_default().push(GatewayId::Mesh);
    }

    (result, owners, updates)
}

/// Names of the GatewayClasses owned by this controller; each admitted
/// class gets an Admitted condition.
fn admitted_classes(
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    updates: &mut Vec<Update>,
) -> HashSet<String> {
    let mut classes = HashSet::default();
    for class in &snapshot.gateway_classes {
        if class.spec.controller != GATEWAY_CONTROLLER_NAME {
            continue;
        }
        let name = class.metadata.name.as_deref().unwrap_or_default();
        classes.insert(name.to_string());

        let mut status = class.status.clone().unwrap_or_default();
        reconcile(
            &mut status.conditions,
            condition(
                GATEWAY_CLASS_CONDITION_ADMITTED,
                true,
                "Handled",
                "Handled by this controller",
                class.metadata.generation,
                now,
            ),
        );
        updates.push(Update {
            // GatewayClass is cluster-scoped.
            id: ResourceId::new("GatewayClass", String::new(), name.to_string()),
            patch: make_patch(k8s::API_VERSION, "GatewayClass", name, &status),
        });
    }
    classes
}

fn build_server(listener: &Listener, gateway_name: &str, namespace: &str) -> Server {
    Server {
        // Allow every matching host here; the per-route configs narrow
        // the actual routing.
        hosts: hostname_match(listener.hostname.as_deref()),
        port: ServerPort {
            number: listener.port.into(),
            protocol: listener.protocol.clone(),
            name: format!(
                "{}-{}-gateway-{}-{}",
                listener.protocol.to_lowercase(),
                listener.port,
                gateway_name,
                namespace
            ),
        },
        tls: listener.tls.as_ref().and_then(build_server_tls),
    }
}

fn build_server_tls(tls: &GatewayTlsConfig) -> Option<ServerTls> {
    match tls.mode.unwrap_or(TlsMode::Terminate) {
        TlsMode::Terminate => {
            let cert = match tls.certificate_ref.as_ref() {
                Some(cert) => cert,
                None => {
                    // Required by the API; should have been rejected in
                    // validation.
                    tracing::warn!(?tls, "ignoring invalid TLS config with no certificate ref");
                    return None;
                }
            };
            Some(ServerTls::Simple {
                credential_name: secret_name(cert),
            })
        }
        TlsMode::Passthrough => Some(ServerTls::Passthrough),
    }
}

pub(crate) fn secret_name(reference: &k8s::LocalObjectReference) -> String {
    if !reference.targets("", "Secret") {
        tracing::error!(?reference, "invalid certificate reference, only Secret is allowed");
        return String::new();
    }
    reference.name.clone()
}

/// Unset or empty hostname means the listener accepts any host.
fn hostname_match(hostname: Option<&str>) -> Vec<String> {
    match hostname {
        None | Some("") => vec!["*".to_string()],
        Some(hostname) => vec![hostname.to_string()],
    }
}

fn workload_selector() -> BTreeMap<String, String> {
    let (key, value) = GATEWAY_WORKLOAD_LABEL;
    BTreeMap::from([(key.to_string(), value.to_string())])
}
