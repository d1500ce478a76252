use crate::{
    binding::{GatewayId, RouteOwners, RouteView},
    resources::Snapshot,
    weights,
};
use chrono::{DateTime, Utc};
use mesh_gateway_controller_core::{
    routing::{
        Destination, HeaderModifier, HttpDestination, HttpMatch, HttpRule, RouteSet, StringMatch,
        TcpRule, TlsMatch, TlsRule, WeightedDestination,
    },
    Config, GENERATED_NAME_SUFFIX, MESH_GATEWAY_NAME,
};
use mesh_gateway_controller_k8s_api::{
    self as k8s,
    httproute::{
        HttpHeaderMatch, HttpPathMatch, HttpRouteFilter, HttpRouteForwardTo, HttpRouteMatch,
        FILTER_REQUEST_HEADER_MODIFIER,
    },
    route::{
        GatewayReference, RouteForwardTo, RouteGatewayStatus, RouteStatus, ROUTE_CONDITION_ADMITTED,
    },
};
use mesh_gateway_controller_k8s_status::{condition, make_patch, reconcile, ResourceId, Update};
use std::collections::BTreeMap;

/// Optionally matches "/..." after a literal path prefix.
const PREFIX_MATCH_TRAILER: &str = r"((\/).*)?";

/// Emits one routing config per route that has at least one owning
/// gateway. Routes absent from the ownership map are skipped, not
/// errors.
pub(crate) fn convert_routes(
    snapshot: &Snapshot,
    owners: &RouteOwners,
    now: DateTime<Utc>,
) -> (Vec<Config<RouteSet>>, Vec<Update>) {
    let mut result = Vec::new();
    let mut updates = Vec::new();

    for route in &snapshot.tcp_routes {
        let view = RouteView::tcp(route);
        let gateways = match owners.get(&view.id()) {
            Some(gateways) => gateways,
            None => continue,
        };
        result.push(tcp_route_set(route, &view, gateways, &snapshot.cluster_domain));
        updates.push(status_update(
            &view,
            route.status.as_ref(),
            route.metadata.generation,
            gateways,
            now,
        ));
    }

    for route in &snapshot.tls_routes {
        let view = RouteView::tls(route);
        let gateways = match owners.get(&view.id()) {
            Some(gateways) => gateways,
            None => continue,
        };
        result.push(tls_route_set(route, &view, gateways, &snapshot.cluster_domain));
        updates.push(status_update(
            &view,
            route.status.as_ref(),
            route.metadata.generation,
            gateways,
            now,
        ));
    }

    for route in &snapshot.http_routes {
        let view = RouteView::http(route);
        let gateways = match owners.get(&view.id()) {
            Some(gateways) => gateways,
            None => continue,
        };
        result.push(http_route_set(route, &view, gateways, &snapshot.cluster_domain));
        updates.push(status_update(
            &view,
            route.status.as_ref(),
            route.metadata.generation,
            gateways,
            now,
        ));
    }

    (result, updates)
}

fn http_route_set(
    route: &k8s::HttpRoute,
    view: &RouteView<'_>,
    gateways: &[GatewayId],
    domain: &str,
) -> Config<RouteSet> {
    let http = route
        .spec
        .rules
        .iter()
        .map(|rule| HttpRule {
            matches: rule.matches.iter().map(http_match).collect(),
            headers: headers_filter(&rule.filters),
            route: http_destinations(&rule.forward_to, view.namespace, domain),
        })
        .collect();

    Config {
        name: format!("{}-{}", view.name, GENERATED_NAME_SUFFIX),
        namespace: view.namespace.to_string(),
        spec: RouteSet {
            hosts: route.spec.hostnames.clone(),
            gateways: gateway_names(gateways),
            http,
            tcp: Vec::new(),
            tls: Vec::new(),
        },
    }
}

fn tcp_route_set(
    route: &k8s::TcpRoute,
    view: &RouteView<'_>,
    gateways: &[GatewayId],
    domain: &str,
) -> Config<RouteSet> {
    let tcp = route
        .spec
        .rules
        .iter()
        // The schema defines no usable TCP match criteria; every rule
        // matches everything.
        .map(|rule| TcpRule {
            route: weighted_destinations(&rule.forward_to, view.namespace, domain),
        })
        .collect();

    Config {
        name: format!("{}-tcp-{}", view.name, GENERATED_NAME_SUFFIX),
        namespace: view.namespace.to_string(),
        spec: RouteSet {
            hosts: vec!["*".to_string()],
            gateways: gateway_names(gateways),
            http: Vec::new(),
            tcp,
            tls: Vec::new(),
        },
    }
}

fn tls_route_set(
    route: &k8s::TlsRoute,
    view: &RouteView<'_>,
    gateways: &[GatewayId],
    domain: &str,
) -> Config<RouteSet> {
    let tls = route
        .spec
        .rules
        .iter()
        .map(|rule| TlsRule {
            matches: tls_matches(&rule.matches),
            route: weighted_destinations(&rule.forward_to, view.namespace, domain),
        })
        .collect();

    Config {
        name: format!("{}-tls-{}", view.name, GENERATED_NAME_SUFFIX),
        namespace: view.namespace.to_string(),
        spec: RouteSet {
            hosts: vec!["*".to_string()],
            gateways: gateway_names(gateways),
            http: Vec::new(),
            tcp: Vec::new(),
            tls,
        },
    }
}

fn gateway_names(gateways: &[GatewayId]) -> Vec<String> {
    gateways.iter().map(GatewayId::qualified_name).collect()
}

fn http_match(route_match: &HttpRouteMatch) -> HttpMatch {
    HttpMatch {
        uri: route_match.path.as_ref().map(uri_match),
        headers: route_match
            .headers
            .as_ref()
            .map(headers_match)
            .unwrap_or_default(),
    }
}

fn uri_match(path: &HttpPathMatch) -> StringMatch {
    match path {
        HttpPathMatch::Prefix { value } | HttpPathMatch::ImplementationSpecific { value } => {
            let trimmed = value.strip_suffix('/').unwrap_or(value);
            StringMatch::Regex(format!("{}{}", regex::escape(trimmed), PREFIX_MATCH_TRAILER))
        }
        HttpPathMatch::Exact { value } => StringMatch::Exact(value.clone()),
        HttpPathMatch::RegularExpression { value } => StringMatch::Regex(value.clone()),
    }
}

fn headers_match(headers: &HttpHeaderMatch) -> BTreeMap<String, StringMatch> {
    match headers {
        HttpHeaderMatch::Exact { values } | HttpHeaderMatch::ImplementationSpecific { values } => {
            values
                .iter()
                .map(|(name, value)| (name.clone(), StringMatch::Exact(value.clone())))
                .collect()
        }
        HttpHeaderMatch::RegularExpression { .. } => {
            tracing::warn!("unsupported header match type, dropping header constraint");
            BTreeMap::new()
        }
    }
}

/// The last supported header-modifier filter wins; unsupported kinds are
/// dropped with a warning.
fn headers_filter(filters: &[HttpRouteFilter]) -> Option<HeaderModifier> {
    let mut headers = None;
    for filter in filters {
        if filter.filter_type == FILTER_REQUEST_HEADER_MODIFIER {
            headers = filter.request_header_modifier.as_ref().map(|modifier| HeaderModifier {
                set: modifier.set.clone(),
                add: modifier.add.clone(),
                remove: modifier.remove.clone(),
            });
        } else {
            tracing::warn!(filter_type = %filter.filter_type, "unsupported filter type");
        }
    }
    headers
}

fn http_destinations(
    forward_to: &[HttpRouteForwardTo],
    namespace: &str,
    domain: &str,
) -> Vec<HttpDestination> {
    let targets: Vec<(&HttpRouteForwardTo, Destination)> = forward_to
        .iter()
        .filter_map(|fwd| {
            destination(fwd.service_name.as_deref(), fwd.backend_ref.as_ref(), fwd.port, namespace, domain)
                .map(|dst| (fwd, dst))
        })
        .collect();

    let weights = weights::normalize(&targets.iter().map(|(fwd, _)| fwd.weight).collect::<Vec<_>>());

    targets
        .into_iter()
        .zip(weights)
        .map(|((fwd, destination), weight)| HttpDestination {
            destination,
            weight,
            headers: headers_filter(&fwd.filters),
        })
        .collect()
}

fn weighted_destinations(
    forward_to: &[RouteForwardTo],
    namespace: &str,
    domain: &str,
) -> Vec<WeightedDestination> {
    let targets: Vec<(u32, Destination)> = forward_to
        .iter()
        .filter_map(|fwd| {
            destination(fwd.service_name.as_deref(), fwd.backend_ref.as_ref(), fwd.port, namespace, domain)
                .map(|dst| (fwd.weight, dst))
        })
        .collect();

    let weights = weights::normalize(&targets.iter().map(|(weight, _)| *weight).collect::<Vec<_>>());

    targets
        .into_iter()
        .zip(weights)
        .map(|((_, destination), weight)| WeightedDestination { destination, weight })
        .collect()
}

/// Synthesizes the fully-qualified destination host. Only plain service
/// names are supported; any other backend reference contributes no
/// destination.
fn destination(
    service_name: Option<&str>,
    backend_ref: Option<&k8s::LocalObjectReference>,
    port: Option<u16>,
    namespace: &str,
    domain: &str,
) -> Option<Destination> {
    if let Some(service) = service_name {
        return Some(Destination {
            host: format!("{}.{}.svc.{}", service, namespace, domain),
            port: port.map(u32::from),
        });
    }
    if let Some(reference) = backend_ref {
        tracing::error!(?reference, "unsupported destination; backendRef is not supported");
    }
    None
}

fn tls_matches(matches: &[k8s::tlsroute::TlsRouteMatch]) -> Vec<TlsMatch> {
    if matches.is_empty() {
        // The downstream engine rejects an empty match list; match every
        // SNI explicitly instead.
        return vec![TlsMatch {
            sni_hosts: vec!["*".to_string()],
        }];
    }
    matches
        .iter()
        .map(|tls_match| TlsMatch {
            sni_hosts: tls_match.snis.clone(),
        })
        .collect()
}

fn status_update(
    view: &RouteView<'_>,
    existing: Option<&RouteStatus>,
    generation: Option<i64>,
    gateways: &[GatewayId],
    now: DateTime<Utc>,
) -> Update {
    let status = route_status(existing, generation, gateways, now);
    Update {
        id: ResourceId::new(
            view.kind.kind(),
            view.namespace.to_string(),
            view.name.to_string(),
        ),
        patch: make_patch(k8s::API_VERSION, view.kind.kind(), view.name, &status),
    }
}

/// One status entry per owning gateway, in ownership order. Conditions
/// are carried over from the existing entry for the same gateway so an
/// unchanged admission does not churn timestamps.
fn route_status(
    existing: Option<&RouteStatus>,
    generation: Option<i64>,
    gateways: &[GatewayId],
    now: DateTime<Utc>,
) -> RouteStatus {
    let gateways = gateways
        .iter()
        .map(|owner| {
            let gateway_ref = match owner {
                GatewayId::Gateway { namespace, name } => GatewayReference {
                    namespace: namespace.clone(),
                    name: name.clone(),
                },
                // The mesh gateway is not namespaced, but the reference
                // requires a namespace.
                GatewayId::Mesh => GatewayReference {
                    namespace: "default".to_string(),
                    name: MESH_GATEWAY_NAME.to_string(),
                },
            };
            let mut conditions = existing
                .iter()
                .flat_map(|status| status.gateways.iter())
                .find(|gw| gw.gateway_ref == gateway_ref)
                .map(|gw| gw.conditions.clone())
                .unwrap_or_default();
            reconcile(
                &mut conditions,
                condition(
                    ROUTE_CONDITION_ADMITTED,
                    true,
                    "RouteAdmitted",
                    "Route admitted",
                    generation,
                    now,
                ),
            );
            RouteGatewayStatus {
                gateway_ref,
                conditions,
            }
        })
        .collect();

    RouteStatus { gateways }
}
