use ahash::AHashMap as HashMap;
use mesh_gateway_controller_core::MESH_GATEWAY_NAME;
use mesh_gateway_controller_k8s_api::{
    self as k8s,
    gateway::{RouteBindingSelector, RouteSelectType},
    labels,
    route::{GatewayAllowType, RouteGateways},
    ObjectMeta,
};

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) enum RouteKind {
    Http,
    Tcp,
    Tls,
}

impl RouteKind {
    pub(crate) fn kind(self) -> &'static str {
        match self {
            Self::Http => "HTTPRoute",
            Self::Tcp => "TCPRoute",
            Self::Tls => "TLSRoute",
        }
    }
}

/// Identifies one route resource across kinds; key of the ownership map.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct RouteId {
    pub kind: RouteKind,
    pub namespace: String,
    pub name: String,
}

/// A gateway that has bound a route: either a generated gateway config
/// (referenced `<namespace>/<name>`) or the reserved mesh gateway.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum GatewayId {
    Gateway { namespace: String, name: String },
    Mesh,
}

impl GatewayId {
    pub(crate) fn qualified_name(&self) -> String {
        match self {
            Self::Gateway { namespace, name } => format!("{}/{}", namespace, name),
            Self::Mesh => MESH_GATEWAY_NAME.to_string(),
        }
    }
}

pub(crate) type RouteOwners = HashMap<RouteId, Vec<GatewayId>>;

/// A kind-erased view of one route resource, as the binding predicate
/// sees it.
#[derive(Copy, Clone, Debug)]
pub(crate) struct RouteView<'a> {
    pub kind: RouteKind,
    pub namespace: &'a str,
    pub name: &'a str,
    pub labels: Option<&'a labels::Map>,
    pub gateways: Option<&'a RouteGateways>,
}

impl<'a> RouteView<'a> {
    pub(crate) fn http(route: &'a k8s::HttpRoute) -> Self {
        Self::new(RouteKind::Http, &route.metadata, route.spec.gateways.as_ref())
    }

    pub(crate) fn tcp(route: &'a k8s::TcpRoute) -> Self {
        Self::new(RouteKind::Tcp, &route.metadata, route.spec.gateways.as_ref())
    }

    pub(crate) fn tls(route: &'a k8s::TlsRoute) -> Self {
        Self::new(RouteKind::Tls, &route.metadata, route.spec.gateways.as_ref())
    }

    fn new(kind: RouteKind, metadata: &'a ObjectMeta, gateways: Option<&'a RouteGateways>) -> Self {
        Self {
            kind,
            namespace: metadata.namespace.as_deref().unwrap_or_default(),
            name: metadata.name.as_deref().unwrap_or_default(),
            labels: metadata.labels.as_ref(),
            gateways,
        }
    }

    pub(crate) fn id(&self) -> RouteId {
        RouteId {
            kind: self.kind,
            namespace: self.namespace.to_string(),
            name: self.name.to_string(),
        }
    }
}

/// Whether a route binds to a gateway listener. This takes into account
/// selection config on both the gateway and the route.
///
/// A series of short-circuit `return false`s; passing every clause is a
/// match.
pub(crate) fn route_matches(
    route: &RouteView<'_>,
    gateway_namespace: &str,
    gateway_name: &str,
    selector: &RouteBindingSelector,
    namespaces: &HashMap<String, k8s::Namespace>,
) -> bool {
    if selector.kind != route.kind.kind() {
        return false;
    }

    let group = selector
        .group
        .as_deref()
        .filter(|g| !g.is_empty())
        .unwrap_or(k8s::API_GROUP);
    if group != k8s::API_GROUP {
        return false;
    }

    let empty = labels::Map::new();

    if let Some(route_selector) = selector.selector.as_ref() {
        let matcher = match route_selector.matcher() {
            Ok(matcher) => matcher,
            Err(error) => {
                tracing::error!(%error, "failed to compile route selector");
                return false;
            }
        };
        if !matcher.matches(route.labels.unwrap_or(&empty)) {
            return false;
        }
    }

    let from = selector
        .namespaces
        .as_ref()
        .and_then(|ns| ns.from)
        .unwrap_or(RouteSelectType::Same);
    match from {
        RouteSelectType::All => {}
        RouteSelectType::Same => {
            if gateway_namespace != route.namespace {
                return false;
            }
        }
        RouteSelectType::Selector => {
            let namespace = match namespaces.get(route.namespace) {
                Some(namespace) => namespace,
                None => {
                    tracing::error!(
                        namespace = %route.namespace,
                        route = %route.name,
                        "missing namespace for route, skipping"
                    );
                    return false;
                }
            };
            if let Some(ns_selector) = selector.namespaces.as_ref().and_then(|ns| ns.selector.as_ref()) {
                let matcher = match ns_selector.matcher() {
                    Ok(matcher) => matcher,
                    Err(error) => {
                        tracing::error!(%error, "failed to compile namespace selector");
                        return false;
                    }
                };
                if !matcher.matches(namespace.metadata.labels.as_ref().unwrap_or(&empty)) {
                    return false;
                }
            }
        }
    }

    let allow = route
        .gateways
        .and_then(|gws| gws.allow)
        .unwrap_or(GatewayAllowType::SameNamespace);
    match allow {
        GatewayAllowType::All => {}
        GatewayAllowType::FromList => {
            let found = route.gateways.is_some_and(|gws| {
                gws.gateway_refs
                    .iter()
                    .any(|gw| gw.name == gateway_name && gw.namespace == gateway_namespace)
            });
            if !found {
                return false;
            }
        }
        GatewayAllowType::SameNamespace => {
            if gateway_namespace != route.namespace {
                return false;
            }
        }
    }

    true
}

/// HTTP routes that name the reserved mesh gateway in their gateway
/// refs. These bind to sidecar-to-sidecar routing unconditionally,
/// without passing any listener selector; the ref's namespace is
/// ignored.
pub(crate) fn mesh_routes(http_routes: &[k8s::HttpRoute]) -> Vec<RouteId> {
    let mut keys = Vec::new();
    for route in http_routes {
        let names_mesh = route
            .spec
            .gateways
            .as_ref()
            .map(|gws| gws.gateway_refs.iter().any(|gw| gw.name == MESH_GATEWAY_NAME))
            .unwrap_or(false);
        if names_mesh {
            keys.push(RouteView::http(route).id());
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_gateway_controller_k8s_api::{
        gateway::RouteNamespaces, httproute::HttpRouteSpec, labels::Selector,
        route::GatewayReference,
    };

    fn route(namespace: &str, labels: &[(&str, &str)], gateways: Option<RouteGateways>) -> k8s::HttpRoute {
        k8s::HttpRoute {
            metadata: ObjectMeta {
                namespace: Some(namespace.to_string()),
                name: Some("route".to_string()),
                labels: Some(
                    labels
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                ),
                ..Default::default()
            },
            spec: HttpRouteSpec {
                gateways,
                ..Default::default()
            },
            status: None,
        }
    }

    fn selector() -> RouteBindingSelector {
        RouteBindingSelector {
            group: None,
            kind: "HTTPRoute".to_string(),
            selector: None,
            namespaces: None,
        }
    }

    #[test]
    fn same_namespace_default_fields_match() {
        let route = route("default", &[], None);
        let view = RouteView::http(&route);
        assert!(route_matches(
            &view,
            "default",
            "gw",
            &selector(),
            &HashMap::new()
        ));
    }

    #[test]
    fn kind_mismatch_rejected() {
        let route = route("default", &[], None);
        let view = RouteView::http(&route);
        let selector = RouteBindingSelector {
            kind: "TCPRoute".to_string(),
            ..selector()
        };
        assert!(!route_matches(
            &view,
            "default",
            "gw",
            &selector,
            &HashMap::new()
        ));
    }

    #[test]
    fn foreign_group_rejected() {
        let route = route("default", &[], None);
        let view = RouteView::http(&route);
        let selector = RouteBindingSelector {
            group: Some("example.com".to_string()),
            ..selector()
        };
        assert!(!route_matches(
            &view,
            "default",
            "gw",
            &selector,
            &HashMap::new()
        ));
    }

    #[test]
    fn label_selector_filters_routes() {
        let labeled = route("default", &[("expose", "true")], None);
        let unlabeled = route("default", &[], None);
        let selector = RouteBindingSelector {
            selector: Some(Selector::from_iter(Some(("expose", "true")))),
            ..selector()
        };
        assert!(route_matches(
            &RouteView::http(&labeled),
            "default",
            "gw",
            &selector,
            &HashMap::new()
        ));
        assert!(!route_matches(
            &RouteView::http(&unlabeled),
            "default",
            "gw",
            &selector,
            &HashMap::new()
        ));
    }

    #[test]
    fn default_namespace_policy_rejects_cross_namespace() {
        let route = route("other", &[], None);
        let view = RouteView::http(&route);
        assert!(!route_matches(
            &view,
            "default",
            "gw",
            &selector(),
            &HashMap::new()
        ));
    }

    #[test]
    fn all_namespace_policy_crosses_namespaces() {
        let route = route(
            "other",
            &[],
            Some(RouteGateways {
                allow: Some(GatewayAllowType::All),
                gateway_refs: Vec::new(),
            }),
        );
        let view = RouteView::http(&route);
        let selector = RouteBindingSelector {
            namespaces: Some(RouteNamespaces {
                from: Some(RouteSelectType::All),
                selector: None,
            }),
            ..selector()
        };
        assert!(route_matches(
            &view,
            "default",
            "gw",
            &selector,
            &HashMap::new()
        ));
    }

    #[test]
    fn namespace_selector_consults_namespace_labels() {
        let route = route(
            "prod",
            &[],
            Some(RouteGateways {
                allow: Some(GatewayAllowType::All),
                gateway_refs: Vec::new(),
            }),
        );
        let view = RouteView::http(&route);
        let selector = RouteBindingSelector {
            namespaces: Some(RouteNamespaces {
                from: Some(RouteSelectType::Selector),
                selector: Some(Selector::from_iter(Some(("env", "prod")))),
            }),
            ..selector()
        };

        // Unknown namespace fails.
        assert!(!route_matches(
            &view,
            "default",
            "gw",
            &selector,
            &HashMap::new()
        ));

        let mut namespaces = HashMap::new();
        namespaces.insert(
            "prod".to_string(),
            k8s::Namespace {
                metadata: ObjectMeta {
                    name: Some("prod".to_string()),
                    labels: Some(
                        Some(("env".to_string(), "prod".to_string()))
                            .into_iter()
                            .collect(),
                    ),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        assert!(route_matches(&view, "default", "gw", &selector, &namespaces));
    }

    #[test]
    fn same_namespace_allow_policy_rejects_regardless_of_labels() {
        let route = route(
            "other",
            &[("expose", "true")],
            Some(RouteGateways {
                allow: Some(GatewayAllowType::SameNamespace),
                gateway_refs: Vec::new(),
            }),
        );
        let view = RouteView::http(&route);
        let selector = RouteBindingSelector {
            selector: Some(Selector::from_iter(Some(("expose", "true")))),
            namespaces: Some(RouteNamespaces {
                from: Some(RouteSelectType::All),
                selector: None,
            }),
            ..selector()
        };
        assert!(!route_matches(
            &view,
            "default",
            "gw",
            &selector,
            &HashMap::new()
        ));
    }

    #[test]
    fn from_list_matches_explicit_ref_only() {
        let gateways = RouteGateways {
            allow: Some(GatewayAllowType::FromList),
            gateway_refs: vec![GatewayReference {
                namespace: "default".to_string(),
                name: "gw".to_string(),
            }],
        };
        let route = route("other", &[], Some(gateways));
        let view = RouteView::http(&route);
        let selector = RouteBindingSelector {
            namespaces: Some(RouteNamespaces {
                from: Some(RouteSelectType::All),
                selector: None,
            }),
            ..selector()
        };
        assert!(route_matches(
            &view,
            "default",
            "gw",
            &selector,
            &HashMap::new()
        ));
        assert!(!route_matches(
            &view,
            "default",
            "other-gw",
            &selector,
            &HashMap::new()
        ));
    }

    #[test]
    fn invalid_selector_is_not_a_match() {
        use mesh_gateway_controller_k8s_api::labels::{Expression, Operator};

        let route = route("default", &[("expose", "true")], None);
        let view = RouteView::http(&route);
        let selector = RouteBindingSelector {
            selector: Some(Selector::from_iter(Some(Expression::new(
                "expose",
                Operator::In,
                None,
            )))),
            ..selector()
        };
        assert!(!route_matches(
            &view,
            "default",
            "gw",
            &selector,
            &HashMap::new()
        ));
    }

    #[test]
    fn mesh_routes_keyed_by_literal_name() {
        let meshed = route(
            "default",
            &[],
            Some(RouteGateways {
                allow: Some(GatewayAllowType::FromList),
                gateway_refs: vec![GatewayReference {
                    namespace: "anything".to_string(),
                    name: "mesh".to_string(),
                }],
            }),
        );
        let cased = route(
            "default",
            &[],
            Some(RouteGateways {
                allow: Some(GatewayAllowType::FromList),
                gateway_refs: vec![GatewayReference {
                    namespace: "anything".to_string(),
                    name: "Mesh".to_string(),
                }],
            }),
        );
        assert_eq!(mesh_routes(&[meshed.clone()]).len(), 1);
        assert_eq!(mesh_routes(&[cased]).len(), 0);
        assert_eq!(
            mesh_routes(&[meshed])[0],
            RouteId {
                kind: RouteKind::Http,
                namespace: "default".to_string(),
                name: "route".to_string(),
            }
        );
    }
}
