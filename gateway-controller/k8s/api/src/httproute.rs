use crate::{
    route::{RouteGateways, RouteStatus},
    LocalObjectReference,
};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FILTER_REQUEST_HEADER_MODIFIER: &str = "RequestHeaderModifier";

/// Routes HTTP requests by path and header to weighted backends.
#[derive(Clone, Debug, Default, PartialEq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "networking.x-k8s.io",
    version = "v1alpha1",
    kind = "HTTPRoute",
    root = "HttpRoute",
    status = "RouteStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct HttpRouteSpec {
    pub gateways: Option<RouteGateways>,
    #[serde(default)]
    pub hostnames: Vec<String>,
    #[serde(default)]
    pub rules: Vec<HttpRouteRule>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpRouteRule {
    #[serde(default)]
    pub matches: Vec<HttpRouteMatch>,
    #[serde(default)]
    pub filters: Vec<HttpRouteFilter>,
    #[serde(default)]
    pub forward_to: Vec<HttpRouteForwardTo>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpRouteMatch {
    pub path: Option<HttpPathMatch>,
    pub headers: Option<HttpHeaderMatch>,
}

#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "type")]
pub enum HttpPathMatch {
    Exact { value: String },
    Prefix { value: String },
    RegularExpression { value: String },
    ImplementationSpecific { value: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "type")]
pub enum HttpHeaderMatch {
    Exact { values: BTreeMap<String, String> },
    RegularExpression { values: BTreeMap<String, String> },
    ImplementationSpecific { values: BTreeMap<String, String> },
}

// An unset or empty match type means the schema default, so these cannot
// be plain tagged enums on the way in.

impl<'de> Deserialize<'de> for HttpPathMatch {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(rename = "type", default)]
            match_type: Option<String>,
            value: String,
        }

        let Raw { match_type, value } = Raw::deserialize(deserializer)?;
        match match_type.as_deref() {
            None | Some("") | Some("Prefix") => Ok(Self::Prefix { value }),
            Some("Exact") => Ok(Self::Exact { value }),
            Some("RegularExpression") => Ok(Self::RegularExpression { value }),
            Some("ImplementationSpecific") => Ok(Self::ImplementationSpecific { value }),
            Some(other) => Err(serde::de::Error::unknown_variant(
                other,
                &[
                    "Exact",
                    "Prefix",
                    "RegularExpression",
                    "ImplementationSpecific",
                ],
            )),
        }
    }
}

impl<'de> Deserialize<'de> for HttpHeaderMatch {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(rename = "type", default)]
            match_type: Option<String>,
            #[serde(default)]
            values: BTreeMap<String, String>,
        }

        let Raw { match_type, values } = Raw::deserialize(deserializer)?;
        match match_type.as_deref() {
            None | Some("") | Some("Exact") => Ok(Self::Exact { values }),
            Some("RegularExpression") => Ok(Self::RegularExpression { values }),
            Some("ImplementationSpecific") => Ok(Self::ImplementationSpecific { values }),
            Some(other) => Err(serde::de::Error::unknown_variant(
                other,
                &["Exact", "RegularExpression", "ImplementationSpecific"],
            )),
        }
    }
}

/// The filter kind is left as an open string so that kinds this
/// controller does not implement survive deserialization and can be
/// skipped with a warning instead of rejecting the whole route.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpRouteFilter {
    #[serde(rename = "type")]
    pub filter_type: String,
    pub request_header_modifier: Option<HttpRequestHeaderFilter>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequestHeaderFilter {
    #[serde(default)]
    pub set: BTreeMap<String, String>,
    #[serde(default)]
    pub add: BTreeMap<String, String>,
    #[serde(default)]
    pub remove: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpRouteForwardTo {
    pub service_name: Option<String>,
    pub backend_ref: Option<LocalObjectReference>,
    pub port: Option<u16>,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub filters: Vec<HttpRouteFilter>,
}
