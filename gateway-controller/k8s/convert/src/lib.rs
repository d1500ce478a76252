#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Compiles Gateway API resources into mesh configuration.
//!
//! One call consumes one immutable snapshot and produces one output
//! bundle plus the recomputed statuses for the input resources. The
//! conversion performs no I/O and never fails: malformed units degrade
//! to warnings and are excluded from the output.

mod binding;
mod destination;
mod gateway;
mod resources;
mod route;
mod weights;


pub use self::resources::{Outcome, Output, Snapshot};

/// Converts one snapshot. Gateways are processed in snapshot order and
/// listeners in declaration order, so unchanged input yields
/// byte-identical output.
pub fn convert(snapshot: &Snapshot) -> Outcome {
    let now = timestamp();

    let (gateways, owners, mut updates) = gateway::convert_gateways(snapshot, now);
    let (routes, route_updates) = route::convert_routes(snapshot, &owners, now);
    updates.extend(route_updates);
    let destinations = destination::convert_destinations(snapshot);

    Outcome {
        output: Output {
            gateways,
            routes,
            destinations,
        },
        updates,
    }
}

#[cfg(not(test))]
fn timestamp() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}

#[cfg(test)]
fn timestamp() -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::MIN_UTC
}
