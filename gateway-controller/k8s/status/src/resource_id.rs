/// Identifies one resource by kind, namespace, and name.
///
/// Kinds come from the fixed set of resource types this controller
/// handles, so they are borrowed for the program's lifetime.
/// Cluster-scoped resources carry an empty namespace.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ResourceId {
    pub kind: &'static str,
    pub namespace: String,
    pub name: String,
}

impl ResourceId {
    pub fn new(kind: &'static str, namespace: String, name: String) -> Self {
        Self {
            kind,
            namespace,
            name,
        }
    }
}
