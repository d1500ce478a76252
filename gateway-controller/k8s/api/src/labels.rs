use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type Map = BTreeMap<String, String>;

pub type Expressions = Vec<Expression>;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Expression {
    key: String,
    operator: Operator,
    #[serde(default)]
    values: Option<BTreeSet<String>>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum Operator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

/// Selects resources by their labels.
///
/// A default (empty) selector matches everything. Expressions are only
/// checked for well-formedness when the selector is compiled into a
/// [`Matcher`], mirroring how the apiserver accepts selectors that can
/// still fail to compile at evaluation time.
#[derive(Clone, Debug, Eq, PartialEq, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    match_labels: Option<Map>,
    match_expressions: Option<Expressions>,
}

/// A validated [`Selector`], ready to match label maps.
#[derive(Copy, Clone, Debug)]
pub struct Matcher<'t>(&'t Selector);

#[derive(Clone, Debug, thiserror::Error)]
pub enum InvalidSelector {
    #[error("operator {operator:?} on key {key} requires at least one value")]
    ValuesRequired { key: String, operator: Operator },

    #[error("operator {operator:?} on key {key} must not carry values")]
    ValuesForbidden { key: String, operator: Operator },
}

// === Selector ===

impl Selector {
    pub fn from_expressions(exprs: Expressions) -> Self {
        Self {
            match_labels: None,
            match_expressions: Some(exprs),
        }
    }

    pub fn from_map(map: Map) -> Self {
        Self {
            match_labels: Some(map),
            match_expressions: None,
        }
    }

    pub fn matcher(&self) -> Result<Matcher<'_>, InvalidSelector> {
        for expr in self.match_expressions.iter().flatten() {
            expr.validate()?;
        }
        Ok(Matcher(self))
    }
}

impl std::iter::FromIterator<(String, String)> for Selector {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

impl std::iter::FromIterator<(&'static str, &'static str)> for Selector {
    fn from_iter<T: IntoIterator<Item = (&'static str, &'static str)>>(iter: T) -> Self {
        Self::from_map(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl std::iter::FromIterator<Expression> for Selector {
    fn from_iter<T: IntoIterator<Item = Expression>>(iter: T) -> Self {
        Self::from_expressions(iter.into_iter().collect())
    }
}

// === Matcher ===

impl Matcher<'_> {
    pub fn matches(&self, labels: &Map) -> bool {
        for expr in self.0.match_expressions.iter().flatten() {
            if !expr.matches(labels) {
                return false;
            }
        }

        if let Some(match_labels) = self.0.match_labels.as_ref() {
            for (k, v) in match_labels.iter() {
                if labels.get(k) != Some(v) {
                    return false;
                }
            }
        }

        true
    }
}

// === Expression ===

impl Expression {
    pub fn new(key: impl ToString, operator: Operator, values: Option<BTreeSet<String>>) -> Self {
        Self {
            key: key.to_string(),
            operator,
            values,
        }
    }

    fn validate(&self) -> Result<(), InvalidSelector> {
        match self.operator {
            Operator::In | Operator::NotIn => {
                if self.values.as_ref().map_or(true, BTreeSet::is_empty) {
                    return Err(InvalidSelector::ValuesRequired {
                        key: self.key.clone(),
                        operator: self.operator,
                    });
                }
            }
            Operator::Exists | Operator::DoesNotExist => {
                if self.values.as_ref().is_some_and(|vs| !vs.is_empty()) {
                    return Err(InvalidSelector::ValuesForbidden {
                        key: self.key.clone(),
                        operator: self.operator,
                    });
                }
            }
        }
        Ok(())
    }

    fn matches(&self, labels: &Map) -> bool {
        let values = self.values.as_ref();
        match self.operator {
            Operator::In => labels
                .get(&self.key)
                .is_some_and(|v| values.is_some_and(|vs| vs.contains(v))),
            Operator::NotIn => labels
                .get(&self.key)
                .map_or(true, |v| !values.is_some_and(|vs| vs.contains(v))),
            Operator::Exists => labels.contains_key(&self.key),
            Operator::DoesNotExist => !labels.contains_key(&self.key),
        }
    }
}
