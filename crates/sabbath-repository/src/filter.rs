//! Query filters
//!
//! A filter is a conjunction of per-field predicates. Backends either
//! evaluate it directly ([`Filter::matches`]) or translate it to their own
//! query language.

use sabbath_core::{Document, Value};

/// Predicate applied to one field
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field equals the value exactly
    Eq(Value),

    /// Field is a member of the set.
    ///
    /// A sequence field matches when it shares at least one element with the
    /// set; a scalar field matches when it equals one of the set's values.
    AnyOf(Vec<Value>),
}

impl Predicate {
    /// Check a field value (absent fields never match)
    pub fn matches(&self, field: Option<&Value>) -> bool {
        let Some(field) = field else {
            return false;
        };

        match self {
            Predicate::Eq(expected) => field == expected,
            Predicate::AnyOf(set) => match field {
                Value::Array(items) => items.iter().any(|item| set.contains(item)),
                scalar => set.contains(scalar),
            },
        }
    }
}

/// A set of field predicates combined with AND logic
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Predicate)>,
}

impl Filter {
    /// The empty filter, matching every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), Predicate::Eq(value.into())));
        self
    }

    /// Require `field` to intersect `values`
    pub fn any_of<V: Into<Value>>(
        mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.clauses.push((field.into(), Predicate::AnyOf(values)));
        self
    }

    /// Require the sequence `field` to contain `value`
    pub fn contains(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let value: Value = value.into();
        self.any_of(field, [value])
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[(String, Predicate)] {
        &self.clauses
    }

    /// Check if a document matches every clause
    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, predicate)| predicate.matches(doc.get(field)))
    }
}
