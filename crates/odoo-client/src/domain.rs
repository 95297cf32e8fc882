//! Search domains and search options

use xmlrpc_proto::{Kwargs, Value};

/// Builder for a search domain
///
/// A domain is a list of `(field, operator, value)` terms, optionally mixed
/// with the prefix operators `"&"`, `"|"` and `"!"`. The client never
/// inspects it; this only saves writing nested arrays by hand.
///
/// ```
/// use odoo_client::Domain;
///
/// let domain = Domain::new()
///     .or()
///     .filter("customer_rank", ">", 0)
///     .filter("supplier_rank", ">", 0);
/// assert_eq!(domain.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    terms: Vec<Value>,
}

impl Domain {
    /// Empty domain (matches every record)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `(field, operator, value)` term
    pub fn filter(
        mut self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.terms.push(Value::Array(vec![
            Value::String(field.into()),
            Value::String(operator.into()),
            value.into(),
        ]));
        self
    }

    pub fn and(self) -> Self {
        self.operator("&")
    }

    pub fn or(self) -> Self {
        self.operator("|")
    }

    /// Negate the next term
    pub fn negate(self) -> Self {
        self.operator("!")
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn operator(mut self, op: &str) -> Self {
        self.terms.push(Value::String(op.to_string()));
        self
    }
}

impl From<Domain> for Value {
    fn from(domain: Domain) -> Self {
        Value::Array(domain.terms)
    }
}

/// Named options for `search` / `search_read`
///
/// Only the options that are set are sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Number of records to skip
    pub offset: Option<i64>,

    /// Maximum number of records to return
    pub limit: Option<i64>,

    /// Sort specification (e.g. "name asc, id desc")
    pub order: Option<String>,

    /// Server-side context (language, timezone, ...)
    pub context: Option<Kwargs>,

    /// Any other named argument, forwarded as-is
    pub extra: Kwargs,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn context(mut self, context: Kwargs) -> Self {
        self.context = Some(context);
        self
    }

    /// Set an arbitrary named argument
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Flatten into the named-argument mapping sent to the server
    pub fn into_kwargs(self) -> Kwargs {
        let mut kwargs = self.extra;

        if let Some(offset) = self.offset {
            kwargs.insert("offset".to_string(), Value::Int(offset));
        }
        if let Some(limit) = self.limit {
            kwargs.insert("limit".to_string(), Value::Int(limit));
        }
        if let Some(order) = self.order {
            kwargs.insert("order".to_string(), Value::String(order));
        }
        if let Some(context) = self.context {
            kwargs.insert("context".to_string(), Value::Struct(context));
        }

        kwargs
    }
}
