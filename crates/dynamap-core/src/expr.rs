//! Conditional expressions for query and scan requests.
//!
//! A [`Condition`] is a small tree of comparisons over attribute paths.
//! Paths may reach into nested maps and lists (`"lines[0].sku"`). Rendering
//! produces the store's expression string plus the attribute-name and
//! attribute-value placeholder maps; one [`ExprAttrs`] allocator is shared
//! by the key condition and the filter of a single request.

use std::collections::HashMap;

use serde_dynamo::AttributeValue;

use crate::record::DELETED_ATTRIBUTE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparator {
    fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "<>",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
        }
    }
}

/// A key condition or filter condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        path: String,
        op: Comparator,
        value: AttributeValue,
    },
    BeginsWith {
        path: String,
        prefix: AttributeValue,
    },
    And(Vec<Condition>),
}

impl Condition {
    pub fn eq(path: impl Into<String>, value: AttributeValue) -> Self {
        Self::compare(path, Comparator::Eq, value)
    }

    pub fn ne(path: impl Into<String>, value: AttributeValue) -> Self {
        Self::compare(path, Comparator::Ne, value)
    }

    pub fn gt(path: impl Into<String>, value: AttributeValue) -> Self {
        Self::compare(path, Comparator::Gt, value)
    }

    pub fn ge(path: impl Into<String>, value: AttributeValue) -> Self {
        Self::compare(path, Comparator::Ge, value)
    }

    pub fn lt(path: impl Into<String>, value: AttributeValue) -> Self {
        Self::compare(path, Comparator::Lt, value)
    }

    pub fn le(path: impl Into<String>, value: AttributeValue) -> Self {
        Self::compare(path, Comparator::Le, value)
    }

    pub fn compare(path: impl Into<String>, op: Comparator, value: AttributeValue) -> Self {
        Condition::Compare {
            path: path.into(),
            op,
            value,
        }
    }

    pub fn begins_with(path: impl Into<String>, prefix: AttributeValue) -> Self {
        Condition::BeginsWith {
            path: path.into(),
            prefix,
        }
    }

    /// The explicit soft-delete exclusion: `deleted = 0`. Compose it into
    /// a filter wherever soft-deleted records must read as absent.
    pub fn not_deleted() -> Self {
        Condition::eq(DELETED_ATTRIBUTE, AttributeValue::N("0".to_string()))
    }

    pub fn and(self, other: Condition) -> Condition {
        match self {
            Condition::And(mut operands) => {
                operands.push(other);
                Condition::And(operands)
            }
            first => Condition::And(vec![first, other]),
        }
    }

    /// Renders the expression string, allocating placeholders in `attrs`.
    pub fn render(&self, attrs: &mut ExprAttrs) -> String {
        match self {
            Condition::Compare { path, op, value } => {
                let path = attrs.path(path);
                let value = attrs.value(value.clone());
                format!("{path} {} {value}", op.symbol())
            }
            Condition::BeginsWith { path, prefix } => {
                let path = attrs.path(path);
                let prefix = attrs.value(prefix.clone());
                format!("begins_with({path}, {prefix})")
            }
            Condition::And(operands) => operands
                .iter()
                .map(|operand| operand.render(attrs))
                .collect::<Vec<_>>()
                .join(" AND "),
        }
    }
}

/// Placeholder allocator for expression attribute names and values.
#[derive(Debug, Default)]
pub struct ExprAttrs {
    by_segment: HashMap<String, String>,
    attr_names: HashMap<String, String>,
    attr_values: HashMap<String, AttributeValue>,
}

impl ExprAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder map keyed by `#n` placeholder, valued by attribute name.
    pub fn names(&self) -> &HashMap<String, String> {
        &self.attr_names
    }

    /// Placeholder map keyed by `:v` placeholder.
    pub fn values(&self) -> &HashMap<String, AttributeValue> {
        &self.attr_values
    }

    pub fn into_parts(self) -> (HashMap<String, String>, HashMap<String, AttributeValue>) {
        (self.attr_names, self.attr_values)
    }

    /// Rewrites a dotted attribute path with name placeholders, preserving
    /// list-index suffixes: `lines[0].sku` becomes `#n0[0].#n1`.
    fn path(&mut self, path: &str) -> String {
        path.split('.')
            .map(|segment| match segment.find('[') {
                Some(bracket) => {
                    let name = self.name(&segment[..bracket]);
                    format!("{name}{}", &segment[bracket..])
                }
                None => self.name(segment),
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    fn name(&mut self, attribute: &str) -> String {
        if let Some(placeholder) = self.by_segment.get(attribute) {
            return placeholder.clone();
        }

        let placeholder = format!("#n{}", self.by_segment.len());
        self.by_segment
            .insert(attribute.to_string(), placeholder.clone());
        self.attr_names
            .insert(placeholder.clone(), attribute.to_string());
        placeholder
    }

    fn value(&mut self, value: AttributeValue) -> String {
        let placeholder = format!(":v{}", self.attr_values.len());
        self.attr_values.insert(placeholder.clone(), value);
        placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_equality_with_placeholders() {
        let mut attrs = ExprAttrs::new();
        let expr = Condition::eq("customer", value::s("c-1")).render(&mut attrs);

        assert_eq!(expr, "#n0 = :v0");
        assert_eq!(attrs.names()["#n0"], "customer");
        assert_eq!(attrs.values()[":v0"], value::s("c-1"));
    }

    #[test]
    fn renders_and_chains_in_order() {
        let mut attrs = ExprAttrs::new();
        let condition = Condition::eq("customer", value::s("c-1"))
            .and(Condition::ge("placed", value::n(100)))
            .and(Condition::not_deleted());

        assert_eq!(
            condition.render(&mut attrs),
            "#n0 = :v0 AND #n1 >= :v1 AND #n2 = :v2"
        );
        assert_eq!(attrs.names()["#n2"], "deleted");
        assert_eq!(attrs.values()[":v2"], value::n(0));
    }

    #[test]
    fn nested_list_paths_keep_index_suffixes() {
        let mut attrs = ExprAttrs::new();
        let expr = Condition::eq("lines[0].sku", value::s("widget")).render(&mut attrs);

        assert_eq!(expr, "#n0[0].#n1 = :v0");
        assert_eq!(attrs.names()["#n0"], "lines");
        assert_eq!(attrs.names()["#n1"], "sku");
    }

    #[test]
    fn repeated_attribute_names_share_a_placeholder() {
        let mut attrs = ExprAttrs::new();
        let condition = Condition::ge("placed", value::n(1)).and(Condition::le("placed", value::n(9)));

        assert_eq!(condition.render(&mut attrs), "#n0 >= :v0 AND #n0 <= :v1");
        assert_eq!(attrs.names().len(), 1);
    }

    #[test]
    fn begins_with_renders_as_function_call() {
        let mut attrs = ExprAttrs::new();
        let expr = Condition::begins_with("region", value::s("eu-")).render(&mut attrs);

        assert_eq!(expr, "begins_with(#n0, :v0)");
    }
}
