use rust_decimal::Decimal;

/// A value bound to exactly one positional parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Decimal(Decimal),
    Text(String),
    IdList(Vec<i32>),
}

/// Ordered conjunction of predicate fragments and their bound values.
///
/// A parameterized fragment and its value are appended in a single call, so
/// placeholder numbering always matches the bound-value sequence. The two can
/// never be appended independently.
#[derive(Debug, Default)]
pub struct ConditionSet {
    fragments: Vec<String>,
    params: Vec<BindValue>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a constant fragment with no bound value. Callers must only pass
    /// fragments assembled from trusted literals, never request text.
    pub fn push_literal(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    /// Append a fragment containing exactly one `$?` marker together with the
    /// value it binds. The marker is rewritten to the next free positional
    /// placeholder.
    pub fn push(&mut self, template: &str, value: BindValue) {
        debug_assert_eq!(
            template.matches("$?").count(),
            1,
            "condition template must contain exactly one $? marker: {template}"
        );
        let placeholder = format!("${}", self.params.len() + 1);
        self.fragments.push(template.replacen("$?", &placeholder, 1));
        self.params.push(value);
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Render the WHERE body and hand back the bound values in placeholder
    /// order.
    pub fn into_parts(self) -> (String, Vec<BindValue>) {
        let clause = if self.fragments.is_empty() {
            "1=1".to_string()
        } else {
            self.fragments.join(" AND ")
        };
        (clause, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_renders_tautology() {
        let (clause, params) = ConditionSet::new().into_parts();
        assert_eq!(clause, "1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn literals_bind_nothing() {
        let mut set = ConditionSet::new();
        set.push_literal("status = 'approved'");
        set.push_literal("archived = FALSE");
        let (clause, params) = set.into_parts();
        assert_eq!(clause, "status = 'approved' AND archived = FALSE");
        assert!(params.is_empty());
    }

    #[test]
    fn placeholders_number_in_appearance_order() {
        let mut set = ConditionSet::new();
        set.push("price >= $?", BindValue::Decimal("100".parse().unwrap()));
        set.push_literal("archived = FALSE");
        set.push("price <= $?", BindValue::Decimal("500".parse().unwrap()));
        set.push("location ILIKE $?", BindValue::Text("%riga%".into()));

        let (clause, params) = set.into_parts();
        assert_eq!(
            clause,
            "price >= $1 AND archived = FALSE AND price <= $2 AND location ILIKE $3"
        );
        assert_eq!(
            params,
            vec![
                BindValue::Decimal("100".parse().unwrap()),
                BindValue::Decimal("500".parse().unwrap()),
                BindValue::Text("%riga%".into()),
            ]
        );
    }

    #[test]
    fn interleaving_literals_does_not_shift_positions() {
        let mut set = ConditionSet::new();
        set.push_literal("1=1");
        set.push("a = $?", BindValue::Text("x".into()));
        set.push_literal("b IS NOT NULL");
        set.push("c = $?", BindValue::Text("y".into()));
        let (clause, params) = set.into_parts();
        assert!(clause.contains("a = $1"));
        assert!(clause.contains("c = $2"));
        assert_eq!(params.len(), 2);
    }
}
