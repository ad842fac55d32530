//! Filter-formula builder.
//!
//! The record service filters with spreadsheet-style formulas embedded in a
//! query parameter. These helpers compose the handful of shapes the app uses
//! and escape interpolated values so a quote in user input cannot break out
//! of its string literal.

/// Escape a value for inclusion inside a single-quoted formula string.
#[must_use]
pub fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// `{Field}` reference.
#[must_use]
pub fn field(name: &str) -> String {
    format!("{{{name}}}")
}

/// `{Field}='value'` equality.
#[must_use]
pub fn eq(name: &str, value: &str) -> String {
    format!("{}='{}'", field(name), escape(value))
}

/// `LOWER({Field})=LOWER('value')` case-insensitive equality.
#[must_use]
pub fn eq_ci(name: &str, value: &str) -> String {
    format!("LOWER({})=LOWER('{}')", field(name), escape(value))
}

/// `FIND(LOWER('query'), LOWER({Field}))` case-insensitive containment.
#[must_use]
pub fn contains_ci(name: &str, query: &str) -> String {
    format!("FIND(LOWER('{}'), LOWER({}))", escape(query), field(name))
}

/// Containment over a linked-record field, joined to a single string first.
#[must_use]
pub fn contains_ci_joined(name: &str, query: &str) -> String {
    format!(
        "FIND(LOWER('{}'), LOWER(ARRAYJOIN({})))",
        escape(query),
        field(name)
    )
}

/// `{Active}=TRUE()` - the standard storefront visibility filter.
#[must_use]
pub fn active() -> String {
    format!("{}=TRUE()", field("Active"))
}

/// `AND(a, b, ...)`; passes a single clause through unchanged.
#[must_use]
pub fn and(clauses: &[String]) -> String {
    combine("AND", clauses)
}

/// `OR(a, b, ...)`; passes a single clause through unchanged.
#[must_use]
pub fn or(clauses: &[String]) -> String {
    combine("OR", clauses)
}

fn combine(op: &str, clauses: &[String]) -> String {
    match clauses {
        [] => String::new(),
        [only] => only.clone(),
        many => format!("{op}({})", many.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_quotes_value() {
        assert_eq!(eq("Slug", "rose-lipstick"), "{Slug}='rose-lipstick'");
    }

    #[test]
    fn test_escape_neutralizes_quotes() {
        assert_eq!(
            eq("Name", "l'oreal"),
            "{Name}='l\\'oreal'"
        );
        // A value trying to close the literal stays inert.
        let hostile = eq("Slug", "x', {Active}=FALSE(), '");
        assert!(!hostile.contains("', {Active}"));
    }

    #[test]
    fn test_and_flattens_single_clause() {
        assert_eq!(and(&[active()]), "{Active}=TRUE()");
        assert_eq!(
            and(&[active(), eq("Slug", "blush")]),
            "AND({Active}=TRUE(), {Slug}='blush')"
        );
    }

    #[test]
    fn test_case_insensitive_match_shape() {
        assert_eq!(
            eq_ci("Customer Email", "Jane@X.com"),
            "LOWER({Customer Email})=LOWER('Jane@X.com')"
        );
    }
}
