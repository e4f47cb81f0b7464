use crate::source::Row;

/// Header label of the column holding customer email addresses.
pub const EMAIL_COLUMN: &str = "email";

/// Lowercased domain of the email stored at `column`, or `None` when the row
/// has no such field, the field is not valid UTF-8, or it holds no `@`.
///
/// The domain is the token between the first and second `@`, so
/// `a@b@c.com` yields `b`.
pub fn extract_domain(row: &Row, column: usize) -> Option<String> {
    let email = row.field(column)?;
    let domain = email.split('@').nth(1)?;
    if domain.is_empty() {
        return None;
    }
    Some(domain.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        Row::new(2, fields.iter().copied())
    }

    #[test]
    fn extracts_domain_after_at() {
        assert_eq!(extract_domain(&row(&["a@b.com"]), 0).as_deref(), Some("b.com"));
    }

    #[test]
    fn lowercases_domain() {
        assert_eq!(extract_domain(&row(&["a@B.COM"]), 0).as_deref(), Some("b.com"));
    }

    #[test]
    fn missing_at_yields_nothing() {
        assert_eq!(extract_domain(&row(&["no-at-sign"]), 0), None);
        assert_eq!(extract_domain(&row(&[""]), 0), None);
    }

    #[test]
    fn second_at_truncates_domain() {
        assert_eq!(extract_domain(&row(&["a@b@c.com"]), 0).as_deref(), Some("b"));
    }

    #[test]
    fn trailing_at_yields_nothing() {
        assert_eq!(extract_domain(&row(&["joe@"]), 0), None);
    }

    #[test]
    fn out_of_range_column_yields_nothing() {
        let short = row(&["Joe", "Smith"]);
        assert_eq!(extract_domain(&short, 2), None);
        assert_eq!(extract_domain(&short, 7), None);
        assert_eq!(extract_domain(&row(&[]), 0), None);
    }

    #[test]
    fn non_utf8_email_yields_nothing() {
        let r = Row::new(2, [b"Jos\xe9".as_slice(), b"j\xff@acme.com".as_slice()]);
        assert_eq!(extract_domain(&r, 1), None);
        let r = Row::new(3, [b"Jos\xe9".as_slice(), b"jose@acme.com".as_slice()]);
        assert_eq!(extract_domain(&r, 1).as_deref(), Some("acme.com"));
    }

    #[test]
    fn reads_the_requested_column_only() {
        let r = row(&["x@ignored.org", "Joe", "joe@Acme.com"]);
        assert_eq!(extract_domain(&r, 2).as_deref(), Some("acme.com"));
    }
}
