//! The field-annotation mini-language.
//!
//! An annotation is a comma-separated list of role tokens:
//!
//! ```text
//! hash
//! range
//! global_secondary_index(<name>:hash|range)
//! local_secondary_index(<name>:hash|range)
//! ```
//!
//! A field may carry several tokens and contribute to the primary key and
//! to multiple secondary indexes at the same time.

use crate::error::{Error, Result};
use crate::schema::KeyKind;

/// One role carried by a field annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Bare `hash` or `range`: part of the table's primary key.
    Key(KeyKind),
    /// Key element of a named global secondary index.
    GlobalIndex { index: String, key: KeyKind },
    /// Key element of a named local secondary index.
    LocalIndex { index: String, key: KeyKind },
}

/// Splits an annotation into its role tokens. An empty annotation yields
/// no roles; unknown or malformed tokens fail the parse.
pub fn parse(annotation: &str) -> Result<Vec<Role>> {
    let mut roles = vec![];

    for token in annotation.split(',') {
        let token = token.trim();

        if token.is_empty() {
            continue;
        }

        roles.push(parse_token(token)?);
    }

    Ok(roles)
}

fn parse_token(token: &str) -> Result<Role> {
    match token {
        "hash" => Ok(Role::Key(KeyKind::Hash)),
        "range" => Ok(Role::Key(KeyKind::Range)),
        _ => {
            if let Some(args) = index_args(token, "global_secondary_index") {
                let (index, key) = parse_index_args(token, args)?;
                Ok(Role::GlobalIndex { index, key })
            } else if let Some(args) = index_args(token, "local_secondary_index") {
                let (index, key) = parse_index_args(token, args)?;
                Ok(Role::LocalIndex { index, key })
            } else {
                Err(Error::Annotation(format!("unknown role token `{token}`")))
            }
        }
    }
}

fn index_args<'a>(token: &'a str, role: &str) -> Option<&'a str> {
    token
        .strip_prefix(role)?
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_index_args(token: &str, args: &str) -> Result<(String, KeyKind)> {
    let Some((index, key)) = args.split_once(':') else {
        return Err(Error::Annotation(format!(
            "expected `<name>:hash|range` in `{token}`"
        )));
    };

    let index = index.trim();

    if index.is_empty() {
        return Err(Error::Annotation(format!("missing index name in `{token}`")));
    }

    let key = match key.trim() {
        "hash" => KeyKind::Hash,
        "range" => KeyKind::Range,
        other => {
            return Err(Error::Annotation(format!(
                "expected `hash` or `range`, got `{other}` in `{token}`"
            )))
        }
    };

    Ok((index.to_string(), key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_annotation_has_no_roles() {
        assert_eq!(parse("").unwrap(), vec![]);
    }

    #[test]
    fn bare_key_tokens() {
        assert_eq!(parse("hash").unwrap(), vec![Role::Key(KeyKind::Hash)]);
        assert_eq!(parse("range").unwrap(), vec![Role::Key(KeyKind::Range)]);
    }

    #[test]
    fn index_tokens() {
        assert_eq!(
            parse("global_secondary_index(by_owner:hash)").unwrap(),
            vec![Role::GlobalIndex {
                index: "by_owner".to_string(),
                key: KeyKind::Hash,
            }]
        );
        assert_eq!(
            parse("local_secondary_index(by_placed:range)").unwrap(),
            vec![Role::LocalIndex {
                index: "by_placed".to_string(),
                key: KeyKind::Range,
            }]
        );
    }

    #[test]
    fn multiple_tokens_with_whitespace() {
        let roles = parse("hash, global_secondary_index(by_owner:range)").unwrap();
        assert_eq!(
            roles,
            vec![
                Role::Key(KeyKind::Hash),
                Role::GlobalIndex {
                    index: "by_owner".to_string(),
                    key: KeyKind::Range,
                },
            ]
        );
    }

    #[test]
    fn one_field_may_serve_two_indexes() {
        let roles =
            parse("global_secondary_index(a:hash),global_secondary_index(b:range)").unwrap();
        assert_eq!(roles.len(), 2);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!(parse("primary").is_err());
        assert!(parse("global_secondary_index(by_owner)").is_err());
        assert!(parse("global_secondary_index(:hash)").is_err());
        assert!(parse("local_secondary_index(by_placed:both)").is_err());
    }
}
