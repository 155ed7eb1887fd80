//! Property path parsing and resolution.
//!
//! Two path shapes are understood:
//! - dot notation, `address.city`, walking nested records;
//! - indexer notation, `skills[name]`, quantifying over a collection of
//!   records. The part before `[` may itself be dotted and the part inside
//!   may be any path, indexers included (`teams[members[name]]`).

use crate::errors::FilterError;
use crate::record::{FieldKind, FieldMeta, FieldRef, MemberLookup, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PropertyPath<'a> {
    /// A plain dotted path.
    Member(Vec<&'a str>),
    /// `collection[inner]`: any element of `collection` matches `inner`.
    Quantified {
        collection: Vec<&'a str>,
        inner: &'a str,
    },
}

pub(crate) fn parse_property(property: &str) -> Result<PropertyPath<'_>, FilterError> {
    let property = property.trim();
    let Some(open) = property.find('[') else {
        return split_segments(property, property).map(PropertyPath::Member);
    };

    let inner = property[open + 1..]
        .strip_suffix(']')
        .filter(|inner| !inner.trim().is_empty())
        .ok_or_else(|| malformed(property, "expected 'collection[member]'"))?;

    Ok(PropertyPath::Quantified {
        collection: split_segments(&property[..open], property)?,
        inner,
    })
}

fn split_segments<'a>(dotted: &'a str, property: &str) -> Result<Vec<&'a str>, FilterError> {
    let segments: Vec<&str> = dotted.split('.').map(str::trim).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(malformed(property, "empty path segment"));
    }
    Ok(segments)
}

fn malformed(property: &str, reason: &str) -> FilterError {
    FilterError::InvalidArgument(format!("malformed property path '{property}': {reason}"))
}

/// A path resolved against record metadata: canonical segment names plus the
/// metadata of the last one.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedPath {
    pub segments: Vec<&'static str>,
    pub leaf: FieldMeta,
}

/// Resolves `segments` starting from `lookup`. Every segment but the last must
/// be a record.
pub(crate) fn resolve(
    lookup: MemberLookup,
    segments: &[&str],
    path: &str,
) -> Result<ResolvedPath, FilterError> {
    let mut lookup = lookup;
    let mut resolved = Vec::with_capacity(segments.len());
    let mut leaf = None;

    for (i, segment) in segments.iter().enumerate() {
        let meta = lookup(segment).ok_or_else(|| FilterError::UnknownMember {
            path: path.to_string(),
            segment: (*segment).to_string(),
        })?;
        resolved.push(meta.name);

        if i + 1 < segments.len() {
            lookup = match meta.kind {
                FieldKind::Object(next) => next,
                _ => {
                    return Err(FilterError::NotARecord {
                        path: path.to_string(),
                        segment: meta.name.to_string(),
                    });
                }
            };
        } else {
            leaf = Some(meta);
        }
    }

    let leaf = leaf.ok_or_else(|| malformed(path, "empty path"))?;
    Ok(ResolvedPath {
        segments: resolved,
        leaf,
    })
}

/// Outcome of reading a resolved path from a record instance.
#[derive(Debug)]
pub(crate) enum Walk<'a> {
    /// A record on the way to the leaf was null.
    ParentNull,
    Leaf(FieldRef<'a>),
}

pub(crate) fn walk<'a>(record: &'a dyn Record, segments: &[&'static str]) -> Walk<'a> {
    let Some((last, parents)) = segments.split_last() else {
        return Walk::ParentNull;
    };

    let mut current = record;
    for segment in parents {
        match current.field(segment) {
            Some(FieldRef::Object(next)) => current = next,
            _ => return Walk::ParentNull,
        }
    }
    Walk::Leaf(current.field(last).unwrap_or(FieldRef::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted() {
        assert_eq!(
            parse_property("address.city").unwrap(),
            PropertyPath::Member(vec!["address", "city"])
        );
        assert_eq!(
            parse_property("name").unwrap(),
            PropertyPath::Member(vec!["name"])
        );
    }

    #[test]
    fn test_parse_indexer() {
        assert_eq!(
            parse_property("skills[name]").unwrap(),
            PropertyPath::Quantified {
                collection: vec!["skills"],
                inner: "name"
            }
        );
        assert_eq!(
            parse_property("profile.teams[members[name]]").unwrap(),
            PropertyPath::Quantified {
                collection: vec!["profile", "teams"],
                inner: "members[name]"
            }
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for property in ["a..b", ".a", "skills[", "skills[]", "[name]", "skills[name].level"] {
            assert!(
                matches!(parse_property(property), Err(FilterError::InvalidArgument(_))),
                "{property} should be rejected"
            );
        }
    }
}
