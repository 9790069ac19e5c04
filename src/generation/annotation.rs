//! Annotation lookups shared by every backend.

use crate::spec::Annotations;

/// Annotation naming the subdirectory a node is generated into
pub const GROUP: &str = "group";

/// First non-empty value of `key` along `chain`, with surrounding quotes trimmed.
///
/// The chain is ordered most specific first, e.g. route before group.
pub fn lookup<'a>(key: &str, chain: &[&'a Annotations]) -> Option<&'a str> {
    chain
        .iter()
        .filter_map(|annotations| annotations.get(key))
        .map(|value| unquote(value))
        .find(|value| !value.is_empty())
}

/// Subdirectory for a node: the first `group` annotation along `chain` joined
/// onto `default`, or `default` itself when none is set.
///
/// Leading and trailing `/` are trimmed from the annotation.
pub fn resolve_folder(default: &str, chain: &[&Annotations]) -> String {
    match lookup(GROUP, chain).map(|folder| folder.trim_matches('/')) {
        Some(folder) if !folder.is_empty() => format!("{default}/{folder}"),
        _ => default.to_string(),
    }
}

/// Trim whitespace and one pair of surrounding double quotes
pub fn unquote(value: &str) -> &str {
    let value = value.trim();
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotations(pairs: &[(&str, &str)]) -> Annotations {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_route_group_wins_over_group() {
        let route = annotations(&[("group", "admin")]);
        let group = annotations(&[("group", "user")]);
        assert_eq!(
            resolve_folder("internal/handler", &[&route, &group]),
            "internal/handler/admin"
        );
    }

    #[test]
    fn test_falls_back_to_group_then_default() {
        let route = Annotations::new();
        let group = annotations(&[("group", "/user/")]);
        assert_eq!(
            resolve_folder("internal/logic", &[&route, &group]),
            "internal/logic/user"
        );
        assert_eq!(
            resolve_folder("internal/logic", &[&route, &Annotations::new()]),
            "internal/logic"
        );
    }

    #[test]
    fn test_slash_only_group_is_default() {
        let group = annotations(&[("group", "/")]);
        assert_eq!(resolve_folder("internal/handler", &[&group]), "internal/handler");
    }

    #[test]
    fn test_lookup_trims_quotes_and_skips_empty() {
        let route = annotations(&[("summary", "\"\"")]);
        let group = annotations(&[("summary", "\"Say hello\"")]);
        assert_eq!(lookup("summary", &[&route, &group]), Some("Say hello"));
        assert_eq!(lookup("tag", &[&route, &group]), None);
    }
}
