//! Resolution of user-typed configuration names against a host catalog.

use crate::host::{ConfigurationCatalog, ConfigurationHandle};

/// Picks the catalog entry matching `requested`.
///
/// Precedence: exact match first, then case-insensitive match. Empty or
/// whitespace-only names never resolve.
pub fn match_name<'a>(requested: &str, names: &'a [String]) -> Option<&'a str> {
    let requested = requested.trim();
    if requested.is_empty() {
        return None;
    }

    names
        .iter()
        .find(|name| name.as_str() == requested)
        .or_else(|| {
            let lowered = requested.to_lowercase();
            names.iter().find(|name| name.to_lowercase() == lowered)
        })
        .map(String::as_str)
}

/// Resolves `requested` against the catalog's current list.
///
/// Listing errors and unknown names both yield `None`: an override that cannot
/// be resolved degrades to no override at all. Names typed while the host was
/// on its other configuration format land here too, because the catalog only
/// lists the active format.
pub async fn resolve(
    catalog: &dyn ConfigurationCatalog,
    requested: &str,
) -> Option<ConfigurationHandle> {
    if requested.trim().is_empty() {
        return None;
    }

    let names = match catalog.list_names().await {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!(
                kind = %catalog.kind(),
                requested,
                error = %e,
                "could not list configurations, skipping override"
            );
            return None;
        }
    };

    match match_name(requested, &names) {
        Some(name) => Some(ConfigurationHandle {
            kind: catalog.kind(),
            name: name.to_string(),
        }),
        None => {
            tracing::debug!(kind = %catalog.kind(), requested, "configuration not found, skipping override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ConfigurationKind;
    use crate::testing::FakeCatalog;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match_wins_over_case_insensitive() {
        let list = names(&["creative", "Creative"]);
        assert_eq!(match_name("Creative", &list), Some("Creative"));
    }

    #[test]
    fn test_case_insensitive_fallback_returns_host_spelling() {
        let list = names(&["Default", "GGSytemPrompt"]);
        assert_eq!(match_name("ggsytemprompt", &list), Some("GGSytemPrompt"));
    }

    #[test]
    fn test_blank_and_unknown_names_do_not_resolve() {
        let list = names(&["Default"]);
        assert_eq!(match_name("", &list), None);
        assert_eq!(match_name("   ", &list), None);
        assert_eq!(match_name("does-not-exist", &list), None);
    }

    #[tokio::test]
    async fn test_resolve_swallows_listing_errors() {
        let catalog = FakeCatalog::new(ConfigurationKind::Preset, &["Default"], Some("Default"));
        *catalog.fail_listing.lock().unwrap() = true;

        assert_eq!(resolve(&catalog, "Default").await, None);
    }

    #[tokio::test]
    async fn test_resolve_tags_handle_with_kind() {
        let catalog = FakeCatalog::new(ConfigurationKind::Profile, &["Main"], Some("Main"));
        let handle = resolve(&catalog, "main").await.unwrap();

        assert_eq!(handle.kind, ConfigurationKind::Profile);
        assert_eq!(handle.name, "Main");
    }
}
