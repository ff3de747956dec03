//! Route table and prefix matching.
//!
//! # Responsibilities
//! - Hold the compiled prefix → target mapping
//! - Find the longest matching prefix for a request path
//! - Rewrite the path by stripping the matched prefix

use url::Url;

use crate::config::RouteConfig;

/// A compiled route entry.
#[derive(Debug, Clone)]
pub struct Route {
    /// Service name, used in logs, metrics, and error bodies.
    pub name: String,

    /// Normalized path prefix (no trailing slash).
    pub prefix: String,

    /// Backend origin this prefix forwards to.
    pub target: Url,
}

/// Result of a successful route lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,

    /// Original path with the matched prefix stripped.
    /// Always starts with `/`; an exact prefix match rewrites to `/`.
    pub rewritten_path: String,
}

/// Immutable prefix-ordered route table.
///
/// Built once at startup and shared behind an `Arc`; never mutated after.
#[derive(Debug, Default)]
pub struct RouteTable {
    /// Routes sorted by prefix length, longest first.
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile a route table from configuration.
    ///
    /// Entries with unparsable targets are skipped with a warning; config
    /// validation rejects them before this point on the normal startup path.
    pub fn from_config(configs: &[RouteConfig]) -> Self {
        let mut routes = Vec::with_capacity(configs.len());
        for config in configs {
            match Url::parse(&config.target) {
                Ok(target) => routes.push(Route {
                    name: config.name.clone(),
                    prefix: config.prefix.trim_end_matches('/').to_string(),
                    target,
                }),
                Err(e) => {
                    tracing::warn!(route = %config.name, error = %e, "Invalid route target, skipping");
                }
            }
        }

        // Longest prefix first so overlapping prefixes resolve deterministically.
        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));

        Self { routes }
    }

    /// Find the longest prefix matching `path` and rewrite the path.
    ///
    /// Matching respects segment boundaries: `/patients` matches
    /// `/patients` and `/patients/123` but not `/patientsfoo`.
    pub fn matched(&self, path: &str) -> Option<RouteMatch<'_>> {
        for route in &self.routes {
            if let Some(rewritten_path) = strip_prefix(path, &route.prefix) {
                return Some(RouteMatch {
                    route,
                    rewritten_path,
                });
            }
        }
        None
    }

    /// Number of compiled routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Strip `prefix` from `path` at a segment boundary.
///
/// Returns the remainder with a leading `/` re-inserted when the remainder
/// is empty, or `None` when the prefix does not match.
fn strip_prefix(path: &str, prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some("/".to_string())
    } else if rest.starts_with('/') {
        Some(rest.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str, &str)]) -> RouteTable {
        let configs: Vec<RouteConfig> = entries
            .iter()
            .map(|(name, prefix, target)| RouteConfig {
                name: name.to_string(),
                prefix: prefix.to_string(),
                target: target.to_string(),
            })
            .collect();
        RouteTable::from_config(&configs)
    }

    #[test]
    fn test_prefix_stripped_from_path() {
        let table = table(&[("patients", "/patients", "http://localhost:5002")]);

        let matched = table.matched("/patients/123").unwrap();
        assert_eq!(matched.route.name, "patients");
        assert_eq!(matched.rewritten_path, "/123");
    }

    #[test]
    fn test_exact_match_rewrites_to_root() {
        let table = table(&[("auth", "/auth", "http://localhost:5001")]);

        let matched = table.matched("/auth").unwrap();
        assert_eq!(matched.rewritten_path, "/");
    }

    #[test]
    fn test_no_match_for_unknown_path() {
        let table = table(&[("auth", "/auth", "http://localhost:5001")]);
        assert!(table.matched("/billing/42").is_none());
    }

    #[test]
    fn test_segment_boundary_respected() {
        let table = table(&[("patients", "/patients", "http://localhost:5002")]);
        assert!(table.matched("/patientsfoo").is_none());
    }

    #[test]
    fn test_longest_prefix_wins() {
        let table = table(&[
            ("patients", "/patients", "http://localhost:5002"),
            ("admin", "/patients/admin", "http://localhost:5008"),
        ]);

        let matched = table.matched("/patients/admin/42").unwrap();
        assert_eq!(matched.route.name, "admin");
        assert_eq!(matched.rewritten_path, "/42");

        let matched = table.matched("/patients/42").unwrap();
        assert_eq!(matched.route.name, "patients");
    }

    #[test]
    fn test_invalid_target_skipped() {
        let table = table(&[
            ("bad", "/bad", "not a url"),
            ("auth", "/auth", "http://localhost:5001"),
        ]);
        assert_eq!(table.len(), 1);
        assert!(table.matched("/bad/1").is_none());
    }
}
