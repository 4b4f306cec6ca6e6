//! Denormalized paths for vaults and logs
//!
//! A path is the slash-joined chain of names from a root vault down to the
//! node. Names are passed through verbatim; no sanitization happens here.

pub const SEPARATOR: char = '/';

/// Compute a node's full path from its name and its parent's current path.
pub fn resolve_path(name: &str, parent_path: Option<&str>) -> String {
    match parent_path {
        Some(parent) => format!("{}{}{}", parent, SEPARATOR, name),
        None => name.to_string(),
    }
}

/// Move `path` from under `old_prefix` to under `new_prefix`.
///
/// Returns `None` when `path` is not `old_prefix` itself or a descendant of it
/// (matching is on whole segments, so `src` does not rebase `srcs/x`).
pub fn rebase_path(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if path == old_prefix {
        return Some(new_prefix.to_string());
    }
    let rest = path.strip_prefix(old_prefix)?;
    let rest = rest.strip_prefix(SEPARATOR)?;
    Some(resolve_path(rest, Some(new_prefix)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path_is_name() {
        assert_eq!(resolve_path("vault", None), "vault");
    }

    #[test]
    fn test_child_path_joins_parent() {
        assert_eq!(resolve_path("app.js", Some("root/mid")), "root/mid/app.js");
    }

    #[test]
    fn test_names_pass_through() {
        assert_eq!(resolve_path("my file.txt", Some("a b")), "a b/my file.txt");
        assert_eq!(resolve_path("", None), "");
    }

    #[test]
    fn test_rebase_path() {
        assert_eq!(
            rebase_path("src/lib/mod.rs", "src", "source").as_deref(),
            Some("source/lib/mod.rs")
        );
        assert_eq!(rebase_path("src", "src", "source").as_deref(), Some("source"));
        assert_eq!(rebase_path("srcs/x", "src", "source"), None);
        assert_eq!(rebase_path("other/x", "src", "source"), None);
    }
}
