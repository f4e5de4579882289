// Route table - hash to fragment resource mapping
//
// The table is fixed at compile time and read-only at runtime. Every key is
// a hash literal (or the empty string for "no hash yet"); lookups that miss
// fall back to the root entry so navigation can never fail to resolve.

/// The canonical root hash, used when the address bar has no hash yet and as
/// the fallback target for unknown hashes.
pub const ROOT_HASH: &str = "#/";

/// Hash -> fragment resource, in table order
const ROUTES: &[(&str, &str)] = &[
    ("", "index.html"),
    ("#/", "index.html"),
    ("#/projeto", "projeto.html"),
    ("#/cadastro", "cadastro.html"),
];

/// Resolve a hash to its fragment resource.
///
/// Unknown hashes resolve to the root entry rather than erroring.
pub fn resolve(hash: &str) -> &'static str {
    ROUTES
        .iter()
        .find(|(key, _)| *key == hash)
        .map(|(_, resource)| *resource)
        .unwrap_or(ROUTES[0].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_routes() {
        assert_eq!(resolve("#/"), "index.html");
        assert_eq!(resolve("#/projeto"), "projeto.html");
        assert_eq!(resolve("#/cadastro"), "cadastro.html");
    }

    #[test]
    fn test_empty_hash_is_root() {
        assert_eq!(resolve(""), resolve(ROOT_HASH));
    }

    #[test]
    fn test_unknown_hash_falls_back_to_root() {
        for hash in ["#/nada", "#/cadastro/extra", "#cadastro", "banana"] {
            assert_eq!(resolve(hash), resolve(ROOT_HASH));
        }
    }
}
