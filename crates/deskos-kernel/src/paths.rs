//! Virtual path utilities.
//!
//! Every path in the VFS is an absolute, slash-separated string. Backends
//! canonicalize with [`normalize`] before touching anything, so two paths
//! are the same entry iff their canonical forms are equal.
//!
//! | input | normalized |
//! |-------|------------|
//! | `""` | `/` |
//! | `a//b/` | `/a/b` |
//! | `\music\mix.mp3` | `/music/mix.mp3` |
//!
//! These are total functions: malformed input maps to `"/"` rather than
//! erroring, and `normalize` is idempotent.

/// Canonicalize a virtual path.
///
/// Converts backslashes to forward slashes, forces a leading slash,
/// collapses duplicate slashes, and strips any trailing slash (except on
/// the root itself).
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    let mut out = String::with_capacity(path.len() + 1);
    out.push('/');
    for segment in path.split(['/', '\\']) {
        if segment.is_empty() {
            continue;
        }
        if !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(segment);
    }
    out
}

/// Parent of a virtual path. The root (and any single-segment path) has
/// parent `"/"`.
pub fn dirname(path: &str) -> String {
    let p = normalize(path);
    if p == "/" {
        return p;
    }
    match p.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => p[..i].to_string(),
    }
}

/// Final segment of a virtual path, or `"/"` for the root.
pub fn basename(path: &str) -> String {
    let p = normalize(path);
    if p == "/" {
        return p;
    }
    match p.rfind('/') {
        Some(i) => p[i + 1..].to_string(),
        None => p,
    }
}

/// Join a path under a base prefix and canonicalize the result.
///
/// Used by the subdir view to rewrite every incoming path, and by the
/// overlay to compute the full path of a directory entry.
pub fn join(base: &str, path: &str) -> String {
    normalize(&format!("{}/{}", base, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "/")]
    #[case("/", "/")]
    #[case("a", "/a")]
    #[case("/a/b", "/a/b")]
    #[case("a//b/", "/a/b")]
    #[case("///", "/")]
    #[case("/a/b/c/", "/a/b/c")]
    #[case("\\music\\mix.mp3", "/music/mix.mp3")]
    #[case("a\\b//c", "/a/b/c")]
    fn normalize_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[rstest]
    #[case("/", "/")]
    #[case("/a", "/")]
    #[case("a", "/")]
    #[case("/a/b", "/a")]
    #[case("/a/b/c.txt", "/a/b")]
    fn dirname_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(dirname(input), expected);
    }

    #[rstest]
    #[case("/", "/")]
    #[case("/a", "a")]
    #[case("/a/b/c.txt", "c.txt")]
    #[case("a//b/", "b")]
    fn basename_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(basename(input), expected);
    }

    #[test]
    fn join_under_base() {
        assert_eq!(join("/home/music", "mix.mp3"), "/home/music/mix.mp3");
        assert_eq!(join("/home", "/already/rooted"), "/home/already/rooted");
        assert_eq!(join("/", "x"), "/x");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(p in "\\PC{0,40}") {
            let once = normalize(&p);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalized_paths_are_canonical(p in "\\PC{0,40}") {
            let n = normalize(&p);
            prop_assert!(n.starts_with('/'));
            prop_assert!(!n.contains("//"));
            prop_assert!(!n.contains('\\'));
            prop_assert!(n == "/" || !n.ends_with('/'));
        }
    }
}
