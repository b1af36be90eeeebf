//! Remote key derivation
//!
//! Keys are built like slash-separated paths: rooted at `/`, duplicate
//! separators collapsed, `.` dropped and `..` resolved without ever climbing
//! above the root.

/// Separator between key segments
pub const KEY_SEPARATOR: char = '/';

/// Join a path prefix and a file name into a rooted, cleaned remote key
///
/// The same prefix and file name always produce the same key, so repeated
/// runs overwrite the same object.
///
/// # Examples
///
/// ```rust
/// use pipeline_upload::storage::remote_key;
///
/// assert_eq!(remote_key("backups", "out.txt"), "/backups/out.txt");
/// assert_eq!(remote_key("/nightly//db/", "dump.sql"), "/nightly/db/dump.sql");
/// assert_eq!(remote_key("", "out.txt"), "/out.txt");
/// ```
#[must_use]
pub fn remote_key(path_prefix: &str, file_name: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path_prefix
        .split(KEY_SEPARATOR)
        .chain(file_name.split(KEY_SEPARATOR))
    {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    let mut key = String::with_capacity(path_prefix.len() + file_name.len() + 2);
    key.push(KEY_SEPARATOR);
    key.push_str(&segments.join("/"));
    key
}

/// The object name sent to the storage service for a remote key
///
/// S3 keys are not paths; the leading separator is dropped so
/// `/backups/out.txt` is stored as `backups/out.txt`.
#[must_use]
pub fn object_key(remote_key: &str) -> &str {
    remote_key.trim_start_matches(KEY_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_prefix_and_file_name_are_joined_under_root() {
        assert_eq!(remote_key("backups", "out.txt"), "/backups/out.txt");
    }

    #[test]
    fn test_redundant_separators_are_collapsed() {
        assert_eq!(remote_key("/backups/", "out.txt"), "/backups/out.txt");
        assert_eq!(remote_key("a//b///c", "out.txt"), "/a/b/c/out.txt");
    }

    #[test]
    fn test_dot_segments_are_resolved() {
        assert_eq!(remote_key("a/./b/../c", "out.txt"), "/a/c/out.txt");
        assert_eq!(remote_key("../../escape", "out.txt"), "/escape/out.txt");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(remote_key("", "out.txt"), "/out.txt");
        assert_eq!(remote_key("", ""), "/");
    }

    #[test]
    fn test_object_key_drops_leading_separator() {
        assert_eq!(object_key("/backups/out.txt"), "backups/out.txt");
        assert_eq!(object_key("backups/out.txt"), "backups/out.txt");
    }

    #[test]
    fn test_same_inputs_give_same_key() {
        assert_eq!(remote_key("backups", "out.txt"), remote_key("backups", "out.txt"));
    }

    proptest! {
        #[test]
        fn prop_key_is_rooted_and_clean(
            prefix in "[a-z./]{0,24}",
            name in "[a-z]{1,8}\\.txt",
        ) {
            let key = remote_key(&prefix, &name);

            prop_assert!(key.starts_with('/'));
            prop_assert!(!key.contains("//"));
            prop_assert!(!key.split('/').any(|segment| segment == "." || segment == ".."));
            let suffix = format!("/{name}");
            prop_assert!(key.ends_with(&suffix));
        }
    }
}
