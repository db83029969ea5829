use std::fmt;

use super::InodeNumber;

/// A directory entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DirectoryEntry {
    /// The directory that holds the entry.
    pub parent: InodeNumber,
    /// The inode number the entry names.
    pub target: InodeNumber,
    /// The name of the entry.
    pub name: DirectoryEntryName,
}

impl DirectoryEntry {
    /// Constructs a new [`DirectoryEntry`] instance.
    pub fn new(
        parent: InodeNumber,
        target: InodeNumber,
        name: impl Into<DirectoryEntryName>,
    ) -> Self {
        DirectoryEntry {
            parent,
            target,
            name: name.into(),
        }
    }
}

/// A name, as used in [`DirectoryEntry`].
///
/// The dump wraps names in single quotes. We keep them so that names are printed exactly as
/// they were dumped; comparisons against `.` and `..` look through the quotes.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct DirectoryEntryName(String);

impl DirectoryEntryName {
    /// The name with the dump's quoting removed.
    pub fn unquoted(&self) -> &str {
        self.0
            .strip_prefix('\'')
            .and_then(|name| name.strip_suffix('\''))
            .unwrap_or(&self.0)
    }

    pub fn is_dot(&self) -> bool {
        self.unquoted() == "."
    }

    pub fn is_dot_dot(&self) -> bool {
        self.unquoted() == ".."
    }
}

impl From<&str> for DirectoryEntryName {
    fn from(value: &str) -> Self {
        DirectoryEntryName(value.to_owned())
    }
}

impl From<String> for DirectoryEntryName {
    fn from(value: String) -> Self {
        DirectoryEntryName(value)
    }
}

impl fmt::Debug for DirectoryEntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DirectoryEntryName").field(&self.0).finish()
    }
}

impl fmt::Display for DirectoryEntryName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
