/// Kind of node a handle or directory entry refers to.
///
/// The adapter distinguishes only regular files and directories; anything
/// else a reconstruction produces is rejected before a handle exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Regular file entry
    File,
    /// Directory entry
    Directory,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::File => "file",
            EntryType::Directory => "directory",
        }
    }

    /// Derive the type of an enumerated child from its exposed name: a
    /// trailing separator means directory, anything else a regular file.
    pub fn from_entry_name<S: AsRef<str>>(name: S) -> Self {
        if crate::path::has_dir_marker(name) {
            EntryType::Directory
        } else {
            EntryType::File
        }
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryType::Directory)
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(EntryType::File),
            "directory" => Ok(EntryType::Directory),
            other => Err(format!("Unknown entry type: {}", other)),
        }
    }
}
