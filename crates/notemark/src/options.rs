use serde::{Deserialize, Serialize};

/// Per-import switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Drop the first line of each note; the source repeats the title there.
    pub omit_first_line: bool,
    /// Put handwriting transcripts of drawings in a collapsed callout.
    pub include_handwriting: bool,
    /// Folder internal note links are generated relative to.
    pub root_folder: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            omit_first_line: false,
            include_handwriting: false,
            root_folder: "/".to_string(),
        }
    }
}
