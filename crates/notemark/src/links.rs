use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::converter::ConvertContext;
use crate::error::ConvertError;
use crate::store::{FileHandle, LinkGenerator, RowKind};

pub const UNKNOWN_FILE_LINK: &str = "(unknown file link)";

pub static NOTE_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"applenotes:note/(?P<id>[-0-9a-f]+)(?:\?ownerIdentifier=.*)?").unwrap()
});

pub fn is_note_uri(uri: &str) -> bool {
    NOTE_URI_RE.is_match(uri)
}

/// The note identifier inside an internal link, if it is one.
pub fn note_identifier(uri: &str) -> Option<&str> {
    NOTE_URI_RE
        .captures(uri)
        .and_then(|caps| caps.name("id"))
        .map(|m| m.as_str())
}

/// Resolve a link to another note into a vault link. A uri that is not a
/// note link at all is a caller bug and fails the conversion.
pub async fn resolve_internal_link(
    ctx: &ConvertContext<'_>,
    uri: &str,
    display: Option<&str>,
) -> Result<String, ConvertError> {
    let identifier = note_identifier(uri).ok_or_else(|| ConvertError::MalformedNoteUri {
        uri: uri.to_string(),
    })?;

    let primary_key = ctx
        .query(RowKind::NotePrimaryKey, &identifier.to_uppercase())
        .await
        .and_then(|row| row.primary_key);
    let Some(primary_key) = primary_key else {
        tracing::debug!("no row for linked note {}", identifier);
        return Ok(UNKNOWN_FILE_LINK.to_string());
    };

    let Some(file) = ctx.files.resolve_note_file(primary_key).await else {
        return Ok(UNKNOWN_FILE_LINK.to_string());
    };

    Ok(ctx
        .links
        .generate_link(&file, &ctx.options.root_folder, display))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    #[default]
    Wiki,
    Markdown,
}

impl FromStr for LinkStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wiki" => Ok(Self::Wiki),
            "markdown" => Ok(Self::Markdown),
            other => Err(format!("unknown link style: {other}")),
        }
    }
}

/// Obsidian-flavoured links: attachments are embedded, notes are linked.
#[derive(Debug, Clone, Default)]
pub struct ObsidianLinkGenerator {
    pub style: LinkStyle,
}

impl ObsidianLinkGenerator {
    pub fn new(style: LinkStyle) -> Self {
        Self { style }
    }
}

impl LinkGenerator for ObsidianLinkGenerator {
    fn generate_link(
        &self,
        target: &FileHandle,
        source_path: &str,
        display: Option<&str>,
    ) -> String {
        let relative = pathdiff::diff_paths(target.path(), Path::new(source_path))
            .unwrap_or_else(|| target.path().to_path_buf());
        let path = relative.to_string_lossy().replace('\\', "/");
        let embed = if target.is_markdown() { "" } else { "!" };
        let display = display.filter(|d| !d.trim().is_empty());

        match self.style {
            LinkStyle::Wiki => {
                let path = if target.is_markdown() {
                    path.strip_suffix(".md").unwrap_or(&path)
                } else {
                    &path
                };
                match display {
                    Some(display) if display != path => {
                        format!("{embed}[[{path}|{display}]]")
                    }
                    _ => format!("{embed}[[{path}]]"),
                }
            }
            LinkStyle::Markdown => {
                let stem = target.stem();
                let display = display.unwrap_or(&stem);
                format!("{embed}[{display}](<{path}>)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_identifier() {
        assert_eq!(
            note_identifier("applenotes:note/0a1b-2c3d?ownerIdentifier=_abc"),
            Some("0a1b-2c3d")
        );
        assert_eq!(note_identifier("https://example.com"), None);
        assert!(is_note_uri("applenotes:note/ff00"));
    }

    #[test]
    fn test_wiki_links() {
        let links = ObsidianLinkGenerator::default();
        let note = FileHandle::new("/Vault/Notes/Groceries.md");
        let image = FileHandle::new("/Vault/Attachments/photo one.png");

        assert_eq!(
            links.generate_link(&note, "/Vault", None),
            "[[Notes/Groceries]]"
        );
        assert_eq!(
            links.generate_link(&note, "/Vault", Some("shopping")),
            "[[Notes/Groceries|shopping]]"
        );
        assert_eq!(
            links.generate_link(&image, "/Vault", None),
            "![[Attachments/photo one.png]]"
        );
    }

    #[test]
    fn test_markdown_links() {
        let links = ObsidianLinkGenerator::new(LinkStyle::Markdown);
        let note = FileHandle::new("/Vault/Notes/Groceries.md");
        let image = FileHandle::new("/Vault/photo.png");

        assert_eq!(
            links.generate_link(&note, "/Vault", None),
            "[Groceries](<Notes/Groceries.md>)"
        );
        assert_eq!(
            links.generate_link(&image, "/Vault", Some("pic")),
            "![pic](<photo.png>)"
        );
    }

    #[test]
    fn test_relative_target_is_kept() {
        let links = ObsidianLinkGenerator::default();
        let file = FileHandle::new("Attachments/a.pdf");
        assert_eq!(links.generate_link(&file, "/", None), "![[Attachments/a.pdf]]");
    }

    #[test]
    fn test_link_style_from_str() {
        assert_eq!("markdown".parse::<LinkStyle>(), Ok(LinkStyle::Markdown));
        assert!("html".parse::<LinkStyle>().is_err());
    }
}
