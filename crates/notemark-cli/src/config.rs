//! Optional KDL config file. Every setting can also be given on the command
//! line, which wins.
//!
//! ```kdl
//! omit-first-line true
//! include-handwriting false
//! root-folder "/Notes"
//! link-style "markdown"
//! ```

use std::path::{Path, PathBuf};

use kdl::{KdlDocument, KdlError, KdlNode};
use miette::Diagnostic;
use notemark::{ConvertOptions, LinkStyle};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("could not read config file {}", path.display())]
    #[diagnostic(code(notemark::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", path.display())]
    #[diagnostic(code(notemark::config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: KdlError,
    },

    #[error("bad value for `{node}`: {message}")]
    #[diagnostic(
        code(notemark::config::invalid),
        help("booleans are `true`/`false`; link-style is \"wiki\" or \"markdown\"")
    )]
    Invalid { node: String, message: String },
}

/// Settings read from the config file. Unset entries fall through to the
/// command line or the defaults.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FileConfig {
    pub omit_first_line: Option<bool>,
    pub include_handwriting: Option<bool>,
    pub root_folder: Option<String>,
    pub link_style: Option<LinkStyle>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Overrides {
    pub omit_first_line: bool,
    pub include_handwriting: bool,
    pub root_folder: Option<String>,
    pub link_style: Option<LinkStyle>,
}

impl FileConfig {
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let doc: KdlDocument = content.parse().map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let link_style = match string_value(&doc, "link-style")? {
            Some(style) => Some(style.parse::<LinkStyle>().map_err(|message| ConfigError::Invalid {
                node: "link-style".to_string(),
                message,
            })?),
            None => None,
        };

        Ok(Self {
            omit_first_line: bool_value(&doc, "omit-first-line")?,
            include_handwriting: bool_value(&doc, "include-handwriting")?,
            root_folder: string_value(&doc, "root-folder")?,
            link_style,
        })
    }

    pub fn merge(self, overrides: Overrides) -> (ConvertOptions, LinkStyle) {
        let defaults = ConvertOptions::default();
        let options = ConvertOptions {
            omit_first_line: overrides.omit_first_line
                || self.omit_first_line.unwrap_or(defaults.omit_first_line),
            include_handwriting: overrides.include_handwriting
                || self
                    .include_handwriting
                    .unwrap_or(defaults.include_handwriting),
            root_folder: overrides
                .root_folder
                .or(self.root_folder)
                .unwrap_or(defaults.root_folder),
        };
        let link_style = overrides.link_style.or(self.link_style).unwrap_or_default();
        (options, link_style)
    }
}

/// Read an explicitly named config file.
pub fn load(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    FileConfig::parse(&content, path)
}

/// Read the config file from the user's config directory, if there is one.
pub fn load_default() -> Result<FileConfig, ConfigError> {
    match default_config_path() {
        Some(path) if path.exists() => {
            tracing::debug!("loading config from {}", path.display());
            load(&path)
        }
        _ => Ok(FileConfig::default()),
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("notemark").join("config.kdl"))
}

fn first_value<'d>(doc: &'d KdlDocument, name: &str) -> Option<(&'d KdlNode, &'d kdl::KdlValue)> {
    let node = doc.get(name)?;
    Some((node, node.entries().first()?.value()))
}

fn bool_value(doc: &KdlDocument, name: &str) -> Result<Option<bool>, ConfigError> {
    match first_value(doc, name) {
        Some((_, value)) => value.as_bool().map(Some).ok_or_else(|| ConfigError::Invalid {
            node: name.to_string(),
            message: format!("expected a boolean, got {value}"),
        }),
        // A bare node reads as switched on.
        None if doc.get(name).is_some() => Ok(Some(true)),
        None => Ok(None),
    }
}

fn string_value(doc: &KdlDocument, name: &str) -> Result<Option<String>, ConfigError> {
    match first_value(doc, name) {
        Some((_, value)) => value
            .as_string()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| ConfigError::Invalid {
                node: name.to_string(),
                message: format!("expected a string, got {value}"),
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<FileConfig, ConfigError> {
        FileConfig::parse(content, Path::new("config.kdl"))
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            "omit-first-line true\ninclude-handwriting false\nroot-folder \"/Notes\"\nlink-style \"markdown\"\n",
        )
        .unwrap();
        assert_eq!(
            config,
            FileConfig {
                omit_first_line: Some(true),
                include_handwriting: Some(false),
                root_folder: Some("/Notes".to_string()),
                link_style: Some(LinkStyle::Markdown),
            }
        );
    }

    #[test]
    fn test_bare_node_is_true() {
        let config = parse("include-handwriting\n").unwrap();
        assert_eq!(config.include_handwriting, Some(true));
        assert_eq!(config.omit_first_line, None);
    }

    #[test]
    fn test_bad_values() {
        assert!(matches!(
            parse("link-style \"html\"\n"),
            Err(ConfigError::Invalid { ref node, .. }) if node == "link-style"
        ));
        assert!(matches!(
            parse("omit-first-line \"yes\"\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(parse("root-folder \"\n"), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_flags_override_file() {
        let config = FileConfig {
            omit_first_line: Some(false),
            include_handwriting: None,
            root_folder: Some("/Notes".to_string()),
            link_style: Some(LinkStyle::Markdown),
        };
        let (options, style) = config.merge(Overrides {
            omit_first_line: true,
            link_style: Some(LinkStyle::Wiki),
            ..Default::default()
        });

        assert!(options.omit_first_line);
        assert!(!options.include_handwriting);
        assert_eq!(options.root_folder, "/Notes");
        assert_eq!(style, LinkStyle::Wiki);
    }

    #[test]
    fn test_defaults_without_file() {
        let (options, style) = FileConfig::default().merge(Overrides::default());
        assert_eq!(options, ConvertOptions::default());
        assert_eq!(style, LinkStyle::Wiki);
    }
}
