use serde::{Deserialize, Serialize};

/// Attachment UTIs the converter knows how to resolve.
pub mod uti {
    pub const HASHTAG: &str = "com.apple.notes.inlinetextattachment.hashtag";
    pub const MENTION: &str = "com.apple.notes.inlinetextattachment.mention";
    pub const INTERNAL_LINK: &str = "com.apple.notes.inlinetextattachment.link";
    pub const INLINE_TEXT_ATTACHMENT: &str = "com.apple.notes.inlinetextattachment";
    pub const TABLE: &str = "com.apple.notes.table";
    pub const URL_CARD: &str = "public.url";
    pub const SCAN: &str = "com.apple.notes.gallery";
    pub const MODIFIED_SCAN: &str = "com.apple.paper.doc.scan";
    pub const DRAWING: &str = "com.apple.paper";
    pub const DRAWING_LEGACY: &str = "com.apple.drawing";
    pub const DRAWING_LEGACY_2: &str = "com.apple.drawing.2";
}

/// Font id the source uses for emoji; never worth emitting as a font-family.
pub const DEFAULT_EMOJI_FONT: &str = ".AppleColorEmojiUI";

/// How `AttributeRun::length` counts text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    #[default]
    Utf16,
    Utf8,
}

/// A note as stored: the raw text plus its run-length formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub text: String,
    #[serde(default)]
    pub attribute_runs: Vec<AttributeRun>,
    #[serde(default)]
    pub offset_unit: OffsetUnit,
}

impl Note {
    pub fn new(text: impl Into<String>, attribute_runs: Vec<AttributeRun>) -> Self {
        Self {
            text: text.into(),
            attribute_runs,
            offset_unit: OffsetUnit::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRun {
    pub length: usize,
    #[serde(flatten)]
    pub format: Formatting,
}

impl AttributeRun {
    pub fn new(length: usize, format: Formatting) -> Self {
        Self { length, format }
    }

    pub fn plain(length: usize) -> Self {
        Self::new(length, Formatting::default())
    }
}

/// Every attribute of a run except its length. Two adjacent runs merge iff
/// their `Formatting` values are equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Formatting {
    pub paragraph_style: Option<ParagraphStyle>,
    pub font: Option<Font>,
    pub font_weight: Option<FontWeight>,
    pub underlined: bool,
    pub strikethrough: bool,
    pub superscript: Baseline,
    pub link: Option<String>,
    pub color: Option<Color>,
    pub attachment_info: Option<AttachmentInfo>,
}

impl Formatting {
    pub fn style_type(&self) -> StyleType {
        self.paragraph_style
            .as_ref()
            .map(|p| p.style_type)
            .unwrap_or_default()
    }

    pub fn indent_amount(&self) -> usize {
        self.paragraph_style
            .as_ref()
            .map(|p| p.indent_amount)
            .unwrap_or(0)
    }

    pub fn is_blockquote(&self) -> bool {
        self.paragraph_style.as_ref().is_some_and(|p| p.blockquote)
    }

    /// Alignment other than the default left, if any.
    pub fn alignment(&self) -> Option<Alignment> {
        self.paragraph_style
            .as_ref()
            .map(|p| p.alignment)
            .filter(|a| *a != Alignment::Left)
    }

    pub fn is_checked(&self) -> bool {
        self.paragraph_style
            .as_ref()
            .and_then(|p| p.checklist.as_ref())
            .is_some_and(|c| c.done)
    }

    pub fn attachment_kind(&self) -> Option<AttachmentKind> {
        self.attachment_info.as_ref().map(AttachmentInfo::kind)
    }

    pub fn is_hashtag(&self) -> bool {
        matches!(self.attachment_kind(), Some(AttachmentKind::Hashtag))
    }

    pub fn is_block_attachment(&self) -> bool {
        self.attachment_info
            .as_ref()
            .is_some_and(|a| !a.type_uti.contains(uti::INLINE_TEXT_ATTACHMENT))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParagraphStyle {
    pub style_type: StyleType,
    pub alignment: Alignment,
    pub indent_amount: usize,
    pub checklist: Option<Checklist>,
    pub blockquote: bool,
}

impl ParagraphStyle {
    pub fn new(style_type: StyleType) -> Self {
        Self {
            style_type,
            ..Default::default()
        }
    }

    pub fn indented(mut self, indent_amount: usize) -> Self {
        self.indent_amount = indent_amount;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleType {
    #[default]
    Default,
    Title,
    Heading,
    Subheading,
    Monospaced,
    DottedList,
    DashedList,
    NumberedList,
    Checkbox,
}

impl StyleType {
    pub fn is_list(self) -> bool {
        matches!(
            self,
            Self::DottedList | Self::DashedList | Self::NumberedList | Self::Checkbox
        )
    }

    pub fn is_bulleted(self) -> bool {
        matches!(self, Self::DottedList | Self::DashedList)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    #[default]
    Left,
    Centre,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Centre => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Checklist {
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontWeight {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Baseline {
    #[default]
    Default,
    Super,
    Sub,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Font {
    pub font_name: Option<String>,
    pub point_size: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    #[serde(default = "opaque")]
    pub alpha: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// `#rrggbb`; alpha is not representable in the CSS we emit.
    pub fn to_hex(&self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).floor() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInfo {
    pub attachment_identifier: String,
    pub type_uti: String,
}

impl AttachmentInfo {
    pub fn new(attachment_identifier: impl Into<String>, type_uti: impl Into<String>) -> Self {
        Self {
            attachment_identifier: attachment_identifier.into(),
            type_uti: type_uti.into(),
        }
    }

    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::from_uti(&self.type_uti)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentKind {
    Hashtag,
    Mention,
    InternalLink,
    Table,
    UrlCard,
    Scan,
    ModifiedScan,
    Drawing,
    DrawingLegacy,
    DrawingLegacy2,
    /// Any file on disk: images, audio, video, pdf, contact cards...
    Other(String),
}

impl AttachmentKind {
    pub fn from_uti(type_uti: &str) -> Self {
        match type_uti {
            uti::HASHTAG => Self::Hashtag,
            uti::MENTION => Self::Mention,
            uti::INTERNAL_LINK => Self::InternalLink,
            uti::TABLE => Self::Table,
            uti::URL_CARD => Self::UrlCard,
            uti::SCAN => Self::Scan,
            uti::MODIFIED_SCAN => Self::ModifiedScan,
            uti::DRAWING => Self::Drawing,
            uti::DRAWING_LEGACY => Self::DrawingLegacy,
            uti::DRAWING_LEGACY_2 => Self::DrawingLegacy2,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            Self::ModifiedScan | Self::Drawing | Self::DrawingLegacy | Self::DrawingLegacy2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_run() {
        let json = r#"{
            "length": 5,
            "fontWeight": "bold",
            "paragraphStyle": {"styleType": "numberedList", "indentAmount": 2},
            "color": {"red": 1.0, "green": 0.5, "blue": 0.0}
        }"#;

        let run: AttributeRun = serde_json::from_str(json).unwrap();
        assert_eq!(run.length, 5);
        assert_eq!(run.format.font_weight, Some(FontWeight::Bold));
        assert_eq!(run.format.style_type(), StyleType::NumberedList);
        assert_eq!(run.format.indent_amount(), 2);
        assert!(!run.format.underlined);
        assert_eq!(run.format.color.unwrap().alpha, 1.0);
    }

    #[test]
    fn test_deserialize_note() {
        let json = r#"{
            "text": "Hi\n",
            "attributeRuns": [{"length": 2}, {"length": 1, "underlined": true}]
        }"#;

        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.offset_unit, OffsetUnit::Utf16);
        assert_eq!(note.attribute_runs.len(), 2);
        assert!(note.attribute_runs[1].format.underlined);
    }

    #[test]
    fn test_white_is_ffffff() {
        assert_eq!(Color::rgb(1.0, 1.0, 1.0).to_hex(), "#ffffff");
    }

    #[test]
    fn test_color_channels_are_padded() {
        assert_eq!(Color::rgb(0.0, 0.01, 0.5).to_hex(), "#00027f");
    }

    #[test]
    fn test_left_alignment_is_unset() {
        let mut style = ParagraphStyle::new(StyleType::Default);
        let format = Formatting {
            paragraph_style: Some(style.clone()),
            ..Default::default()
        };
        assert_eq!(format.alignment(), None);

        style.alignment = Alignment::Centre;
        let format = Formatting {
            paragraph_style: Some(style),
            ..Default::default()
        };
        assert_eq!(format.alignment(), Some(Alignment::Centre));
    }

    #[test]
    fn test_attachment_classification() {
        assert_eq!(AttachmentKind::from_uti(uti::HASHTAG), AttachmentKind::Hashtag);
        assert_eq!(
            AttachmentKind::from_uti("public.jpeg"),
            AttachmentKind::Other("public.jpeg".into())
        );

        let tag = Formatting {
            attachment_info: Some(AttachmentInfo::new("A", uti::HASHTAG)),
            ..Default::default()
        };
        assert!(tag.is_hashtag());
        assert!(!tag.is_block_attachment());

        let table = Formatting {
            attachment_info: Some(AttachmentInfo::new("B", uti::TABLE)),
            ..Default::default()
        };
        assert!(table.is_block_attachment());
    }
}
