//! Result types: what a conversion produced and what `--info` reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Outcome of a successful [`crate::convert::convert`] call.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// Directory the images were written to.
    pub output_dir: PathBuf,
    /// Final image paths, in page order.
    pub files: Vec<PathBuf>,
    /// Number of page images staged.
    pub page_count: usize,
    /// Wall-clock time for the whole conversion, cleanup included.
    pub duration_ms: u64,
}

/// Document-level facts reported by `ofd2jpg --info`.
///
/// Deserialised from the renderer's `info` JSON. Every field is optional on
/// the wire and defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentInfo {
    pub page_count: usize,
    pub fonts: Vec<String>,
    pub doc_info: DocMetadata,
}

/// The OFD `DocInfo` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocMetadata {
    pub author: Option<String>,
    pub creation_date: Option<String>,
    pub creator: Option<String>,
    pub creator_version: Option<String>,
    pub mod_date: Option<String>,
    pub subject: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub keywords: Vec<String>,
    pub custom_data: Vec<CustomDatum>,
}

/// One user-defined `Name = value` entry of `DocInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomDatum {
    pub name: String,
    pub value: String,
}

/// One `Key: value` line per field; absent fields print as empty.
impl fmt::Display for DocumentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meta = &self.doc_info;
        let or_empty = |v: &Option<String>| v.clone().unwrap_or_default();

        writeln!(f, "NumberOfPages: {}", self.page_count)?;
        writeln!(f, "Fonts: {}", self.fonts.join(", "))?;
        writeln!(f, "Author: {}", or_empty(&meta.author))?;
        writeln!(f, "CreationDate: {}", or_empty(&meta.creation_date))?;
        writeln!(f, "Creator: {}", or_empty(&meta.creator))?;
        writeln!(f, "CreatorVersion: {}", or_empty(&meta.creator_version))?;
        writeln!(f, "ModDate: {}", or_empty(&meta.mod_date))?;
        writeln!(f, "Subject: {}", or_empty(&meta.subject))?;
        writeln!(f, "Abstract: {}", or_empty(&meta.abstract_text))?;
        write!(f, "Keywords: {}", meta.keywords.join(", "))?;
        for datum in &meta.custom_data {
            write!(f, "\nCustomData: {} = {}", datum.name, datum.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_print_empty() {
        let info = DocumentInfo {
            page_count: 2,
            fonts: vec!["SimSun".into(), "KaiTi".into()],
            doc_info: DocMetadata {
                author: Some("Zhang".into()),
                ..Default::default()
            },
        };
        let text = info.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "NumberOfPages: 2",
                "Fonts: SimSun, KaiTi",
                "Author: Zhang",
                "CreationDate: ",
                "Creator: ",
                "CreatorVersion: ",
                "ModDate: ",
                "Subject: ",
                "Abstract: ",
                "Keywords: ",
            ]
        );
    }

    #[test]
    fn custom_data_lines_follow_keywords() {
        let info = DocumentInfo {
            doc_info: DocMetadata {
                keywords: vec!["tax".into(), "2024".into()],
                custom_data: vec![CustomDatum {
                    name: "InvoiceNo".into(),
                    value: "0042".into(),
                }],
                ..Default::default()
            },
            ..Default::default()
        };
        let text = info.to_string();
        assert!(text.contains("Keywords: tax, 2024\nCustomData: InvoiceNo = 0042"));
    }

    #[test]
    fn renderer_json_with_gaps_deserialises() {
        let json = r#"{"pageCount":3,"docInfo":{"abstract":"summary","creatorVersion":"2.1"}}"#;
        let info: DocumentInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.page_count, 3);
        assert!(info.fonts.is_empty());
        assert_eq!(info.doc_info.abstract_text.as_deref(), Some("summary"));
        assert_eq!(info.doc_info.creator_version.as_deref(), Some("2.1"));
        assert!(info.doc_info.custom_data.is_empty());
    }
}
