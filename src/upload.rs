//! Upload Files
//!
//! Client-side gate in front of `POST /upload/`: only spreadsheet
//! extensions are sent. File contents are never inspected here.

use std::fmt;

/// Shown when a file is refused before any request is made
pub const UNSUPPORTED_FILE_MESSAGE: &str = "Please upload a CSV or Excel file (.csv, .xls, .xlsx)";

/// Accepted spreadsheet formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Csv,
    Xls,
    Xlsx,
}

impl FileKind {
    pub const ALL: [FileKind; 3] = [FileKind::Csv, FileKind::Xls, FileKind::Xlsx];

    /// Classify by the last dot-separated component of the name, ignoring case
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(FileKind::Csv),
            "xls" => Some(FileKind::Xls),
            "xlsx" => Some(FileKind::Xlsx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Xls => "xls",
            FileKind::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FileKind::Csv => "text/csv",
            FileKind::Xls => "application/vnd.ms-excel",
            FileKind::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// Value for an `<input type="file" accept=...>` attribute
    pub fn accept_attribute() -> String {
        Self::ALL
            .iter()
            .map(|kind| format!(".{}", kind.extension()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A file that passed the extension check, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    name: String,
    kind: FileKind,
    bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, kind: FileKind, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            kind,
            bytes,
        }
    }

    /// Classify and wrap, or `None` for a disallowed extension
    pub fn detect(name: impl Into<String>, bytes: Vec<u8>) -> Option<Self> {
        let name = name.into();
        let kind = FileKind::from_filename(&name)?;
        Some(Self::new(name, kind, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert_eq!(FileKind::from_filename("equipment.csv"), Some(FileKind::Csv));
        assert_eq!(FileKind::from_filename("plant.data.XLSX"), Some(FileKind::Xlsx));
        assert_eq!(FileKind::from_filename("Old Sheet.Xls"), Some(FileKind::Xls));
    }

    #[test]
    fn test_rejected_extensions() {
        for name in ["report.pdf", "data.csv.zip", "notes", "archive.", ".csvx", "image.png"] {
            assert_eq!(FileKind::from_filename(name), None, "{} should be rejected", name);
        }
    }

    #[test]
    fn test_detect() {
        let file = UploadFile::detect("sample_equipment_data.csv", b"Type\nPump\n".to_vec()).unwrap();
        assert_eq!(file.kind(), FileKind::Csv);
        assert_eq!(file.name(), "sample_equipment_data.csv");
        assert_eq!(file.len(), 10);

        assert!(UploadFile::detect("readme.txt", Vec::new()).is_none());
    }

    #[test]
    fn test_accept_attribute() {
        assert_eq!(FileKind::accept_attribute(), ".csv,.xls,.xlsx");
    }
}
