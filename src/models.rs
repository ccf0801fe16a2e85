//! Data models for Microsoft Graph drive API responses.

use serde::{Deserialize, Serialize};

/// Visibility reported for every item. The Graph drive API has no per-item
/// visibility toggle, so the adapter reports a constant.
pub const VISIBILITY_PUBLIC: &str = "public";

/// A drive item as returned by the Graph API.
///
/// Only the attributes the adapter consumes are modeled; the folder, file
/// and package facets double as the item-kind discriminator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub last_modified_date_time: Option<String>,
    #[serde(default)]
    pub folder: Option<FolderFacet>,
    #[serde(default)]
    pub package: Option<PackageFacet>,
    #[serde(default)]
    pub file: Option<FileFacet>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default, rename = "@microsoft.graph.downloadUrl")]
    pub download_url: Option<String>,
}

impl DriveItem {
    /// Whether the item is a plain folder. Packages (e.g. OneNote notebooks)
    /// carry a folder facet too but are treated as files.
    pub fn is_dir(&self) -> bool {
        self.folder.is_some() && self.package.is_none()
    }
}

/// Folder facet of a drive item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    #[serde(default)]
    pub child_count: Option<i64>,
}

/// File facet of a drive item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Package facet of a drive item.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageFacet {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// One page of a children listing.
#[derive(Debug, Deserialize)]
pub struct DriveItemList {
    #[serde(default)]
    pub value: Vec<DriveItem>,
    #[serde(default, rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Graph API error envelope.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

/// OAuth2 token response from the identity endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Kind of a drive item in the adapter's output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Dir,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::File => write!(f, "file"),
            ItemKind::Dir => write!(f, "dir"),
        }
    }
}

/// Normalized metadata record produced by every adapter operation.
///
/// Serializes to `{"type", "path", "timestamp", "size", "mimetype",
/// "visibility", "webUrl"}` with the timestamp in epoch seconds.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub path: String,
    pub timestamp: Option<i64>,
    pub size: Option<u64>,
    pub mimetype: Option<String>,
    pub visibility: &'static str,
    #[serde(rename = "webUrl", skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

impl Metadata {
    /// Build a metadata record from a Graph item and the relative path it
    /// was addressed by.
    pub fn from_item(item: &DriveItem, path: impl Into<String>) -> Self {
        let kind = if item.is_dir() {
            ItemKind::Dir
        } else {
            ItemKind::File
        };
        Metadata {
            kind,
            path: path.into(),
            timestamp: item
                .last_modified_date_time
                .as_deref()
                .and_then(parse_timestamp),
            size: item.size,
            mimetype: match kind {
                ItemKind::Dir => None,
                ItemKind::File => item.file.as_ref().and_then(|f| f.mime_type.clone()),
            },
            visibility: VISIBILITY_PUBLIC,
            web_url: item.web_url.clone(),
        }
    }
}

impl std::fmt::Display for Metadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size_str = self
            .size
            .map(format_size)
            .unwrap_or_else(|| "-".to_string());
        let mime = self.mimetype.as_deref().unwrap_or("-");
        write!(f, "{}\t{}\t{}\t{}", self.kind, size_str, mime, self.path)
    }
}

/// Parse an RFC 3339 timestamp into epoch seconds.
pub fn parse_timestamp(rfc3339: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(rfc3339)
        .ok()
        .map(|dt| dt.timestamp())
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1970-01-01T00:01:00Z"), Some(60));
        assert_eq!(parse_timestamp("2024-01-01T00:00:00.000Z"), Some(1704067200));
        assert_eq!(parse_timestamp("not a date"), None);
    }

    #[test]
    fn test_drive_item_file_deserialize() {
        let json = r#"{
            "id": "abc123",
            "name": "test.txt",
            "size": 1024,
            "lastModifiedDateTime": "2024-01-01T00:00:00Z",
            "file": {"mimeType": "text/plain"},
            "webUrl": "https://contoso.sharepoint.com/test.txt",
            "@microsoft.graph.downloadUrl": "https://download.example/abc123"
        }"#;

        let item: DriveItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "abc123");
        assert!(!item.is_dir());
        assert_eq!(item.size, Some(1024));
        assert_eq!(
            item.download_url.as_deref(),
            Some("https://download.example/abc123")
        );
    }

    #[test]
    fn test_drive_item_folder_deserialize() {
        let json = r#"{
            "id": "dir1",
            "name": "Documents",
            "folder": {"childCount": 3}
        }"#;

        let item: DriveItem = serde_json::from_str(json).unwrap();
        assert!(item.is_dir());
        assert_eq!(item.folder.as_ref().unwrap().child_count, Some(3));
    }

    #[test]
    fn test_package_is_not_a_dir() {
        let json = r#"{
            "id": "pkg1",
            "name": "Notebook",
            "folder": {},
            "package": {"type": "oneNote"}
        }"#;

        let item: DriveItem = serde_json::from_str(json).unwrap();
        assert!(!item.is_dir());
    }

    #[test]
    fn test_item_list_with_next_link() {
        let json = r#"{
            "value": [{"id": "f1", "name": "a.txt"}],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/next"
        }"#;

        let list: DriveItemList = serde_json::from_str(json).unwrap();
        assert_eq!(list.value.len(), 1);
        assert!(list.next_link.is_some());
    }

    #[test]
    fn test_metadata_from_folder_item() {
        let json = r#"{
            "id": "dir1",
            "name": "Documents",
            "size": 0,
            "lastModifiedDateTime": "1970-01-01T00:01:00Z",
            "folder": {}
        }"#;

        let item: DriveItem = serde_json::from_str(json).unwrap();
        let meta = Metadata::from_item(&item, "Documents");
        assert_eq!(meta.kind, ItemKind::Dir);
        assert_eq!(meta.path, "Documents");
        assert_eq!(meta.timestamp, Some(60));
        assert_eq!(meta.mimetype, None);
        assert_eq!(meta.visibility, "public");
    }

    #[test]
    fn test_metadata_display() {
        let meta = Metadata {
            kind: ItemKind::File,
            path: "docs/a.txt".to_string(),
            timestamp: None,
            size: Some(1024),
            mimetype: Some("text/plain".to_string()),
            visibility: VISIBILITY_PUBLIC,
            web_url: None,
        };

        let display = format!("{}", meta);
        assert!(display.contains("file"));
        assert!(display.contains("1.00 KB"));
        assert!(display.contains("text/plain"));
        assert!(display.contains("docs/a.txt"));
    }

    #[test]
    fn test_metadata_json_contract() {
        let meta = Metadata {
            kind: ItemKind::File,
            path: "docs/a.txt".to_string(),
            timestamp: Some(60),
            size: Some(12),
            mimetype: Some("text/plain".to_string()),
            visibility: VISIBILITY_PUBLIC,
            web_url: None,
        };

        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["type"], "file");
        assert_eq!(value["path"], "docs/a.txt");
        assert_eq!(value["timestamp"], 60);
        assert_eq!(value["size"], 12);
        assert_eq!(value["mimetype"], "text/plain");
        assert_eq!(value["visibility"], "public");
        assert!(value.get("webUrl").is_none());
    }
}
