//! Resource path construction for Microsoft Graph drive items.

use crate::error::{DriveError, Result};

/// Strip leading and trailing slashes from a relative drive path.
pub fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

/// Build the resource path addressing an item by its path relative to the
/// drive root.
///
/// An empty relative path addresses the root container itself.
///
/// # Examples
///
/// ```
/// use graph_drive::path::item_path;
///
/// assert_eq!(item_path("d1", ""), "/drives/d1/root");
/// assert_eq!(item_path("d1", "docs/a.txt"), "/drives/d1/root:/docs/a.txt");
/// ```
pub fn item_path(drive_id: &str, path: &str) -> String {
    let path = normalize(path);
    if path.is_empty() {
        format!("/drives/{}/root", drive_id)
    } else {
        format!("/drives/{}/root:/{}", drive_id, path)
    }
}

/// Build the resource path listing the children of a container.
pub fn children_path(drive_id: &str, path: &str) -> String {
    let path = normalize(path);
    if path.is_empty() {
        format!("/drives/{}/root/children", drive_id)
    } else {
        format!("/drives/{}/root:/{}:/children", drive_id, path)
    }
}

/// Build the resource path for uploading content to a path-addressed item.
///
/// The root container has no content endpoint, so an empty path is rejected.
pub fn content_path(drive_id: &str, path: &str) -> Result<String> {
    let normalized = normalize(path);
    if normalized.is_empty() {
        return Err(DriveError::InvalidPath(path.to_string()));
    }
    Ok(format!("/drives/{}/root:/{}:/content", drive_id, normalized))
}

/// Build the resource path addressing an item by ID.
pub fn item_by_id(drive_id: &str, item_id: &str) -> String {
    format!("/drives/{}/items/{}", drive_id, item_id)
}

/// Build the resource path for the children of an ID-addressed container.
pub fn children_by_id(drive_id: &str, item_id: &str) -> String {
    format!("/drives/{}/items/{}/children", drive_id, item_id)
}

/// Build the resource path for copying an ID-addressed item.
pub fn copy_by_id(drive_id: &str, item_id: &str) -> String {
    format!("/drives/{}/items/{}/copy", drive_id, item_id)
}

/// Split a relative path into its parent container path and leaf name.
///
/// The parent is empty when the leaf sits directly under the drive root.
///
/// # Examples
///
/// ```
/// use graph_drive::path::split_parent;
///
/// assert_eq!(split_parent("a/b/c.txt").unwrap(), ("a/b".to_string(), "c.txt".to_string()));
/// assert_eq!(split_parent("c.txt").unwrap(), (String::new(), "c.txt".to_string()));
/// ```
pub fn split_parent(path: &str) -> Result<(String, String)> {
    let normalized = normalize(path);
    if normalized.is_empty() {
        return Err(DriveError::InvalidPath(path.to_string()));
    }
    match normalized.rsplit_once('/') {
        Some((parent, leaf)) => Ok((parent.to_string(), leaf.to_string())),
        None => Ok((String::new(), normalized.to_string())),
    }
}

/// Join a directory path and a child name into a relative path.
pub fn join(dir: &str, name: &str) -> String {
    let dir = normalize(dir);
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}
