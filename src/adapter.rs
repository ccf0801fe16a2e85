//! Filesystem-style adapter over the Microsoft Graph drive API.

use std::collections::VecDeque;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, info};

use crate::auth::{TokenProvider, LOGIN_BASE};
use crate::error::{DriveError, Result};
use crate::models::{ApiErrorResponse, DriveItem, DriveItemList, ItemKind, Metadata};
use crate::path;

/// Base URL for the Microsoft Graph API.
pub const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Configuration for a Graph drive adapter.
///
/// All fields are required; validation happens once at construction and the
/// config is immutable for the adapter's lifetime.
#[derive(Debug, Clone)]
pub struct DriveConfig {
    pub drive_id: String,
    pub tenant: String,
    pub client_id: String,
    pub client_secret: String,
}

impl DriveConfig {
    fn validate(&self) -> Result<()> {
        if self.drive_id.is_empty() {
            return Err(DriveError::InvalidConfiguration("drive_id"));
        }
        if self.tenant.is_empty() {
            return Err(DriveError::InvalidConfiguration("tenant"));
        }
        if self.client_id.is_empty() {
            return Err(DriveError::InvalidConfiguration("client_id"));
        }
        if self.client_secret.is_empty() {
            return Err(DriveError::InvalidConfiguration("client_secret"));
        }
        Ok(())
    }
}

/// Adapter translating filesystem verbs into Graph drive API calls.
///
/// Every operation is stateless beyond the immutable configuration and the
/// cached bearer token; calls resolve relative paths into drive-scoped
/// resource paths or item IDs, issue the remote verb, and normalize the
/// response into a [`Metadata`] record.
pub struct GraphDriveAdapter {
    drive_id: String,
    graph_base: String,
    auth: TokenProvider,
    http: Client,
}

impl GraphDriveAdapter {
    /// Connect against the public Graph and identity endpoints.
    ///
    /// Validates the configuration before any network activity, then
    /// performs the initial token exchange; a failed exchange is fatal.
    pub async fn connect(config: DriveConfig) -> Result<Self> {
        Self::connect_with_endpoints(config, GRAPH_API_BASE, LOGIN_BASE).await
    }

    /// Connect against custom Graph and identity endpoint bases.
    pub async fn connect_with_endpoints(
        config: DriveConfig,
        graph_base: impl Into<String>,
        login_base: impl Into<String>,
    ) -> Result<Self> {
        config.validate()?;

        let auth = TokenProvider::with_login_base(
            login_base,
            config.tenant.as_str(),
            config.client_id.as_str(),
            config.client_secret.as_str(),
        );
        auth.get_access_token().await?;

        Ok(Self {
            drive_id: config.drive_id,
            graph_base: graph_base.into(),
            auth,
            http: Client::new(),
        })
    }

    /// Get the drive ID.
    pub fn drive_id(&self) -> &str {
        &self.drive_id
    }

    fn url(&self, resource: &str) -> String {
        format!("{}{}", self.graph_base, resource)
    }

    /// Look up an item by its path relative to the drive root.
    async fn get_item(&self, relative: &str) -> Result<DriveItem> {
        let token = self.auth.get_access_token().await?;
        let resource = path::item_path(&self.drive_id, relative);
        debug!(resource = %resource, "looking up drive item");

        let response = self
            .http
            .get(self.url(&resource))
            .bearer_auth(&token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DriveError::NotFound(path::normalize(relative).to_string()));
        }
        if !status.is_success() {
            let (status, message) = error_parts(response).await;
            return Err(DriveError::Lookup {
                path: path::normalize(relative).to_string(),
                status,
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Upload content to a path-addressed item, creating or overwriting it.
    ///
    /// The whole payload goes out in a single PUT; there is no chunked or
    /// resumable upload, so this is unsuitable for very large files.
    pub async fn write(
        &self,
        p: &str,
        contents: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<Metadata> {
        let relative = path::normalize(p).to_string();
        let resource = path::content_path(&self.drive_id, p)?;
        let token = self.auth.get_access_token().await?;

        info!(path = %relative, bytes = contents.len(), "uploading content");

        let mut request = self
            .http
            .put(self.url(&resource))
            .bearer_auth(&token)
            .body(contents);
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let (status, message) = error_parts(response).await;
            return Err(DriveError::Write {
                path: relative,
                status,
                message,
            });
        }

        let item: DriveItem = response.json().await?;
        Ok(Metadata::from_item(&item, relative))
    }

    /// Read an item's content fully into memory.
    pub async fn read(&self, p: &str) -> Result<Vec<u8>> {
        let mut stream = self.read_stream(p).await?;
        let mut contents = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(DriveError::Http)?;
            contents.extend_from_slice(&chunk);
        }
        Ok(contents)
    }

    /// Read an item's content as a byte stream.
    ///
    /// Two sequential round trips: an authenticated metadata lookup, then an
    /// unauthenticated GET of the pre-signed download URL it carries.
    pub async fn read_stream(
        &self,
        p: &str,
    ) -> Result<impl Stream<Item = reqwest::Result<Bytes>>> {
        let relative = path::normalize(p).to_string();
        let item = self.get_item(&relative).await?;

        let download_url = item.download_url.ok_or_else(|| DriveError::Download {
            path: relative.clone(),
            message: "item has no downloadable content".to_string(),
        })?;

        // Pre-signed URL; no auth header needed
        let response = self.http.get(download_url).send().await?;
        if !response.status().is_success() {
            let (status, message) = error_parts(response).await;
            return Err(DriveError::Download {
                path: relative,
                message: format!("content fetch returned {}: {}", status, message),
            });
        }

        Ok(response.bytes_stream())
    }

    /// Check whether a path resolves to an item.
    ///
    /// A confirmed-absent lookup yields `Ok(false)`; any other failure
    /// propagates so callers can tell absence from breakage.
    pub async fn exists(&self, p: &str) -> Result<bool> {
        match self.get_item(p).await {
            Ok(_) => Ok(true),
            Err(DriveError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Move or rename an item.
    ///
    /// Resolves the source item and the destination's parent container, then
    /// patches the item with its new parent reference and name.
    pub async fn rename(&self, from: &str, to: &str) -> Result<Metadata> {
        let dest = path::normalize(to).to_string();
        let (parent, leaf) = path::split_parent(&dest)?;

        let item = self.get_item(from).await.map_err(|e| DriveError::Move {
            path: dest.clone(),
            message: format!("source lookup failed: {}", e),
        })?;
        let parent_item = self.get_item(&parent).await.map_err(|e| DriveError::Move {
            path: dest.clone(),
            message: format!("destination parent lookup failed: {}", e),
        })?;

        info!(from = %path::normalize(from), to = %dest, "moving item");

        let body = json!({
            "parentReference": {
                "driveId": self.drive_id,
                "id": parent_item.id,
            },
            "name": leaf,
        });

        let token = self.auth.get_access_token().await?;
        let response = self
            .http
            .patch(self.url(&path::item_by_id(&self.drive_id, &item.id)))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = error_parts(response).await;
            return Err(DriveError::Move {
                path: dest,
                message: format!("({}) {}", status, message),
            });
        }

        let moved: DriveItem = response.json().await?;
        Ok(Metadata::from_item(&moved, dest))
    }

    /// Copy an item to a new parent and name.
    ///
    /// The service performs the copy asynchronously; this call returns once
    /// the request is accepted, without awaiting completion.
    pub async fn copy(&self, from: &str, to: &str) -> Result<()> {
        let dest = path::normalize(to).to_string();
        let (parent, leaf) = path::split_parent(&dest)?;

        let item = self.get_item(from).await.map_err(|e| DriveError::Copy {
            path: dest.clone(),
            message: format!("source lookup failed: {}", e),
        })?;
        let parent_item = self.get_item(&parent).await.map_err(|e| DriveError::Copy {
            path: dest.clone(),
            message: format!("destination parent lookup failed: {}", e),
        })?;

        info!(from = %path::normalize(from), to = %dest, "copying item");

        let body = json!({
            "parentReference": {
                "driveId": self.drive_id,
                "id": parent_item.id,
            },
            "name": leaf,
        });

        let token = self.auth.get_access_token().await?;
        let response = self
            .http
            .post(self.url(&path::copy_by_id(&self.drive_id, &item.id)))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = error_parts(response).await;
            return Err(DriveError::Copy {
                path: dest,
                message: format!("({}) {}", status, message),
            });
        }

        if let Some(monitor) = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
        {
            debug!(to = %dest, monitor, "copy accepted; completes server-side");
        }

        Ok(())
    }

    /// Delete an item.
    pub async fn delete(&self, p: &str) -> Result<()> {
        let relative = path::normalize(p).to_string();
        let item = self.get_item(&relative).await?;

        info!(path = %relative, "deleting item");

        let token = self.auth.get_access_token().await?;
        let response = self
            .http
            .delete(self.url(&path::item_by_id(&self.drive_id, &item.id)))
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = error_parts(response).await;
            return Err(DriveError::Delete {
                path: relative,
                status,
                message,
            });
        }

        Ok(())
    }

    /// Delete a directory. The service removes its contents recursively.
    pub async fn delete_directory(&self, p: &str) -> Result<()> {
        self.delete(p).await
    }

    /// Create a directory under an existing parent.
    ///
    /// On a name collision the service auto-renames instead of failing, so
    /// the returned record's path carries the name the service chose.
    pub async fn create_directory(&self, p: &str) -> Result<Metadata> {
        let dest = path::normalize(p).to_string();
        let (parent, leaf) = path::split_parent(&dest)?;
        let parent_item = self.get_item(&parent).await?;

        info!(path = %dest, "creating directory");

        let body = json!({
            "name": leaf,
            "folder": {},
            "@microsoft.graph.conflictBehavior": "rename",
        });

        let token = self.auth.get_access_token().await?;
        let response = self
            .http
            .post(self.url(&path::children_by_id(&self.drive_id, &parent_item.id)))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = error_parts(response).await;
            return Err(DriveError::Write {
                path: dest,
                status,
                message,
            });
        }

        let item: DriveItem = response.json().await?;
        let created_path = path::join(&parent, &item.name);
        Ok(Metadata::from_item(&item, created_path))
    }

    /// List the contents of a directory.
    ///
    /// With `recursive` set, discovered subdirectories are listed in turn.
    /// Listing is all-or-nothing: the first failing container aborts the
    /// whole call.
    pub async fn list_contents(&self, directory: &str, recursive: bool) -> Result<Vec<Metadata>> {
        let mut entries = Vec::new();
        let mut pending = VecDeque::from([path::normalize(directory).to_string()]);

        while let Some(dir) = pending.pop_front() {
            for item in self.list_children(&dir).await? {
                let child_path = path::join(&dir, &item.name);
                let meta = Metadata::from_item(&item, child_path.clone());
                if recursive && meta.kind == ItemKind::Dir {
                    pending.push_back(child_path);
                }
                entries.push(meta);
            }
        }

        Ok(entries)
    }

    /// List the immediate children of a container, following pagination.
    async fn list_children(&self, dir: &str) -> Result<Vec<DriveItem>> {
        let token = self.auth.get_access_token().await?;
        let mut all_items = Vec::new();
        let mut next_url = Some(self.url(&path::children_path(&self.drive_id, dir)));

        while let Some(url) = next_url {
            let response = self.http.get(url).bearer_auth(&token).send().await?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(DriveError::NotFound(dir.to_string()));
            }
            if !status.is_success() {
                let (status, message) = error_parts(response).await;
                return Err(DriveError::Lookup {
                    path: dir.to_string(),
                    status,
                    message,
                });
            }

            let page: DriveItemList = response.json().await?;
            all_items.extend(page.value);
            next_url = page.next_link;
        }

        debug!(dir = %dir, count = all_items.len(), "listed children");
        Ok(all_items)
    }

    /// Fetch the full metadata record for an item.
    pub async fn get_metadata(&self, p: &str) -> Result<Metadata> {
        let relative = path::normalize(p).to_string();
        let item = self.get_item(&relative).await?;
        Ok(Metadata::from_item(&item, relative))
    }

    /// Fetch an item's size in bytes.
    pub async fn get_size(&self, p: &str) -> Result<Option<u64>> {
        Ok(self.get_metadata(p).await?.size)
    }

    /// Fetch an item's MIME type. Directories have none.
    pub async fn get_mimetype(&self, p: &str) -> Result<Option<String>> {
        Ok(self.get_metadata(p).await?.mimetype)
    }

    /// Fetch an item's last-modified time in epoch seconds.
    pub async fn get_timestamp(&self, p: &str) -> Result<Option<i64>> {
        Ok(self.get_metadata(p).await?.timestamp)
    }

    /// Per-item visibility has no Graph drive equivalent.
    pub fn set_visibility(&self, _p: &str, _visibility: &str) -> Result<()> {
        Err(DriveError::Unsupported("set_visibility"))
    }

    /// Per-item visibility has no Graph drive equivalent.
    pub fn get_visibility(&self, _p: &str) -> Result<&'static str> {
        Err(DriveError::Unsupported("get_visibility"))
    }
}

/// Pull the status and a human-readable message out of an error response,
/// decoding the Graph error envelope when present.
async fn error_parts(response: reqwest::Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_error) => (
            status,
            format!("{}: {}", api_error.error.code, api_error.error.message),
        ),
        Err(_) => (status, body),
    }
}

#[cfg(test)]
mod tests {
    // Tests are in tests/adapter_test.rs
}
