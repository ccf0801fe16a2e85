//! graph_drive CLI - Interact with a Microsoft Graph drive.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use glob::glob;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;
use tracing_subscriber::EnvFilter;

use graph_drive::{DriveConfig, GraphDriveAdapter};

/// CLI tool for interacting with a Microsoft Graph drive.
#[derive(Parser)]
#[command(name = "graph_drive")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Drive ID of the target drive.
    #[arg(long, env = "GRAPH_DRIVE_ID")]
    drive_id: String,

    /// Directory (tenant) ID or domain.
    #[arg(long, env = "GRAPH_TENANT")]
    tenant: String,

    /// Application (client) ID.
    #[arg(long, env = "GRAPH_CLIENT_ID")]
    client_id: String,

    /// Client secret for the application.
    #[arg(long, env = "GRAPH_CLIENT_SECRET")]
    client_secret: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the contents of a directory.
    List {
        /// Directory path relative to the drive root (defaults to the root).
        #[arg(default_value = "")]
        path: String,

        /// Recurse into subdirectories.
        #[arg(long, short = 'r')]
        recursive: bool,
    },

    /// Print an item's metadata record as JSON.
    Stat {
        /// Item path relative to the drive root.
        path: String,
    },

    /// Check whether a path exists.
    Exists {
        /// Item path relative to the drive root.
        path: String,
    },

    /// Upload local files into a directory.
    Upload {
        /// File patterns to upload (supports glob patterns like *.tar, file_{1,2,3}.txt).
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Destination directory path relative to the drive root.
        #[arg(long, short = 't', default_value = "")]
        to: String,
    },

    /// Download a file to the local filesystem.
    Download {
        /// Item path relative to the drive root.
        path: String,

        /// Local destination path (file or directory).
        #[arg(long, short = 't', default_value = ".")]
        to: PathBuf,
    },

    /// Create a directory.
    Mkdir {
        /// Directory path relative to the drive root.
        path: String,
    },

    /// Move or rename an item.
    Move {
        /// Source path relative to the drive root.
        from: String,

        /// Destination path relative to the drive root.
        to: String,
    },

    /// Copy an item.
    Copy {
        /// Source path relative to the drive root.
        from: String,

        /// Destination path relative to the drive root.
        to: String,
    },

    /// Delete a file or directory (directories are removed recursively).
    Remove {
        /// Item path relative to the drive root.
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let adapter = GraphDriveAdapter::connect(DriveConfig {
        drive_id: cli.drive_id,
        tenant: cli.tenant,
        client_id: cli.client_id,
        client_secret: cli.client_secret,
    })
    .await
    .context("Failed to connect to the drive")?;

    match cli.command {
        Commands::List { path, recursive } => {
            let entries = adapter
                .list_contents(&path, recursive)
                .await
                .with_context(|| format!("Failed to list directory: {:?}", path))?;

            if entries.is_empty() {
                println!("No items found.");
            } else {
                println!("{:<6} {:>10} {:<30} {}", "TYPE", "SIZE", "MIME", "PATH");
                println!("{}", "-".repeat(80));
                for entry in entries {
                    println!("{}", entry);
                }
            }
        }

        Commands::Stat { path } => {
            let metadata = adapter
                .get_metadata(&path)
                .await
                .with_context(|| format!("Failed to stat: {}", path))?;

            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }

        Commands::Exists { path } => {
            let exists = adapter
                .exists(&path)
                .await
                .with_context(|| format!("Failed to check: {}", path))?;

            println!("{}", exists);
        }

        Commands::Upload { patterns, to } => {
            // Expand glob patterns
            let mut files_to_upload: Vec<PathBuf> = Vec::new();

            for pattern in &patterns {
                // Handle brace expansion manually for patterns like file_{1,2,3}.txt
                let expanded_patterns = expand_braces(pattern);

                for expanded_pattern in expanded_patterns {
                    let matches: Vec<PathBuf> = glob(&expanded_pattern)
                        .with_context(|| format!("Invalid glob pattern: {}", expanded_pattern))?
                        .filter_map(|r| r.ok())
                        .filter(|p| p.is_file())
                        .collect();

                    if matches.is_empty() {
                        // If no glob matches, treat as literal path
                        let path = PathBuf::from(&expanded_pattern);
                        if path.is_file() {
                            files_to_upload.push(path);
                        } else {
                            eprintln!("Warning: No files matched pattern: {}", expanded_pattern);
                        }
                    } else {
                        files_to_upload.extend(matches);
                    }
                }
            }

            // Remove duplicates
            files_to_upload.sort();
            files_to_upload.dedup();

            if files_to_upload.is_empty() {
                anyhow::bail!("No files to upload");
            }

            let dest_label = if to.is_empty() { "/" } else { to.as_str() };
            println!(
                "Uploading {} file(s) to {}...",
                files_to_upload.len(),
                dest_label
            );

            for (idx, file_path) in files_to_upload.iter().enumerate() {
                let filename = file_path.file_name().unwrap_or_default().to_string_lossy();
                print!(
                    "[{}/{}] Uploading {}... ",
                    idx + 1,
                    files_to_upload.len(),
                    filename
                );

                let remote_path = graph_drive::path::join(&to, &filename);
                let mime_type = mime_guess::from_path(file_path)
                    .first_or_octet_stream()
                    .to_string();

                let contents = tokio::fs::read(file_path)
                    .await
                    .with_context(|| format!("Failed to read local file: {:?}", file_path))?;

                match adapter.write(&remote_path, contents, Some(&mime_type)).await {
                    Ok(metadata) => {
                        println!("OK ({})", metadata.path);
                    }
                    Err(e) => {
                        println!("FAILED");
                        eprintln!("  Error: {}", e);
                    }
                }
            }

            println!("Done.");
        }

        Commands::Download { path, to } => {
            // Ensure destination directory exists
            if to.is_dir() || to.to_string_lossy().ends_with('/') {
                std::fs::create_dir_all(&to)
                    .with_context(|| format!("Failed to create directory: {:?}", to))?;
            } else if let Some(parent) = to.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create directory: {:?}", parent))?;
                }
            }

            let final_path = if to.is_dir() {
                let filename = path.rsplit('/').next().unwrap_or(&path);
                to.join(filename)
            } else {
                to
            };

            print!("Downloading {}... ", path);

            let stream = adapter
                .read_stream(&path)
                .await
                .with_context(|| format!("Failed to download: {}", path))?;

            let mut reader =
                StreamReader::new(Box::pin(stream.map(|chunk| chunk.map_err(std::io::Error::other))));
            let mut file = tokio::fs::File::create(&final_path)
                .await
                .with_context(|| format!("Failed to create file: {:?}", final_path))?;

            tokio::io::copy(&mut reader, &mut file)
                .await
                .with_context(|| format!("Failed to write file: {:?}", final_path))?;
            file.flush().await?;

            println!("OK");
            println!("Saved to: {:?}", final_path);
        }

        Commands::Mkdir { path } => {
            let metadata = adapter
                .create_directory(&path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path))?;

            // The service may have renamed on collision
            println!("Created: {}", metadata.path);
        }

        Commands::Move { from, to } => {
            let metadata = adapter
                .rename(&from, &to)
                .await
                .with_context(|| format!("Failed to move {} to {}", from, to))?;

            println!("Moved to: {}", metadata.path);
        }

        Commands::Copy { from, to } => {
            adapter
                .copy(&from, &to)
                .await
                .with_context(|| format!("Failed to copy {} to {}", from, to))?;

            println!("Copy accepted (completes server-side).");
        }

        Commands::Remove { path } => {
            adapter
                .delete(&path)
                .await
                .with_context(|| format!("Failed to delete: {}", path))?;

            println!("Deleted: {}", path);
        }
    }

    Ok(())
}

/// Expand brace patterns like file_{1,2,3}.txt into multiple patterns.
fn expand_braces(pattern: &str) -> Vec<String> {
    // Find brace expression
    if let Some(start) = pattern.find('{') {
        if let Some(end) = pattern[start..].find('}') {
            let end = start + end;
            let prefix = &pattern[..start];
            let suffix = &pattern[end + 1..];
            let alternatives = &pattern[start + 1..end];

            return alternatives
                .split(',')
                .flat_map(|alt| {
                    let expanded = format!("{}{}{}", prefix, alt.trim(), suffix);
                    expand_braces(&expanded)
                })
                .collect();
        }
    }

    vec![pattern.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_braces_simple() {
        let result = expand_braces("file_{1,2,3}.txt");
        assert_eq!(result, vec!["file_1.txt", "file_2.txt", "file_3.txt"]);
    }

    #[test]
    fn test_expand_braces_no_braces() {
        let result = expand_braces("file.txt");
        assert_eq!(result, vec!["file.txt"]);
    }

    #[test]
    fn test_expand_braces_glob_pattern() {
        let result = expand_braces("*.tar");
        assert_eq!(result, vec!["*.tar"]);
    }

    #[test]
    fn test_expand_braces_nested() {
        let result = expand_braces("{a,b}_{1,2}.txt");
        assert_eq!(result, vec!["a_1.txt", "a_2.txt", "b_1.txt", "b_2.txt"]);
    }
}
