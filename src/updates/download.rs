//! Release asset download
//!
//! Streams an asset to disk chunk by chunk, reporting progress as it goes.
//! The file is written to a `.part` path and renamed once complete.

use super::http_client;
use crate::error::{DashError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Progress notifications from a running download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    /// Response received; `None` when the server sent no length
    Started { content_length: Option<u64> },
    Progress { chunk_len: usize },
    Finished { path: PathBuf },
    Failed(String),
}

/// Download `url` into `dest` in the background
pub fn spawn_download(url: String, dest: PathBuf, tx: mpsc::Sender<DownloadEvent>) {
    tokio::spawn(async move {
        let final_event = match download(&url, &dest, &tx).await {
            Ok(()) => {
                info!("Downloaded {} to {:?}", url, dest);
                DownloadEvent::Finished { path: dest }
            }
            Err(e) => {
                warn!("Download of {} failed: {}", url, e);
                DownloadEvent::Failed(e.to_string())
            }
        };
        let _ = tx.send(final_event).await;
    });
}

async fn download(url: &str, dest: &Path, tx: &mpsc::Sender<DownloadEvent>) -> Result<()> {
    let client = http_client(None)?;
    let mut response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| DashError::http(url, e))?;

    let content_length = response.content_length();
    info!("Started downloading {:?} bytes from {}", content_length, url);
    send(tx, DownloadEvent::Started { content_length }).await?;

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DashError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let part = dest.with_extension("part");
    let result = match write_part(url, &mut response, &part, tx).await {
        Ok(()) => std::fs::rename(&part, dest).map_err(|e| DashError::Io {
            path: dest.to_path_buf(),
            source: e,
        }),
        Err(e) => Err(e),
    };
    if result.is_err() {
        discard_part(&part);
    }
    result
}

/// Stream the response body into `part`
async fn write_part(
    url: &str,
    response: &mut reqwest::Response,
    part: &Path,
    tx: &mpsc::Sender<DownloadEvent>,
) -> Result<()> {
    let io_err = |e| DashError::Io {
        path: part.to_path_buf(),
        source: e,
    };
    let mut file = std::fs::File::create(part).map_err(io_err)?;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| DashError::http(url, e))?
    {
        file.write_all(&chunk).map_err(io_err)?;
        send(tx, DownloadEvent::Progress {
            chunk_len: chunk.len(),
        })
        .await?;
    }
    file.flush().map_err(io_err)
}

fn discard_part(part: &Path) {
    match std::fs::remove_file(part) {
        Ok(()) => debug!("Removed partial download {:?}", part),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove partial download {:?}: {}", part, e),
    }
}

async fn send(tx: &mpsc::Sender<DownloadEvent>, event: DownloadEvent) -> Result<()> {
    tx.send(event)
        .await
        .map_err(|_| DashError::ChannelClosed { what: "download" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::time::Duration;

    /// Answer one HTTP request with `response`, then close the connection
    fn serve_once(response: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 512];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(response);
        });
        format!("http://{}/pulse-dash", addr)
    }

    async fn collect(url: String, dest: PathBuf) -> Vec<DownloadEvent> {
        let (tx, mut rx) = mpsc::channel(64);
        spawn_download(url, dest, tx);
        let mut events = Vec::new();
        while let Some(event) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
        {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pulse-dash");
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 11\r\nConnection: close\r\n\r\nhello world",
        );

        let events = collect(url, dest.clone()).await;
        assert_eq!(
            events.first(),
            Some(&DownloadEvent::Started {
                content_length: Some(11)
            })
        );
        assert_eq!(
            events.last(),
            Some(&DownloadEvent::Finished { path: dest.clone() })
        );
        let received: usize = events
            .iter()
            .map(|e| match e {
                DownloadEvent::Progress { chunk_len } => *chunk_len,
                _ => 0,
            })
            .sum();
        assert_eq!(received, 11);
        assert_eq!(std::fs::read(&dest).unwrap(), b"hello world");
        assert!(!dest.with_extension("part").exists());
    }

    #[tokio::test]
    async fn test_truncated_download_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pulse-dash");
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\nConnection: close\r\n\r\n0123456789",
        );

        let events = collect(url, dest.clone()).await;
        assert!(matches!(events.last(), Some(DownloadEvent::Failed(_))));
        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_http_error_status_fails() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pulse-dash");
        let url = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );

        let events = collect(url, dest.clone()).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], DownloadEvent::Failed(_)));
        assert!(!dest.exists());
    }
}
