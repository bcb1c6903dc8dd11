//! Streaming downloads.

use std::path::Path;

use reqwest::blocking::Client;

use crate::error::{LosError, Result};

/// Result of fetching a resource that is allowed to be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched,
    /// The server answered with a non-success status.
    NotAvailable { status: u16 },
}

pub fn client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(concat!("los/", env!("CARGO_PKG_VERSION")))
        .timeout(None::<std::time::Duration>)
        .build()?)
}

/// Download `url` into `dest`.
///
/// The body is streamed into a tempfile beside `dest` and renamed into place
/// once complete, so a failed download never leaves a truncated file behind.
/// A non-2xx status is [`LosError::HttpStatus`].
pub fn download(client: &Client, url: &str, dest: &Path) -> Result<()> {
    let mut response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(LosError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let mut tmp = crate::io::temp_beside(dest)?;
    let bytes = response.copy_to(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    tracing::debug!(url, dest = %dest.display(), bytes, "downloaded");
    Ok(())
}

/// Turn an HTTP status failure into [`FetchOutcome::NotAvailable`].
/// Transport and filesystem errors stay fatal.
pub fn optional(result: Result<()>) -> Result<FetchOutcome> {
    match result {
        Ok(()) => Ok(FetchOutcome::Fetched),
        Err(LosError::HttpStatus { status, .. }) => Ok(FetchOutcome::NotAvailable { status }),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn download_writes_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/get-pip.py")
            .with_status(200)
            .with_body("print('pip')\n")
            .create();

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("get-pip.py");
        download(&client().unwrap(), &format!("{}/get-pip.py", server.url()), &dest).unwrap();

        mock.assert();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "print('pip')\n");
    }

    #[test]
    fn download_failure_keeps_previous_file() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/los.json").with_status(500).create();

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("los.json");
        std::fs::write(&dest, "{}").unwrap();

        let err = download(&client().unwrap(), &format!("{}/los.json", server.url()), &dest)
            .unwrap_err();
        assert!(matches!(err, LosError::HttpStatus { status: 500, .. }));
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "{}");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn optional_maps_status_to_not_available() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/los.json").with_status(404).create();

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("los.json");
        let outcome = optional(download(
            &client().unwrap(),
            &format!("{}/los.json", server.url()),
            &dest,
        ))
        .unwrap();
        assert_eq!(outcome, FetchOutcome::NotAvailable { status: 404 });
        assert!(!dest.exists());
    }

    #[test]
    fn optional_keeps_other_errors_fatal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(optional(Err(io.into())).is_err());
    }
}
