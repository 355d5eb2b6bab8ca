//! Cookie persistence between runs.
//!
//! The session cookie store is saved as JSON, session cookies included, so a
//! later run can skip the login form while the portal still honours them.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use cookie_store::CookieStore;
use reqwest_cookie_store::CookieStoreMutex;

use crate::error::ClientError;

/// Load the cookie file, or start empty when it does not exist yet.
pub(crate) fn load(path: Option<&Path>) -> Result<CookieStore, ClientError> {
    let Some(path) = path else {
        return Ok(CookieStore::default());
    };
    match File::open(path) {
        Ok(file) => cookie_store::serde::json::load_all(BufReader::new(file))
            .map_err(|e| ClientError::CookieStore(format!("{}: {e}", path.display()))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(CookieStore::default()),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn save(store: &CookieStoreMutex, path: &Path) -> Result<(), ClientError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    {
        let store = store
            .lock()
            .map_err(|_| ClientError::CookieStore("cookie store lock poisoned".into()))?;
        cookie_store::serde::json::save_incl_expired_and_nonpersistent(&store, &mut writer)
            .map_err(|e| ClientError::CookieStore(format!("{}: {e}", path.display())))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = load(Some(&dir.path().join("cookies.json"))).unwrap();
        assert_eq!(store.iter_any().count(), 0);
        assert_eq!(load(None).unwrap().iter_any().count(), 0);
    }

    #[test]
    fn session_cookies_survive_a_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cookies.json");

        let mut store = CookieStore::default();
        let url = reqwest::Url::parse("https://school.smartschool.be/login").unwrap();
        store.parse("PHPSESSID=abc123; Path=/", &url).unwrap();
        save(&CookieStoreMutex::new(store), &path).unwrap();

        let loaded = load(Some(&path)).unwrap();
        let cookie = loaded
            .get("school.smartschool.be", "/", "PHPSESSID")
            .unwrap();
        assert_eq!(cookie.value(), "abc123");
    }

    #[test]
    fn garbage_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(load(Some(&path)), Err(ClientError::CookieStore(_))));
    }
}
