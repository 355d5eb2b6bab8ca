//! Development tracing: one human-readable file per request.
//!
//! Enabled with `session.trace_dir`. Files are named
//! `<YYYYmmdd.HHMMSS>.<counter>.txt`, the timestamp being the session start.

use std::fmt::{self, Write as _};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Local;

use crate::error::ClientError;
use crate::http::{PortalRequest, PortalResponse, RequestBody};

const RULE: &str = "============================================================";
const BODY_EXCERPT_CHARS: usize = 2000;

#[derive(Debug)]
pub(crate) struct DevTracer {
    dir: PathBuf,
    prefix: String,
    counter: AtomicU32,
}

impl DevTracer {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            prefix: Local::now().format("%Y%m%d.%H%M%S").to_string(),
            counter: AtomicU32::new(0),
        }
    }

    /// Write the trace for one request. Failures are logged, never raised.
    pub fn record(
        &self,
        url: &str,
        request: &PortalRequest,
        outcome: &Result<PortalResponse, ClientError>,
        logins: u32,
    ) {
        let number = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let path = self.dir.join(format!("{}.{number}.txt", self.prefix));

        let Ok(text) = render(number, url, request, outcome, logins) else {
            return;
        };
        if let Err(e) = std::fs::create_dir_all(&self.dir).and_then(|()| std::fs::write(&path, text))
        {
            tracing::warn!(path = %path.display(), %e, "could not write request trace");
        }
    }
}

fn render(
    number: u32,
    url: &str,
    request: &PortalRequest,
    outcome: &Result<PortalResponse, ClientError>,
    logins: u32,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{RULE}")?;
    writeln!(out, "TRACE #{number} - {}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Logins so far: {logins}")?;

    writeln!(out, "\n{RULE}\nREQUEST\n{RULE}")?;
    writeln!(out, "Method: {}", request.method)?;
    writeln!(out, "URL: {url}")?;
    for (key, value) in &request.query {
        writeln!(out, "  query {key}: {value}")?;
    }
    for (name, value) in &request.headers {
        writeln!(out, "  header {name}: {value}")?;
    }
    match &request.body {
        RequestBody::Empty => {}
        RequestBody::Form(fields) => {
            writeln!(out, "Form:")?;
            for (name, value) in fields {
                writeln!(out, "  {name}: {}", redact(name, value))?;
            }
        }
        RequestBody::Raw { content_type, text } => {
            writeln!(out, "Body ({content_type}): {text}")?;
        }
        RequestBody::Json(value) => {
            let keys: Vec<&str> = value
                .as_object()
                .map(|map| map.keys().map(String::as_str).collect())
                .unwrap_or_default();
            writeln!(out, "JSON body keys: {}", keys.join(", "))?;
        }
    }

    match outcome {
        Ok(response) => {
            writeln!(out, "\n{RULE}\nRESPONSE\n{RULE}")?;
            writeln!(out, "Status: {}", response.status)?;
            writeln!(out, "Final URL: {}", response.url)?;
            writeln!(out, "Headers:")?;
            for (name, value) in &response.headers {
                writeln!(out, "  {name}: {}", value.to_str().unwrap_or("<binary>"))?;
            }
            let body: String = response.text().chars().take(BODY_EXCERPT_CHARS).collect();
            writeln!(out, "Body ({} bytes):\n{body}", response.body.len())?;
        }
        Err(error) => {
            writeln!(out, "\n{RULE}\nERROR\n{RULE}")?;
            writeln!(out, "{error}")?;
        }
    }

    writeln!(out, "\n{RULE}\nEND TRACE\n{RULE}")?;
    Ok(out)
}

const SECRET_FIELDS: [&str; 3] = ["password", "birthdate", "security_question_answer"];

fn redact<'a>(name: &str, value: &'a str) -> &'a str {
    if SECRET_FIELDS.iter().any(|secret| name.contains(secret)) {
        "********"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_numbered_files_with_redacted_passwords() {
        let dir = tempfile::tempdir().unwrap();
        let tracer = DevTracer::new(dir.path().join("traces"));
        let request = PortalRequest::post("/login").form([
            ("login_form[_username]", "bumba"),
            ("login_form[_password]", "hunter2"),
        ]);
        let outcome = Err(ClientError::Parse("boom".into()));

        tracer.record("https://site/login", &request, &outcome, 0);
        tracer.record("https://site/login", &request, &outcome, 0);

        let mut names: Vec<String> = std::fs::read_dir(dir.path().join("traces"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with(".1.txt"));
        assert!(names[1].ends_with(".2.txt"));

        let text = std::fs::read_to_string(dir.path().join("traces").join(&names[0])).unwrap();
        assert!(text.contains("login_form[_username]: bumba"));
        assert!(text.contains("login_form[_password]: ********"));
        assert!(!text.contains("hunter2"));
        assert!(text.contains("parse error: boom"));
    }

    #[test]
    fn birthday_answers_are_redacted() {
        let dir = tempfile::tempdir().unwrap();
        let tracer = DevTracer::new(dir.path().to_path_buf());
        let request = PortalRequest::post("/account-verification").form([
            ("account_verification_form[_token]", "csrf"),
            ("account_verification_form[_birthdate]", "2010-04-01"),
            ("account_verification_form[security_question_answer]", "2010-04-01"),
        ]);

        tracer.record("https://site/account-verification", &request, &Err(ClientError::Parse("x".into())), 0);

        let entry = std::fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
        let text = std::fs::read_to_string(entry.path()).unwrap();
        assert!(text.contains("account_verification_form[_token]: csrf"));
        assert!(text.contains("account_verification_form[_birthdate]: ********"));
        assert!(text.contains("account_verification_form[security_question_answer]: ********"));
        assert!(!text.contains("2010-04-01"));
    }
}
