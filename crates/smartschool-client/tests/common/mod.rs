//! A scripted Smartschool portal on `127.0.0.1`, served by `tiny_http` from a
//! background thread.
//!
//! It knows the sign-in pages (login form with CSRF token, birthday
//! verification, two-factor API), keeps sessions in a `PHPSESSID` cookie and
//! answers everything else from fixtures registered by the test.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use smartschool_client::{SessionConfig, Smartschool, SmartschoolConfig};

pub const USERNAME: &str = "bumba";
pub const PASSWORD: &str = "delu";
pub const BIRTHDAY: &str = "2010-04-01";
pub const TWO_FACTOR_CODE: &str = "123456";
const CSRF_TOKEN: &str = "csrf-4f2a";
const SESSION_COOKIE: &str = "PHPSESSID";

const LOGIN_PAGE: &str = r#"<html><body>
<form name="login_form" method="post" action="/login">
    <input type="hidden" name="login_form[_token]" value="csrf-4f2a">
    <input type="text" name="login_form[_username]" value="">
    <input type="password" name="login_form[_password]" value="">
</form>
</body></html>"#;

const VERIFICATION_PAGE: &str = r#"<html><body>
<form name="account_verification_form" method="post">
    <input type="hidden" name="account_verification_form[_token]" value="csrf-4f2a">
    <input type="text" name="account_verification_form[_birthdate]" value="">
</form>
</body></html>"#;

const MAIN_PAGE: &str = r#"<html><head><script>
window.SMSC = {"platform": 49, "authenticatedUser": {"id": "49_1234_0", "platformId": 49,
    "name": {"startingWithFirstName": "Bumba Delu", "startingWithLastName": "Delu Bumba"},
    "username": "bumba"}, "modules": []};
</script></head><body>Start</body></html>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Anonymous,
    Verification,
    TwoFactor,
    Authenticated,
}

/// A canned answer.
#[derive(Debug, Clone)]
pub enum Fixture {
    Json(String),
    Html(String),
    Xml(String),
    Bytes(Vec<u8>),
    /// JSON answers picked by the `pageNumber` query parameter (1-based).
    /// Pages past the end are empty lists.
    Pages(Vec<String>),
    Status(u16),
}

#[derive(Debug, Default)]
struct PortalState {
    sessions: HashMap<String, Stage>,
    next_session: u32,
    require_verification: bool,
    require_two_factor: bool,
    routes: HashMap<String, Fixture>,
    dispatcher: HashMap<String, String>,
    requests: Vec<String>,
    bodies: Vec<String>,
    login_posts: usize,
}

/// What the portal answers for one request.
struct Reply {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    location: Option<String>,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
            location: None,
        }
    }

    fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            content_type: "text/html",
            body: Vec::new(),
            location: Some(location.to_string()),
        }
    }

    fn fixture(fixture: &Fixture, query: &HashMap<String, String>) -> Self {
        match fixture {
            Fixture::Json(body) => Self::new(200, "application/json", body.as_bytes()),
            Fixture::Html(body) => Self::new(200, "text/html; charset=utf-8", body.as_bytes()),
            Fixture::Xml(body) => Self::new(200, "text/xml", body.as_bytes()),
            Fixture::Bytes(body) => Self::new(200, "application/octet-stream", body.clone()),
            Fixture::Pages(pages) => {
                let page = query
                    .get("pageNumber")
                    .and_then(|n| n.parse::<usize>().ok())
                    .unwrap_or(1);
                let body = pages
                    .get(page.saturating_sub(1))
                    .map_or("[]", String::as_str);
                Self::new(200, "application/json", body.as_bytes())
            }
            Fixture::Status(status) => Self::new(*status, "text/plain", "error"),
        }
    }
}

pub struct MockPortal {
    url: String,
    server: Arc<tiny_http::Server>,
    state: Arc<Mutex<PortalState>>,
    handle: Option<JoinHandle<()>>,
}

impl MockPortal {
    pub fn start() -> Self {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").unwrap());
        let port = server.server_addr().to_ip().unwrap().port();
        let state = Arc::new(Mutex::new(PortalState::default()));

        let handle = {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            std::thread::spawn(move || {
                for request in server.incoming_requests() {
                    serve(request, &state);
                }
            })
        };

        Self {
            url: format!("http://127.0.0.1:{port}"),
            server,
            state,
            handle: Some(handle),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn config(&self) -> SmartschoolConfig {
        self.config_with(SessionConfig::default())
    }

    pub fn config_with(&self, session: SessionConfig) -> SmartschoolConfig {
        SmartschoolConfig {
            username: USERNAME.into(),
            password: PASSWORD.into(),
            main_url: self.url.clone(),
            birthday: BIRTHDAY.into(),
            session,
        }
    }

    /// A signed-in session.
    pub async fn session(&self) -> Smartschool {
        Smartschool::connect(&self.config()).await.unwrap()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, PortalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer `METHOD path` with `fixture`. A path with a query only matches
    /// that exact query; a bare path matches any.
    pub fn route(&self, method: &str, path: &str, fixture: Fixture) {
        self.state()
            .routes
            .insert(format!("{method} {path}"), fixture);
    }

    /// Answer dispatcher commands with `action` with `xml`.
    pub fn dispatcher(&self, action: &str, xml: &str) {
        self.state()
            .dispatcher
            .insert(action.to_string(), xml.to_string());
    }

    pub fn require_verification(&self) {
        self.state().require_verification = true;
    }

    pub fn require_two_factor(&self) {
        self.state().require_two_factor = true;
    }

    /// Forget every signed-in session, as the portal does when it times out.
    pub fn expire_sessions(&self) {
        for stage in self.state().sessions.values_mut() {
            *stage = Stage::Anonymous;
        }
    }

    pub fn login_posts(&self) -> usize {
        self.state().login_posts
    }

    /// `METHOD path?query` of every request so far.
    pub fn requests(&self) -> Vec<String> {
        self.state().requests.clone()
    }

    /// Requests exactly matching `METHOD path?query`.
    pub fn hits(&self, request: &str) -> usize {
        self.state().requests.iter().filter(|r| *r == request).count()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }

    /// Decoded request bodies, in order.
    pub fn bodies(&self) -> Vec<String> {
        self.state().bodies.clone()
    }
}

impl Drop for MockPortal {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn decode(value: &str) -> String {
    urlencoding::decode(&value.replace('+', " "))
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

fn parse_pairs(text: &str) -> HashMap<String, String> {
    text.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn session_cookie(request: &tiny_http::Request) -> Option<String> {
    request
        .headers()
        .iter()
        .filter(|h| h.field.equiv("Cookie"))
        .flat_map(|h| h.value.as_str().split(';'))
        .find_map(|c| {
            let (name, value) = c.trim().split_once('=')?;
            (name == SESSION_COOKIE).then(|| value.to_string())
        })
}

/// Text between `<tag>` and `</tag>`.
fn xml_tag<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&format!("</{tag}>"))? + start;
    Some(&xml[start..end])
}

fn serve(mut request: tiny_http::Request, state: &Mutex<PortalState>) {
    let method = request.method().to_string().to_uppercase();
    let raw_url = request.url().to_string();
    let query = parse_pairs(raw_url.split_once('?').map_or("", |(_, query)| query));

    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);

    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    state.requests.push(format!("{method} {raw_url}"));
    state.bodies.push(decode(&body));

    let (session, new_cookie) = match session_cookie(&request) {
        Some(id) if state.sessions.contains_key(&id) => (id, false),
        _ => {
            state.next_session += 1;
            let id = format!("s{}", state.next_session);
            state.sessions.insert(id.clone(), Stage::Anonymous);
            (id, true)
        }
    };

    let reply = route(&mut state, &session, &method, &raw_url, &query, &body);
    drop(state);

    let mut response = tiny_http::Response::from_data(reply.body)
        .with_status_code(reply.status)
        .with_header(
            tiny_http::Header::from_bytes("Content-Type", reply.content_type).unwrap(),
        );
    if let Some(location) = reply.location {
        response = response
            .with_header(tiny_http::Header::from_bytes("Location", location.as_bytes()).unwrap());
    }
    if new_cookie {
        response = response.with_header(
            tiny_http::Header::from_bytes(
                "Set-Cookie",
                format!("{SESSION_COOKIE}={session}; Path=/; HttpOnly").as_bytes(),
            )
            .unwrap(),
        );
    }
    let _ = request.respond(response);
}

fn after_password(state: &PortalState) -> (Stage, &'static str) {
    if state.require_verification {
        (Stage::Verification, "/account-verification")
    } else if state.require_two_factor {
        (Stage::TwoFactor, "/2fa")
    } else {
        (Stage::Authenticated, "/")
    }
}

fn route(
    state: &mut PortalState,
    session: &str,
    method: &str,
    raw_url: &str,
    query: &HashMap<String, String>,
    body: &str,
) -> Reply {
    let path = raw_url.split_once('?').map_or(raw_url, |(path, _)| path);
    let stage = state.sessions[session];

    match (method, path, stage) {
        ("GET", "/login", Stage::Authenticated) => Reply::redirect("/"),
        ("GET", "/login", _) => Reply::new(200, "text/html", LOGIN_PAGE),
        ("POST", "/login", _) => {
            state.login_posts += 1;
            let form = parse_pairs(body);
            let accepted = form.get("login_form[_token]").map(String::as_str) == Some(CSRF_TOKEN)
                && form.get("login_form[_username]").map(String::as_str) == Some(USERNAME)
                && form.get("login_form[_password]").map(String::as_str) == Some(PASSWORD);
            if !accepted {
                return Reply::redirect("/login");
            }
            let (next, location) = after_password(state);
            state.sessions.insert(session.to_string(), next);
            Reply::redirect(location)
        }

        ("GET", "/account-verification", Stage::Verification) => {
            Reply::new(200, "text/html", VERIFICATION_PAGE)
        }
        ("POST", "/account-verification", Stage::Verification) => {
            let form = parse_pairs(body);
            if form.get("account_verification_form[_birthdate]").map(String::as_str)
                != Some(BIRTHDAY)
            {
                return Reply::redirect("/account-verification");
            }
            let next = if state.require_two_factor {
                Stage::TwoFactor
            } else {
                Stage::Authenticated
            };
            state.sessions.insert(session.to_string(), next);
            Reply::redirect(if next == Stage::TwoFactor { "/2fa" } else { "/" })
        }

        ("GET", "/2fa", Stage::TwoFactor) => {
            Reply::new(200, "text/html", "<html><body>2fa</body></html>")
        }
        ("GET", "/2fa/api/v1/config", Stage::TwoFactor) => Reply::new(
            200,
            "application/json",
            r#"{"possibleAuthenticationMechanisms": ["googleAuthenticator"]}"#,
        ),
        ("POST", "/2fa/api/v1/google-authenticator", Stage::TwoFactor) => {
            let answer: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
            if answer["google2fa"] == TWO_FACTOR_CODE {
                state
                    .sessions
                    .insert(session.to_string(), Stage::Authenticated);
                Reply::new(200, "application/json", "{}")
            } else {
                Reply::new(403, "application/json", r#"{"error": "invalid code"}"#)
            }
        }

        (_, _, Stage::Authenticated) => authenticated(state, method, raw_url, query, body),
        _ => Reply::redirect("/login"),
    }
}

fn authenticated(
    state: &PortalState,
    method: &str,
    raw_url: &str,
    query: &HashMap<String, String>,
    body: &str,
) -> Reply {
    let path = raw_url.split_once('?').map_or(raw_url, |(path, _)| path);
    if path == "/" && query.get("file").map(String::as_str) == Some("dispatcher") {
        let form = parse_pairs(body);
        let command = form.get("command").map_or("", String::as_str);
        let action = xml_tag(command, "action").unwrap_or_default();
        return state.dispatcher.get(action).map_or_else(
            || Reply::new(500, "text/plain", format!("no dispatcher fixture for {action}")),
            |xml| Reply::new(200, "text/xml", xml.as_bytes()),
        );
    }

    let fixture = state
        .routes
        .get(&format!("{method} {raw_url}"))
        .or_else(|| state.routes.get(&format!("{method} {path}")));
    if let Some(fixture) = fixture {
        return Reply::fixture(fixture, query);
    }
    if method == "GET" && path == "/" {
        return Reply::new(200, "text/html", MAIN_PAGE);
    }
    Reply::new(404, "text/plain", format!("no fixture for {method} {path}"))
}
