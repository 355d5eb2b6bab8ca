//! The portal's XML dispatcher protocol.
//!
//! Commands are posted as one `command` form field to
//! `/?module=<Module>&file=dispatcher`. Answers are XML; the interesting
//! entries are picked by a slash-separated element path and turned into JSON
//! values so the typed records can deserialize them.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::Smartschool;
use crate::error::ClientError;
use crate::http::PortalRequest;

/// One dispatcher command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct XmlCommand {
    module: &'static str,
    subsystem: &'static str,
    action: &'static str,
    params: Vec<(&'static str, String)>,
    path: &'static str,
    cache_key: Option<String>,
}

impl XmlCommand {
    pub fn new(
        module: &'static str,
        subsystem: &'static str,
        action: &'static str,
        path: &'static str,
    ) -> Self {
        Self {
            module,
            subsystem,
            action,
            params: Vec::new(),
            path,
            cache_key: None,
        }
    }

    #[must_use]
    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    /// Serve repeated calls with the same key from the session cache.
    #[must_use]
    pub fn cached(mut self, key: impl AsRef<str>) -> Self {
        self.cache_key = Some(format!("{}/{}/{}", self.subsystem, self.action, key.as_ref()));
        self
    }

    pub fn cache_key(&self) -> Option<&str> {
        self.cache_key.as_deref()
    }

    pub fn dispatcher_path(&self) -> String {
        format!("/?module={}&file=dispatcher", self.module)
    }

    pub fn envelope(&self) -> String {
        let mut xml = String::from("<request><command>");
        xml.push_str(&format!("<subsystem>{}</subsystem>", self.subsystem));
        xml.push_str(&format!("<action>{}</action>", self.action));
        xml.push_str("<params>");
        for (name, value) in &self.params {
            xml.push_str(&format!(
                r#"<param name="{}"><![CDATA[{}]]></param>"#,
                escape_attr(name),
                value.replace("]]>", "]]]]><![CDATA[>")
            ));
        }
        xml.push_str("</params></command></request>");
        xml
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Every element matching `path` (`messages/message`: a `message` whose
/// parent is `messages`), anywhere below the document root, as JSON.
pub(crate) fn select_entries(xml: &str, path: &str) -> Result<Vec<Value>, ClientError> {
    let document = roxmltree::Document::parse(xml.trim())
        .map_err(|e| ClientError::Parse(format!("dispatcher answered with invalid XML: {e}")))?;
    let root = document.root_element();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    Ok(root
        .descendants()
        .filter(|node| node.is_element() && *node != root && matches_path(*node, &segments))
        .map(element_to_value)
        .collect())
}

fn matches_path(node: roxmltree::Node<'_, '_>, segments: &[&str]) -> bool {
    let mut current = Some(node);
    for segment in segments.iter().rev() {
        match current {
            Some(n) if n.tag_name().name() == *segment => current = n.parent_element(),
            _ => return false,
        }
    }
    true
}

/// Children of `element` as an object. Leaves become their text (null when
/// empty); a tag seen more than once becomes an array.
pub(crate) fn element_to_value(element: roxmltree::Node<'_, '_>) -> Value {
    let mut map = Map::new();
    for child in element.children().filter(roxmltree::Node::is_element) {
        let value = if child.children().any(|c| c.is_element()) {
            element_to_value(child)
        } else {
            let text: String = child.children().filter_map(|c| c.text()).collect();
            if text.is_empty() { Value::Null } else { Value::String(text) }
        };

        let tag = child.tag_name().name().to_string();
        match map.get_mut(&tag) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(tag, value);
            }
        }
    }
    Value::Object(map)
}

/// Parsed dispatcher entries, kept for the lifetime of a session.
#[derive(Debug, Default)]
pub(crate) struct XmlCache {
    entries: Mutex<HashMap<String, Vec<Value>>>,
}

impl XmlCache {
    fn get(&self, key: &str) -> Option<Vec<Value>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn insert(&self, key: String, entries: Vec<Value>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entries);
    }
}

impl Smartschool {
    /// Run a dispatcher command and return the selected entries.
    pub(crate) async fn dispatch(&self, command: &XmlCommand) -> Result<Vec<Value>, ClientError> {
        if let Some(key) = &command.cache_key {
            if let Some(hit) = self.xml_cache.get(key) {
                tracing::debug!(key, "dispatcher cache hit");
                return Ok(hit);
            }
        }

        let request = PortalRequest::post(command.dispatcher_path())
            .form([("command", command.envelope())])
            .xhr();
        let response = self.send(request).await?;
        let entries = select_entries(&response.text(), command.path)?;

        if let Some(key) = &command.cache_key {
            self.xml_cache.insert(key.clone(), entries.clone());
        }
        Ok(entries)
    }

    /// Run a command, reshape each entry, then deserialize it.
    pub(crate) async fn dispatch_as<T, F>(
        &self,
        command: &XmlCommand,
        reshape: F,
    ) -> Result<Vec<T>, ClientError>
    where
        T: DeserializeOwned,
        F: Fn(&mut Value),
    {
        self.dispatch(command)
            .await?
            .into_iter()
            .map(|mut entry| {
                reshape(&mut entry);
                serde_json::from_value(entry).map_err(ClientError::from)
            })
            .collect()
    }
}
