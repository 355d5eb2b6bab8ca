//! Message boxes via the XML dispatcher, plus the archive XHR endpoint.

use serde::Deserialize;
use serde_json::Value;
use smartschool_core::entities::{
    Attachment, FullMessage, MessageChanged, MessageDeletionStatus, ShortMessage,
};
use smartschool_core::enums::{BoxType, MessageLabel, SortField, SortOrder};

use crate::Smartschool;
use crate::error::ClientError;
use crate::http::PortalRequest;
use crate::xml::XmlCommand;

const MODULE: &str = "Messages";
const SUBSYSTEM: &str = "postboxes";

/// Which headers to list and in what order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageQuery {
    pub box_type: BoxType,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    /// Ids the caller already has. When set, the portal only reports what
    /// changed (polling).
    pub already_seen: Vec<i64>,
}

pub(crate) fn headers_command(query: &MessageQuery) -> XmlCommand {
    let poll_ids = query
        .already_seen
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    XmlCommand::new(MODULE, SUBSYSTEM, "message list", "messages/message")
        .param("boxType", query.box_type)
        .param("boxID", "0")
        .param("sortField", query.sort_by.as_str())
        .param("sortKey", query.sort_order.as_str())
        .param("poll", !query.already_seen.is_empty())
        .param("poll_ids", poll_ids)
        .param("layout", "new")
}

fn single_message_command(
    action: &'static str,
    path: &'static str,
    msg_id: i64,
    box_type: BoxType,
) -> XmlCommand {
    XmlCommand::new(MODULE, SUBSYSTEM, action, path)
        .param("msgID", msg_id)
        .param("boxType", box_type)
        .param("limitList", "true")
        .cached(format!("{msg_id}/{box_type}"))
}

/// `receivers` and friends arrive as `{"to": x}` (or null); flatten them to a
/// list of names.
fn flatten_receivers(entry: &mut Value) {
    let Some(object) = entry.as_object_mut() else {
        return;
    };
    for key in ["receivers", "ccreceivers", "bccreceivers"] {
        let names = match object.get_mut(key).map(Value::take) {
            Some(Value::Object(mut inner)) => match inner.remove("to") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(single) => vec![single],
            },
            _ => Vec::new(),
        };
        let names = names.into_iter().filter(|n| !n.is_null()).collect();
        object.insert(key.to_string(), Value::Array(names));
    }
}

fn first<T>(mut entries: Vec<T>, what: &str) -> Result<T, ClientError> {
    if entries.is_empty() {
        return Err(ClientError::Parse(format!("dispatcher returned no {what}")));
    }
    Ok(entries.swap_remove(0))
}

#[derive(Deserialize)]
struct ArchiveOutcome {
    #[serde(default)]
    success: Vec<Value>,
}

/// Whether `id` is among the archived ids, which come as numbers or text.
fn archived(success: &[Value], id: i64) -> bool {
    success.iter().any(|v| match v {
        Value::Number(n) => n.as_i64() == Some(id),
        Value::String(s) => s.trim().parse::<i64>().ok() == Some(id),
        _ => false,
    })
}

impl Smartschool {
    /// Message headers of one box.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or an entry cannot be
    /// parsed.
    pub async fn message_headers(
        &self,
        query: &MessageQuery,
    ) -> Result<Vec<ShortMessage>, ClientError> {
        self.dispatch_as(&headers_command(query), |_| {}).await
    }

    /// One complete message. Cached per message and box.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or an entry cannot be
    /// parsed.
    pub async fn message(
        &self,
        msg_id: i64,
        box_type: BoxType,
    ) -> Result<Option<FullMessage>, ClientError> {
        let command = single_message_command("show message", "data/message", msg_id, box_type);
        let messages: Vec<FullMessage> = self.dispatch_as(&command, flatten_receivers).await?;
        Ok(messages.into_iter().next())
    }

    /// Attachments of one message. Cached per message and box.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or an entry cannot be
    /// parsed.
    pub async fn attachments(
        &self,
        msg_id: i64,
        box_type: BoxType,
    ) -> Result<Vec<Attachment>, ClientError> {
        let command =
            single_message_command("attachment list", "attachmentlist/attachment", msg_id, box_type);
        self.dispatch_as(&command, |_| {}).await
    }

    /// Contents of one attachment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the download fails.
    pub async fn download_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>, ClientError> {
        tracing::debug!(file = %attachment.name, "downloading attachment");
        self.send(
            PortalRequest::get("/")
                .query("module", "Messages")
                .query("file", "download")
                .query("fileID", attachment.file_id.to_string())
                .query("target", "0"),
        )
        .await
        .map(|response| response.body)
    }

    /// Flag a message as unread again.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the portal does not
    /// confirm the change.
    pub async fn mark_message_unread(
        &self,
        msg_id: i64,
        box_type: BoxType,
    ) -> Result<MessageChanged, ClientError> {
        let command = XmlCommand::new(MODULE, SUBSYSTEM, "mark message unread", "data/message")
            .param("boxType", box_type)
            .param("boxID", "0")
            .param("msgID", msg_id)
            .param("clAction", "status");
        first(self.dispatch_as(&command, |_| {}).await?, "status change")
    }

    /// Set the coloured flag of a message.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the portal does not
    /// confirm the change.
    pub async fn adjust_message_label(
        &self,
        msg_id: i64,
        box_type: BoxType,
        label: MessageLabel,
    ) -> Result<MessageChanged, ClientError> {
        let command = XmlCommand::new(MODULE, SUBSYSTEM, "save msglabel", "data/message")
            .param("boxType", box_type)
            .param("msgLabel", label.code())
            .param("msgID", msg_id)
            .param("clAction", "label");
        first(self.dispatch_as(&command, |_| {}).await?, "label change")
    }

    /// Move messages to the archive. `new` is 1 for every id the portal
    /// archived, 0 otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the answer cannot be
    /// parsed.
    pub async fn archive_messages(&self, msg_ids: &[i64]) -> Result<Vec<MessageChanged>, ClientError> {
        if msg_ids.is_empty() {
            return Ok(Vec::new());
        }
        let body = msg_ids
            .iter()
            .map(|id| format!("msgIDs%5B%5D={}", urlencoding::encode(&id.to_string())))
            .collect::<Vec<_>>()
            .join("&");

        let outcome: ArchiveOutcome = self
            .json(
                PortalRequest::post("/Messages/Xhr/archivemessages")
                    .raw_body("application/x-www-form-urlencoded", body)
                    .xhr(),
            )
            .await?;

        Ok(msg_ids
            .iter()
            .map(|&id| MessageChanged {
                id,
                new: i64::from(archived(&outcome.success, id)),
            })
            .collect())
    }

    /// Move one message to the trash.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the portal does not
    /// confirm the deletion.
    pub async fn trash_message(&self, msg_id: i64) -> Result<MessageDeletionStatus, ClientError> {
        let command = XmlCommand::new(MODULE, SUBSYSTEM, "quick delete", "data/details")
            .param("msgID", msg_id);
        first(self.dispatch_as(&command, |_| {}).await?, "deletion status")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn headers_command_params() {
        let envelope = headers_command(&MessageQuery {
            already_seen: vec![1, 2],
            ..Default::default()
        })
        .envelope();
        for expected in [
            r#"<param name="boxType"><![CDATA[inbox]]></param>"#,
            r#"<param name="sortField"><![CDATA[date]]></param>"#,
            r#"<param name="sortKey"><![CDATA[desc]]></param>"#,
            r#"<param name="poll"><![CDATA[true]]></param>"#,
            r#"<param name="poll_ids"><![CDATA[1,2]]></param>"#,
            r#"<param name="layout"><![CDATA[new]]></param>"#,
        ] {
            assert!(envelope.contains(expected), "missing {expected} in {envelope}");
        }
    }

    #[test]
    fn fresh_listing_does_not_poll() {
        let envelope = headers_command(&MessageQuery::default()).envelope();
        assert!(envelope.contains(r#"<param name="poll"><![CDATA[false]]></param>"#));
        assert!(envelope.contains(r#"<param name="poll_ids"><![CDATA[]]></param>"#));
    }

    #[test]
    fn single_message_is_cached_per_box() {
        let inbox = single_message_command("show message", "data/message", 5, BoxType::Inbox);
        let sent = single_message_command("show message", "data/message", 5, BoxType::Sent);
        assert_ne!(inbox.cache_key(), sent.cache_key());
        assert_eq!(inbox.cache_key(), Some("postboxes/show message/5/inbox"));
    }

    #[test]
    fn receivers_are_flattened() {
        let mut entry = json!({
            "receivers": {"to": "Bumba Delu"},
            "ccreceivers": {"to": ["A", "B"]},
            "bccreceivers": null
        });
        flatten_receivers(&mut entry);
        assert_eq!(
            entry,
            json!({
                "receivers": ["Bumba Delu"],
                "ccreceivers": ["A", "B"],
                "bccreceivers": []
            })
        );
    }

    #[test]
    fn archived_ids_match_numbers_and_text() {
        let success = vec![json!(1), json!("3")];
        assert!(archived(&success, 1));
        assert!(!archived(&success, 2));
        assert!(archived(&success, 3));
    }
}
