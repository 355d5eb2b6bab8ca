//! Message box records served by the XML dispatcher.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::enums::MessageLabel;

/// A message header as shown in a box listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortMessage {
    #[serde(deserialize_with = "crate::de::lenient_i64")]
    pub id: i64,
    #[serde(rename = "from", default, deserialize_with = "crate::de::lenient_string")]
    pub sender: String,
    #[serde(rename = "fromImage", default, deserialize_with = "crate::de::lenient_string")]
    pub from_image: String,
    #[serde(default, deserialize_with = "crate::de::verbatim_string")]
    pub subject: String,
    #[serde(deserialize_with = "crate::de::datetime")]
    pub date: DateTime<FixedOffset>,
    #[serde(default, deserialize_with = "crate::de::lenient_i64")]
    pub status: i64,
    #[serde(default, deserialize_with = "crate::de::lenient_i64")]
    pub attachment: i64,
    #[serde(default, deserialize_with = "crate::de::lenient_bool")]
    pub unread: bool,
    #[serde(default, deserialize_with = "crate::de::message_label")]
    pub label: MessageLabel,
    #[serde(default, deserialize_with = "crate::de::lenient_bool")]
    pub deleted: bool,
    #[serde(rename = "allowreply", default, deserialize_with = "crate::de::lenient_bool")]
    pub allow_reply: bool,
    #[serde(rename = "allowreplyenabled", default, deserialize_with = "crate::de::lenient_bool")]
    pub allow_reply_enabled: bool,
    #[serde(rename = "hasreply", default, deserialize_with = "crate::de::lenient_bool")]
    pub has_reply: bool,
    #[serde(rename = "hasForward", default, deserialize_with = "crate::de::lenient_bool")]
    pub has_forward: bool,
    #[serde(rename = "realBox", default, deserialize_with = "crate::de::lenient_string")]
    pub real_box: String,
    #[serde(rename = "sendDate", default, deserialize_with = "crate::de::opt_datetime")]
    pub send_date: Option<DateTime<FixedOffset>>,
}

/// A complete message, body included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullMessage {
    #[serde(deserialize_with = "crate::de::lenient_i64")]
    pub id: i64,
    #[serde(rename = "from", default, deserialize_with = "crate::de::lenient_string")]
    pub sender: String,
    #[serde(default, deserialize_with = "crate::de::lenient_opt_string")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "crate::de::verbatim_string")]
    pub subject: String,
    #[serde(deserialize_with = "crate::de::datetime")]
    pub date: DateTime<FixedOffset>,
    #[serde(default, deserialize_with = "crate::de::verbatim_string")]
    pub body: String,
    #[serde(default, deserialize_with = "crate::de::lenient_i64")]
    pub status: i64,
    #[serde(default, deserialize_with = "crate::de::lenient_i64")]
    pub attachment: i64,
    #[serde(default, deserialize_with = "crate::de::lenient_bool")]
    pub unread: bool,
    #[serde(default, deserialize_with = "crate::de::message_label")]
    pub label: MessageLabel,
    #[serde(default)]
    pub receivers: Vec<String>,
    #[serde(rename = "ccreceivers", default)]
    pub cc_receivers: Vec<String>,
    #[serde(rename = "bccreceivers", default)]
    pub bcc_receivers: Vec<String>,
    #[serde(rename = "senderPicture", default, deserialize_with = "crate::de::lenient_string")]
    pub sender_picture: String,
    #[serde(rename = "fromTeam", default, deserialize_with = "crate::de::lenient_i64")]
    pub from_team: i64,
    #[serde(rename = "totalNrOtherToReciviers", default, deserialize_with = "crate::de::lenient_i64")]
    pub total_other_to_receivers: i64,
    #[serde(rename = "totalnrOtherCcReceivers", default, deserialize_with = "crate::de::lenient_i64")]
    pub total_other_cc_receivers: i64,
    #[serde(rename = "totalnrOtherBccReceivers", default, deserialize_with = "crate::de::lenient_i64")]
    pub total_other_bcc_receivers: i64,
    #[serde(rename = "canReply", default, deserialize_with = "crate::de::lenient_bool")]
    pub can_reply: bool,
    #[serde(rename = "hasReply", default, deserialize_with = "crate::de::lenient_bool")]
    pub has_reply: bool,
    #[serde(rename = "hasForward", default, deserialize_with = "crate::de::lenient_bool")]
    pub has_forward: bool,
    #[serde(rename = "sendDate", default, deserialize_with = "crate::de::opt_datetime")]
    pub send_date: Option<DateTime<FixedOffset>>,
}

/// A file attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "fileID", deserialize_with = "crate::de::lenient_i64")]
    pub file_id: i64,
    #[serde(deserialize_with = "crate::de::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub mime: String,
    /// Human readable (`"120 KB"`).
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub size: String,
    #[serde(default, deserialize_with = "crate::de::lenient_string")]
    pub icon: String,
    #[serde(rename = "wopiAllowed", default, deserialize_with = "crate::de::lenient_bool")]
    pub wopi_allowed: bool,
    #[serde(default, deserialize_with = "crate::de::lenient_i64")]
    pub order: i64,
}

/// Outcome of a status/label change. `new` is the new status or label code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageChanged {
    #[serde(deserialize_with = "crate::de::lenient_i64")]
    pub id: i64,
    #[serde(alias = "status", alias = "label", deserialize_with = "crate::de::lenient_i64")]
    pub new: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDeletionStatus {
    #[serde(rename = "msgID", deserialize_with = "crate::de::lenient_i64")]
    pub msg_id: i64,
    #[serde(rename = "boxType", deserialize_with = "crate::de::lenient_string")]
    pub box_type: String,
    #[serde(alias = "status", deserialize_with = "crate::de::lenient_bool")]
    pub is_deleted: bool,
}
