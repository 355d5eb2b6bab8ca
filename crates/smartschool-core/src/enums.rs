//! Enums for message boxes, sorting, flags and grade colours.
//!
//! `as_str()` returns the exact token the portal expects in dispatcher
//! parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// BoxType
// ---------------------------------------------------------------------------

/// Message box to list or act on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxType {
    #[default]
    Inbox,
    Draft,
    Scheduled,
    #[serde(rename = "outbox")]
    Sent,
    Trash,
}

impl BoxType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::Sent => "outbox",
            Self::Trash => "trash",
        }
    }
}

impl fmt::Display for BoxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SortField / SortOrder
// ---------------------------------------------------------------------------

/// Column the message list is sorted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Date,
    From,
    ReadUnread,
    Attachment,
    Flag,
}

impl SortField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::From => "from",
            Self::ReadUnread => "status",
            Self::Attachment => "attachment",
            Self::Flag => "label",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

// ---------------------------------------------------------------------------
// MessageLabel
// ---------------------------------------------------------------------------

/// Coloured flag on a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLabel {
    #[default]
    NoFlag,
    GreenFlag,
    YellowFlag,
    RedFlag,
    BlueFlag,
}

impl MessageLabel {
    /// Numeric code used by the portal.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::NoFlag => 0,
            Self::GreenFlag => 1,
            Self::YellowFlag => 2,
            Self::RedFlag => 3,
            Self::BlueFlag => 4,
        }
    }

    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::NoFlag),
            1 => Some(Self::GreenFlag),
            2 => Some(Self::YellowFlag),
            3 => Some(Self::RedFlag),
            4 => Some(Self::BlueFlag),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ResultColor
// ---------------------------------------------------------------------------

/// Colour the portal paints a grade with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultColor {
    Green,
    Red,
    Olive,
    Yellow,
    Steel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_type_tokens() {
        assert_eq!(BoxType::Sent.as_str(), "outbox");
        assert_eq!(BoxType::default().to_string(), "inbox");
        let parsed: BoxType = serde_json::from_str("\"outbox\"").unwrap();
        assert_eq!(parsed, BoxType::Sent);
    }

    #[test]
    fn sort_tokens() {
        assert_eq!(SortField::ReadUnread.as_str(), "status");
        assert_eq!(SortField::Flag.as_str(), "label");
        assert_eq!(SortOrder::default().as_str(), "desc");
    }

    #[test]
    fn label_codes_roundtrip() {
        for code in 0..=4 {
            let label = MessageLabel::from_code(code).unwrap();
            assert_eq!(label.code(), code);
        }
        assert!(MessageLabel::from_code(9).is_none());
    }

    #[test]
    fn result_color_parses() {
        let color: ResultColor = serde_json::from_str("\"olive\"").unwrap();
        assert_eq!(color, ResultColor::Olive);
    }
}
