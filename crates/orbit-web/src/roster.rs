#![forbid(unsafe_code)]

//! Member records as delivered by the membership store.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use orbit_layout::{Member, MemberId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// One member profile.
///
/// Only `id` matters to layout; the remaining fields ride along so that a
/// selection can hand the full record back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: MemberId,
    #[serde(default)]
    pub x_username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_answer: Option<String>,
    /// Join time. Any RFC 3339 offset is accepted and normalized to UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Store columns this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MemberRecord {
    #[must_use]
    pub fn new(id: impl Into<MemberId>, x_username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x_username: x_username.into(),
            profile_photo_url: None,
            privacy_answer: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

impl Member for MemberRecord {
    fn member_id(&self) -> &MemberId {
        &self.id
    }
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("invalid member roster: {0}")]
    Json(#[from] serde_json::Error),
    #[error("member at index {index} has an empty id")]
    EmptyId { index: usize },
}

/// Ordered member list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    members: Vec<MemberRecord>,
}

impl Roster {
    #[must_use]
    pub fn new(members: Vec<MemberRecord>) -> Self {
        Self { members }
    }

    /// Decode a JSON array of member records, keeping array order.
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        let members: Vec<MemberRecord> = serde_json::from_str(json)?;
        if let Some(index) = members.iter().position(|m| m.id.as_str().is_empty()) {
            return Err(RosterError::EmptyId { index });
        }
        Ok(Self { members })
    }

    /// Stable sort by join instant ascending; records without a timestamp
    /// keep their relative order after all timestamped ones.
    #[must_use]
    pub fn ordered_by_join_time(mut self) -> Self {
        self.members
            .sort_by(|a, b| match (&a.created_at, &b.created_at) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        self
    }

    #[must_use]
    pub fn members(&self) -> &[MemberRecord] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// First record carrying `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&MemberRecord> {
        self.members.iter().find(|m| m.id.as_str() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberRecord> {
        self.members.iter()
    }

    #[must_use]
    pub fn into_members(self) -> Vec<MemberRecord> {
        self.members
    }
}

impl From<Vec<MemberRecord>> for Roster {
    fn from(members: Vec<MemberRecord>) -> Self {
        Self::new(members)
    }
}

#[cfg(test)]
mod tests {
    use super::{MemberRecord, Roster, RosterError};
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    fn join_order(roster: Roster) -> Vec<String> {
        roster
            .ordered_by_join_time()
            .iter()
            .map(|m| m.id.as_str().to_owned())
            .collect()
    }

    #[test]
    fn decodes_store_rows_and_keeps_unknown_columns() {
        let json = r#"[
            {"id":"u1","x_username":"alice","privacy_answer":"zk","created_at":"2024-03-01T10:00:00Z","badge":"early"},
            {"id":"u2","x_username":"bob","profile_photo_url":"https://img/bob.png"}
        ]"#;
        let roster = Roster::from_json(json).expect("valid roster");
        assert_eq!(roster.len(), 2);
        let alice = roster.get("u1").expect("alice");
        assert_eq!(alice.x_username, "alice");
        assert_eq!(alice.extra.get("badge").and_then(|v| v.as_str()), Some("early"));
        assert_eq!(
            roster.get("u2").and_then(|m| m.profile_photo_url.as_deref()),
            Some("https://img/bob.png")
        );
    }

    #[test]
    fn empty_id_is_rejected() {
        let err = Roster::from_json(r#"[{"id":"a"},{"id":""}]"#).expect_err("empty id");
        assert!(matches!(err, RosterError::EmptyId { index: 1 }));
    }

    #[test]
    fn non_array_is_a_json_error() {
        let err = Roster::from_json(r#"{"id":"a"}"#).expect_err("object");
        assert!(matches!(err, RosterError::Json(_)));
    }

    #[test]
    fn join_order_is_stable_and_untimed_last() {
        let roster = Roster::new(vec![
            MemberRecord::new("late", "l").with_created_at(at("2024-05-01T00:00:00Z")),
            MemberRecord::new("untimed-1", "u1"),
            MemberRecord::new("early", "e").with_created_at(at("2024-01-01T00:00:00Z")),
            MemberRecord::new("untimed-2", "u2"),
            MemberRecord::new("early-tie", "t").with_created_at(at("2024-01-01T00:00:00Z")),
        ]);
        assert_eq!(
            join_order(roster),
            vec!["early", "early-tie", "late", "untimed-1", "untimed-2"]
        );
    }

    #[test]
    fn join_order_compares_instants_not_text() {
        let roster = Roster::from_json(
            r#"[
                {"id":"half_second","created_at":"2024-01-01T00:00:00.500Z"},
                {"id":"whole_second","created_at":"2024-01-01T00:00:00Z"},
                {"id":"utc_0030","created_at":"2024-01-01T00:30:00Z"},
                {"id":"utc_2300_prev_day","created_at":"2024-01-01T01:00:00+02:00"}
            ]"#,
        )
        .expect("valid roster");
        assert_eq!(
            join_order(roster),
            vec!["utc_2300_prev_day", "whole_second", "half_second", "utc_0030"]
        );
    }

    #[test]
    fn null_timestamp_is_untimed_and_garbage_is_rejected() {
        let roster = Roster::from_json(
            r#"[{"id":"a","created_at":null},{"id":"b","created_at":"2024-01-01T00:00:00Z"}]"#,
        )
        .expect("null is allowed");
        assert_eq!(join_order(roster), vec!["b", "a"]);

        let err = Roster::from_json(r#"[{"id":"a","created_at":"yesterday"}]"#)
            .expect_err("unparsable timestamp");
        assert!(matches!(err, RosterError::Json(_)));
    }
}
