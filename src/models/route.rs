// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route and roster models.
//!
//! The JSON layout (camelCase, `maxParticipants: -1` for "no limit") matches
//! the snapshots written by the legacy web client, so an exported catalog
//! loads unchanged.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Wire value stored in `maxParticipants` for a route without a limit.
pub const UNBOUNDED_SENTINEL: i64 = -1;

/// Prefix on the membership key of roster entries that carry no `userId`.
/// Auth tokens whose subject starts with it are refused, so a token can
/// never claim a legacy entry.
pub const LEGACY_KEY_PREFIX: &str = "name:";

/// Map reference used when a new route does not supply one.
pub const DEFAULT_MAP_IMAGE: &str = "/placeholder.svg?height=200&width=400&text=Route+Map";

/// Route difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "difficulty must be one of Beginner, Intermediate, Advanced (got {:?})",
                    s
                )
            })
    }
}

/// Roster size limit for a route.
///
/// Serialized as a bare integer: the limit itself, or `-1` for no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Bounded(NonZeroU32),
    Unbounded,
}

impl Capacity {
    /// Bounded capacity, or `None` for a zero limit.
    pub fn bounded(limit: u32) -> Option<Self> {
        NonZeroU32::new(limit).map(Capacity::Bounded)
    }

    /// Interpret a raw `maxParticipants` value.
    ///
    /// Accepts `-1` (no limit) and `1..=u32::MAX`; everything else is invalid.
    pub fn from_raw(raw: i64) -> Option<Self> {
        if raw == UNBOUNDED_SENTINEL {
            return Some(Capacity::Unbounded);
        }
        u32::try_from(raw).ok().and_then(Capacity::bounded)
    }

    pub fn to_raw(self) -> i64 {
        match self {
            Capacity::Bounded(limit) => i64::from(limit.get()),
            Capacity::Unbounded => UNBOUNDED_SENTINEL,
        }
    }

    pub fn limit(self) -> Option<u32> {
        match self {
            Capacity::Bounded(limit) => Some(limit.get()),
            Capacity::Unbounded => None,
        }
    }

    /// Whether a roster of `count` riders has room for one more.
    pub fn admits(self, count: usize) -> bool {
        match self {
            Capacity::Bounded(limit) => count < limit.get() as usize,
            Capacity::Unbounded => true,
        }
    }
}

impl Serialize for Capacity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.to_raw())
    }
}

impl<'de> Deserialize<'de> for Capacity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Capacity::from_raw(raw).ok_or_else(|| {
            de::Error::custom(format!(
                "maxParticipants must be a positive integer or -1, got {}",
                raw
            ))
        })
    }
}

/// Occupancy of a route's roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum RosterState {
    Empty,
    Partial,
    Full,
}

/// Snapshot of the rider who created a route, frozen at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Creator {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub rides_led: u32,
}

/// A rider attached to a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Participant {
    /// Stable identity key from the auth provider.
    /// Absent on rosters written before keys were tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Display name at join time
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    /// Motorcycle the rider will bring
    pub bike: String,
    #[serde(default)]
    pub has_passenger: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_name: Option<String>,
}

impl Participant {
    /// Key used for roster membership checks.
    ///
    /// Legacy entries without a `userId` are keyed by
    /// [`LEGACY_KEY_PREFIX`] plus display name.
    pub fn identity_key(&self) -> Cow<'_, str> {
        match &self.user_id {
            Some(id) => Cow::Borrowed(id),
            None => Cow::Owned(format!("{}{}", LEGACY_KEY_PREFIX, self.name)),
        }
    }
}

/// A planned group ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Route {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub distance: String,
    pub duration: String,
    pub start_location: String,
    pub end_location: String,
    pub date: String,
    pub time: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub max_participants: Capacity,
    /// Cached roster length; recomputed on every load and mutation.
    #[serde(default)]
    pub current_participants: u32,
    #[serde(default)]
    pub rating: f64,
    pub creator: Creator,
    pub meeting_point: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub map_image: String,
}

impl Route {
    pub fn roster_len(&self) -> usize {
        self.participants.len()
    }

    /// Re-derive `current_participants` from the roster.
    pub fn sync_participant_count(&mut self) {
        self.current_participants = u32::try_from(self.participants.len()).unwrap_or(u32::MAX);
    }

    pub fn is_participant(&self, identity_key: &str) -> bool {
        self.participant_info(identity_key).is_some()
    }

    pub fn participant_info(&self, identity_key: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.identity_key() == identity_key)
    }

    pub fn has_room(&self) -> bool {
        self.max_participants.admits(self.roster_len())
    }

    /// Free places left, `None` when the route has no limit.
    pub fn spots_left(&self) -> Option<u32> {
        self.max_participants
            .limit()
            .map(|limit| limit.saturating_sub(self.current_participants))
    }

    pub fn roster_state(&self) -> RosterState {
        if self.participants.is_empty() {
            RosterState::Empty
        } else if self.has_room() {
            RosterState::Partial
        } else {
            RosterState::Full
        }
    }
}
