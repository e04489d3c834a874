// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Acting rider identity, as asserted by the auth token.

use crate::models::route::{Creator, Participant};

/// Avatar used when the identity provider has none on file.
pub const DEFAULT_AVATAR: &str = "/placeholder-user.jpg";

/// The rider performing an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Stable opaque key (JWT subject)
    pub key: String,
    pub display_name: String,
    pub avatar: String,
    pub rating: f64,
    pub rides_led: u32,
}

impl Identity {
    pub fn new(key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            avatar: DEFAULT_AVATAR.to_string(),
            rating: 0.0,
            rides_led: 0,
        }
    }

    /// Snapshot stored on routes this identity creates.
    pub fn creator_snapshot(&self) -> Creator {
        Creator {
            name: self.display_name.clone(),
            avatar: self.avatar.clone(),
            rating: self.rating,
            rides_led: self.rides_led,
        }
    }

    /// Roster entry for this identity.
    pub fn participant(
        &self,
        bike: String,
        passenger_name: Option<String>,
    ) -> Participant {
        Participant {
            user_id: Some(self.key.clone()),
            name: self.display_name.clone(),
            avatar: self.avatar.clone(),
            bike,
            has_passenger: passenger_name.is_some(),
            passenger_name,
        }
    }
}
