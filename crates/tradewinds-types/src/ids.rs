//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity in the simulation has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. All IDs use UUID v7
//! (time-ordered) so logs and saved records sort chronologically.
//!
//! Player identities normally arrive from the transport layer's
//! authentication handshake; the `new()` constructors exist for bots,
//! tests, and seed data.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a game room.
    RoomId
}

define_id! {
    /// Unique identifier for a player (human or bot).
    PlayerId
}

define_id! {
    /// Unique identifier for a facility auction.
    AuctionId
}

define_id! {
    /// Unique identifier for a modal notification.
    ModalId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types_and_unique() {
        let a = PlayerId::new();
        let b = PlayerId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn display_matches_inner_uuid() {
        let id = RoomId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }

    #[test]
    fn serde_round_trip() {
        let id = ModalId::new();
        let json = serde_json::to_string(&id);
        assert!(json.is_ok());
        if let Ok(json) = json {
            let back: Result<ModalId, _> = serde_json::from_str(&json);
            assert_eq!(back.ok(), Some(id));
        }
    }
}
