//! Clearance levels and the profile-backed clearance store.
//!
//! Clearance is a client-held rank, not an authorization mechanism. Invalid
//! stored values are coerced to [`ClearanceLevel::Public`] and invalid set
//! requests are ignored, so reading a level never fails for data reasons.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::Result;
use crate::storage::KeyValueStore;

/// Storage key for the clearance level.
pub const CLEARANCE_KEY: &str = "gc_clearance";

/// Storage key for the admin flag.
pub const ADMIN_KEY: &str = "gc_admin";

/// Passphrase that raises clearance to [`ClearanceLevel::Witness`].
pub const WITNESS_PASSPHRASE: &str = "agata";

/// Passphrase that sets the admin flag.
pub const OPERATOR_PASSPHRASE: &str = "agata-internal-operator";

/// Clearance ranks, lowest first. Ordering follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearanceLevel {
    /// Anonymous visitor.
    #[default]
    Public,
    /// Has read the charter.
    Registered,
    /// Entered the witness passphrase.
    Witness,
    /// May use internal tools.
    Authorized,
    /// Highest rank.
    Restricted,
}

impl ClearanceLevel {
    /// Every level in rank order.
    pub const ALL: [Self; 5] = [
        Self::Public,
        Self::Registered,
        Self::Witness,
        Self::Authorized,
        Self::Restricted,
    ];

    /// Index of this level in the rank order.
    #[must_use]
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Stored string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Registered => "registered",
            Self::Witness => "witness",
            Self::Authorized => "authorized",
            Self::Restricted => "restricted",
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Registered => "Registered",
            Self::Witness => "Witness",
            Self::Authorized => "Authorized",
            Self::Restricted => "Restricted",
        }
    }

    /// Parse a stored value. Only exact lowercase names are accepted.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }
}

impl fmt::Display for ClearanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown clearance name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown clearance level '{0}'")]
pub struct UnknownClearance(pub String);

impl FromStr for ClearanceLevel {
    type Err = UnknownClearance;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownClearance(s.to_string()))
    }
}

/// Rank of an arbitrary level name; unrecognized names rank as `0`.
#[must_use]
pub fn rank_of(level: &str) -> usize {
    ClearanceLevel::parse(level).map_or(0, ClearanceLevel::rank)
}

/// Result of submitting the passphrase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassphraseOutcome {
    /// Clearance was set to witness.
    Witness,
    /// The admin flag was set.
    Operator,
    /// Nothing changed.
    NoChange,
}

impl PassphraseOutcome {
    /// Notice shown after the submission.
    #[must_use]
    pub fn notice(self) -> &'static str {
        match self {
            Self::Witness => "Recorded.",
            Self::Operator => "Access state updated.",
            Self::NoChange => "No change.",
        }
    }

    /// Whether the profile changed and views should be re-rendered.
    #[must_use]
    pub fn changed(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Clearance level and admin flag persisted in a [`KeyValueStore`].
#[derive(Debug)]
pub struct ClearanceStore<S> {
    store: S,
}

impl<S: KeyValueStore> ClearanceStore<S> {
    /// Wrap a key/value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current clearance level.
    ///
    /// An absent or unrecognized stored value is replaced with `public`,
    /// which is persisted before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn get(&self) -> Result<ClearanceLevel> {
        let stored = self.store.get(CLEARANCE_KEY)?;
        if let Some(level) = stored.as_deref().and_then(ClearanceLevel::parse) {
            return Ok(level);
        }
        if let Some(value) = stored {
            debug!("Coercing unrecognized clearance '{}' to public", value);
        }
        self.store
            .set(CLEARANCE_KEY, ClearanceLevel::Public.as_str())?;
        Ok(ClearanceLevel::Public)
    }

    /// Persist a clearance level.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn set(&self, level: ClearanceLevel) -> Result<()> {
        self.store.set(CLEARANCE_KEY, level.as_str())?;
        info!("Clearance set to {}", level);
        Ok(())
    }

    /// Persist a clearance level given by name.
    ///
    /// Unrecognized names are ignored. Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn set_raw(&self, level: &str) -> Result<bool> {
        match ClearanceLevel::parse(level) {
            Some(level) => {
                self.set(level)?;
                Ok(true)
            }
            None => {
                debug!("Ignoring request to set unknown clearance '{}'", level);
                Ok(false)
            }
        }
    }

    /// Whether the admin flag is set. Only the exact value `"true"` counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn is_admin(&self) -> Result<bool> {
        Ok(self.store.get(ADMIN_KEY)?.as_deref() == Some("true"))
    }

    /// Set or clear the admin flag. Clearing removes the entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn set_admin(&self, admin: bool) -> Result<()> {
        if admin {
            self.store.set(ADMIN_KEY, "true")?;
        } else {
            self.store.remove(ADMIN_KEY)?;
        }
        info!("Admin flag {}", if admin { "set" } else { "cleared" });
        Ok(())
    }

    /// Apply a passphrase entry. Input is trimmed and compared literally.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn submit_passphrase(&self, input: &str) -> Result<PassphraseOutcome> {
        match input.trim() {
            WITNESS_PASSPHRASE => {
                self.set(ClearanceLevel::Witness)?;
                Ok(PassphraseOutcome::Witness)
            }
            OPERATOR_PASSPHRASE => {
                self.set_admin(true)?;
                Ok(PassphraseOutcome::Operator)
            }
            _ => Ok(PassphraseOutcome::NoChange),
        }
    }

    /// Notice shown when a restricted record is opened.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn restricted_notice(&self) -> Result<&'static str> {
        Ok(restricted_notice(self.get()?))
    }
}

/// Notice shown when a restricted record is opened at `level`.
#[must_use]
pub fn restricted_notice(level: ClearanceLevel) -> &'static str {
    if level == ClearanceLevel::Witness {
        "This record remains sealed."
    } else {
        "This record is not available at your clearance level."
    }
}
