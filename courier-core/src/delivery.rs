//! Delivery records and their arrival sequence numbers.

use std::fmt;

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::NodeId;

/// Arrival order of a delivery; the sole sort key of the pending queue.
///
/// Sequence numbers start at one and are issued by the component that creates
/// delivery records, never by the queue itself.
///
/// # Examples
/// ```
/// use courier_core::SequenceNumber;
///
/// let first = SequenceNumber::FIRST;
/// assert_eq!(first.get(), 1);
/// assert_eq!(first.checked_next(), Some(SequenceNumber::new(2)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    /// The first sequence number handed out.
    pub const FIRST: Self = Self(1);

    /// Wrap a raw sequence value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw sequence value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The following sequence number, or `None` on overflow.
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }
}

impl Default for SequenceNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// District and street a delivery was addressed to, as entered by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StreetAddress {
    /// District name.
    pub district: String,
    /// Street name within the district.
    pub street: String,
}

/// A pending delivery.
///
/// Owned by the pending queue until delivered; delivering moves the record
/// out to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeliveryRecord {
    /// Arrival order.
    pub sequence: SequenceNumber,
    /// Customer the delivery is for.
    pub customer: String,
    /// Graph node the delivery goes to.
    pub destination: NodeId,
    /// Address the destination was resolved from, when submitted by address.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub address: Option<StreetAddress>,
    /// When the delivery was submitted.
    pub created_at: DateTime<Utc>,
}
