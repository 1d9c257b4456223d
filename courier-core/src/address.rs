//! District and street directory.
//!
//! Callers often know a delivery by its district and street rather than by
//! graph node. The address book resolves those names, ignoring case and
//! surrounding whitespace, and reports the valid alternatives when a name is
//! not found.

use thiserror::Error;

use crate::NodeId;

/// Errors returned by [`AddressBook::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The district is not in the directory.
    #[error("district {district:?} is not served; valid districts: {}", .known.join(", "))]
    UnknownDistrict {
        /// District as supplied by the caller.
        district: String,
        /// Every district in the directory.
        known: Vec<String>,
    },
    /// The street does not exist in the district.
    #[error(
        "street {street:?} not found in district {district}; valid streets: {}",
        .known.join(", ")
    )]
    UnknownStreet {
        /// Canonical district name.
        district: String,
        /// Street as supplied by the caller.
        street: String,
        /// Every street in the district.
        known: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Street {
    name: String,
    node: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct District {
    name: String,
    streets: Vec<Street>,
}

/// Maps `(district, street)` names to graph nodes.
///
/// Districts and streets keep their insertion order for listing.
///
/// # Examples
/// ```
/// use courier_core::{AddressBook, NodeId};
///
/// let mut book = AddressBook::new();
/// book.add_street("North", "Elm", NodeId::from("N_ELM"));
///
/// assert_eq!(book.resolve(" north ", "ELM"), Ok(&NodeId::from("N_ELM")));
/// assert!(book.resolve("South", "Elm").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    districts: Vec<District>,
}

impl AddressBook {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `street` in `district`, creating the district on first use.
    ///
    /// Re-registering an existing street points it at `node`.
    pub fn add_street(
        &mut self,
        district: impl Into<String>,
        street: impl Into<String>,
        node: NodeId,
    ) {
        let district_name = district.into();
        let street_name = street.into();
        let slot = self.district_slot(&district_name).unwrap_or_else(|| {
            self.districts.push(District {
                name: district_name.trim().to_owned(),
                streets: Vec::new(),
            });
            self.districts.len() - 1
        });
        let Some(entry) = self.districts.get_mut(slot) else {
            return;
        };
        if let Some(existing) = entry
            .streets
            .iter_mut()
            .find(|candidate| same_name(&candidate.name, &street_name))
        {
            existing.node = node;
            return;
        }
        entry.streets.push(Street {
            name: street_name.trim().to_owned(),
            node,
        });
    }

    /// Resolve a district and street to the node they name.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::UnknownDistrict`] or
    /// [`AddressError::UnknownStreet`], each listing the valid names.
    pub fn resolve(&self, district: &str, street: &str) -> Result<&NodeId, AddressError> {
        let entry = self
            .district_slot(district)
            .and_then(|slot| self.districts.get(slot))
            .ok_or_else(|| AddressError::UnknownDistrict {
                district: district.trim().to_owned(),
                known: self.districts().map(str::to_owned).collect(),
            })?;
        entry
            .streets
            .iter()
            .find(|candidate| same_name(&candidate.name, street))
            .map(|candidate| &candidate.node)
            .ok_or_else(|| AddressError::UnknownStreet {
                district: entry.name.clone(),
                street: street.trim().to_owned(),
                known: entry.streets.iter().map(|s| s.name.clone()).collect(),
            })
    }

    /// District names in insertion order.
    pub fn districts(&self) -> impl Iterator<Item = &str> + '_ {
        self.districts.iter().map(|district| district.name.as_str())
    }

    /// Street names of `district`, or an empty list when it is unknown.
    #[must_use]
    pub fn streets(&self, district: &str) -> Vec<&str> {
        self.district_slot(district)
            .and_then(|slot| self.districts.get(slot))
            .map(|entry| entry.streets.iter().map(|s| s.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Whether the directory has no districts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    fn district_slot(&self, district: &str) -> Option<usize> {
        self.districts
            .iter()
            .position(|entry| same_name(&entry.name, district))
    }
}

fn same_name(canonical: &str, candidate: &str) -> bool {
    canonical.trim().eq_ignore_ascii_case(candidate.trim())
}
