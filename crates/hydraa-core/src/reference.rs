//! Static reference data: the encroachment location taxonomy and the
//! encroachment type list.
//!
//! The location taxonomy is a three-level tree (zone → sub-zone → area).
//! Both tables are read-only at runtime.

use crate::error::{CoreError, Result};

/// A node in the location taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationNode {
    /// Display name of the node.
    pub name: &'static str,
    /// Child nodes; empty for areas.
    pub children: &'static [LocationNode],
}

impl LocationNode {
    const fn leaf(name: &'static str) -> Self {
        Self {
            name,
            children: &[],
        }
    }

    /// Find a direct child by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&'static LocationNode> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// An encroachment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncroachmentType {
    /// Stable identifier stored on petitions.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
}

/// The location taxonomy roots.
pub static LOCATIONS: &[LocationNode] = &[LocationNode {
    name: "Hyderabad",
    children: &[
        LocationNode {
            name: "North",
            children: &[
                LocationNode::leaf("Begumpet"),
                LocationNode::leaf("Secunderabad"),
                LocationNode::leaf("Bowenpally"),
            ],
        },
        LocationNode {
            name: "South",
            children: &[
                LocationNode::leaf("Mehdipatnam"),
                LocationNode::leaf("Attapur"),
                LocationNode::leaf("Rajendranagar"),
            ],
        },
        LocationNode {
            name: "East",
            children: &[
                LocationNode::leaf("Uppal"),
                LocationNode::leaf("LB Nagar"),
                LocationNode::leaf("Nacharam"),
            ],
        },
        LocationNode {
            name: "West",
            children: &[
                LocationNode::leaf("Gachibowli"),
                LocationNode::leaf("Madhapur"),
                LocationNode::leaf("Kukatpally"),
            ],
        },
        LocationNode {
            name: "Central",
            children: &[
                LocationNode::leaf("Abids"),
                LocationNode::leaf("Nampally"),
                LocationNode::leaf("Koti"),
            ],
        },
    ],
}];

/// The encroachment types a petition can be tagged with.
pub static ENCROACHMENT_TYPES: &[EncroachmentType] = &[
    EncroachmentType { id: "1", name: "Road Encroachment" },
    EncroachmentType { id: "2", name: "Lake Encroachment" },
    EncroachmentType { id: "3", name: "Footpath Encroachment" },
    EncroachmentType { id: "4", name: "Park Encroachment" },
    EncroachmentType { id: "5", name: "Government Land Encroachment" },
    EncroachmentType { id: "6", name: "Water Body Encroachment" },
    EncroachmentType { id: "7", name: "Railway Land Encroachment" },
    EncroachmentType { id: "8", name: "Forest Land Encroachment" },
    EncroachmentType { id: "9", name: "Heritage Site Encroachment" },
    EncroachmentType { id: "10", name: "Waqf Property Encroachment" },
];

/// Names of the top-level zones.
#[must_use]
pub fn zones() -> Vec<&'static str> {
    LOCATIONS.iter().map(|n| n.name).collect()
}

/// Names of the sub-zones of a zone, or `None` if the zone is unknown.
#[must_use]
pub fn sub_zones(zone: &str) -> Option<Vec<&'static str>> {
    let zone = LOCATIONS.iter().find(|n| n.name == zone)?;
    Some(zone.children.iter().map(|n| n.name).collect())
}

/// Names of the areas of a sub-zone, or `None` if the path is unknown.
#[must_use]
pub fn areas(zone: &str, sub_zone: &str) -> Option<Vec<&'static str>> {
    let sub = LOCATIONS.iter().find(|n| n.name == zone)?.child(sub_zone)?;
    Some(sub.children.iter().map(|n| n.name).collect())
}

/// Check that `zone / sub_zone / area` names a leaf of the taxonomy.
///
/// # Errors
///
/// Returns `CoreError::UnknownLocation` if any level does not resolve.
pub fn resolve_location(zone: &str, sub_zone: &str, area: &str) -> Result<()> {
    let found = LOCATIONS
        .iter()
        .find(|n| n.name == zone)
        .and_then(|z| z.child(sub_zone))
        .and_then(|s| s.child(area))
        .is_some_and(|a| a.children.is_empty());

    if found {
        Ok(())
    } else {
        Err(CoreError::UnknownLocation(format!(
            "{zone} / {sub_zone} / {area}"
        )))
    }
}

/// Look up an encroachment type by ID.
#[must_use]
pub fn encroachment_type(id: &str) -> Option<&'static EncroachmentType> {
    ENCROACHMENT_TYPES.iter().find(|t| t.id == id)
}

/// Check that every ID names a known encroachment type.
///
/// # Errors
///
/// Returns `CoreError::UnknownEncroachmentType` for the first unknown ID.
pub fn validate_encroachment_types<'a, I>(ids: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for id in ids {
        if encroachment_type(id).is_none() {
            return Err(CoreError::UnknownEncroachmentType(id.to_string()));
        }
    }
    Ok(())
}
