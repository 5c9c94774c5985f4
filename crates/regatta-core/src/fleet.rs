//! # Fleet Registry
//!
//! Fleets of a document and the free-text provisions scoped to them.
//!
//! Fleets and provisions are kept in creation order, which is the order they
//! are rendered in. Removing a fleet removes every provision attached to it.

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::ids::{FleetId, ProvisionId};
use crate::rule::DocumentSection;

/// Colors handed out to new fleets, round-robin.
pub const FLEET_COLORS: [&str; 8] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
];

fn palette_color(index: usize) -> &'static str {
    FLEET_COLORS[index % FLEET_COLORS.len()]
}

/// A group of boats racing together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fleet {
    /// Unique within the document.
    pub id: FleetId,
    /// Display name, used as the heading for the fleet's provisions.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Badge color, `#rrggbb`.
    #[serde(default)]
    pub color: String,
}

/// A free-text clause that applies to one fleet only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provision {
    pub id: ProvisionId,
    pub fleet_id: FleetId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub section: DocumentSection,
}

/// Partial update for a [`Provision`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionPatch {
    pub fleet_id: Option<FleetId>,
    pub content: Option<String>,
    pub section: Option<DocumentSection>,
}

/// The fleets and fleet-scoped provisions of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetRegistry {
    fleets: Vec<Fleet>,
    provisions: Vec<Provision>,
}

impl FleetRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from stored fleets and provisions.
    ///
    /// A fleet without a color gets the palette color for its position.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::Invalid`] for blank fleet names.
    /// - [`DocumentError::DuplicateId`] for repeated fleet or provision ids.
    /// - [`DocumentError::UnknownFleet`] for provisions pointing nowhere.
    pub fn from_parts(fleets: Vec<Fleet>, provisions: Vec<Provision>) -> Result<Self, DocumentError> {
        let mut registry = Self::new();
        for mut fleet in fleets {
            if fleet.name.trim().is_empty() {
                return Err(DocumentError::Invalid(format!(
                    "fleet \"{}\" must have a name",
                    fleet.id
                )));
            }
            if registry.fleet(&fleet.id).is_some() {
                return Err(DocumentError::DuplicateId {
                    kind: "fleet",
                    id: fleet.id.to_string(),
                });
            }
            if fleet.color.trim().is_empty() {
                fleet.color = palette_color(registry.fleets.len()).to_string();
            }
            registry.fleets.push(fleet);
        }
        for provision in provisions {
            if registry.fleet(&provision.fleet_id).is_none() {
                return Err(DocumentError::UnknownFleet(provision.fleet_id.to_string()));
            }
            if registry.provision(&provision.id).is_some() {
                return Err(DocumentError::DuplicateId {
                    kind: "provision",
                    id: provision.id.to_string(),
                });
            }
            registry.provisions.push(provision);
        }
        Ok(registry)
    }

    /// Create a fleet with a fresh id and the next palette color.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Invalid`] if `name` is blank.
    pub fn add_fleet(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<&Fleet, DocumentError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DocumentError::Invalid("fleet name must not be empty".to_string()));
        }
        let color = palette_color(self.fleets.len()).to_string();
        let idx = self.fleets.len();
        self.fleets.push(Fleet {
            id: FleetId::generate(),
            name,
            description: description.filter(|d| !d.trim().is_empty()),
            color,
        });
        Ok(&self.fleets[idx])
    }

    /// Remove a fleet and all of its provisions.
    ///
    /// # Errors
    ///
    /// [`DocumentError::UnknownFleet`] if no such fleet exists.
    pub fn remove_fleet(&mut self, id: &FleetId) -> Result<Fleet, DocumentError> {
        let idx = self
            .fleets
            .iter()
            .position(|f| &f.id == id)
            .ok_or_else(|| DocumentError::UnknownFleet(id.to_string()))?;
        self.provisions.retain(|p| &p.fleet_id != id);
        Ok(self.fleets.remove(idx))
    }

    /// Attach a new provision to a fleet.
    ///
    /// # Errors
    ///
    /// [`DocumentError::UnknownFleet`] if the fleet does not exist.
    pub fn add_provision(
        &mut self,
        fleet_id: &FleetId,
        content: impl Into<String>,
        section: DocumentSection,
    ) -> Result<&Provision, DocumentError> {
        if self.fleet(fleet_id).is_none() {
            return Err(DocumentError::UnknownFleet(fleet_id.to_string()));
        }
        let idx = self.provisions.len();
        self.provisions.push(Provision {
            id: ProvisionId::generate(),
            fleet_id: fleet_id.clone(),
            content: content.into(),
            section,
        });
        Ok(&self.provisions[idx])
    }

    /// Apply a partial update to a provision.
    ///
    /// # Errors
    ///
    /// [`DocumentError::UnknownProvision`] if the provision does not exist;
    /// [`DocumentError::UnknownFleet`] if the patch moves it to a missing
    /// fleet. Nothing is changed on error.
    pub fn update_provision(
        &mut self,
        id: &ProvisionId,
        patch: ProvisionPatch,
    ) -> Result<&Provision, DocumentError> {
        if let Some(fleet_id) = &patch.fleet_id {
            if self.fleet(fleet_id).is_none() {
                return Err(DocumentError::UnknownFleet(fleet_id.to_string()));
            }
        }
        let provision = self
            .provisions
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| DocumentError::UnknownProvision(id.to_string()))?;
        if let Some(fleet_id) = patch.fleet_id {
            provision.fleet_id = fleet_id;
        }
        if let Some(content) = patch.content {
            provision.content = content;
        }
        if let Some(section) = patch.section {
            provision.section = section;
        }
        Ok(&*provision)
    }

    /// Delete a provision.
    ///
    /// # Errors
    ///
    /// [`DocumentError::UnknownProvision`] if it does not exist.
    pub fn remove_provision(&mut self, id: &ProvisionId) -> Result<Provision, DocumentError> {
        let idx = self
            .provisions
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| DocumentError::UnknownProvision(id.to_string()))?;
        Ok(self.provisions.remove(idx))
    }

    pub fn fleet(&self, id: &FleetId) -> Option<&Fleet> {
        self.fleets.iter().find(|f| &f.id == id)
    }

    pub fn provision(&self, id: &ProvisionId) -> Option<&Provision> {
        self.provisions.iter().find(|p| &p.id == id)
    }

    /// Fleets in creation order.
    pub fn fleets(&self) -> &[Fleet] {
        &self.fleets
    }

    /// All provisions in creation order.
    pub fn provisions(&self) -> &[Provision] {
        &self.provisions
    }

    /// Provisions of one fleet, in creation order.
    pub fn provisions_for<'a>(&'a self, fleet_id: &'a FleetId) -> impl Iterator<Item = &'a Provision> {
        self.provisions.iter().filter(move |p| &p.fleet_id == fleet_id)
    }

    /// Split into owned parts for serialization.
    pub fn into_parts(self) -> (Vec<Fleet>, Vec<Provision>) {
        (self.fleets, self.provisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn add_fleet_assigns_unique_ids_and_rotating_colors() {
        let mut reg = FleetRegistry::new();
        let mut ids = Vec::new();
        for i in 0..9 {
            let fleet = reg.add_fleet(format!("Fleet {i}"), None).unwrap();
            ids.push(fleet.id.clone());
        }
        assert_eq!(reg.fleets()[0].color, FLEET_COLORS[0]);
        assert_eq!(reg.fleets()[7].color, FLEET_COLORS[7]);
        assert_eq!(reg.fleets()[8].color, FLEET_COLORS[0]);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn add_fleet_rejects_blank_name() {
        let mut reg = FleetRegistry::new();
        assert!(matches!(reg.add_fleet("  ", None), Err(DocumentError::Invalid(_))));
    }

    #[test]
    fn add_provision_requires_existing_fleet() {
        let mut reg = FleetRegistry::new();
        let ghost = FleetId::new("fleet-ghost").unwrap();
        let err = reg.add_provision(&ghost, "text", DocumentSection::Both).unwrap_err();
        assert_eq!(err, DocumentError::UnknownFleet("fleet-ghost".to_string()));
        assert!(reg.provisions().is_empty());
    }

    #[test]
    fn remove_fleet_cascades() {
        let mut reg = FleetRegistry::new();
        let phrf = reg.add_fleet("PHRF", None).unwrap().id.clone();
        let j70 = reg.add_fleet("J/70", None).unwrap().id.clone();
        reg.add_provision(&phrf, "A", DocumentSection::Nor).unwrap();
        reg.add_provision(&j70, "B", DocumentSection::Si).unwrap();
        reg.add_provision(&phrf, "C", DocumentSection::Both).unwrap();

        reg.remove_fleet(&phrf).unwrap();
        assert_eq!(reg.fleets().len(), 1);
        assert_eq!(reg.provisions().len(), 1);
        assert_eq!(reg.provisions()[0].content, "B");
    }

    #[test]
    fn update_provision_applies_patch() {
        let mut reg = FleetRegistry::new();
        let a = reg.add_fleet("A", None).unwrap().id.clone();
        let b = reg.add_fleet("B", None).unwrap().id.clone();
        let pid = reg.add_provision(&a, "old", DocumentSection::Both).unwrap().id.clone();

        let updated = reg
            .update_provision(
                &pid,
                ProvisionPatch {
                    fleet_id: Some(b.clone()),
                    content: Some("new".to_string()),
                    section: Some(DocumentSection::Si),
                },
            )
            .unwrap();
        assert_eq!(updated.fleet_id, b);
        assert_eq!(updated.content, "new");
        assert_eq!(updated.section, DocumentSection::Si);
    }

    #[test]
    fn update_provision_to_missing_fleet_changes_nothing() {
        let mut reg = FleetRegistry::new();
        let a = reg.add_fleet("A", None).unwrap().id.clone();
        let pid = reg.add_provision(&a, "keep", DocumentSection::Nor).unwrap().id.clone();
        let before = reg.clone();
        let err = reg
            .update_provision(
                &pid,
                ProvisionPatch {
                    fleet_id: Some(FleetId::new("nowhere").unwrap()),
                    content: Some("lost".to_string()),
                    section: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, DocumentError::UnknownFleet(_)));
        assert_eq!(reg, before);
    }

    #[test]
    fn remove_unknown_provision_fails() {
        let mut reg = FleetRegistry::new();
        let err = reg
            .remove_provision(&ProvisionId::new("provision-1").unwrap())
            .unwrap_err();
        assert!(matches!(err, DocumentError::UnknownProvision(_)));
    }

    #[test]
    fn from_parts_rejects_duplicates_and_dangling_provisions() {
        let fleet = Fleet {
            id: FleetId::new("fleet-1").unwrap(),
            name: "PHRF".to_string(),
            description: None,
            color: FLEET_COLORS[0].to_string(),
        };
        let dup = FleetRegistry::from_parts(vec![fleet.clone(), fleet.clone()], vec![]);
        assert!(matches!(dup, Err(DocumentError::DuplicateId { kind: "fleet", .. })));

        let dangling = Provision {
            id: ProvisionId::new("provision-1").unwrap(),
            fleet_id: FleetId::new("fleet-2").unwrap(),
            content: "x".to_string(),
            section: DocumentSection::Both,
        };
        let err = FleetRegistry::from_parts(vec![fleet], vec![dangling]).unwrap_err();
        assert_eq!(err, DocumentError::UnknownFleet("fleet-2".to_string()));
    }

    #[test]
    fn from_parts_fills_missing_colors_by_position() {
        let fleets: Vec<Fleet> = serde_json::from_str(
            r##"[
                {"id": "f1", "name": "PHRF"},
                {"id": "f2", "name": "J/70", "color": "#000000"},
                {"id": "f3", "name": "Lasers", "color": "  "}
            ]"##,
        )
        .unwrap();
        let registry = FleetRegistry::from_parts(fleets, Vec::new()).unwrap();
        let colors: Vec<&str> = registry.fleets().iter().map(|f| f.color.as_str()).collect();
        assert_eq!(colors, vec![FLEET_COLORS[0], "#000000", FLEET_COLORS[2]]);
    }

    #[test]
    fn provision_deserializes_with_default_section() {
        let p: Provision =
            serde_json::from_str(r#"{"id":"provision-1","fleetId":"fleet-1","content":"x"}"#)
                .unwrap();
        assert_eq!(p.section, DocumentSection::Both);
    }

    proptest! {
        #[test]
        fn cascade_removes_exactly_the_fleets_provisions(
            assignments in proptest::collection::vec(0usize..4, 0..24),
            victim in 0usize..4,
        ) {
            let mut reg = FleetRegistry::new();
            let ids: Vec<FleetId> = (0..4)
                .map(|i| reg.add_fleet(format!("F{i}"), None).unwrap().id.clone())
                .collect();
            for (n, fleet_idx) in assignments.iter().enumerate() {
                reg.add_provision(&ids[*fleet_idx], format!("p{n}"), DocumentSection::Both).unwrap();
            }
            let survivors: Vec<String> = reg
                .provisions()
                .iter()
                .filter(|p| p.fleet_id != ids[victim])
                .map(|p| p.content.clone())
                .collect();

            reg.remove_fleet(&ids[victim]).unwrap();

            let remaining: Vec<String> = reg.provisions().iter().map(|p| p.content.clone()).collect();
            prop_assert_eq!(remaining, survivors);
            prop_assert!(reg.fleet(&ids[victim]).is_none());
            prop_assert_eq!(reg.fleets().len(), 3);
        }
    }
}
