//! Emergency contacts.

use serde::{Deserialize, Serialize};

use super::catalog::EMERGENCY_NUMBER;
use crate::domain::foundation::{ContactId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub id: ContactId,
    pub name: String,
    pub relation: String,
    pub number: String,
}

/// Contact list, always seeded with public emergency services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContacts {
    contacts: Vec<EmergencyContact>,
}

impl EmergencyContacts {
    pub fn new() -> Self {
        Self {
            contacts: vec![EmergencyContact {
                id: ContactId::new(),
                name: "Emergency Services".to_string(),
                relation: "Public".to_string(),
                number: EMERGENCY_NUMBER.to_string(),
            }],
        }
    }

    /// Adds a contact. Name and number are required; relation is free text.
    pub fn add(
        &mut self,
        name: &str,
        relation: &str,
        number: &str,
    ) -> Result<&EmergencyContact, ValidationError> {
        let name = name.trim();
        let number = number.trim();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if number.is_empty() {
            return Err(ValidationError::empty_field("number"));
        }

        let index = self.contacts.len();
        self.contacts.push(EmergencyContact {
            id: ContactId::new(),
            name: name.to_string(),
            relation: relation.trim().to_string(),
            number: number.to_string(),
        });
        Ok(&self.contacts[index])
    }

    /// Removes a contact, returning it if present.
    pub fn remove(&mut self, id: ContactId) -> Option<EmergencyContact> {
        let index = self.contacts.iter().position(|c| c.id == id)?;
        Some(self.contacts.remove(index))
    }

    pub fn list(&self) -> &[EmergencyContact] {
        &self.contacts
    }
}

impl Default for EmergencyContacts {
    fn default() -> Self {
        Self::new()
    }
}
