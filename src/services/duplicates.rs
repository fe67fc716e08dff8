//! Identity matching against a registry snapshot

use uuid::Uuid;

use crate::types::PersonRecord;

/// Identity triple in comparison form (trimmed, lower-cased)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub surname: String,
    pub name: String,
    pub patronymic: String,
}

impl Identity {
    pub fn new(surname: &str, name: &str, patronymic: &str) -> Self {
        Self {
            surname: surname.trim().to_lowercase(),
            name: name.trim().to_lowercase(),
            patronymic: patronymic.trim().to_lowercase(),
        }
    }

    pub fn of(person: &PersonRecord) -> Self {
        Self::new(&person.surname, &person.name, &person.patronymic)
    }

    /// Exact triple, or (surname, name) when either patronymic is blank.
    /// The fallback can merge two different people sharing a name.
    pub fn matches(&self, other: &Identity) -> bool {
        if self.surname != other.surname || self.name != other.name {
            return false;
        }
        self.patronymic.is_empty() || other.patronymic.is_empty() || self.patronymic == other.patronymic
    }
}

/// What to do with an incoming record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Insert,
    Update(Uuid),
    Reject,
}

/// Duplicate lookup over the registry as it was at batch start, plus
/// whatever the batch itself has written since
pub struct DuplicateResolver {
    snapshot: Vec<PersonRecord>,
    update_existing: bool,
}

impl DuplicateResolver {
    pub fn new(snapshot: Vec<PersonRecord>, update_existing: bool) -> Self {
        Self {
            snapshot,
            update_existing,
        }
    }

    /// First snapshot record with the same identity
    pub fn find(&self, person: &PersonRecord) -> Option<&PersonRecord> {
        let identity = Identity::of(person);
        self.snapshot
            .iter()
            .find(|existing| identity.matches(&Identity::of(existing)))
    }

    pub fn decide(&self, person: &PersonRecord) -> Decision {
        match self.find(person) {
            None => Decision::Insert,
            Some(existing) => match (self.update_existing, existing.id) {
                (true, Some(id)) => Decision::Update(id),
                _ => Decision::Reject,
            },
        }
    }

    /// Record a successful insert or update so later rows in the batch see it
    pub fn remember(&mut self, person: PersonRecord) {
        if let Some(id) = person.id {
            if let Some(slot) = self.snapshot.iter_mut().find(|p| p.id == Some(id)) {
                *slot = person;
                return;
            }
        }
        self.snapshot.push(person);
    }
}
