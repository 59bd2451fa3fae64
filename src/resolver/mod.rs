//! Relationship resolver: typed lookups over the platform's JSON resources.
//!
//! Every lookup issues exactly one fetch. "No content" and documents of an
//! unexpected shape both come back as an empty or absent result; the latter
//! is logged first.

mod dto;

#[cfg(test)]
pub(crate) mod fixtures;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AncestryError, Result};
use crate::fetch::Fetcher;
use crate::model::{ChildTriple, Event, Gender, ParentPair, PersonDetails, SpouseTriple};
use dto::{
    ChildAndParentsDocument, FactDto, PersonsDocument, RelationshipsDocument, UsersDocument,
};

/// Wraps a [`Fetcher`] and knows the platform's URL layout
pub struct Resolver<F> {
    fetcher: F,
    platform_url: String,
}

impl<F: Fetcher> Resolver<F> {
    pub fn new(fetcher: F, platform_url: &str) -> Self {
        Self {
            fetcher,
            platform_url: platform_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn person_url(&self, id: &str) -> String {
        format!("{}/tree/persons/{}.json", self.platform_url, id)
    }

    pub fn parents_url(&self, id: &str) -> String {
        format!("{}/tree/persons/{}/parents.json", self.platform_url, id)
    }

    pub fn children_url(&self, id: &str) -> String {
        format!("{}/tree/persons/{}/children.json", self.platform_url, id)
    }

    pub fn spouses_url(&self, id: &str) -> String {
        format!("{}/tree/persons/{}/spouses.json", self.platform_url, id)
    }

    pub fn couple_url(&self, relationship_id: &str) -> String {
        format!("{}/tree/couple-relationships/{}.json", self.platform_url, relationship_id)
    }

    pub fn current_user_url(&self) -> String {
        format!("{}/users/current.json", self.platform_url)
    }

    /// Fetch and decode one document, folding every failure into `None`
    async fn fetch_doc<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        let value: Value = self.fetcher.fetch_json(url).await?;
        match serde_json::from_value(value) {
            Ok(doc) => Some(doc),
            Err(e) => {
                log::warn!("Unexpected document from {}: {}", url, e);
                None
            }
        }
    }

    /// Person ID of the logged-in account
    pub async fn current_user_id(&self) -> Result<String> {
        let url = self.current_user_url();
        self.fetch_doc::<UsersDocument>(&url)
            .await
            .and_then(|doc| doc.users.into_iter().next())
            .and_then(|user| user.person_id)
            .ok_or_else(|| {
                AncestryError::InvalidInput(format!("no person ID for the current user at {}", url))
            })
    }

    /// Names, gender and life events of a person
    pub async fn person(&self, id: &str) -> Option<PersonDetails> {
        let doc: PersonsDocument = self.fetch_doc(&self.person_url(id)).await?;
        let person = doc.persons.into_iter().next()?;
        let mut details = PersonDetails::default();

        let parts = person
            .names
            .first()
            .and_then(|name| name.name_forms.first())
            .map(|form| form.parts.as_slice())
            .unwrap_or_default();
        for part in parts {
            match part.kind.as_str() {
                dto::GIVEN => details.given = Some(part.value.clone()),
                dto::SURNAME => details.surname = Some(part.value.clone()),
                _ => {}
            }
        }

        details.gender = match person.gender.as_ref().map(|g| g.kind.as_str()) {
            Some(dto::MALE) => Gender::Male,
            Some(dto::FEMALE) => Gender::Female,
            _ => Gender::Unknown,
        };

        for fact in &person.facts {
            let slot = match fact.kind.as_str() {
                dto::BIRTH => &mut details.birth,
                dto::CHRISTENING => &mut details.christening,
                dto::DEATH => &mut details.death,
                dto::BURIAL => &mut details.burial,
                _ => continue,
            };
            *slot = fact_event(fact);
        }

        Some(details)
    }

    /// Father and mother of a person; both absent when unknown
    pub async fn parents_of(&self, id: &str) -> ParentPair {
        let Some(doc) = self
            .fetch_doc::<ChildAndParentsDocument>(&self.parents_url(id))
            .await
        else {
            return ParentPair::default();
        };
        match doc.child_and_parents_relationships.into_iter().next() {
            Some(rel) => ParentPair {
                father: rel.father.map(|r| r.resource_id),
                mother: rel.mother.map(|r| r.resource_id),
            },
            None => ParentPair::default(),
        }
    }

    /// Every (father, mother, child) grouping in which the person is a parent
    pub async fn children_of(&self, id: &str) -> Vec<ChildTriple> {
        let Some(doc) = self
            .fetch_doc::<ChildAndParentsDocument>(&self.children_url(id))
            .await
        else {
            return Vec::new();
        };
        doc.child_and_parents_relationships
            .into_iter()
            .filter_map(|rel| match rel.child {
                Some(child) => Some(ChildTriple {
                    father: rel.father.map(|r| r.resource_id),
                    mother: rel.mother.map(|r| r.resource_id),
                    child: child.resource_id,
                }),
                None => {
                    log::warn!("Child relationship without a child for {}", id);
                    None
                }
            })
            .collect()
    }

    /// Every couple relationship the person takes part in
    pub async fn spouses_of(&self, id: &str) -> Vec<SpouseTriple> {
        let Some(doc) = self
            .fetch_doc::<RelationshipsDocument>(&self.spouses_url(id))
            .await
        else {
            return Vec::new();
        };
        doc.relationships
            .into_iter()
            .filter_map(|rel| match (rel.person1, rel.person2, rel.id) {
                (Some(p1), Some(p2), Some(rel_id)) => Some(SpouseTriple {
                    person1: p1.resource_id,
                    person2: p2.resource_id,
                    relationship_id: rel_id,
                }),
                _ => {
                    log::warn!("Incomplete couple relationship for {}", id);
                    None
                }
            })
            .collect()
    }

    /// Marriage date and place of a couple relationship
    pub async fn marriage(&self, relationship_id: &str) -> Option<Event> {
        let doc: RelationshipsDocument = self.fetch_doc(&self.couple_url(relationship_id)).await?;
        let rel = doc.relationships.into_iter().next()?;
        rel.facts.first().map(fact_event)
    }
}

fn fact_event(fact: &FactDto) -> Event {
    Event::new(
        fact.date.as_ref().and_then(|d| d.original.clone()),
        fact.place.as_ref().and_then(|p| p.original.clone()),
    )
}
