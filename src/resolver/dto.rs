//! Subset of the GEDCOM X JSON documents returned by the platform API.

use serde::Deserialize;

pub(crate) const GIVEN: &str = "http://gedcomx.org/Given";
pub(crate) const SURNAME: &str = "http://gedcomx.org/Surname";
pub(crate) const MALE: &str = "http://gedcomx.org/Male";
pub(crate) const FEMALE: &str = "http://gedcomx.org/Female";
pub(crate) const BIRTH: &str = "http://gedcomx.org/Birth";
pub(crate) const CHRISTENING: &str = "http://gedcomx.org/Christening";
pub(crate) const DEATH: &str = "http://gedcomx.org/Death";
pub(crate) const BURIAL: &str = "http://gedcomx.org/Burial";

#[derive(Debug, Deserialize)]
pub(crate) struct PersonsDocument {
    #[serde(default)]
    pub persons: Vec<PersonDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PersonDto {
    #[serde(default)]
    pub names: Vec<NameDto>,
    pub gender: Option<TypedDto>,
    #[serde(default)]
    pub facts: Vec<FactDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NameDto {
    #[serde(default)]
    pub name_forms: Vec<NameFormDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NameFormDto {
    #[serde(default)]
    pub parts: Vec<NamePartDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamePartDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TypedDto {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FactDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: Option<OriginalDto>,
    pub place: Option<OriginalDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OriginalDto {
    pub original: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChildAndParentsDocument {
    #[serde(default)]
    pub child_and_parents_relationships: Vec<ChildAndParentsDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChildAndParentsDto {
    pub father: Option<ResourceRef>,
    pub mother: Option<ResourceRef>,
    pub child: Option<ResourceRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResourceRef {
    pub resource_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RelationshipsDocument {
    #[serde(default)]
    pub relationships: Vec<RelationshipDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RelationshipDto {
    pub id: Option<String>,
    pub person1: Option<ResourceRef>,
    pub person2: Option<ResourceRef>,
    #[serde(default)]
    pub facts: Vec<FactDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersDocument {
    #[serde(default)]
    pub users: Vec<UserDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDto {
    pub person_id: Option<String>,
}
