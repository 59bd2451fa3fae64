//! Value types shared by the relationship resolver and the family tree.

/// Gender as reported by the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// GEDCOM `SEX` value, `None` when unknown
    pub fn gedcom_code(self) -> Option<&'static str> {
        match self {
            Gender::Male => Some("M"),
            Gender::Female => Some("F"),
            Gender::Unknown => None,
        }
    }
}

/// A dated and/or placed life event. Either half may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Event {
    pub date: Option<String>,
    pub place: Option<String>,
}

impl Event {
    pub fn new(date: Option<String>, place: Option<String>) -> Self {
        Self { date, place }
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.place.is_none()
    }
}

/// Person attributes fetched from the remote service
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonDetails {
    pub given: Option<String>,
    pub surname: Option<String>,
    pub gender: Gender,
    pub birth: Event,
    pub christening: Event,
    pub death: Event,
    pub burial: Event,
}

/// Result of a parents lookup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParentPair {
    pub father: Option<String>,
    pub mother: Option<String>,
}

impl ParentPair {
    pub fn is_empty(&self) -> bool {
        self.father.is_none() && self.mother.is_none()
    }
}

/// One (father, mother, child) entry of a children lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildTriple {
    pub father: Option<String>,
    pub mother: Option<String>,
    pub child: String,
}

/// One couple relationship of a spouses lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpouseTriple {
    pub person1: String,
    pub person2: String,
    pub relationship_id: String,
}
