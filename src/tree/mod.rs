//! Family tree graph: persons, unions and their cross-references.
//!
//! Records are keyed by remote identity (person ID, parent-pair key) while the
//! traversal runs. Serialization numbers are only handed out by
//! [`Tree::renumber`] once the graph is complete.

pub mod builder;

pub use builder::TreeBuilder;

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::model::{ChildTriple, Event, Gender, ParentPair, PersonDetails, SpouseTriple};

/// Surname used when the remote record carries none
pub const UNKNOWN_SURNAME: &str = "Unknown";

/// Identity of a union: the ordered (father, mother) pair.
///
/// Equality is component-wise, so `(F, absent)` and `(absent, F)` are distinct
/// unions, as are `(F, absent)` and `(F, M)`. At least one side is present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnionKey {
    father: Option<String>,
    mother: Option<String>,
}

impl UnionKey {
    /// `None` when both parents are absent
    pub fn new(father: Option<String>, mother: Option<String>) -> Option<Self> {
        if father.is_none() && mother.is_none() {
            return None;
        }
        Some(Self { father, mother })
    }

    pub fn couple(person1: &str, person2: &str) -> Self {
        Self {
            father: Some(person1.to_string()),
            mother: Some(person2.to_string()),
        }
    }

    pub fn father(&self) -> Option<&str> {
        self.father.as_deref()
    }

    pub fn mother(&self) -> Option<&str> {
        self.mother.as_deref()
    }

    /// Present parents, father first
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.father().into_iter().chain(self.mother())
    }
}

impl fmt::Display for UnionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})",
            self.father().unwrap_or("-"),
            self.mother().unwrap_or("-")
        )
    }
}

/// One discovered individual
#[derive(Debug, Clone)]
pub struct Person {
    pub id: String,
    pub num: Option<usize>,
    pub given: String,
    surname: Option<String>,
    pub gender: Gender,
    pub birth: Event,
    pub christening: Event,
    pub death: Event,
    pub burial: Event,
    /// Unions in which this person is a child (FAMC)
    pub child_of: BTreeSet<UnionKey>,
    /// Unions in which this person is a parent (FAMS)
    pub parent_in: BTreeSet<UnionKey>,
    ascend_distance: Option<usize>,
    descend_distance: Option<usize>,
    pub(crate) parents_memo: Option<ParentPair>,
    pub(crate) children_memo: Option<Vec<ChildTriple>>,
    pub(crate) spouses_memo: Option<Vec<SpouseTriple>>,
}

impl Person {
    /// Identity-only record; attributes arrive through [`Person::hydrate`]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            num: None,
            given: String::new(),
            surname: None,
            gender: Gender::Unknown,
            birth: Event::default(),
            christening: Event::default(),
            death: Event::default(),
            burial: Event::default(),
            child_of: BTreeSet::new(),
            parent_in: BTreeSet::new(),
            ascend_distance: None,
            descend_distance: None,
            parents_memo: None,
            children_memo: None,
            spouses_memo: None,
        }
    }

    pub fn hydrate(&mut self, details: PersonDetails) {
        self.given = details.given.unwrap_or_default();
        self.surname = details.surname;
        self.gender = details.gender;
        self.birth = details.birth;
        self.christening = details.christening;
        self.death = details.death;
        self.burial = details.burial;
    }

    pub fn surname(&self) -> &str {
        self.surname.as_deref().unwrap_or(UNKNOWN_SURNAME)
    }

    pub fn ascend_distance(&self) -> Option<usize> {
        self.ascend_distance
    }

    pub fn descend_distance(&self) -> Option<usize> {
        self.descend_distance
    }

    /// Record `distance` if it is the first or a shorter one. Returns whether it changed.
    pub fn lower_ascend_distance(&mut self, distance: usize) -> bool {
        lower(&mut self.ascend_distance, distance)
    }

    /// Record `distance` if it is the first or a shorter one. Returns whether it changed.
    pub fn lower_descend_distance(&mut self, distance: usize) -> bool {
        lower(&mut self.descend_distance, distance)
    }
}

fn lower(slot: &mut Option<usize>, distance: usize) -> bool {
    match *slot {
        Some(current) if current <= distance => false,
        _ => {
            *slot = Some(distance);
            true
        }
    }
}

/// One discovered parent pair (possibly one-sided)
#[derive(Debug, Clone)]
pub struct Union {
    pub key: UnionKey,
    pub num: Option<usize>,
    pub children: BTreeSet<String>,
    pub marriage: Event,
    pub relationship_id: Option<String>,
}

impl Union {
    fn new(key: UnionKey) -> Self {
        Self {
            key,
            num: None,
            children: BTreeSet::new(),
            marriage: Event::default(),
            relationship_id: None,
        }
    }
}

/// What [`Tree::add_couple`] changed
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CoupleOutcome {
    /// Persons created bare, still to be hydrated
    pub new_persons: Vec<String>,
    /// The union learned its relationship ID just now
    pub needs_marriage: bool,
}

/// The family graph built by one run
#[derive(Debug, Default)]
pub struct Tree {
    persons: HashMap<String, Person>,
    person_order: Vec<String>,
    unions: HashMap<UnionKey, Union>,
    union_order: Vec<UnionKey>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a bare person unless one already exists. Returns whether it was created.
    pub fn insert_person(&mut self, id: &str) -> bool {
        if self.persons.contains_key(id) {
            return false;
        }
        self.persons.insert(id.to_string(), Person::new(id));
        self.person_order.push(id.to_string());
        true
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.persons.get(id)
    }

    pub fn person_mut(&mut self, id: &str) -> Option<&mut Person> {
        self.persons.get_mut(id)
    }

    pub fn union(&self, key: &UnionKey) -> Option<&Union> {
        self.unions.get(key)
    }

    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    pub fn union_count(&self) -> usize {
        self.unions.len()
    }

    /// Persons in discovery order
    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.person_order.iter().filter_map(|id| self.persons.get(id))
    }

    /// Unions in discovery order
    pub fn unions(&self) -> impl Iterator<Item = &Union> {
        self.union_order.iter().filter_map(|key| self.unions.get(key))
    }

    fn union_entry(&mut self, key: &UnionKey) -> &mut Union {
        let order = &mut self.union_order;
        self.unions.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            Union::new(key.clone())
        })
    }

    fn link_parents(&mut self, key: &UnionKey, new_persons: &mut Vec<String>) {
        for parent in key.parents() {
            if self.insert_person(parent) {
                new_persons.push(parent.to_string());
            }
            if let Some(person) = self.persons.get_mut(parent) {
                person.parent_in.insert(key.clone());
            }
        }
    }

    /// Merge a (father, mother, child) relation. Returns the persons created bare.
    pub fn add_trio(&mut self, key: &UnionKey, child: &str) -> Vec<String> {
        let mut new_persons = Vec::new();
        self.union_entry(key).children.insert(child.to_string());
        self.link_parents(key, &mut new_persons);
        if self.insert_person(child) {
            new_persons.push(child.to_string());
        }
        if let Some(person) = self.persons.get_mut(child) {
            person.child_of.insert(key.clone());
        }
        new_persons
    }

    /// Merge a couple relation carrying a remote relationship ID.
    pub fn add_couple(&mut self, key: &UnionKey, relationship_id: &str) -> CoupleOutcome {
        let mut outcome = CoupleOutcome::default();
        let union = self.union_entry(key);
        if union.relationship_id.is_none() {
            union.relationship_id = Some(relationship_id.to_string());
            outcome.needs_marriage = true;
        }
        self.link_parents(key, &mut outcome.new_persons);
        outcome
    }

    pub fn set_marriage(&mut self, key: &UnionKey, marriage: Event) {
        if let Some(union) = self.unions.get_mut(key) {
            union.marriage = marriage;
        }
    }

    /// Assign dense serialization numbers 1..N and 1..M in discovery order.
    pub fn renumber(&mut self) {
        for (idx, id) in self.person_order.iter().enumerate() {
            if let Some(person) = self.persons.get_mut(id) {
                person.num = Some(idx + 1);
            }
        }
        for (idx, key) in self.union_order.iter().enumerate() {
            if let Some(union) = self.unions.get_mut(key) {
                union.num = Some(idx + 1);
            }
        }
    }

    pub fn is_numbered(&self) -> bool {
        self.persons.values().all(|p| p.num.is_some())
            && self.unions.values().all(|u| u.num.is_some())
    }
}
