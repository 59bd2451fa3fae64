//! Two bounded breadth-first traversals (ancestors, descendants) over one graph.
//!
//! Frontier levels are ordered sets and always yield their smallest ID first,
//! so a run against unchanged remote data discovers, and therefore numbers,
//! records in the same order every time.

use std::collections::BTreeSet;

use super::{Tree, UnionKey};
use crate::fetch::Fetcher;
use crate::model::{ChildTriple, ParentPair, SpouseTriple};
use crate::resolver::Resolver;

/// Generation bounds of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Depth {
    pub ascend: usize,
    pub descend: usize,
}

/// Builds a [`Tree`] by crawling relationships through a [`Resolver`]
pub struct TreeBuilder<F> {
    resolver: Resolver<F>,
    tree: Tree,
}

impl<F: Fetcher> TreeBuilder<F> {
    pub fn new(resolver: Resolver<F>) -> Self {
        Self {
            resolver,
            tree: Tree::new(),
        }
    }

    /// Crawl from `roots` and return the finished, un-numbered graph.
    pub async fn build(mut self, roots: &[String], depth: Depth) -> Tree {
        let mut ascending = vec![BTreeSet::new(); depth.ascend + 1];
        let mut descending = vec![BTreeSet::new(); depth.descend + 1];

        for id in roots {
            self.ensure_person(id).await;
            if let Some(person) = self.tree.person_mut(id) {
                person.lower_ascend_distance(0);
                person.lower_descend_distance(0);
            }
            ascending[0].insert(id.clone());
            descending[0].insert(id.clone());
        }

        self.ascend(&mut ascending, &mut descending[0]).await;
        self.descend(&mut descending).await;

        log::info!(
            "Traversal complete: {} individuals, {} families",
            self.tree.person_count(),
            self.tree.union_count()
        );
        self.tree
    }

    /// Ancestors, plus the full sibling sets of every ancestor found.
    ///
    /// Siblings not yet tracked in either direction are seeded into `seeds`,
    /// the descend frontier at distance 0, so their own families get crawled.
    async fn ascend(&mut self, frontier: &mut [BTreeSet<String>], seeds: &mut BTreeSet<String>) {
        for generation in 0..frontier.len().saturating_sub(1) {
            log::info!(
                "Ascending generation {}: {} individuals to expand",
                generation,
                frontier[generation].len()
            );
            while let Some(id) = frontier[generation].pop_first() {
                let parents = self.parents_of(&id).await;
                let Some(key) = UnionKey::new(parents.father, parents.mother) else {
                    continue;
                };
                self.record_trio(&key, &id).await;

                for parent in key.parents() {
                    let closer = self
                        .tree
                        .person_mut(parent)
                        .is_some_and(|p| p.lower_ascend_distance(generation + 1));
                    if closer {
                        frontier[generation + 1].insert(parent.to_string());
                    }

                    for sibling in self.family_of(parent).await {
                        if let Some(person) = self.tree.person_mut(&sibling) {
                            if person.ascend_distance().is_none()
                                && person.descend_distance().is_none()
                            {
                                person.lower_descend_distance(0);
                                seeds.insert(sibling);
                            }
                        }
                    }
                }
            }
        }
    }

    async fn descend(&mut self, frontier: &mut [BTreeSet<String>]) {
        for generation in 0..frontier.len().saturating_sub(1) {
            log::info!(
                "Descending generation {}: {} individuals to expand",
                generation,
                frontier[generation].len()
            );
            while let Some(id) = frontier[generation].pop_first() {
                for child in self.family_of(&id).await {
                    let closer = self
                        .tree
                        .person_mut(&child)
                        .is_some_and(|p| p.lower_descend_distance(generation + 1));
                    if closer {
                        // spouses of the last generation still get their union
                        self.record_spouses(&child).await;
                        frontier[generation + 1].insert(child);
                    }
                }
            }
        }
    }

    /// Merge all spouses and children of `id`; returns the child IDs.
    async fn family_of(&mut self, id: &str) -> Vec<String> {
        self.record_spouses(id).await;

        let mut children = Vec::new();
        for triple in self.children_of(id).await {
            let Some(key) = UnionKey::new(triple.father, triple.mother) else {
                log::warn!("Skipping child {} of {} with no parents", triple.child, id);
                continue;
            };
            self.record_trio(&key, &triple.child).await;
            children.push(triple.child);
        }
        children
    }

    async fn record_trio(&mut self, key: &UnionKey, child: &str) {
        for id in self.tree.add_trio(key, child) {
            self.hydrate(&id).await;
        }
    }

    async fn record_spouses(&mut self, id: &str) {
        for spouse in self.spouses_of(id).await {
            let key = UnionKey::couple(&spouse.person1, &spouse.person2);
            let outcome = self.tree.add_couple(&key, &spouse.relationship_id);
            for new_id in &outcome.new_persons {
                self.hydrate(new_id).await;
            }
            if outcome.needs_marriage {
                if let Some(marriage) = self.resolver.marriage(&spouse.relationship_id).await {
                    self.tree.set_marriage(&key, marriage);
                }
            }
        }
    }

    async fn ensure_person(&mut self, id: &str) {
        if self.tree.insert_person(id) {
            self.hydrate(id).await;
        }
    }

    async fn hydrate(&mut self, id: &str) {
        match self.resolver.person(id).await {
            Some(details) => {
                if let Some(person) = self.tree.person_mut(id) {
                    person.hydrate(details);
                }
            }
            None => log::debug!("No details for {}", id),
        }
    }

    async fn parents_of(&mut self, id: &str) -> ParentPair {
        if let Some(memo) = self.tree.person(id).and_then(|p| p.parents_memo.clone()) {
            return memo;
        }
        let parents = self.resolver.parents_of(id).await;
        if let Some(person) = self.tree.person_mut(id) {
            person.parents_memo = Some(parents.clone());
        }
        parents
    }

    async fn children_of(&mut self, id: &str) -> Vec<ChildTriple> {
        if let Some(memo) = self.tree.person(id).and_then(|p| p.children_memo.clone()) {
            return memo;
        }
        let children = self.resolver.children_of(id).await;
        if let Some(person) = self.tree.person_mut(id) {
            person.children_memo = Some(children.clone());
        }
        children
    }

    async fn spouses_of(&mut self, id: &str) -> Vec<SpouseTriple> {
        if let Some(memo) = self.tree.person(id).and_then(|p| p.spouses_memo.clone()) {
            return memo;
        }
        let spouses = self.resolver.spouses_of(id).await;
        if let Some(person) = self.tree.person_mut(id) {
            person.spouses_memo = Some(spouses.clone());
        }
        spouses
    }
}
