//! Two-pass hierarchy resolver.
//!
//! Pass 1 indexes rows by id and by lowercase name. Pass 2 links every row to
//! its parent using the first present reference (`parent_id`, `orang_tua`,
//! `orangtua`, then an all-digit `bin`), resolving it by id before name.
//! Rows without a resolvable parent become root candidates.

use super::ResolutionError;
use crate::model::person::{normalize_text, PersonRecord};
use crate::model::tree::{FamilyTree, PersonNode, Spouse};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::time::Instant;

/// Conventional id of the family's founding ancestor.
pub const ROOT_SENTINEL_ID: &str = "1";

static PATRONYMIC_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid patronymic id regex"));

/// What to do with root candidates other than the selected root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Drop them from the tree and list them in diagnostics.
    #[default]
    Discard,
    /// Fail with `ResolutionError::MultipleRoots`.
    Reject,
}

/// Resolver configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub orphan_policy: OrphanPolicy,
}

/// Root candidate left out of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscardedRoot {
    pub id: String,
    /// Rows lost with this candidate, itself included.
    pub subtree_size: usize,
}

/// Name collision where a later row lost the name lookup slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShadowedName {
    /// Lowercase, trimmed lookup key.
    pub key: String,
    pub kept_id: String,
    pub shadowed_id: String,
}

/// Lenient fallbacks taken during one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionDiagnostics {
    /// In input order.
    pub discarded_roots: Vec<DiscardedRoot>,
    /// In input order of the shadowed row.
    pub shadowed_names: Vec<ShadowedName>,
}

impl ResolutionDiagnostics {
    /// Total rows not reachable from the selected root.
    pub fn discarded_records(&self) -> usize {
        self.discarded_roots
            .iter()
            .map(|root| root.subtree_size)
            .sum()
    }

    pub fn is_clean(&self) -> bool {
        self.discarded_roots.is_empty() && self.shadowed_names.is_empty()
    }
}

/// Successful resolution output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub tree: FamilyTree,
    pub diagnostics: ResolutionDiagnostics,
}

/// Builds a [`FamilyTree`] from flat person rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyResolver {
    options: ResolveOptions,
}

/// Resolves with default options.
pub fn resolve(records: &[PersonRecord]) -> Result<Resolution, ResolutionError> {
    HierarchyResolver::default().resolve(records)
}

impl HierarchyResolver {
    pub fn new(options: ResolveOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    /// Resolves `records` into one rooted tree.
    ///
    /// # Errors
    /// - `MissingId` / `DuplicateId` when ids are blank or repeated.
    /// - `SelfParentReference` when a row resolves to itself.
    /// - `ParentCycle` when parent chains loop without reaching a root.
    /// - `NoRootFound` for empty input.
    /// - `MultipleRoots` when orphans are rejected and several roots exist.
    pub fn resolve(&self, records: &[PersonRecord]) -> Result<Resolution, ResolutionError> {
        let started_at = Instant::now();
        match self.resolve_inner(records) {
            Ok(resolution) => {
                info!(
                    "event=resolve module=resolve status=ok records={} reachable={} discarded_roots={} discarded_records={} shadowed_names={} duration_ms={}",
                    records.len(),
                    resolution.tree.len(),
                    resolution.diagnostics.discarded_roots.len(),
                    resolution.diagnostics.discarded_records(),
                    resolution.diagnostics.shadowed_names.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(resolution)
            }
            Err(err) => {
                warn!(
                    "event=resolve module=resolve status=error records={} duration_ms={} error_code={} error={}",
                    records.len(),
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn resolve_inner(&self, records: &[PersonRecord]) -> Result<Resolution, ResolutionError> {
        let records = records
            .iter()
            .map(PersonRecord::normalized)
            .collect::<Vec<_>>();
        let index = RecordIndex::build(&records)?;

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
        let mut parents: Vec<Option<usize>> = vec![None; records.len()];
        let mut root_candidates = Vec::new();
        for (position, record) in records.iter().enumerate() {
            match parent_candidate(record).and_then(|candidate| index.lookup(candidate)) {
                Some(parent) if parent == position => {
                    return Err(ResolutionError::SelfParentReference {
                        id: record.id.clone(),
                    });
                }
                Some(parent) => {
                    children[parent].push(position);
                    parents[position] = Some(parent);
                }
                None => root_candidates.push(position),
            }
        }

        let mut reached = vec![false; records.len()];
        let subtree_sizes = root_candidates
            .iter()
            .map(|&candidate| mark_subtree(candidate, &children, &mut reached))
            .collect::<Vec<_>>();
        if reached.iter().any(|seen| !seen) {
            let ids = (0..records.len())
                .filter(|&position| !reached[position] && is_on_cycle(position, &parents))
                .map(|position| records[position].id.clone())
                .collect();
            return Err(ResolutionError::ParentCycle { ids });
        }

        if root_candidates.is_empty() {
            return Err(ResolutionError::NoRootFound);
        }
        if self.options.orphan_policy == OrphanPolicy::Reject && root_candidates.len() > 1 {
            return Err(ResolutionError::MultipleRoots {
                ids: root_candidates
                    .iter()
                    .map(|&position| records[position].id.clone())
                    .collect(),
            });
        }

        let root_slot = root_candidates
            .iter()
            .position(|&position| records[position].id == ROOT_SENTINEL_ID)
            .unwrap_or(0);
        let discarded_roots = root_candidates
            .iter()
            .zip(&subtree_sizes)
            .enumerate()
            .filter(|(slot, _)| *slot != root_slot)
            .map(|(_, (&position, &subtree_size))| DiscardedRoot {
                id: records[position].id.clone(),
                subtree_size,
            })
            .collect::<Vec<_>>();
        if !discarded_roots.is_empty() {
            warn!(
                "event=resolve_orphans module=resolve status=discarded count={} records={}",
                discarded_roots.len(),
                discarded_roots
                    .iter()
                    .map(|root| root.subtree_size)
                    .sum::<usize>()
            );
        }

        let tree = build_tree(&records, &children, root_candidates[root_slot]);
        Ok(Resolution {
            tree,
            diagnostics: ResolutionDiagnostics {
                discarded_roots,
                shadowed_names: index.shadowed,
            },
        })
    }
}

struct RecordIndex<'a> {
    by_id: HashMap<&'a str, usize>,
    by_name: HashMap<String, usize>,
    shadowed: Vec<ShadowedName>,
}

impl<'a> RecordIndex<'a> {
    fn build(records: &'a [PersonRecord]) -> Result<Self, ResolutionError> {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut by_name: HashMap<String, usize> = HashMap::with_capacity(records.len());
        let mut shadowed = Vec::new();

        for (position, record) in records.iter().enumerate() {
            let id = record.id.as_str();
            if id.is_empty() {
                return Err(ResolutionError::MissingId { position });
            }
            if by_id.insert(id, position).is_some() {
                return Err(ResolutionError::DuplicateId { id: id.to_string() });
            }

            let Some(name) = record.name.as_deref() else {
                continue;
            };
            match by_name.entry(name.to_lowercase()) {
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
                Entry::Occupied(slot) => shadowed.push(ShadowedName {
                    key: slot.key().clone(),
                    kept_id: records[*slot.get()].id.clone(),
                    shadowed_id: id.to_string(),
                }),
            }
        }

        Ok(Self {
            by_id,
            by_name,
            shadowed,
        })
    }

    fn lookup(&self, identifier: &str) -> Option<usize> {
        self.by_id
            .get(identifier)
            .or_else(|| self.by_name.get(&identifier.to_lowercase()))
            .copied()
    }
}

/// First present parent reference, in precedence order.
fn parent_candidate(record: &PersonRecord) -> Option<&str> {
    [&record.parent_id, &record.parent_ref, &record.parent_ref_alt]
        .into_iter()
        .find_map(|field| field.as_deref().and_then(normalize_text))
        .or_else(|| {
            record
                .patronymic
                .as_deref()
                .and_then(normalize_text)
                .filter(|value| PATRONYMIC_ID_RE.is_match(value))
        })
}

fn mark_subtree(root: usize, children: &[Vec<usize>], reached: &mut [bool]) -> usize {
    let mut size = 0;
    let mut queue = VecDeque::from([root]);
    while let Some(position) = queue.pop_front() {
        reached[position] = true;
        size += 1;
        queue.extend(children[position].iter().copied());
    }
    size
}

fn is_on_cycle(start: usize, parents: &[Option<usize>]) -> bool {
    let mut cursor = parents[start];
    let mut steps = 0;
    while let Some(current) = cursor {
        if current == start {
            return true;
        }
        steps += 1;
        if steps > parents.len() {
            return false;
        }
        cursor = parents[current];
    }
    false
}

fn build_tree(records: &[PersonRecord], children: &[Vec<usize>], root: usize) -> FamilyTree {
    let mut order = Vec::new();
    let mut queue = VecDeque::from([root]);
    while let Some(position) = queue.pop_front() {
        order.push(position);
        queue.extend(children[position].iter().copied());
    }

    // Reverse breadth-first order builds every child before its parent.
    let mut built: Vec<Option<PersonNode>> = (0..records.len()).map(|_| None).collect();
    for &position in order.iter().skip(1).rev() {
        let node = assemble_node(records, children, &mut built, position);
        built[position] = Some(node);
    }
    FamilyTree::new(assemble_node(records, children, &mut built, root))
}

fn assemble_node(
    records: &[PersonRecord],
    children: &[Vec<usize>],
    built: &mut [Option<PersonNode>],
    position: usize,
) -> PersonNode {
    let record = &records[position];
    let kids = children[position]
        .iter()
        .filter_map(|&child| built[child].take())
        .collect();
    let spouse = record.spouse_name.as_ref().map(|name| Spouse {
        name: name.clone(),
        photo: record.spouse_photo.clone(),
    });
    PersonNode::new(record.clone(), kids, spouse)
}

#[cfg(test)]
mod tests {
    use super::{is_on_cycle, parent_candidate};
    use crate::model::person::PersonRecord;

    #[test]
    fn parent_candidate_follows_field_precedence() {
        let mut record = PersonRecord::new("9", "Nine").with_patronymic("4");
        assert_eq!(parent_candidate(&record), Some("4"));

        record.parent_ref_alt = Some("3".to_string());
        assert_eq!(parent_candidate(&record), Some("3"));

        record.parent_ref = Some("Budi".to_string());
        assert_eq!(parent_candidate(&record), Some("Budi"));

        record.parent_id = Some("1".to_string());
        assert_eq!(parent_candidate(&record), Some("1"));
    }

    #[test]
    fn sentinel_parent_fields_fall_through() {
        let mut record = PersonRecord::new("9", "Nine").with_patronymic("2");
        record.parent_id = Some(" - ".to_string());
        record.parent_ref = Some("   ".to_string());
        assert_eq!(parent_candidate(&record), Some("2"));
    }

    #[test]
    fn patronymic_must_be_all_digits() {
        for value in ["Alm. Kyai Munajad", "12a", "bin 12", "1 2", "١٢"] {
            let record = PersonRecord::new("9", "Nine").with_patronymic(value);
            assert_eq!(parent_candidate(&record), None, "value {value:?}");
        }
        let record = PersonRecord::new("9", "Nine").with_patronymic(" 12 ");
        assert_eq!(parent_candidate(&record), Some("12"));
    }

    #[test]
    fn cycle_detection_ignores_chains_hanging_below_a_loop() {
        // 0 <-> 1, 2 -> 0
        let parents = [Some(1), Some(0), Some(0)];
        assert!(is_on_cycle(0, &parents));
        assert!(is_on_cycle(1, &parents));
        assert!(!is_on_cycle(2, &parents));
    }
}
