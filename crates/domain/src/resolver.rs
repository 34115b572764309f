//! Merging of own and inherited access control entries.
//!
//! Resolution works per principal id:
//!
//! ```text
//! own entry with overwrite flag  -> own set only
//! otherwise                      -> merge(inherited...) merged with own set, if any
//! ```
//!
//! Group membership is never expanded here. A user that holds entries as
//! itself and through groups gets one resolution per principal id.

use std::collections::BTreeMap;

use folio_core::PrincipalId;
use serde::Serialize;

use crate::{AccessControlEntry, PermissionSet, PrincipalKind, ResourcePath};

/// Entries attached to one ancestor folder, as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorEntries {
    /// Ancestor folder path.
    pub folder: ResourcePath,
    /// Every entry stored on the folder, inheritable or not.
    pub entries: Vec<AccessControlEntry>,
}

/// Entry seen through an ancestor folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InheritedEntry {
    distance: usize,
    entry: AccessControlEntry,
}

impl InheritedEntry {
    /// Returns how many levels up the entry was found; the parent is 1.
    #[must_use]
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// Returns the stored entry.
    #[must_use]
    pub fn entry(&self) -> &AccessControlEntry {
        &self.entry
    }
}

/// Own and inherited entries of one principal with their merged result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntry {
    principal_id: PrincipalId,
    principal_kind: PrincipalKind,
    own: Option<AccessControlEntry>,
    inherited: Vec<InheritedEntry>,
    effective: PermissionSet,
}

impl ResolvedEntry {
    /// Returns the principal this resolution belongs to.
    #[must_use]
    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    /// Returns whether the principal is a user or a group.
    #[must_use]
    pub fn principal_kind(&self) -> PrincipalKind {
        self.principal_kind
    }

    /// Returns the entry stored directly on the resource, if any.
    #[must_use]
    pub fn own(&self) -> Option<&AccessControlEntry> {
        self.own.as_ref()
    }

    /// Returns entries contributed by ancestors, nearest first.
    #[must_use]
    pub fn inherited(&self) -> &[InheritedEntry] {
        &self.inherited
    }

    /// Returns the merged permission set.
    #[must_use]
    pub fn effective(&self) -> PermissionSet {
        self.effective
    }

    /// Returns whether inherited entries were discarded by the own entry.
    #[must_use]
    pub fn is_overwriting(&self) -> bool {
        self.own
            .as_ref()
            .is_some_and(AccessControlEntry::overwrites_inherited)
    }
}

/// Per-principal access control list rebuilt for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessControlList {
    resource: ResourcePath,
    entries: BTreeMap<PrincipalId, ResolvedEntry>,
}

struct PrincipalAccumulator {
    kind: PrincipalKind,
    own: Option<AccessControlEntry>,
    inherited: Vec<InheritedEntry>,
}

impl AccessControlList {
    /// Resolves the list for `resource`.
    ///
    /// `ancestors` must be ordered nearest first. Entries on ancestors that do
    /// not carry the inherit flag are ignored.
    #[must_use]
    pub fn resolve(
        resource: ResourcePath,
        own_entries: Vec<AccessControlEntry>,
        ancestors: Vec<AncestorEntries>,
    ) -> Self {
        let mut accumulators: BTreeMap<PrincipalId, PrincipalAccumulator> = BTreeMap::new();

        for entry in own_entries {
            let accumulator = accumulators
                .entry(entry.principal_id())
                .or_insert_with(|| PrincipalAccumulator {
                    kind: entry.principal_kind(),
                    own: None,
                    inherited: Vec::new(),
                });
            accumulator.kind = entry.principal_kind();
            accumulator.own = Some(match accumulator.own.take() {
                // A store holding two own entries for one principal is
                // read as a single entry carrying both.
                Some(existing) => {
                    let overwrite =
                        existing.overwrites_inherited() || entry.overwrites_inherited();
                    let inherit = existing.inherit_to_children() || entry.inherit_to_children();
                    let permissions = existing.permissions().merge(&entry.permissions());
                    existing
                        .with_permissions(permissions)
                        .with_overwrites_inherited(overwrite)
                        .with_inherit_to_children(inherit)
                }
                None => entry,
            });
        }

        for (index, ancestor) in ancestors.into_iter().enumerate() {
            let distance = index + 1;
            for entry in ancestor
                .entries
                .into_iter()
                .filter(AccessControlEntry::inherit_to_children)
            {
                accumulators
                    .entry(entry.principal_id())
                    .or_insert_with(|| PrincipalAccumulator {
                        kind: entry.principal_kind(),
                        own: None,
                        inherited: Vec::new(),
                    })
                    .inherited
                    .push(InheritedEntry { distance, entry });
            }
        }

        let entries = accumulators
            .into_iter()
            .map(|(principal_id, accumulator)| {
                let effective = merge_for_principal(&accumulator);
                (
                    principal_id,
                    ResolvedEntry {
                        principal_id,
                        principal_kind: accumulator.kind,
                        own: accumulator.own,
                        inherited: accumulator.inherited,
                        effective,
                    },
                )
            })
            .collect();

        Self { resource, entries }
    }

    /// Returns the resource the list was resolved for.
    #[must_use]
    pub fn resource(&self) -> &ResourcePath {
        &self.resource
    }

    /// Returns the resolution for one principal, if any entry applies.
    #[must_use]
    pub fn entry(&self, principal_id: PrincipalId) -> Option<&ResolvedEntry> {
        self.entries.get(&principal_id)
    }

    /// Returns the merged set for one principal, or `None` when no entry applies.
    #[must_use]
    pub fn effective_permission(&self, principal_id: PrincipalId) -> Option<PermissionSet> {
        self.entry(principal_id).map(ResolvedEntry::effective)
    }

    /// Iterates resolutions ordered by principal id.
    pub fn entries(&self) -> impl Iterator<Item = &ResolvedEntry> {
        self.entries.values()
    }

    /// Returns the number of principals with at least one entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no principal has an entry on the chain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn merge_for_principal(accumulator: &PrincipalAccumulator) -> PermissionSet {
    if let Some(own) = accumulator
        .own
        .as_ref()
        .filter(|own| own.overwrites_inherited())
    {
        return own.permissions();
    }

    let inherited = accumulator
        .inherited
        .iter()
        .fold(PermissionSet::empty(), |merged, inherited| {
            merged.merge(&inherited.entry.permissions())
        });

    match accumulator.own.as_ref() {
        Some(own) => inherited.merge(&own.permissions()),
        None => inherited,
    }
}

#[cfg(test)]
mod tests {
    use folio_core::PrincipalId;
    use proptest::prelude::*;

    use crate::{
        AccessControlEntry, PermissionBits, PermissionKind, PermissionSet, PrincipalKind,
        ResourcePath,
    };

    use super::{AccessControlList, AncestorEntries};

    fn path(value: &str) -> ResourcePath {
        ResourcePath::new(value).unwrap_or_else(|error| panic!("{value}: {error}"))
    }

    fn entry(
        resource: &str,
        principal_id: PrincipalId,
        allowed: &[PermissionKind],
        denied: &[PermissionKind],
    ) -> AccessControlEntry {
        AccessControlEntry::new(
            path(resource),
            principal_id,
            PrincipalKind::Group,
            PermissionSet::from_kinds(allowed, denied),
        )
    }

    fn editors_chain(editors: PrincipalId) -> Vec<AncestorEntries> {
        vec![
            AncestorEntries {
                folder: path("/a/b/"),
                entries: vec![
                    entry("/a/b/", editors, &[PermissionKind::Write], &[])
                        .with_inherit_to_children(true),
                ],
            },
            AncestorEntries {
                folder: path("/a/"),
                entries: vec![
                    entry("/a/", editors, &[PermissionKind::Read], &[])
                        .with_inherit_to_children(true),
                ],
            },
            AncestorEntries {
                folder: ResourcePath::root(),
                entries: Vec::new(),
            },
        ]
    }

    #[test]
    fn inherited_entries_from_every_ancestor_are_merged() {
        let editors = PrincipalId::new();
        let list =
            AccessControlList::resolve(path("/a/b/c.html"), Vec::new(), editors_chain(editors));

        let effective = list.effective_permission(editors);
        assert_eq!(
            effective,
            Some(PermissionSet::from_kinds(
                &[PermissionKind::Write, PermissionKind::Read],
                &[]
            ))
        );

        let distances: Vec<usize> = list
            .entry(editors)
            .map(|resolved| resolved.inherited().iter().map(|e| e.distance()).collect())
            .unwrap_or_default();
        assert_eq!(distances, vec![1, 2]);
    }

    #[test]
    fn overwriting_own_entry_discards_inherited_grants() {
        let editors = PrincipalId::new();
        let own = entry("/a/b/c.html", editors, &[PermissionKind::Read], &[])
            .with_overwrites_inherited(true);
        let list =
            AccessControlList::resolve(path("/a/b/c.html"), vec![own], editors_chain(editors));

        assert_eq!(
            list.effective_permission(editors),
            Some(PermissionSet::from_kinds(&[PermissionKind::Read], &[]))
        );
        assert!(list.entry(editors).is_some_and(|resolved| resolved.is_overwriting()));
    }

    #[test]
    fn own_entry_without_overwrite_is_merged_with_inherited() {
        let editors = PrincipalId::new();
        let own = entry(
            "/a/b/c.html",
            editors,
            &[PermissionKind::View],
            &[PermissionKind::Write],
        );
        let list =
            AccessControlList::resolve(path("/a/b/c.html"), vec![own], editors_chain(editors));

        let Some(effective) = list.effective_permission(editors) else {
            panic!("editors should resolve");
        };
        assert!(effective.is_effectively_allowed(PermissionKind::Read));
        assert!(effective.is_effectively_allowed(PermissionKind::View));
        assert!(effective.is_allowed(PermissionKind::Write));
        assert!(!effective.is_effectively_allowed(PermissionKind::Write));
    }

    #[test]
    fn non_inheritable_ancestor_entries_are_ignored() {
        let editors = PrincipalId::new();
        let chain = vec![AncestorEntries {
            folder: path("/a/"),
            entries: vec![entry("/a/", editors, &[PermissionKind::Write], &[])],
        }];
        let list = AccessControlList::resolve(path("/a/c.html"), Vec::new(), chain);

        assert!(list.effective_permission(editors).is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn root_resolves_only_own_entries() {
        let editors = PrincipalId::new();
        let own = entry("/", editors, &[PermissionKind::Control], &[]);
        let list = AccessControlList::resolve(ResourcePath::root(), vec![own], Vec::new());

        assert_eq!(list.len(), 1);
        assert!(
            list.entry(editors)
                .is_some_and(|resolved| resolved.inherited().is_empty())
        );
    }

    #[test]
    fn principals_are_resolved_independently() {
        let editors = PrincipalId::new();
        let alice = PrincipalId::new();
        let list =
            AccessControlList::resolve(path("/a/b/c.html"), Vec::new(), editors_chain(editors));

        assert!(list.effective_permission(alice).is_none());
    }

    fn bits() -> impl Strategy<Value = PermissionBits> {
        (0_u8..32).prop_map(PermissionBits::from_bits_truncate)
    }

    proptest! {
        #[test]
        fn overwrite_depends_only_on_own_entry(
            own_allowed in bits(),
            own_denied in bits(),
            inherited in proptest::collection::vec((bits(), bits(), any::<bool>()), 0..6),
        ) {
            let principal = PrincipalId::new();
            let own_permissions = PermissionSet::new(own_allowed, own_denied);
            let own = AccessControlEntry::new(
                path("/a/b/c.html"),
                principal,
                PrincipalKind::User,
                own_permissions,
            )
            .with_overwrites_inherited(true);
            let chain = inherited
                .into_iter()
                .map(|(allowed, denied, inherit)| AncestorEntries {
                    folder: path("/a/"),
                    entries: vec![
                        AccessControlEntry::new(
                            path("/a/"),
                            principal,
                            PrincipalKind::User,
                            PermissionSet::new(allowed, denied),
                        )
                        .with_inherit_to_children(inherit),
                    ],
                })
                .collect();

            let list = AccessControlList::resolve(path("/a/b/c.html"), vec![own], chain);
            prop_assert_eq!(list.effective_permission(principal), Some(own_permissions));
        }

        #[test]
        fn inheritable_allowed_bits_reach_descendants(
            allowed in bits(),
            other_allowed in bits(),
            own_allowed in proptest::option::of(bits()),
        ) {
            let principal = PrincipalId::new();
            let chain = vec![
                AncestorEntries {
                    folder: path("/a/b/"),
                    entries: vec![
                        AccessControlEntry::new(
                            path("/a/b/"),
                            principal,
                            PrincipalKind::Group,
                            PermissionSet::new(other_allowed, PermissionBits::empty()),
                        )
                        .with_inherit_to_children(true),
                    ],
                },
                AncestorEntries {
                    folder: path("/a/"),
                    entries: vec![
                        AccessControlEntry::new(
                            path("/a/"),
                            principal,
                            PrincipalKind::Group,
                            PermissionSet::new(allowed, PermissionBits::empty()),
                        )
                        .with_inherit_to_children(true),
                    ],
                },
            ];
            let own = own_allowed
                .map(|own_allowed| {
                    AccessControlEntry::new(
                        path("/a/b/c.html"),
                        principal,
                        PrincipalKind::Group,
                        PermissionSet::new(own_allowed, PermissionBits::empty()),
                    )
                })
                .into_iter()
                .collect();

            let list = AccessControlList::resolve(path("/a/b/c.html"), own, chain);
            let effective = list.effective_permission(principal).unwrap_or_default();
            prop_assert!(effective.allowed().contains(allowed));
        }

        #[test]
        fn resolution_is_deterministic(allowed in bits(), denied in bits()) {
            let principal = PrincipalId::new();
            let build = || {
                AccessControlList::resolve(
                    path("/a/c.html"),
                    Vec::new(),
                    vec![AncestorEntries {
                        folder: path("/a/"),
                        entries: vec![
                            AccessControlEntry::new(
                                path("/a/"),
                                principal,
                                PrincipalKind::Group,
                                PermissionSet::new(allowed, denied),
                            )
                            .with_inherit_to_children(true),
                        ],
                    }],
                )
            };

            prop_assert_eq!(build(), build());
        }
    }
}
