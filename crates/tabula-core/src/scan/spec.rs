use crate::{
    key::{BoundSide, is_empty_range},
    obs::BoundTarget,
    predicate::PredicateSet,
    scan::arena::{ArenaSlice, ByteArena},
};

///
/// ScanSpec
///
/// Server-facing description of one range scan: key bounds, predicates and
/// limit. Bound bytes live in the owning configuration's arena; an absent
/// bound is unbounded. Lower bounds are inclusive, upper bounds exclusive.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ScanSpec {
    lower_bound_key: Option<ArenaSlice>,
    exclusive_upper_bound_key: Option<ArenaSlice>,
    lower_bound_partition_key: Option<ArenaSlice>,
    exclusive_upper_bound_partition_key: Option<ArenaSlice>,
    predicates: PredicateSet,
    limit: Option<i64>,
    include_is_deleted: bool,
    cache_blocks: bool,
    cant_be_satisfied: bool,
}

impl ScanSpec {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lower_bound_key: None,
            exclusive_upper_bound_key: None,
            lower_bound_partition_key: None,
            exclusive_upper_bound_partition_key: None,
            predicates: PredicateSet::new(),
            limit: None,
            include_is_deleted: false,
            cache_blocks: true,
            cant_be_satisfied: false,
        }
    }

    #[must_use]
    pub const fn lower_bound_key(&self) -> Option<ArenaSlice> {
        self.lower_bound_key
    }

    #[must_use]
    pub const fn exclusive_upper_bound_key(&self) -> Option<ArenaSlice> {
        self.exclusive_upper_bound_key
    }

    #[must_use]
    pub const fn lower_bound_partition_key(&self) -> Option<ArenaSlice> {
        self.lower_bound_partition_key
    }

    #[must_use]
    pub const fn exclusive_upper_bound_partition_key(&self) -> Option<ArenaSlice> {
        self.exclusive_upper_bound_partition_key
    }

    #[must_use]
    pub const fn predicates(&self) -> &PredicateSet {
        &self.predicates
    }

    #[must_use]
    pub const fn limit(&self) -> Option<i64> {
        self.limit
    }

    #[must_use]
    pub const fn include_is_deleted(&self) -> bool {
        self.include_is_deleted
    }

    #[must_use]
    pub const fn cache_blocks(&self) -> bool {
        self.cache_blocks
    }

    /// Return whether the scan is known to return no rows.
    #[must_use]
    pub const fn cant_be_satisfied(&self) -> bool {
        self.cant_be_satisfied
    }

    pub(crate) const fn predicates_mut(&mut self) -> &mut PredicateSet {
        &mut self.predicates
    }

    pub(crate) const fn set_limit(&mut self, limit: i64) {
        self.limit = Some(limit);
    }

    pub(crate) const fn set_include_is_deleted(&mut self, include: bool) {
        self.include_is_deleted = include;
    }

    pub(crate) const fn set_cache_blocks(&mut self, cache_blocks: bool) {
        self.cache_blocks = cache_blocks;
    }

    // Emptiness only ever becomes more certain as the scan spec tightens.
    pub(crate) const fn mark_cant_be_satisfied(&mut self) {
        self.cant_be_satisfied = true;
    }

    /// Merge a bound into the spec, keeping the tighter of the two.
    ///
    /// Returns whether the stored bound changed. An empty candidate is
    /// unbounded and never tightens.
    pub(crate) fn merge_bound(
        &mut self,
        arena: &mut ByteArena,
        target: BoundTarget,
        side: BoundSide,
        candidate: &[u8],
    ) -> bool {
        let slot = match (target, side) {
            (BoundTarget::PrimaryKey, BoundSide::Lower) => &mut self.lower_bound_key,
            (BoundTarget::PrimaryKey, BoundSide::Upper) => &mut self.exclusive_upper_bound_key,
            (BoundTarget::PartitionKey, BoundSide::Lower) => &mut self.lower_bound_partition_key,
            (BoundTarget::PartitionKey, BoundSide::Upper) => {
                &mut self.exclusive_upper_bound_partition_key
            }
        };

        let current = slot.map_or(&[][..], |stored| arena.get(stored));
        if !side.is_tighter(current, candidate) {
            return false;
        }
        *slot = Some(arena.alloc(candidate));

        true
    }

    /// Return whether either bound pair admits no key.
    pub(crate) fn has_empty_bounds(&self, arena: &ByteArena) -> bool {
        let resolve = |slice: Option<ArenaSlice>| slice.map_or(&[][..], |s| arena.get(s));

        is_empty_range(
            resolve(self.lower_bound_key),
            resolve(self.exclusive_upper_bound_key),
        ) || is_empty_range(
            resolve(self.lower_bound_partition_key),
            resolve(self.exclusive_upper_bound_partition_key),
        )
    }
}

impl Default for ScanSpec {
    fn default() -> Self {
        Self::new()
    }
}
