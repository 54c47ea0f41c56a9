//! Abstract value domains
//!
//! A domain supplies the lattice algebra for one kind of abstract value:
//! a bottom element, an "unknown" element, a join (`merge`) and an order
//! check (`compare`). The engine only ever asks whether new data differs
//! from old data, so `compare` returns `Ordering::Less` when the new value
//! moved toward the top of the lattice.

use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::Hash;
use std::marker::PhantomData;

/// Join semilattice algebra over `T`
pub trait AbstractValueDomain<T> {
    /// Least element
    fn bottom(&self) -> T;

    /// Value used when nothing precise is known
    fn unknown_or_maybe(&self) -> T;

    /// Least upper bound; associative, commutative and idempotent
    fn merge(&self, a: &T, b: &T) -> T;

    /// `Less` if `new` is above `old`, `Equal` if unchanged, `Greater` if
    /// `new` is below or incomparable to `old`
    fn compare(&self, old: &T, new: &T) -> Ordering;

    /// Merge where an absent operand yields the other one
    fn merge_optional(&self, a: Option<&T>, b: Option<&T>) -> Option<T>
    where
        T: Clone,
    {
        match (a, b) {
            (Some(a), Some(b)) => Some(self.merge(a, b)),
            (Some(v), None) | (None, Some(v)) => Some(v.clone()),
            (None, None) => None,
        }
    }
}

/// Powerset domain ordered by inclusion
#[derive(Debug)]
pub struct SetAbstractDomain<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SetAbstractDomain<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SetAbstractDomain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SetAbstractDomain<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for SetAbstractDomain<T> {}

impl<T: Ord + Clone> AbstractValueDomain<BTreeSet<T>> for SetAbstractDomain<T> {
    fn bottom(&self) -> BTreeSet<T> {
        BTreeSet::new()
    }

    fn unknown_or_maybe(&self) -> BTreeSet<T> {
        BTreeSet::new()
    }

    fn merge(&self, a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
        if a.is_empty() {
            return b.clone();
        }
        if b.is_empty() {
            return a.clone();
        }
        a.union(b).cloned().collect()
    }

    fn compare(&self, old: &BTreeSet<T>, new: &BTreeSet<T>) -> Ordering {
        if old == new {
            Ordering::Equal
        } else if old.is_subset(new) {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

/// Pointwise lifting of a value domain to maps
///
/// A key missing from one side is treated as absent, not as bottom: the
/// merged map takes the present value unchanged.
#[derive(Debug, Clone)]
pub struct MapAbstractDomain<K, V, D> {
    value_domain: D,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V, D> MapAbstractDomain<K, V, D> {
    pub fn new(value_domain: D) -> Self {
        Self {
            value_domain,
            _marker: PhantomData,
        }
    }

    pub fn value_domain(&self) -> &D {
        &self.value_domain
    }
}

impl<K, V, D> AbstractValueDomain<FxHashMap<K, V>> for MapAbstractDomain<K, V, D>
where
    K: Eq + Hash + Clone,
    V: Clone,
    D: AbstractValueDomain<V>,
{
    fn bottom(&self) -> FxHashMap<K, V> {
        FxHashMap::default()
    }

    fn unknown_or_maybe(&self) -> FxHashMap<K, V> {
        FxHashMap::default()
    }

    fn merge(&self, a: &FxHashMap<K, V>, b: &FxHashMap<K, V>) -> FxHashMap<K, V> {
        let mut merged = a.clone();
        for (key, b_value) in b {
            let value = match merged.get(key) {
                Some(a_value) => self.value_domain.merge(a_value, b_value),
                None => b_value.clone(),
            };
            merged.insert(key.clone(), value);
        }
        merged
    }

    fn compare(&self, old: &FxHashMap<K, V>, new: &FxHashMap<K, V>) -> Ordering {
        if old.keys().any(|k| !new.contains_key(k)) {
            return Ordering::Greater;
        }

        let mut result = if new.len() > old.len() {
            Ordering::Less
        } else {
            Ordering::Equal
        };

        for (key, old_value) in old {
            // Presence checked above.
            let Some(new_value) = new.get(key) else {
                continue;
            };
            match self.value_domain.compare(old_value, new_value) {
                Ordering::Greater => return Ordering::Greater,
                Ordering::Less => result = Ordering::Less,
                Ordering::Equal => {}
            }
        }

        result
    }
}
