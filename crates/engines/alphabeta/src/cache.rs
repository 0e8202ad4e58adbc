//! Memoization for the search.
//!
//! The rules caches (move results, legal moves) are pure functions of the
//! board and live only in memory. Node values and deepening progress also
//! depend on the evaluation weights and are keyed by them, so they stay valid
//! across weight changes and can be persisted between runs.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};

use checkers_core::{Color, Move, State, Weights};
use serde::{Deserialize, Serialize};

use crate::search::Statistics;

/// Key-value store shared by concurrent searches.
///
/// Racing writers for the same key store equal values, so last-writer-wins
/// is fine.
pub trait Cache<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn put(&self, key: K, value: V);
    fn len(&self) -> usize;
    fn clear(&self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory [`Cache`] behind a reader-writer lock.
#[derive(Debug)]
pub struct MemoryCache<K, V> {
    map: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for MemoryCache<K, V> {
    fn default() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> MemoryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every entry, for snapshots.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Insert many entries at once; returns how much the cache grew.
    pub fn extend(&self, entries: impl IntoIterator<Item = (K, V)>) -> usize {
        let mut map = self.map.write().unwrap_or_else(PoisonError::into_inner);
        let before = map.len();
        map.extend(entries);
        map.len() - before
    }

    /// Cached value for `key`, computing and storing it on a miss.
    ///
    /// The lock is not held while `compute` runs.
    pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(hit) = self.map.read().unwrap_or_else(PoisonError::into_inner).get(&key) {
            return hit.clone();
        }
        let value = compute();
        self.map
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.clone());
        value
    }
}

impl<K, V> Cache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        self.map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn put(&self, key: K, value: V) {
        self.map
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }

    fn len(&self) -> usize {
        self.map.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn clear(&self) {
        self.map.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Key of a memoized minimax node.
///
/// The window bounds are part of the key: the same node searched with a
/// different window may prune differently and return a different value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    pub turn: Color,
    pub board_size: usize,
    pub state: State,
    pub alpha: ScoreBits,
    pub beta: ScoreBits,
    #[serde(with = "weight_bits")]
    pub weights: Weights,
}

impl NodeKey {
    pub fn new(
        turn: Color,
        board_size: usize,
        state: &State,
        alpha: f64,
        beta: f64,
        weights: Weights,
    ) -> Self {
        Self {
            turn,
            board_size,
            state: state.clone(),
            alpha: alpha.into(),
            beta: beta.into(),
            weights,
        }
    }
}

/// Memoized minimax result. Only fully resolved subtrees are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    #[serde(with = "float_bits")]
    pub value: f64,
    pub best_move: Option<Move>,
    pub stats: Statistics,
}

/// Key of the deepening progress for one root position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeepeningKey {
    pub turn: Color,
    pub board_size: usize,
    pub state: State,
    #[serde(with = "weight_bits")]
    pub weights: Weights,
}

/// Bit pattern of a search bound, so infinities hash and serialize exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBits(u64);

impl From<f64> for ScoreBits {
    fn from(value: f64) -> Self {
        ScoreBits(value.to_bits())
    }
}

impl From<ScoreBits> for f64 {
    fn from(bits: ScoreBits) -> Self {
        f64::from_bits(bits.0)
    }
}

/// JSON has no infinity; scores are stored as their bit pattern.
pub(crate) mod float_bits {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.to_bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        u64::deserialize(deserializer).map(f64::from_bits)
    }
}

/// Weights are keys; decimal text would not reload them bit-for-bit.
pub(crate) mod weight_bits {
    use checkers_core::{Weights, NUM_FEATURES};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(weights: &Weights, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(weights.0.iter().map(|w| w.to_bits()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weights, D::Error> {
        let bits = <[u64; NUM_FEATURES]>::deserialize(deserializer)?;
        Ok(Weights(bits.map(f64::from_bits)))
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod cache_tests;
