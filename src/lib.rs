//! chain-set: a single-threaded hash set backed by separate chaining,
//! with opaque positions for O(1) re-access to found or inserted keys.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: implement the classic chained hash table in safe, verifiable
//!   layers so each piece can be reasoned about independently.
//! - Layers:
//!   - RawTable<K, S>: the structural core. A `Vec` of bucket heads over
//!     an arena of chain entries; owns the hash plumbing, the growth
//!     policy, and the rehash procedure. Includes a debug-only access
//!     guard to keep internals consistent while probing.
//!   - ChainSet<K, S>: public API that exposes set semantics (insert,
//!     contains, remove, iteration, equality, swap) plus `Position`
//!     handles returned by insert/find.
//!
//! Constraints
//! - Single-threaded: `!Sync` by design (the debug guard uses `Cell`);
//!   exclusive access per instance is the contract.
//! - Chains are linked through an arena (`slotmap`) rather than owned
//!   `Box` pointers: dropping a long chain is iteration over the arena,
//!   never recursive destruction, and freed slots are recycled through
//!   the arena's free list.
//! - Set semantics: duplicate inserts are reported, not stored.
//! - Capacity only grows during the table's lifetime; `clear` is the one
//!   operation that resets it back to the minimum.
//! - Amortized O(1) insert/lookup/remove with well-distributed keys;
//!   worst case is the longest chain.
//!
//! Why this split?
//! - Localize invariants: RawTable alone maintains the bucket/chain/count
//!   invariants; ChainSet never touches links directly.
//! - No unsafe anywhere: structural indexing uses arena keys, and stale
//!   positions fail to resolve instead of dangling.
//! - Clear failure boundaries: RawTable only invokes user code via
//!   `K: Eq`/`K: Hash` while probing, never while re-linking.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its precomputed `u64` hash and bucket selection
//!   always uses the stored hash; `K: Hash` is never invoked after
//!   insertion. Rehashing therefore never calls into user code.
//!
//! Notes and non-goals
//! - No ordering guarantees: iteration is ascending bucket order, then
//!   chain order, which is not a key ordering.
//! - No removal-triggered shrink; see `clear`.
//! - Allocation failure follows the std collections convention (abort on
//!   OOM); there is no `try_reserve` surface.
//! - Positions are invalidated by removal of their entry (they stop
//!   resolving, safely) and by rehash (they may still resolve to their
//!   key, but traversal resumed from them must be re-derived).
//! - Public API surface is `ChainSet`, `Position`, and `Iter`; the raw
//!   table is an implementation detail.

mod chain_set;
mod chain_set_proptest;
mod guard;
mod raw_table;

// Public surface
pub use chain_set::{ChainSet, Iter, Position};
