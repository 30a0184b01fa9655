//! Button-gesture detection.
//!
//! Both encoder tasks push their switch presses into one shared ring of
//! key identifiers. After every push cycle the ring is compared against a
//! small set of fixed combos; a hit raises the matching action flag and
//! wipes the ring so the same presses cannot fire twice.
//!
//! ```text
//!   encoder A (key 1) ──┐
//!                       ├──► GestureBuffer [1, 1, 2] ──► Combo {1,1,2} ──► TogglePower
//!   encoder B (key 2) ──┘
//! ```

use core::future::Future;
use core::num::NonZeroU8;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};

use crate::error::Error;

/// Identifier of a physical key.
///
/// Zero is reserved: a cleared ring slot holds no key, so ids are
/// non-zero by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyId(NonZeroU8);

impl KeyId {
    /// Returns `None` for the reserved id 0.
    pub const fn new(raw: u8) -> Option<Self> {
        match NonZeroU8::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Const constructor for compile-time key tables. Panics on 0.
    pub const fn of(raw: u8) -> Self {
        match Self::new(raw) {
            Some(id) => id,
            None => panic!("key id 0 is reserved"),
        }
    }

    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

/// Action triggered by a recognised combo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureAction {
    TogglePower,
    ChangeChannel,
}

/// Ordered key sequence bound to an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Combo<const N: usize> {
    pub keys: [KeyId; N],
    pub action: GestureAction,
}

impl<const N: usize> Combo<N> {
    pub const fn new(keys: [KeyId; N], action: GestureAction) -> Self {
        Self { keys, action }
    }
}

/// Fixed-capacity ring of recent key presses (unlocked).
///
/// Pushing into a full ring evicts the oldest entry.
#[derive(Clone, Debug)]
pub struct KeyRing<const N: usize> {
    slots: [Option<KeyId>; N],
    head: usize,
    tail: usize,
    len: usize,
}

impl<const N: usize> KeyRing<N> {
    pub const fn new() -> Self {
        assert!(N > 0, "key ring must hold at least one key");
        Self {
            slots: [None; N],
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Append `id`, dropping the oldest entry when full.
    pub fn push(&mut self, id: KeyId) {
        self.slots[self.tail] = Some(id);
        self.tail = (self.tail + 1) % N;
        if self.len == N {
            self.head = (self.head + 1) % N;
        } else {
            self.len += 1;
        }
    }

    /// Remove and return the oldest entry.
    pub fn pop(&mut self) -> Option<KeyId> {
        if self.len == 0 {
            return None;
        }
        let id = self.slots[self.head].take();
        self.head = (self.head + 1) % N;
        self.len -= 1;
        id
    }

    /// Reset every slot to the empty sentinel and rewind the indices.
    pub fn clear(&mut self) {
        self.slots = [None; N];
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    /// Scan `N` positions from the oldest entry for `target` in order.
    ///
    /// The cursor restarts at 0 on any mismatch without re-testing the
    /// mismatching entry against `target[0]`. With a scan length equal to
    /// the combo length a hit still requires an exact, full-ring match.
    pub fn matches(&self, target: &[KeyId; N]) -> bool {
        let mut cursor = 0;
        let mut index = self.head;
        for _ in 0..N {
            if self.slots[index] == Some(target[cursor]) {
                cursor += 1;
                if cursor == N {
                    return true;
                }
            } else {
                cursor = 0;
            }
            index = (index + 1) % N;
        }
        false
    }

    /// Entries ordered oldest to newest; empty slots are `None`.
    pub fn snapshot(&self) -> [Option<KeyId>; N] {
        let mut out = [None; N];
        let mut index = self.head;
        for slot in out.iter_mut() {
            *slot = self.slots[index];
            index = (index + 1) % N;
        }
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<const N: usize> Default for KeyRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// [`KeyRing`] shared between tasks behind an async mutex.
///
/// Each operation holds the lock only for its own duration. The `_within`
/// variants race the lock against a caller-supplied deadline; losing the
/// race leaves the ring untouched and returns [`Error::GestureLockBusy`],
/// which callers treat as "skipped this cycle".
pub struct GestureBuffer<M: RawMutex, const N: usize> {
    ring: Mutex<M, KeyRing<N>>,
}

impl<M: RawMutex, const N: usize> GestureBuffer<M, N> {
    pub const fn new() -> Self {
        Self {
            ring: Mutex::new(KeyRing::new()),
        }
    }

    /// Exclusive access to the ring until the guard drops.
    pub async fn lock(&self) -> MutexGuard<'_, M, KeyRing<N>> {
        self.ring.lock().await
    }

    pub async fn push(&self, id: KeyId) {
        self.lock().await.push(id);
    }

    pub async fn pop(&self) -> Option<KeyId> {
        self.lock().await.pop()
    }

    pub async fn clear(&self) {
        self.lock().await.clear();
    }

    pub async fn matches(&self, target: &[KeyId; N]) -> bool {
        self.lock().await.matches(target)
    }

    pub async fn snapshot(&self) -> [Option<KeyId>; N] {
        self.lock().await.snapshot()
    }

    /// Check `combos` in order under one lock; the first hit clears the
    /// ring and returns its action.
    pub async fn take_match(&self, combos: &[Combo<N>]) -> Option<GestureAction> {
        let mut ring = self.lock().await;
        let hit = combos.iter().find(|combo| ring.matches(&combo.keys))?;
        ring.clear();
        Some(hit.action)
    }

    /// [`push`](Self::push), unless `deadline` completes before the lock
    /// is acquired.
    pub async fn push_within<D: Future>(&self, id: KeyId, deadline: D) -> Result<(), Error> {
        match select(self.lock(), deadline).await {
            Either::First(mut ring) => {
                ring.push(id);
                Ok(())
            }
            Either::Second(_) => Err(Error::GestureLockBusy),
        }
    }

    /// [`take_match`](Self::take_match), unless `deadline` completes
    /// before the lock is acquired.
    pub async fn take_match_within<D: Future>(
        &self,
        combos: &[Combo<N>],
        deadline: D,
    ) -> Result<Option<GestureAction>, Error> {
        match select(self.take_match(combos), deadline).await {
            Either::First(hit) => Ok(hit),
            Either::Second(_) => Err(Error::GestureLockBusy),
        }
    }
}

impl<M: RawMutex, const N: usize> Default for GestureBuffer<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pending gesture actions, raised by the encoder tasks and consumed by
/// the transmit loop.
pub struct GestureFlags {
    toggle_power: AtomicBool,
    change_channel: AtomicBool,
}

impl GestureFlags {
    pub const fn new() -> Self {
        Self {
            toggle_power: AtomicBool::new(false),
            change_channel: AtomicBool::new(false),
        }
    }

    pub fn raise(&self, action: GestureAction) {
        self.flag(action).store(true, Ordering::Release);
    }

    /// Consume the flag for `action`, returning whether it was set.
    pub fn take(&self, action: GestureAction) -> bool {
        self.flag(action).swap(false, Ordering::AcqRel)
    }

    pub fn is_raised(&self, action: GestureAction) -> bool {
        self.flag(action).load(Ordering::Acquire)
    }

    fn flag(&self, action: GestureAction) -> &AtomicBool {
        match action {
            GestureAction::TogglePower => &self.toggle_power,
            GestureAction::ChangeChannel => &self.change_channel,
        }
    }
}

impl Default for GestureFlags {
    fn default() -> Self {
        Self::new()
    }
}
