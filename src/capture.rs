//! Edge-timing capture log.
//!
//! The GPIO ISR appends one quantized duration per level transition; the
//! main loop peeks at and consumes them through the [`Reader`](crate::reader::Reader).
//!
//! ```text
//! ┌─────────────┐  record_edge_*   ┌──────────────┐  peek / consume  ┌────────────┐
//! │ GPIO ISR    │─────────────────▶│ CircularLog  │◀─────────────────│ Main loop  │
//! │ (producer)  │                  │ (lock-free)  │                  │ (consumer) │
//! └─────────────┘                  └──────────────┘                  └────────────┘
//! ```
//!
//! ## Polarity
//!
//! Entries alternate: the parity of the logical index says what the entry
//! measured.  Odd entries are marks (carrier present), even entries are
//! spaces.  A transition *into* a mark therefore writes the duration of the
//! space that just ended, which must land in an even slot.  When the ISR
//! sees a level that does not flip the expected parity, a transition was
//! missed and a zero-length placeholder keeps the alternation intact.
//!
//! ## Concurrency
//!
//! Single producer, single consumer.  The producer only moves `write`, the
//! consumer only moves `read`.  A slot is filled before `write` is
//! published with `Release`, and the consumer loads `write` with `Acquire`
//! before touching slots, so no entry is observed half-written.  One slot
//! always stays free, so the producer never overwrites unread data; on
//! overflow the newest entry is dropped and counted.
//!
//! `last_edge` is shared both ways: the producer stamps it on every edge and
//! [`CircularLog::idle_since`] may rebase it.  Callers of `idle_since` must
//! hold a critical section that excludes the producer.

use core::cell::UnsafeCell;
use core::fmt;
use core::marker::PhantomData;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::decode::TimingView;
use crate::timing::PrecisionProfile;

/// Default capacity: one NEC data frame with its stop bit and lead-in
/// needs 68 entries.
pub const DEFAULT_LOG_SIZE: usize = 128;

/// Half of the representable range of the 32-bit microsecond timer.
pub const HALF_RANGE: u32 = 0x8000_0000;

/// Fixed-capacity ring of quantized mark/space durations.
///
/// `N` must be a power of two; this is checked at compile time.
pub struct CircularLog<P: PrecisionProfile, const N: usize = DEFAULT_LOG_SIZE> {
    slots: UnsafeCell<[P::Ticks; N]>,
    /// Next slot to write (producer-owned).
    write: AtomicUsize,
    /// Next slot to read (consumer-owned).
    read: AtomicUsize,
    /// Timestamp (µs, wrapping) of the last recorded edge.
    last_edge: AtomicU32,
    /// Entries dropped because the log was full.
    overflows: AtomicU32,
    _profile: PhantomData<P>,
}

// SAFETY: one producer and one consumer, coordinated through the atomic
// cursors.  The producer only writes slots outside `[read, write)`, the
// consumer only reads slots inside it.
unsafe impl<P: PrecisionProfile, const N: usize> Sync for CircularLog<P, N> {}
unsafe impl<P: PrecisionProfile, const N: usize> Send for CircularLog<P, N> {}

impl<P: PrecisionProfile, const N: usize> CircularLog<P, N> {
    const MASK: usize = N - 1;

    /// Create an empty log.  `const` so it can live in a `static` shared
    /// with the ISR.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "capture log size must be a power of 2");
        assert!(N >= 2, "capture log needs at least two slots");

        Self {
            slots: UnsafeCell::new([P::ZERO; N]),
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
            last_edge: AtomicU32::new(0),
            overflows: AtomicU32::new(0),
            _profile: PhantomData,
        }
    }

    // ── Producer side (ISR) ───────────────────────────────────

    /// Record a transition reported by a pin-change interrupt.
    ///
    /// `mark_active` is the level the pin has just switched to.
    #[inline]
    pub fn record_edge_on_change(&self, mark_active: bool, now: u32) {
        if mark_active == self.next_write_is_mark() {
            // Missed a transition; pad to keep mark/space alternation.
            self.write_entry(P::ZERO);
        }
        self.append_elapsed(now);
    }

    /// Record the current level from a periodic poll.
    ///
    /// No-op while the level matches the last recorded state.
    #[inline]
    pub fn record_edge_on_poll(&self, mark_active: bool, now: u32) {
        if mark_active == self.next_write_is_mark() {
            return;
        }
        self.append_elapsed(now);
    }

    #[inline]
    fn append_elapsed(&self, now: u32) {
        let last = self.last_edge.load(Ordering::Acquire);
        self.write_entry(P::micros_to_ticks(now.wrapping_sub(last)));
        self.last_edge.store(now, Ordering::Release);
    }

    #[inline]
    fn write_entry(&self, ticks: P::Ticks) {
        let write = self.write.load(Ordering::Relaxed);
        let next = (write + 1) & Self::MASK;

        if next == self.read.load(Ordering::Acquire) {
            self.overflows.fetch_add(1, Ordering::Relaxed);
            return;
        }

        // SAFETY: `write` is outside the unread range and only the single
        // producer writes slots.
        unsafe {
            self.slots.get().cast::<P::Ticks>().add(write).write(ticks);
        }
        self.write.store(next, Ordering::Release);
    }

    /// Polarity the next written entry will carry.
    #[inline]
    pub fn next_write_is_mark(&self) -> bool {
        self.write.load(Ordering::Relaxed) & 1 == 1
    }

    // ── Shared ────────────────────────────────────────────────

    /// Microseconds since the last recorded edge.
    ///
    /// Keeps `now - last_edge` below [`HALF_RANGE`] by rebasing the stored
    /// timestamp, so a wrapped timer never yields a huge bogus value.  Must
    /// be called at least once per half timer period (~35 min for a 32-bit
    /// µs counter), from inside a critical section that excludes the ISR.
    pub fn idle_since(&self, now: u32) -> u32 {
        let last = self.last_edge.load(Ordering::Acquire);
        let elapsed = now.wrapping_sub(last);
        if elapsed > HALF_RANGE {
            self.last_edge
                .store(now.wrapping_sub(HALF_RANGE / 2), Ordering::Release);
            return HALF_RANGE / 2;
        }
        elapsed
    }

    /// Total entries dropped on overflow since boot.
    #[inline]
    pub fn overflow_count(&self) -> u32 {
        self.overflows.load(Ordering::Relaxed)
    }

    // ── Consumer side (main loop) ─────────────────────────────

    /// Number of unread entries.  Always `< N`.
    #[inline]
    pub fn size(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Relaxed);
        write.wrapping_sub(read) & Self::MASK
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Polarity of the oldest unread entry.
    #[inline]
    pub fn next_unread_is_mark(&self) -> bool {
        self.read.load(Ordering::Relaxed) & 1 == 1
    }

    /// Read the `i`-th unread entry without consuming it.
    #[inline]
    pub fn peek(&self, i: usize) -> P::Ticks {
        debug_assert!(i < self.size(), "peek({i}) past size {}", self.size());
        let idx = (self.read.load(Ordering::Relaxed) + i) & Self::MASK;
        // SAFETY: `idx` is inside the published unread range; the producer
        // does not touch it until the consumer advances past it.
        unsafe { self.slots.get().cast::<P::Ticks>().add(idx).read() }
    }

    /// Drop the `n` oldest unread entries.
    #[inline]
    pub fn consume(&self, n: usize) {
        debug_assert!(n <= self.size(), "consume({n}) past size {}", self.size());
        let read = self.read.load(Ordering::Relaxed);
        self.read.store((read + n) & Self::MASK, Ordering::Release);
    }

    /// Textual view of the first `n` unread entries (`+` mark, `-` space,
    /// durations in µs).
    pub fn entries(&self, n: usize) -> EntryDump<'_, P, N> {
        EntryDump { log: self, n }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<P: PrecisionProfile, const N: usize> Default for CircularLog<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PrecisionProfile, const N: usize> TimingView<P> for CircularLog<P, N> {
    #[inline]
    fn peek(&self, i: usize) -> P::Ticks {
        CircularLog::peek(self, i)
    }

    #[inline]
    fn next_unread_is_mark(&self) -> bool {
        CircularLog::next_unread_is_mark(self)
    }
}

/// Formats buffered entries as `size=3 +9024 -4480 +576`.
pub struct EntryDump<'a, P: PrecisionProfile, const N: usize> {
    log: &'a CircularLog<P, N>,
    n: usize,
}

impl<P: PrecisionProfile, const N: usize> fmt::Display for EntryDump<'_, P, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "size={}", self.n)?;
        let first_is_mark = self.log.next_unread_is_mark();
        for i in 0..self.n {
            let is_mark = first_is_mark ^ (i & 1 == 1);
            let sign = if is_mark { '+' } else { '-' };
            write!(f, " {}{}", sign, P::ticks_to_micros(self.log.peek(i)))?;
        }
        Ok(())
    }
}
