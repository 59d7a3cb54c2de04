//! Keyboard input ring buffer.
//!
//! The keyboard interrupt is the only producer, the foreground line reader
//! the only consumer. A full buffer never rejects a byte; the oldest one is
//! evicted instead, since the producer runs in interrupt context and must
//! not block.

use crate::config::INPUT_BUFFER_SIZE;
use pikku_hal::Cpu;
use spin::Mutex;

/// Fixed-capacity circular byte queue.
///
/// Invariants: `count <= N` and `count == (write_index - read_index) mod N`
/// (with `count == N` when the indices meet on a full buffer).
#[derive(Debug, Clone)]
pub struct RingBuffer<const N: usize> {
    storage: [u8; N],
    read_index: usize,
    write_index: usize,
    count: usize,
}

impl<const N: usize> RingBuffer<N> {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        assert!(N > 0, "ring buffer needs a non-zero capacity");
        Self {
            storage: [0; N],
            read_index: 0,
            write_index: 0,
            count: 0,
        }
    }

    /// Appends `byte`, evicting the oldest byte when full.
    ///
    /// Returns the evicted byte, if any.
    pub fn push(&mut self, byte: u8) -> Option<u8> {
        let evicted = if self.count == N {
            let oldest = self.storage[self.read_index];
            self.read_index = (self.read_index + 1) % N;
            self.count -= 1;
            Some(oldest)
        } else {
            None
        };

        self.storage[self.write_index] = byte;
        self.write_index = (self.write_index + 1) % N;
        self.count += 1;
        evicted
    }

    /// Removes and returns the oldest byte, or `None` when empty.
    pub fn pop(&mut self) -> Option<u8> {
        if self.count == 0 {
            return None;
        }

        let byte = self.storage[self.read_index];
        self.read_index = (self.read_index + 1) % N;
        self.count -= 1;
        Some(byte)
    }

    /// Number of bytes waiting to be read.
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if no bytes are waiting.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` if the next push will evict.
    pub const fn is_full(&self) -> bool {
        self.count == N
    }

    /// Maximum number of bytes held at once.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// The ring buffer shared between the keyboard interrupt and the foreground.
///
/// The interrupt side runs with interrupts masked and takes the lock
/// directly. Every foreground access disables interrupts first, so the
/// interrupt can never spin on a lock the code it preempted is holding.
pub struct InputBuffer {
    ring: Mutex<RingBuffer<INPUT_BUFFER_SIZE>>,
}

impl InputBuffer {
    /// Creates an empty input buffer.
    pub const fn new() -> Self {
        Self {
            ring: Mutex::new(RingBuffer::new()),
        }
    }

    /// Producer side. Only call from interrupt context.
    ///
    /// Returns the byte evicted to make room, if any.
    pub fn push_from_interrupt(&self, byte: u8) -> Option<u8> {
        self.ring.lock().push(byte)
    }

    /// Consumer side: non-blocking pop.
    pub fn pop<C: Cpu>(&self, cpu: &C) -> Option<u8> {
        cpu.without_interrupts(|| self.ring.lock().pop())
    }

    /// Consumer side: waits in a low-power state until a byte is available.
    ///
    /// Must be called with interrupts enabled; they are enabled again on
    /// return.
    pub fn pop_blocking<C: Cpu>(&self, cpu: &C) -> u8 {
        debug_assert!(
            cpu.interrupts_enabled(),
            "blocking pop with interrupts disabled would never wake"
        );
        loop {
            cpu.disable_interrupts();
            if let Some(byte) = self.ring.lock().pop() {
                cpu.enable_interrupts();
                return byte;
            }
            // Interrupts are still off here, so a key arriving after the
            // empty check stays pending and ends the wait at once.
            cpu.enable_and_wait();
        }
    }

    /// Current occupancy, for polling.
    pub fn available<C: Cpu>(&self, cpu: &C) -> usize {
        cpu.without_interrupts(|| self.ring.lock().len())
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedCpu;

    #[test]
    fn test_push_pop_fifo() {
        let mut ring = RingBuffer::<4>::new();
        assert!(ring.is_empty());
        assert_eq!(ring.push(1), None);
        assert_eq!(ring.push(2), None);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.pop(), Some(1));
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), None);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        const CAP: usize = 256;
        let mut ring = RingBuffer::<CAP>::new();

        // Bytes 1..=CAP+1, wrapping through u8.
        let mut evicted = None;
        for i in 1..=CAP + 1 {
            evicted = ring.push(i as u8);
        }
        assert_eq!(evicted, Some(1));
        assert!(ring.is_full());

        for i in 2..=CAP + 1 {
            assert_eq!(ring.pop(), Some(i as u8));
        }
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn test_count_tracks_pushes_pops_and_evictions() {
        let mut ring = RingBuffer::<8>::new();
        let (mut pushes, mut pops, mut evictions) = (0usize, 0usize, 0usize);

        // Deterministic mixed workload that fills, drains and wraps.
        for step in 0..500usize {
            if step % 7 < 4 || step % 50 < 10 {
                if ring.push(step as u8).is_some() {
                    evictions += 1;
                }
                pushes += 1;
            } else if ring.pop().is_some() {
                pops += 1;
            }
            assert!(ring.len() <= ring.capacity());
            assert_eq!(ring.len(), pushes - pops - evictions);
            assert_eq!(
                ring.len() % 8,
                (ring.write_index + 8 - ring.read_index) % 8,
                "count must match index distance"
            );
        }
        assert!(evictions > 0);
    }

    #[test]
    fn test_wraparound_preserves_order() {
        let mut ring = RingBuffer::<3>::new();
        for round in 0..10u8 {
            ring.push(round);
            ring.push(round.wrapping_add(100));
            assert_eq!(ring.pop(), Some(round));
            assert_eq!(ring.pop(), Some(round.wrapping_add(100)));
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_input_buffer_pop_restores_interrupts() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"");
        cpu.enable_interrupts();

        input.push_from_interrupt(b'x');
        assert_eq!(input.available(&cpu), 1);
        assert_eq!(input.pop(&cpu), Some(b'x'));
        assert_eq!(input.pop(&cpu), None);
        assert!(cpu.interrupts_enabled());
        // Every foreground access ran inside a critical section.
        assert_eq!(cpu.critical_sections(), 3);
    }

    #[test]
    fn test_pop_blocking_waits_for_interrupt() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"q");
        cpu.enable_interrupts();

        assert_eq!(input.pop_blocking(&cpu), b'q');
        assert_eq!(cpu.waits(), 1);
        assert!(cpu.interrupts_enabled());
    }

    #[test]
    #[should_panic(expected = "interrupts disabled")]
    fn test_pop_blocking_requires_interrupts_enabled() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"q");
        input.push_from_interrupt(b'x');

        input.pop_blocking(&cpu);
    }
}
