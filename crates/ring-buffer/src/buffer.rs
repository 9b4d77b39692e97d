//! Ring Buffer Implementation

use crate::BufferError;

/// Fixed-capacity circular buffer; pushing into a full buffer evicts the oldest item.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Pre-allocated storage
    slots: Box<[Option<T>]>,
    /// Next write position
    head: usize,
    /// Number of occupied slots
    len: usize,
    /// Total items written (for statistics)
    total_written: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer holding at most `capacity` items
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        let slots: Vec<Option<T>> = (0..capacity).map(|_| None).collect();
        Ok(Self {
            slots: slots.into_boxed_slice(),
            head: 0,
            len: 0,
            total_written: 0,
        })
    }

    /// Push an item, returning the evicted oldest item if the buffer was full
    pub fn push(&mut self, item: T) -> Option<T> {
        let capacity = self.capacity();
        // When full, the write position holds the oldest item.
        let evicted = self.slots[self.head].replace(item);
        self.head = (self.head + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        }
        self.total_written += 1;
        evicted
    }

    /// Number of items currently held
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Get fill ratio (0.0 to 1.0)
    pub fn fill_ratio(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Total items ever pushed (not reset by `clear`)
    pub fn total_written(&self) -> usize {
        self.total_written
    }

    fn oldest_index(&self) -> usize {
        (self.head + self.capacity() - self.len) % self.capacity()
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let start = self.oldest_index();
        let capacity = self.capacity();
        (0..self.len).filter_map(move |i| self.slots[(start + i) % capacity].as_ref())
    }

    /// Most recently pushed item
    pub fn newest(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        let idx = (self.head + self.capacity() - 1) % self.capacity();
        self.slots[idx].as_ref()
    }

    /// Oldest item still held
    pub fn oldest(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.oldest_index()].as_ref()
    }

    /// Drop all items
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Change capacity, keeping the most recent items that still fit
    pub fn resize(&mut self, capacity: usize) -> Result<(), BufferError> {
        let mut resized = Self::new(capacity)?;
        let start = self.oldest_index();
        let old_capacity = self.capacity();
        for i in 0..self.len {
            if let Some(item) = self.slots[(start + i) % old_capacity].take() {
                resized.push(item);
            }
        }
        resized.total_written = self.total_written;
        *self = resized;
        Ok(())
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Read the last N items (most recent first)
    pub fn read_last(&self, count: usize) -> Vec<T> {
        let count = count.min(self.len);
        let mut items: Vec<T> = self.iter().skip(self.len - count).cloned().collect();
        items.reverse();
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(RingBuffer::<u32>::new(0).unwrap_err(), BufferError::ZeroCapacity);
    }

    #[test]
    fn test_push_and_read() {
        let mut buffer = RingBuffer::new(10).unwrap();
        for i in 0..5u32 {
            buffer.push(i * 100);
        }

        assert_eq!(buffer.len(), 5);

        let items = buffer.read_last(3);
        assert_eq!(items, vec![400, 300, 200]); // Most recent first
    }

    #[test]
    fn test_overwrite_oldest() {
        let mut buffer = RingBuffer::new(5).unwrap();
        let mut evicted = Vec::new();
        for i in 0..8u32 {
            if let Some(old) = buffer.push(i) {
                evicted.push(old);
            }
        }

        assert_eq!(buffer.len(), 5);
        assert!(buffer.is_full());
        assert_eq!(evicted, vec![0, 1, 2]);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5, 6, 7]);
        assert_eq!(buffer.oldest(), Some(&3));
        assert_eq!(buffer.newest(), Some(&7));
        assert_eq!(buffer.total_written(), 8);
    }

    #[test]
    fn test_fill_ratio() {
        let mut buffer = RingBuffer::new(100).unwrap();
        assert_eq!(buffer.fill_ratio(), 0.0);

        for i in 0..50 {
            buffer.push(i);
        }

        assert!((buffer.fill_ratio() - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_clear() {
        let mut buffer = RingBuffer::new(3).unwrap();
        buffer.push(1);
        buffer.push(2);
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.newest(), None);
        buffer.push(9);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn test_resize_keeps_most_recent() {
        let mut buffer = RingBuffer::new(5).unwrap();
        for i in 0..7 {
            buffer.push(i);
        }

        buffer.resize(3).unwrap();
        assert_eq!(buffer.capacity(), 3);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![4, 5, 6]);

        buffer.resize(6).unwrap();
        buffer.push(7);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![4, 5, 6, 7]);
        assert_eq!(buffer.total_written(), 8);
    }

    proptest! {
        #[test]
        fn prop_holds_latest_suffix(capacity in 1usize..20, items in proptest::collection::vec(any::<i32>(), 0..60)) {
            let mut buffer = RingBuffer::new(capacity).unwrap();
            for &item in &items {
                buffer.push(item);
            }

            let expected: Vec<i32> = items.iter().skip(items.len().saturating_sub(capacity)).copied().collect();
            prop_assert!(buffer.len() <= capacity);
            prop_assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), expected);
        }
    }
}
