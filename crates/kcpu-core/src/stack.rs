//! Growable LIFO container with configurable integrity checks.
//!
//! Capacity is tracked explicitly instead of being delegated to `Vec`: growth
//! and shrink follow a fixed policy (grow by `grow_factor` when full, shrink
//! to `capacity / shrink_threshold * grow_factor` once usage drops to a third
//! of capacity), so alternating push/pop at a boundary never reallocates.
//!
//! # Security levels
//!
//! - [`SecurityLevel::None`]: no verification.
//! - [`SecurityLevel::Bounds`]: `size <= capacity` is verified before and
//!   after every mutating operation.
//! - [`SecurityLevel::Checksum`]: additionally keeps a CRC32 over the header
//!   and the live elements, recomputed after every mutation and verified
//!   before every access.

use crc32fast::Hasher;

/// Elements that can be stored in a [`Stack`].
pub trait StackValue: Copy + std::fmt::Debug {
    /// Feed the element's bytes into the integrity checksum.
    fn fingerprint(&self, hasher: &mut Hasher);
}

macro_rules! impl_stack_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl StackValue for $ty {
                #[inline]
                fn fingerprint(&self, hasher: &mut Hasher) {
                    hasher.update(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_stack_value!(u8, i64, u64, usize, f64);

/// Integrity verification performed around stack operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecurityLevel {
    None,
    Bounds,
    Checksum,
}

impl Default for SecurityLevel {
    /// `Checksum` in debug builds, `Bounds` in release builds.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Checksum
        } else {
            Self::Bounds
        }
    }
}

/// Construction-time stack settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackConfig {
    pub(crate) initial_capacity: usize,
    pub(crate) min_capacity: usize,
    pub(crate) grow_factor: f64,
    pub(crate) shrink_threshold: usize,
    pub(crate) security: SecurityLevel,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 32,
            min_capacity: 32,
            grow_factor: 1.5,
            shrink_threshold: 2,
            security: SecurityLevel::default(),
        }
    }
}

impl StackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity reserved at construction.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Capacity below which the stack never shrinks.
    pub fn min_capacity(mut self, capacity: usize) -> Self {
        self.min_capacity = capacity;
        self
    }

    /// Multiplier applied to capacity when a push finds the stack full.
    pub fn grow_factor(mut self, factor: f64) -> Self {
        self.grow_factor = factor;
        self
    }

    /// Shrink once `capacity / (size + 1)` exceeds this value.
    pub fn shrink_threshold(mut self, threshold: usize) -> Self {
        self.shrink_threshold = threshold.max(1);
        self
    }

    pub fn security(mut self, level: SecurityLevel) -> Self {
        self.security = level;
        self
    }

    pub fn get_security(&self) -> SecurityLevel {
        self.security
    }
}

/// Errors reported by stack operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    /// Pop or peek on an empty stack.
    #[error("stack underflow")]
    Underflow,

    /// The backing buffer could not be resized; the stack is unchanged.
    #[error("stack reallocation to {requested} elements failed")]
    ReallocFailed { requested: usize },

    /// Size exceeds capacity.
    #[error("stack overflow: size {size} exceeds capacity {capacity}")]
    Overflow { size: usize, capacity: usize },

    /// Stored checksum does not match the contents.
    #[error("stack corrupted: checksum {actual:#010x}, expected {expected:#010x}")]
    CorruptedState { expected: u32, actual: u32 },
}

/// LIFO container over `T` with explicit capacity management.
#[derive(Clone, Debug)]
pub struct Stack<T: StackValue> {
    buffer: Vec<T>,
    capacity: usize,
    config: StackConfig,
    checksum: u32,
}

impl<T: StackValue> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StackValue> Stack<T> {
    pub fn new() -> Self {
        Self::with_config(StackConfig::default())
    }

    pub fn with_config(config: StackConfig) -> Self {
        let mut stack = Self {
            buffer: Vec::with_capacity(config.initial_capacity),
            capacity: config.initial_capacity,
            config,
            checksum: 0,
        };
        stack.seal();
        stack
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Number of elements currently stored.
    #[inline]
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Number of elements the stack holds before it has to grow.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    /// Verify the stack according to its security level.
    pub fn valid(&self) -> Result<(), StackError> {
        if self.config.security == SecurityLevel::None {
            return Ok(());
        }

        if self.buffer.len() > self.capacity {
            return Err(StackError::Overflow {
                size: self.buffer.len(),
                capacity: self.capacity,
            });
        }

        if self.config.security == SecurityLevel::Checksum {
            let actual = self.compute_checksum();
            if actual != self.checksum {
                return Err(StackError::CorruptedState {
                    expected: self.checksum,
                    actual,
                });
            }
        }

        Ok(())
    }

    pub fn push(&mut self, value: T) -> Result<(), StackError> {
        self.valid()?;

        if self.is_full() {
            let grown = (self.capacity as f64 * self.config.grow_factor) as usize;
            self.realloc(grown.max(self.capacity + 1))?;
        }

        self.buffer.push(value);
        self.seal();
        self.valid()
    }

    /// Pop the top element.
    ///
    /// Popping an empty stack is a caller error and reports `Underflow`.
    pub fn pop(&mut self) -> Result<T, StackError> {
        self.valid()?;

        let value = self.buffer.pop().ok_or(StackError::Underflow)?;
        self.seal();

        if self.capacity / (self.buffer.len() + 1) > self.config.shrink_threshold {
            let shrunk = (self.capacity as f64 / self.config.shrink_threshold as f64
                * self.config.grow_factor) as usize;
            let shrunk = shrunk.max(self.buffer.len()).max(self.config.min_capacity);
            if shrunk < self.capacity {
                self.realloc(shrunk)?;
            }
        }

        self.valid()?;
        Ok(value)
    }

    /// Copy of the top element.
    pub fn peek(&self) -> Result<T, StackError> {
        self.valid()?;
        self.buffer.last().copied().ok_or(StackError::Underflow)
    }

    /// Pop until empty.
    ///
    /// Goes through `pop` one element at a time, so shrinking happens exactly
    /// as it would for the same number of individual pops.
    pub fn clear(&mut self) -> Result<(), StackError> {
        while !self.is_empty() {
            self.pop()?;
        }
        Ok(())
    }

    /// Elements from top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter().rev()
    }

    /// Elements from bottom to top.
    pub fn as_slice(&self) -> &[T] {
        &self.buffer
    }

    fn realloc(&mut self, new_capacity: usize) -> Result<(), StackError> {
        if new_capacity < self.buffer.len() {
            return Err(StackError::ReallocFailed {
                requested: new_capacity,
            });
        }

        if new_capacity > self.buffer.capacity() {
            self.buffer
                .try_reserve_exact(new_capacity - self.buffer.len())
                .map_err(|_| StackError::ReallocFailed {
                    requested: new_capacity,
                })?;
        } else {
            self.buffer.shrink_to(new_capacity);
        }

        tracing::trace!(from = self.capacity, to = new_capacity, "stack realloc");
        self.capacity = new_capacity;
        self.seal();
        Ok(())
    }

    fn compute_checksum(&self) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(&self.capacity.to_le_bytes());
        hasher.update(&self.buffer.len().to_le_bytes());
        for value in &self.buffer {
            value.fingerprint(&mut hasher);
        }
        hasher.finalize()
    }

    fn seal(&mut self) {
        if self.config.security == SecurityLevel::Checksum {
            self.checksum = self.compute_checksum();
        }
    }

    /// Overwrite an element without resealing, simulating memory corruption.
    #[cfg(test)]
    pub(crate) fn corrupt(&mut self, index: usize, value: T) {
        self.buffer[index] = value;
    }
}
