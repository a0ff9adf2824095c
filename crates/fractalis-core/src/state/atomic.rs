use std::sync::atomic::{AtomicU64, Ordering};

use crate::scalar::DoubleDouble;

/// `f64` stored as its bit pattern.
#[derive(Debug, Default)]
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    pub fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    pub fn load(&self, order: Ordering) -> f64 {
        f64::from_bits(self.bits.load(order))
    }

    pub fn store(&self, value: f64, order: Ordering) {
        self.bits.store(value.to_bits(), order);
    }
}

/// Double-double stored as two independent words.
///
/// A load racing a store may pair an old `hi` with a new `lo`. Writers
/// store inside an open update, so a reader that checks the generation
/// around its load never keeps a torn value.
#[derive(Debug, Default)]
pub struct AtomicDoubleDouble {
    hi: AtomicF64,
    lo: AtomicF64,
}

impl AtomicDoubleDouble {
    pub fn new(value: DoubleDouble) -> Self {
        Self {
            hi: AtomicF64::new(value.hi()),
            lo: AtomicF64::new(value.lo()),
        }
    }

    pub fn load(&self, order: Ordering) -> DoubleDouble {
        let hi = self.hi.load(order);
        let lo = self.lo.load(order);
        DoubleDouble::new(hi, lo)
    }

    pub fn store(&self, value: DoubleDouble, order: Ordering) {
        self.hi.store(value.hi(), order);
        self.lo.store(value.lo(), order);
    }
}
