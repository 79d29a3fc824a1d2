use super::{BIAS_CONSTANT, key::SketchKey};

/// HyperLogLog cardinality estimator.
///
/// Keys are hashed to 64 bits; the top `n_bits` of the hash select one of
/// `2^n_bits` registers, and the register keeps the highest rank of the
/// leftmost set bit ever observed in the remaining low bits. The harmonic
/// mean over all registers then yields the distinct-count estimate.
#[derive(Debug)]
pub struct HyperLogLog {
    /// Number of leading hash bits used as the register index.
    n_bits: u32,

    /// One register per index, all starting at zero.
    registers: Vec<u8>,

    /// Estimate stored by the last [`Self::compute_cardinality`] call.
    cardinality: u64,
}

impl HyperLogLog {
    /// Creates an estimator with `2^n_bits` zeroed registers.
    ///
    /// `n_bits` is clamped to `[0, 64]`; a negative value behaves as 0.
    ///
    /// # Panics
    ///
    /// Panics when the register table cannot be addressed in memory
    /// (`n_bits >= usize::BITS`).
    pub fn new(n_bits: i16) -> Self {
        let n_bits = n_bits.clamp(0, 64) as u32;
        let m = 1usize.checked_shl(n_bits).expect("register table too large");
        Self {
            n_bits,
            registers: vec![0; m],
            cardinality: 0,
        }
    }

    /// Feeds one key to the estimator.
    ///
    /// The stored estimate is not refreshed automatically; call
    /// [`Self::compute_cardinality`] to take a new snapshot.
    pub fn add(&mut self, key: impl SketchKey) {
        self.add_hash(key.hash64());
    }

    /// Recomputes the cardinality estimate from the current register state
    /// and stores it.
    pub fn compute_cardinality(&mut self) {
        let m = self.registers.len() as f64;
        let divider: f64 = self
            .registers
            .iter()
            .map(|&rank| 2f64.powi(-i32::from(rank)))
            .sum();
        self.cardinality = (BIAS_CONSTANT * m * m / divider).floor() as u64;
    }

    /// Returns the estimate taken by the last [`Self::compute_cardinality`]
    /// call, or 0 if none was taken yet.
    pub fn cardinality(&self) -> u64 {
        self.cardinality
    }

    fn add_hash(&mut self, hash: u64) {
        let index = self.register_index(hash);
        let rank = self.rank_of(hash);
        let register = &mut self.registers[index];
        *register = (*register).max(rank);
    }

    /// Index of the register addressed by the top `n_bits` of the hash.
    fn register_index(&self, hash: u64) -> usize {
        if self.n_bits == 0 {
            return 0;
        }
        (hash >> (64 - self.n_bits)) as usize
    }

    /// Rank of the hash: 1 + the position of the leftmost set bit of the
    /// value field (the low `64 - n_bits` bits), counting positions from the
    /// field's most significant bit. 0 when the field has no set bit.
    fn rank_of(&self, hash: u64) -> u8 {
        let width = 64 - self.n_bits;
        if width == 0 {
            return 0;
        }
        let field = if width == 64 {
            hash
        } else {
            hash & ((1u64 << width) - 1)
        };
        if field == 0 {
            return 0;
        }
        (field.leading_zeros() - (64 - width) + 1) as u8
    }
}
