use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Seed of the 64-bit integer key domain.
const INT_DOMAIN: u64 = 1;

/// Seed of the string key domain.
const STR_DOMAIN: u64 = 2;

/// A key that can be fed to a cardinality sketch.
///
/// The sketches only ever see the 64-bit hash produced here, so the hash
/// must be deterministic for a given value and uniformly distributed across
/// inputs. Each key type hashes into its own domain: an integer never
/// collides with the string spelling it.
pub trait SketchKey {
    /// Returns the 64-bit hash of the key.
    fn hash64(&self) -> u64;
}

impl SketchKey for i64 {
    fn hash64(&self) -> u64 {
        xxh3_64_with_seed(&self.to_le_bytes(), INT_DOMAIN)
    }
}

impl SketchKey for &str {
    fn hash64(&self) -> u64 {
        xxh3_64_with_seed(self.as_bytes(), STR_DOMAIN)
    }
}

impl SketchKey for String {
    fn hash64(&self) -> u64 {
        self.as_str().hash64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(42i64.hash64(), 42i64.hash64());
        assert_eq!("page".hash64(), "page".hash64());
        assert_eq!("page".to_string().hash64(), "page".hash64());
    }

    #[test]
    fn typed_domains_disjoint() {
        // The same spelling hashed as an integer and as a string must land
        // in different domains.
        assert_ne!(42i64.hash64(), "42".hash64());
        assert_ne!(0i64.hash64(), "".hash64());
    }

    #[test]
    fn values_spread() {
        assert_ne!(1i64.hash64(), 2i64.hash64());
        assert_ne!("a".hash64(), "b".hash64());
    }
}
