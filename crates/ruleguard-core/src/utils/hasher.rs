use std::hash::{BuildHasher, Hasher};

use xxhash_rust::xxh3::Xxh3;

use crate::types::Value;

/// 64-bit xxh3 digest of a cell, tagged by kind so `1`, `1.0` and `"1"` differ.
///
/// Missing values (null and NaN) share one digest. `-0.0` hashes like `0.0`.
pub fn hash_value(value: &Value) -> u64 {
    let mut hasher = Xxh3::new();
    match value {
        v if v.is_missing() => hasher.update(&[0]),
        Value::Boolean(b) => hasher.update(&[1, *b as u8]),
        Value::Integer(i) => {
            hasher.update(&[2]);
            hasher.update(&i.to_le_bytes());
        }
        Value::Float(f) => {
            let normalized = if *f == 0.0 { 0.0f64 } else { *f };
            hasher.update(&[3]);
            hasher.update(&normalized.to_bits().to_le_bytes());
        }
        Value::Text(s) => {
            hasher.update(&[4]);
            hasher.update(s.as_bytes());
        }
        Value::Temporal(dt) => {
            hasher.update(&[5]);
            hasher.update(&dt.and_utc().timestamp_micros().to_le_bytes());
        }
        Value::Null => hasher.update(&[0]),
    }
    hasher.digest()
}

/// `Hasher` for keys that already are xxh3 digests.
#[derive(Default, Clone)]
pub struct PrehashedHasher(u64);

impl Hasher for PrehashedHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        // Only reached for non-u64 keys
        for &b in bytes {
            self.0 = self.0.rotate_left(8) ^ u64::from(b);
        }
    }
    #[inline]
    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }
}

#[derive(Clone, Default)]
pub struct PrehashedBuilder;

impl BuildHasher for PrehashedBuilder {
    type Hasher = PrehashedHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        PrehashedHasher::default()
    }
}
