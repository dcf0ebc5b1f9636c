//! Key-range encoding for column families.
//!
//! Key format: `{family_id:u64 big-endian}{rest...}`
//!
//! Every key of family `n` sorts between `encode(n)` (inclusive) and
//! `encode(n + 1)` (exclusive), so a family is scanned with one forward
//! range iteration.

use zdb_types::ColumnFamily;

/// Width of the family prefix in bytes
pub const PREFIX_LEN: usize = 8;

/// Half-open byte range `[lower, upper)` covering one column family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRange {
    pub lower: [u8; PREFIX_LEN],
    pub upper: [u8; PREFIX_LEN],
}

impl KeyRange {
    /// True if `key` sorts inside `[lower, upper)`.
    pub fn contains(&self, key: &[u8]) -> bool {
        key >= self.lower.as_slice() && key < self.upper.as_slice()
    }
}

/// Encode a family ordinal as the 8-byte big-endian key prefix.
pub fn encode_family_id(family_id: u64) -> [u8; PREFIX_LEN] {
    family_id.to_be_bytes()
}

/// Byte range bounding every key of `family_id`.
///
/// # Panics
///
/// Panics if `family_id == u64::MAX`: the exclusive upper bound would not fit
/// in the prefix width. Family ordinals are small constants, so this is a
/// programming error.
pub fn range_for(family_id: u64) -> KeyRange {
    let next = family_id
        .checked_add(1)
        .expect("family id must leave room for an exclusive upper bound");
    KeyRange {
        lower: encode_family_id(family_id),
        upper: encode_family_id(next),
    }
}

/// Byte range for a column family from the engine table.
pub fn range_for_family(family: ColumnFamily) -> KeyRange {
    range_for(family.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdb_types::ALL_COLUMN_FAMILIES;

    #[test]
    fn test_range_is_big_endian() {
        let range = range_for(33);
        assert_eq!(range.lower, [0, 0, 0, 0, 0, 0, 0, 33]);
        assert_eq!(range.upper, [0, 0, 0, 0, 0, 0, 0, 34]);
    }

    #[test]
    fn test_adjacent_ranges_are_contiguous() {
        for n in [0u64, 1, 33, 255, 256, 65_535, u32::MAX as u64, u64::MAX - 2] {
            assert_eq!(range_for(n).upper, range_for(n + 1).lower, "n = {}", n);
            assert!(range_for(n).lower < range_for(n).upper);
        }
    }

    #[test]
    fn test_carry_across_byte_boundary() {
        let range = range_for(255);
        assert_eq!(range.lower, [0, 0, 0, 0, 0, 0, 0, 255]);
        assert_eq!(range.upper, [0, 0, 0, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_contains_respects_half_open_bounds() {
        let range = range_for(5);
        let mut inside = encode_family_id(5).to_vec();
        inside.extend_from_slice(&[0xff; 16]);

        assert!(range.contains(&encode_family_id(5)));
        assert!(range.contains(&inside));
        assert!(!range.contains(&encode_family_id(6)));
        assert!(!range.contains(&encode_family_id(4)));
        assert!(!range.contains(&[0, 0, 0]));
    }

    #[test]
    fn test_engine_families_do_not_overlap() {
        for pair in ALL_COLUMN_FAMILIES.windows(2) {
            let a = range_for_family(pair[0]);
            let b = range_for_family(pair[1]);
            assert!(a.upper <= b.lower);
        }
    }

    #[test]
    #[should_panic(expected = "exclusive upper bound")]
    fn test_max_id_is_rejected() {
        range_for(u64::MAX);
    }
}
