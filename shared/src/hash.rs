//! Name hashing shared by the corpus index and the shader cache.
//!
//! Both tables use the same function with different table sizes, so a name
//! lands in unrelated buckets in each table.

/// Bucket count of the script corpus index.
pub const CORPUS_HASH_SIZE: usize = 2048;

/// Bucket count of the shader object cache.
pub const SHADER_HASH_SIZE: usize = 1024;

/// Hash a shader or file name into `[0, table_size)`.
///
/// The hash ignores ASCII case, treats `\` and the platform separator as `/`,
/// and stops at the first `.` so `textures/wall` and `textures/wall.tga`
/// share a bucket.
///
/// `table_size` must be a power of two.
pub fn hash_name(name: &str, table_size: usize) -> usize {
    debug_assert!(
        table_size.is_power_of_two(),
        "hash table size {table_size} is not a power of two"
    );

    let mut hash: i64 = 0;
    for (i, &byte) in name.as_bytes().iter().enumerate() {
        let mut letter = byte.to_ascii_lowercase();
        if letter == b'.' {
            break;
        }
        if letter == b'\\' || letter == std::path::MAIN_SEPARATOR as u8 {
            letter = b'/';
        }
        // High bytes contribute as signed values.
        let weight = i64::from(letter as i8);
        hash = hash.wrapping_add(weight.wrapping_mul(i as i64 + 119));
    }

    hash = hash ^ (hash >> 10) ^ (hash >> 20);
    (hash & (table_size as i64 - 1)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_across_calls() {
        let a = hash_name("textures/base_wall/concrete", SHADER_HASH_SIZE);
        let b = hash_name("textures/base_wall/concrete", SHADER_HASH_SIZE);
        assert_eq!(a, b);
    }

    #[test]
    fn ignores_case_and_extension() {
        let plain = hash_name("textures/gothic/block10", CORPUS_HASH_SIZE);
        assert_eq!(plain, hash_name("TEXTURES/Gothic/BLOCK10", CORPUS_HASH_SIZE));
        assert_eq!(plain, hash_name("textures/gothic/block10.tga", CORPUS_HASH_SIZE));
        assert_eq!(plain, hash_name("textures/gothic/block10.jpg", CORPUS_HASH_SIZE));
    }

    #[test]
    fn backslash_matches_forward_slash() {
        assert_eq!(
            hash_name("models\\mapobjects\\lamp", SHADER_HASH_SIZE),
            hash_name("models/mapobjects/lamp", SHADER_HASH_SIZE)
        );
    }

    #[test]
    fn stays_inside_table() {
        for name in ["", "a", "gfx/2d/bigchars", "textures/sfx/flame1", "\u{e9}t\u{e9}"] {
            assert!(hash_name(name, 16) < 16);
            assert!(hash_name(name, SHADER_HASH_SIZE) < SHADER_HASH_SIZE);
        }
    }

    #[test]
    fn empty_name_hashes_to_zero() {
        assert_eq!(hash_name("", CORPUS_HASH_SIZE), 0);
        assert_eq!(hash_name(".tga", CORPUS_HASH_SIZE), 0);
    }

    #[test]
    fn known_value() {
        // 'a' = 97, weight 97 * 119 = 11543; 11543 >> 10 = 11; >> 20 = 0
        let expected = (11543 ^ 11) & (SHADER_HASH_SIZE - 1);
        assert_eq!(hash_name("a", SHADER_HASH_SIZE), expected);
    }
}
