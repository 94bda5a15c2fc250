//! Hash index over the script corpus
//!
//! Built in two passes over the corpus text. The first pass counts the
//! definitions per bucket, the second stores the offset of every
//! definition's name token. Offsets live in one flat vector where bucket `i`
//! owns `offsets[starts[i]..starts[i + 1]]`, so every bucket is exactly as
//! large as its definition count.

use shaderdex_shared::{CORPUS_HASH_SIZE, hash_name, names_equal};

use crate::text::Lexer;

/// Corpus text plus a per-bucket index of definition offsets.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    text: String,
    hash_size: usize,
    starts: Vec<usize>,
    offsets: Vec<usize>,
}

impl CorpusIndex {
    /// Index `text` with `hash_size` buckets.
    ///
    /// A size that is not a power of two falls back to [`CORPUS_HASH_SIZE`].
    pub fn build(text: String, hash_size: usize) -> Self {
        let hash_size = if hash_size.is_power_of_two() {
            hash_size
        } else {
            tracing::warn!(
                "corpus hash size {} is not a power of two; using {}",
                hash_size,
                CORPUS_HASH_SIZE
            );
            CORPUS_HASH_SIZE
        };

        let mut counts = vec![0usize; hash_size];
        let mut total = 0;

        let mut lexer = Lexer::new(&text);
        loop {
            let name = lexer.next_token(true);
            if name.is_empty() {
                break;
            }
            counts[hash_name(name, hash_size)] += 1;
            total += 1;
            lexer.skip_braced_section(0);
        }

        let mut starts = Vec::with_capacity(hash_size + 1);
        let mut next = 0;
        for count in &counts {
            starts.push(next);
            next += count;
        }
        starts.push(next);

        let mut offsets = vec![0usize; total];
        let mut fill = starts[..hash_size].to_vec();

        let mut lexer = Lexer::new(&text);
        loop {
            let name = lexer.next_token(true);
            if name.is_empty() {
                break;
            }
            let bucket = hash_name(name, hash_size);
            offsets[fill[bucket]] = lexer.token_start();
            fill[bucket] += 1;
            lexer.skip_braced_section(0);
        }

        tracing::debug!(
            "indexed {} shader definitions into {} buckets",
            total,
            hash_size
        );

        Self {
            text,
            hash_size,
            starts,
            offsets,
        }
    }

    /// An index over no text.
    pub fn empty(hash_size: usize) -> Self {
        Self::build(String::new(), hash_size)
    }

    /// The compressed corpus text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn hash_size(&self) -> usize {
        self.hash_size
    }

    /// Number of definitions indexed.
    pub fn definition_count(&self) -> usize {
        self.offsets.len()
    }

    /// Offsets of the definitions whose name hashes to `bucket`.
    pub fn bucket(&self, bucket: usize) -> &[usize] {
        &self.offsets[self.starts[bucket]..self.starts[bucket + 1]]
    }

    /// Find the definition of `name`.
    ///
    /// Returns the offset just past the name token, where the definition's
    /// opening brace begins. The bucket is searched first; a linear scan of
    /// the whole corpus runs only when the bucket has no match.
    pub fn find_definition(&self, name: &str) -> Option<usize> {
        let bucket = hash_name(name, self.hash_size);
        for &offset in self.bucket(bucket) {
            let mut lexer = Lexer::at(&self.text, offset);
            if names_equal(lexer.next_token(true), name) {
                return Some(lexer.position());
            }
        }

        let found = self.scan(name);
        if found.is_some() {
            tracing::debug!("shader '{}' found by linear scan, not in its bucket", name);
        }
        found
    }

    fn scan(&self, name: &str) -> Option<usize> {
        let mut lexer = Lexer::new(&self.text);
        loop {
            let token = lexer.next_token(true);
            if token.is_empty() {
                return None;
            }
            if names_equal(token, name) {
                return Some(lexer.position());
            }
            lexer.skip_braced_section(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::compress;

    const CORPUS: &str = "\
textures/base/wall
{
\tsurfaceparm metalsteps
\t{
\t\tmap textures/base/wall.tga
\t}
}
glass { cull none }
Textures/Sfx/Flame { { map flame.tga } }
";

    fn build(text: &str, hash_size: usize) -> CorpusIndex {
        CorpusIndex::build(compress(text), hash_size)
    }

    #[test]
    fn bucket_sizes_match_definition_counts() {
        let index = build(CORPUS, 16);
        assert_eq!(index.definition_count(), 3);

        let mut expected = vec![0usize; 16];
        for name in ["textures/base/wall", "glass", "Textures/Sfx/Flame"] {
            expected[hash_name(name, 16)] += 1;
        }
        for (bucket, count) in expected.iter().enumerate() {
            assert_eq!(index.bucket(bucket).len(), *count, "bucket {bucket}");
        }
    }

    #[test]
    fn offsets_point_at_name_tokens() {
        let index = build(CORPUS, 16);
        for bucket in 0..16 {
            for &offset in index.bucket(bucket) {
                let mut lexer = Lexer::at(index.text(), offset);
                let name = lexer.next_token(true);
                assert_eq!(hash_name(name, 16), bucket);
                assert!(index.text()[offset..].starts_with(name));
            }
        }
    }

    #[test]
    fn finds_every_definition_at_its_brace() {
        let index = build(CORPUS, 2048);
        for name in ["textures/base/wall", "glass", "Textures/Sfx/Flame"] {
            let cursor = index.find_definition(name).unwrap();
            let mut lexer = Lexer::at(index.text(), cursor);
            assert_eq!(lexer.next_token(true), "{", "definition of {name}");
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let index = build(CORPUS, 2048);
        assert!(index.find_definition("TEXTURES/BASE/WALL").is_some());
        assert!(index.find_definition("textures/sfx/flame").is_some());
    }

    #[test]
    fn missing_name_is_not_found() {
        let index = build(CORPUS, 2048);
        assert_eq!(index.find_definition("textures/base/ceiling"), None);
        assert_eq!(CorpusIndex::empty(64).find_definition("glass"), None);
    }

    #[test]
    fn colliding_names_share_a_bucket() {
        // With one bucket every definition collides.
        let index = build(CORPUS, 1);
        assert_eq!(index.bucket(0).len(), 3);
        assert!(index.find_definition("glass").is_some());
    }

    #[test]
    fn separator_variants_are_different_names() {
        // Same bucket, but names compare byte for byte apart from case.
        let index = build("models/lamp { }", 2048);
        assert_eq!(
            hash_name("models\\lamp", 2048),
            hash_name("models/lamp", 2048)
        );
        assert_eq!(index.find_definition("models\\lamp"), None);
        assert_eq!(index.find_definition("models/lamp"), Some(11));
    }

    #[test]
    fn bad_hash_size_uses_default() {
        for size in [0, 3, 1000] {
            let index = build(CORPUS, size);
            assert_eq!(index.hash_size(), CORPUS_HASH_SIZE);
            assert!(index.find_definition("glass").is_some());
        }
    }

    #[test]
    fn unbalanced_definition_swallows_the_rest() {
        let index = build("glass { cull none }\nmetal { { map m.tga }\nwood { }", 2048);
        assert!(index.find_definition("glass").is_some());
        assert!(index.find_definition("metal").is_some());
        assert_eq!(index.find_definition("wood"), None);
        assert_eq!(index.definition_count(), 2);
    }
}
