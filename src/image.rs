//! Bytecode image: a headerless sequence of 8-byte little-endian words.
//! Word count is the file size divided by the word size; a trailing
//! partial word is ignored.

use anyhow::Result;
use std::path::Path;

pub const WORD_BYTES: usize = 8;

pub fn words_from_bytes(bytes: &[u8]) -> Vec<i64> {
    let mut out = Vec::with_capacity(bytes.len() / WORD_BYTES);
    for chunk in bytes.chunks_exact(WORD_BYTES) {
        let mut b = [0u8; WORD_BYTES];
        b.copy_from_slice(chunk);
        out.push(i64::from_le_bytes(b));
    }
    out
}

pub fn bytes_from_words(words: &[i64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(words.len() * WORD_BYTES);
    for w in words {
        out.extend_from_slice(&w.to_le_bytes());
    }
    out
}

pub fn load(path: &Path) -> Result<Vec<i64>> {
    Ok(words_from_bytes(&std::fs::read(path)?))
}

pub fn save(path: &Path, words: &[i64]) -> Result<()> {
    std::fs::write(path, bytes_from_words(words))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_survive_a_file_round_trip() {
        let words = vec![0i64, -1, i64::MAX, i64::MIN, 42];
        let cwd = std::env::current_dir().unwrap();
        let path = cwd.join("_test_image.bin");
        save(&path, &words).unwrap();
        let back = load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(back, words);
    }

    #[test]
    fn trailing_partial_word_is_ignored() {
        let mut bytes = bytes_from_words(&[7, 8]);
        bytes.extend_from_slice(&[1, 2, 3]);
        assert_eq!(words_from_bytes(&bytes), vec![7, 8]);
    }
}
