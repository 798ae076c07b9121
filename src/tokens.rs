//! Token counting for digest size estimates

use tiktoken_rs::CoreBPE;

use crate::error::{Error, Result};

/// Counts tokens in a piece of text.
pub trait TokenCounter {
    fn count_tokens(&self, text: &str) -> usize;
}

/// cl100k_base BPE tokenizer.
pub struct TikTokenCounter {
    bpe: CoreBPE,
}

impl TikTokenCounter {
    pub fn new() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| Error::TokenizerUnavailable(e.to_string()))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for TikTokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

/// Counts whitespace-separated words. Cheap stand-in when the BPE tables
/// are not wanted.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceCounter;

impl TokenCounter for WhitespaceCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiktoken_counts() {
        let counter = TikTokenCounter::new().unwrap();
        assert_eq!(counter.count_tokens(""), 0);
        assert_eq!(counter.count_tokens("hello world"), 2);
    }

    #[test]
    fn test_whitespace_counter() {
        assert_eq!(WhitespaceCounter.count_tokens(""), 0);
        assert_eq!(WhitespaceCounter.count_tokens("fn main() {}\n"), 3);
        assert_eq!(WhitespaceCounter.count_tokens("  a\tb\n\nc "), 3);
    }
}
