//! Fixed symbol alphabet and the symbol <-> index mapping.
//!
//! Every transform works on indices into an [`Alphabet`]. The standard
//! alphabet is pinned: changing its symbol list changes `N` and breaks every
//! previously encoded text, so any change must bump
//! [`STANDARD_ALPHABET_VERSION`].

use std::{collections::HashMap, sync::LazyLock};

use crate::error::{AlphabetError, CipherError};

/// Version of [`STANDARD_SYMBOLS`].
pub const STANDARD_ALPHABET_VERSION: u32 = 1;

/// Symbols of the standard alphabet, in index order.
///
/// Digits, Latin lower/upper, Cyrillic lower/upper (with `ё`/`Ё`), then
/// punctuation starting with the space character. 162 symbols.
pub const STANDARD_SYMBOLS: &str = concat!(
    "0123456789",
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "абвгдеёжзийклмнопрстуфхцчшщъыьэюя",
    "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ",
    " .,!?:;–()[]{}+-=*%^√&#@|/\\_`'°∆$~",
);

static STANDARD: LazyLock<Alphabet> =
    LazyLock::new(|| Alphabet::from_unique(STANDARD_SYMBOLS.chars().collect()));

/// Ordered set of unique symbols.
///
/// # Invariants
///
/// - At least one symbol
/// - Every symbol appears exactly once, so `index_of` and `symbol_at` are
///   inverse bijections over `[0, len)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Builds an alphabet from `symbols` in order.
    pub fn new(symbols: &str) -> Result<Self, AlphabetError> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            return Err(AlphabetError::Empty);
        }

        let mut index = HashMap::with_capacity(symbols.len());
        for (position, &symbol) in symbols.iter().enumerate() {
            if let Some(first) = index.insert(symbol, position) {
                return Err(AlphabetError::DuplicateSymbol { symbol, first, second: position });
            }
        }

        Ok(Self { symbols, index })
    }

    /// The process-wide standard alphabet.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    fn from_unique(symbols: Vec<char>) -> Self {
        let index = symbols.iter().enumerate().map(|(position, &symbol)| (symbol, position)).collect();
        Self { symbols, index }
    }

    /// Number of symbols (`N`).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; an alphabet has at least one symbol.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns true if `symbol` belongs to the alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.index.contains_key(&symbol)
    }

    /// Index of `symbol`, or `None` if it is not a member.
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.index.get(&symbol).copied()
    }

    /// Symbol at `index mod N`.
    pub fn symbol_at(&self, index: usize) -> char {
        self.symbols[index % self.symbols.len()]
    }

    /// Symbols in index order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Maps every character of `text` to its index.
    ///
    /// Fails on the first character outside the alphabet, reporting its
    /// character offset.
    pub fn to_indices(&self, text: &str) -> Result<Vec<usize>, CipherError> {
        text.chars()
            .enumerate()
            .map(|(position, symbol)| {
                self.index_of(symbol).ok_or(CipherError::UnknownSymbol { symbol, position })
            })
            .collect()
    }

    /// Maps indices back to text.
    pub fn to_text(&self, indices: &[usize]) -> String {
        indices.iter().map(|&index| self.symbol_at(index)).collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::standard().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_alphabet_has_162_unique_symbols() {
        let rebuilt = Alphabet::new(STANDARD_SYMBOLS).expect("standard symbols are unique");
        assert_eq!(rebuilt.len(), 162);
        assert_eq!(&rebuilt, Alphabet::standard());
    }

    #[test]
    fn digits_occupy_first_ten_indices() {
        let alphabet = Alphabet::standard();
        for (expected, digit) in ('0'..='9').enumerate() {
            assert_eq!(alphabet.index_of(digit), Some(expected));
        }
        assert_eq!(alphabet.index_of('a'), Some(10));
        assert_eq!(alphabet.index_of('~'), Some(161));
    }

    #[test]
    fn symbol_at_reduces_modulo_len() {
        let alphabet = Alphabet::standard();
        assert_eq!(alphabet.symbol_at(162), '0');
        assert_eq!(alphabet.symbol_at(162 * 3 + 10), 'a');
    }

    #[test]
    fn to_indices_reports_first_unknown_symbol() {
        let alphabet = Alphabet::standard();
        let err = alphabet.to_indices("ab€c€").unwrap_err();
        assert_eq!(err, CipherError::UnknownSymbol { symbol: '€', position: 2 });
    }

    #[test]
    fn to_text_inverts_to_indices() {
        let alphabet = Alphabet::standard();
        let text = "Привет, World!";
        let indices = alphabet.to_indices(text).expect("all symbols known");
        assert_eq!(alphabet.to_text(&indices), text);
    }

    #[test]
    fn new_rejects_empty() {
        assert_eq!(Alphabet::new(""), Err(AlphabetError::Empty));
    }

    #[test]
    fn new_rejects_duplicates() {
        assert_eq!(
            Alphabet::new("abca"),
            Err(AlphabetError::DuplicateSymbol { symbol: 'a', first: 0, second: 3 })
        );
    }

    #[test]
    fn newline_is_not_a_member() {
        assert!(!Alphabet::standard().contains('\n'));
        assert!(Alphabet::standard().contains(' '));
    }
}
