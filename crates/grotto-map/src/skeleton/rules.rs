use super::Symbol;

use rand::Rng;
use std::fmt;
use thiserror::Error;

/// Every rule row is a forward move, five drawn symbols, and another forward move.
pub const RULE_LENGTH: usize = 7;

/// The symbol that each expansion step rewrites.
pub const SWAP_SYMBOL: Symbol = Symbol::Forward;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum GrammarError {
    #[error("rule string has length {len}, which is not a multiple of {RULE_LENGTH}")]
    RuleLength { len: usize },
}

/// One rewrite rule per generation. Row `g` replaces every [`SWAP_SYMBOL`] during expansion step `g`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuleTable {
    rows: Vec<[char; RULE_LENGTH]>,
}

impl RuleTable {
    /// Splits `rules` into consecutive rows of [`RULE_LENGTH`] characters; the number of rows is the generation count.
    pub fn parse(rules: &str) -> Result<Self, GrammarError> {
        let chars: Vec<char> = rules.chars().collect();
        if chars.len() % RULE_LENGTH != 0 {
            return Err(GrammarError::RuleLength { len: chars.len() });
        }
        let rows = chars
            .chunks_exact(RULE_LENGTH)
            .map(|chunk| {
                let mut row = [SWAP_SYMBOL.to_char(); RULE_LENGTH];
                row.copy_from_slice(chunk);
                row
            })
            .collect();
        Ok(Self { rows })
    }

    pub fn random(generations: usize, rng: &mut impl Rng) -> Self {
        let rows = (0..generations)
            .map(|_| {
                let mut row = [SWAP_SYMBOL.to_char(); RULE_LENGTH];
                for c in row[1..RULE_LENGTH - 1].iter_mut() {
                    *c = Symbol::random_motion(rng).to_char();
                }
                row
            })
            .collect();
        Self { rows }
    }

    pub fn generations(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[[char; RULE_LENGTH]] {
        &self.rows
    }

    /// Rewrites `axiom` once per generation.
    pub fn expand(&self, axiom: &str) -> String {
        let swap = SWAP_SYMBOL.to_char();
        self.rows.iter().fold(axiom.to_owned(), |word, row| {
            let replacement: String = row.iter().collect();
            word.replace(swap, &replacement)
        })
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows.iter() {
            for c in row.iter() {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// A starting word: a forward move, `length - 1` drawn symbols, and a closing forward move.
pub fn random_axiom(length: usize, rng: &mut impl Rng) -> String {
    let forward = SWAP_SYMBOL.to_char();
    let mut axiom = String::with_capacity(length + 1);
    axiom.push(forward);
    for _ in 1..length {
        axiom.push(Symbol::random_motion(rng).to_char());
    }
    axiom.push(forward);
    axiom
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
