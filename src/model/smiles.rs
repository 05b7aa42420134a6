//! Token-level SMILES scan for atom and ring counts.
//!
//! No structure perception happens here: the scan only recognises atom
//! tokens (organic subset, bracket atoms, `*`) and ring-closure labels. Each
//! closed label is one ring bond, so the number of closures equals the
//! number of independent rings of the written graph.

use std::collections::HashSet;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    #[error("unterminated bracket atom starting at position {0}")]
    UnterminatedBracket(usize),

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("ring closure {0} is never closed")]
    UnclosedRing(u32),

    #[error("unbalanced parentheses")]
    UnbalancedBranch,

    #[error("empty SMILES")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SmilesCounts {
    pub heavy_atoms: usize,
    pub hydrogens: usize,
    pub rings: usize,
}

pub fn count(smiles: &str) -> Result<SmilesCounts, SmilesError> {
    let chars: Vec<char> = smiles.chars().collect();
    if chars.is_empty() {
        return Err(SmilesError::Empty);
    }

    let mut counts = SmilesCounts::default();
    let mut open_rings: HashSet<u32> = HashSet::new();
    let mut depth: i32 = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '[' => {
                let end = chars[i..]
                    .iter()
                    .position(|&ch| ch == ']')
                    .map(|off| i + off)
                    .ok_or(SmilesError::UnterminatedBracket(i))?;
                if bracket_is_hydrogen(&chars[i + 1..end]) {
                    counts.hydrogens += 1;
                } else {
                    counts.heavy_atoms += 1;
                }
                i = end + 1;
                continue;
            }
            'C' if chars.get(i + 1) == Some(&'l') => {
                counts.heavy_atoms += 1;
                i += 2;
                continue;
            }
            'B' if chars.get(i + 1) == Some(&'r') => {
                counts.heavy_atoms += 1;
                i += 2;
                continue;
            }
            'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' | 'b' | 'c' | 'n' | 'o' | 'p' | 's'
            | '*' => counts.heavy_atoms += 1,
            '0'..='9' => {
                let label = c.to_digit(10).unwrap_or_default();
                close_or_open(&mut open_rings, &mut counts, label);
            }
            '%' => {
                let label = two_digit_label(&chars, i).ok_or(SmilesError::UnexpectedChar {
                    ch: '%',
                    pos: i,
                })?;
                close_or_open(&mut open_rings, &mut counts, label);
                i += 3;
                continue;
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(SmilesError::UnbalancedBranch);
                }
            }
            '-' | '=' | '#' | '$' | ':' | '/' | '\\' | '.' => {}
            other => {
                return Err(SmilesError::UnexpectedChar { ch: other, pos: i });
            }
        }
        i += 1;
    }

    if depth != 0 {
        return Err(SmilesError::UnbalancedBranch);
    }
    if let Some(&label) = open_rings.iter().min() {
        return Err(SmilesError::UnclosedRing(label));
    }

    Ok(counts)
}

fn close_or_open(open: &mut HashSet<u32>, counts: &mut SmilesCounts, label: u32) {
    if open.remove(&label) {
        counts.rings += 1;
    } else {
        open.insert(label);
    }
}

fn two_digit_label(chars: &[char], pct: usize) -> Option<u32> {
    let hi = chars.get(pct + 1)?.to_digit(10)?;
    let lo = chars.get(pct + 2)?.to_digit(10)?;
    Some(hi * 10 + lo)
}

/// `[H]`, `[2H]`, `[H+]` are hydrogens; `[Hg]`, `[He]` are not.
fn bracket_is_hydrogen(inner: &[char]) -> bool {
    let mut rest = inner.iter().skip_while(|c| c.is_ascii_digit());
    match rest.next() {
        Some('H') => !matches!(rest.next(), Some(c) if c.is_ascii_lowercase()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("CCO", 3, 0)]
    #[case("c1ccccc1", 6, 1)]
    #[case("C1CC2CCC1C2", 7, 2)]
    #[case("ClC(Br)I", 4, 0)]
    #[case("c1ccc2c(c1)[nH]c1ccccc12", 13, 3)]
    #[case("C%10CCCCC%10", 6, 1)]
    #[case("[Na+].[Cl-]", 2, 0)]
    #[case("[Hg]C", 2, 0)]
    fn counts_heavy_atoms_and_rings(
        #[case] smiles: &str,
        #[case] heavy: usize,
        #[case] rings: usize,
    ) {
        let counts = count(smiles).expect("valid smiles");
        assert_eq!(counts.heavy_atoms, heavy, "heavy atoms of {smiles}");
        assert_eq!(counts.rings, rings, "rings of {smiles}");
    }

    #[test]
    fn explicit_hydrogens_are_counted_apart() {
        let counts = count("[2H]C([H])([H])[H]").unwrap();
        assert_eq!(counts.heavy_atoms, 1);
        assert_eq!(counts.hydrogens, 4);
    }

    #[test]
    fn ring_label_can_be_reused_after_closing() {
        let counts = count("C1CC1C1CC1").unwrap();
        assert_eq!(counts.rings, 2);
    }

    #[test]
    fn rejects_unclosed_ring() {
        assert_eq!(count("C1CCC"), Err(SmilesError::UnclosedRing(1)));
    }

    #[test]
    fn rejects_unbalanced_branches() {
        assert_eq!(count("CC(C"), Err(SmilesError::UnbalancedBranch));
        assert_eq!(count("CC)C"), Err(SmilesError::UnbalancedBranch));
    }

    #[test]
    fn rejects_unterminated_bracket() {
        assert_eq!(count("C[NH4+"), Err(SmilesError::UnterminatedBracket(1)));
    }

    #[test]
    fn rejects_foreign_characters() {
        assert!(matches!(
            count("CCX"),
            Err(SmilesError::UnexpectedChar { ch: 'X', pos: 2 })
        ));
        assert_eq!(count(""), Err(SmilesError::Empty));
    }
}
