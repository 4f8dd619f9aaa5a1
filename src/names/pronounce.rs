// Pronounceability filter for blend candidates.

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];
const MIN_LEN: usize = 6;
const MAX_LEN: usize = 15;
const MAX_RUN: usize = 3;
const MIN_VOWELS: usize = 2;
const AWKWARD_COMBOS: &[&str] = &["xz", "qx", "zx", "qz", "xq", "xxx", "zzz"];

pub(crate) fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

/// Whether a word reads as something a person could say out loud.
///
/// Case-insensitive. Any character outside the vowel set counts as a consonant.
pub fn is_pronounceable(word: &str) -> bool {
    let word = word.to_lowercase();
    let len = word.chars().count();
    if !(MIN_LEN..=MAX_LEN).contains(&len) {
        return false;
    }

    let mut vowel_run = 0;
    let mut consonant_run = 0;
    for c in word.chars() {
        if is_vowel(c) {
            vowel_run += 1;
            consonant_run = 0;
        } else {
            consonant_run += 1;
            vowel_run = 0;
        }
        if vowel_run > MAX_RUN || consonant_run > MAX_RUN {
            return false;
        }
    }

    if word.chars().filter(|&c| is_vowel(c)).count() < MIN_VOWELS {
        return false;
    }

    !AWKWARD_COMBOS.iter().any(|combo| word.contains(combo))
}
