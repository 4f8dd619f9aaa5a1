// Creativity heuristic for blend candidates.
//
// Longer names score higher, a vowel share strictly between 0.3 and 0.5 earns
// a flat bonus, and each 2-character window of either source name that
// survives in the candidate adds 2.

use super::pronounce::is_vowel;

const LENGTH_WEIGHT: f64 = 0.5;
const BALANCE_BONUS: f64 = 5.0;
const OVERLAP_WEIGHT: f64 = 2.0;

/// Number of 2-character windows of `source` found in `candidate` (both lowercased).
fn bigram_overlap(source: &str, candidate_lower: &str) -> usize {
    let chars: Vec<char> = source.to_lowercase().chars().collect();
    chars
        .windows(2)
        .filter(|w| {
            let pair: String = w.iter().collect();
            candidate_lower.contains(&pair)
        })
        .count()
}

pub fn score_creativity(candidate: &str, source_myth: &str, source_robot: &str) -> f64 {
    let len = candidate.chars().count();
    if len == 0 {
        return 0.0;
    }
    let lower = candidate.to_lowercase();

    let mut score = len as f64 * LENGTH_WEIGHT;

    let vowels = lower.chars().filter(|&c| is_vowel(c)).count();
    let ratio = vowels as f64 / len as f64;
    if ratio > 0.3 && ratio < 0.5 {
        score += BALANCE_BONUS;
    }

    let overlap = bigram_overlap(source_myth, &lower) + bigram_overlap(source_robot, &lower);
    score + overlap as f64 * OVERLAP_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_scores() {
        assert_eq!(score_creativity("Zeimus", "Zeus", "Optimus"), 13.0);
        assert_eq!(score_creativity("Zeuimus", "Zeus", "Optimus"), 15.5);
    }

    #[test]
    fn test_balance_bonus() {
        // 3 vowels of 8: ratio 0.375
        assert_eq!(score_creativity("Bartolin", "Q", "Q"), 4.0 + 5.0);
        // exactly 0.5 gets no bonus
        assert_eq!(score_creativity("Banana", "Q", "Q"), 3.0);
    }

    #[test]
    fn test_empty_candidate_scores_zero() {
        assert_eq!(score_creativity("", "Zeus", "Optimus"), 0.0);
    }

    #[test]
    fn test_overlap_is_case_insensitive() {
        assert_eq!(
            score_creativity("ZEUS", "zeus", "Q"),
            score_creativity("zeus", "ZEUS", "Q")
        );
    }

    #[test]
    fn test_longer_scores_at_least_as_high() {
        let short = score_creativity("Aaaaaa", "Q", "Q");
        let long = score_creativity("Aaaaaaa", "Q", "Q");
        assert!(long >= short);
    }
}
