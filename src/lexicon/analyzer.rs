//! Rule-based sentiment intensity scoring (VADER).

use serde::{Deserialize, Serialize};

use super::Lexicon;
use super::rules::{
    self, C_INCR, EXCLAMATION_WEIGHT, MAX_EXCLAMATIONS, N_SCALAR, QUESTION_CAP, QUESTION_WEIGHT,
};

/// Polarity proportions and the normalised compound score of a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    /// Proportion of negative sentiment, `[0, 1]`.
    pub neg: f64,
    /// Proportion of neutral tokens, `[0, 1]`.
    pub neu: f64,
    /// Proportion of positive sentiment, `[0, 1]`.
    pub pos: f64,
    /// Normalised overall intensity, `[-1, 1]`.
    pub compound: f64,
}

/// Lexicon + heuristics sentiment analyzer.
///
/// Scores each token from the lexicon, then adjusts for intensifiers,
/// capitalisation, negation, contrastive "but" and punctuation emphasis
/// before normalising the sum into `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct SentimentIntensityAnalyzer {
    lexicon: Lexicon,
}

impl Default for SentimentIntensityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentIntensityAnalyzer {
    /// Analyzer over the built-in lexicon.
    pub fn new() -> Self {
        Self::with_lexicon(Lexicon::builtin())
    }

    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Score `text`.
    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return PolarityScores::default();
        }

        let lower: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let cap_diff = is_cap_diff(&tokens);

        let mut sentiments = Vec::with_capacity(tokens.len());
        for i in 0..tokens.len() {
            // Boosters only modify their neighbours; "kind of" is a hedge, not kindness.
            let is_kind_of = lower[i] == "kind" && lower.get(i + 1).is_some_and(|w| w == "of");
            if rules::booster(&lower[i]).is_some() || is_kind_of {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.valence(&tokens, &lower, i, cap_diff));
        }

        but_check(&lower, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn valence(&self, tokens: &[&str], lower: &[String], i: usize, cap_diff: bool) -> f64 {
        let Some(base) = self.lexicon.get(&lower[i]) else {
            return 0.0;
        };
        let mut valence = base;

        // "no" directly before another sentiment word negates it rather than scoring itself.
        if lower[i] == "no" && lower.get(i + 1).is_some_and(|w| self.lexicon.contains(w)) {
            valence = 0.0;
        }
        if (i > 0 && lower[i - 1] == "no")
            || (i > 1 && lower[i - 2] == "no")
            || (i > 2 && lower[i - 3] == "no" && matches!(lower[i - 1].as_str(), "or" | "nor"))
        {
            valence = base * N_SCALAR;
        }

        if cap_diff && is_all_caps(tokens[i]) {
            valence += if valence > 0.0 { C_INCR } else { -C_INCR };
        }

        for start in 0..3 {
            if i <= start {
                break;
            }
            let j = i - (start + 1);
            if self.lexicon.contains(&lower[j]) {
                continue;
            }
            let mut scalar = scalar_inc_dec(tokens[j], &lower[j], valence, cap_diff);
            match start {
                1 => scalar *= 0.95,
                2 => scalar *= 0.9,
                _ => {}
            }
            valence += scalar;
            valence = negation_check(valence, lower, start, i);
            if start == 2 {
                valence = idioms_check(valence, lower, i);
            }
        }

        self.least_check(valence, lower, i)
    }

    fn least_check(&self, valence: f64, lower: &[String], i: usize) -> f64 {
        let preceded_by_least =
            |k: usize| lower[k] == "least" && !self.lexicon.contains(&lower[k]);
        if i > 1 && preceded_by_least(i - 1) {
            if lower[i - 2] != "at" && lower[i - 2] != "very" {
                return valence * N_SCALAR;
            }
            valence
        } else if i > 0 && preceded_by_least(i - 1) {
            valence * N_SCALAR
        } else {
            valence
        }
    }
}

fn negation_check(valence: f64, lower: &[String], start: usize, i: usize) -> f64 {
    let word = |back: usize| lower[i - back].as_str();
    match start {
        0 if rules::is_negation(word(1)) => valence * N_SCALAR,
        1 => {
            if word(2) == "never" && matches!(word(1), "so" | "this") {
                valence * 1.25
            } else if word(2) == "without" && word(1) == "doubt" {
                valence
            } else if rules::is_negation(word(2)) {
                valence * N_SCALAR
            } else {
                valence
            }
        }
        2 => {
            if (word(3) == "never" && matches!(word(2), "so" | "this"))
                || matches!(word(1), "so" | "this")
            {
                valence * 1.25
            } else if word(3) == "without" && (word(2) == "doubt" || word(1) == "doubt") {
                valence
            } else if rules::is_negation(word(3)) {
                valence * N_SCALAR
            } else {
                valence
            }
        }
        _ => valence,
    }
}

/// Idioms around word `i` override its valence; a dampening phrase such as
/// "kind of" in the preceding words reduces it.
fn idioms_check(valence: f64, lower: &[String], i: usize) -> f64 {
    let phrase = |range: std::ops::Range<usize>| lower[range].join(" ");
    let mut valence = valence;

    let before = [
        phrase(i - 1..i + 1),
        phrase(i - 2..i + 1),
        phrase(i - 2..i),
        phrase(i - 3..i),
        phrase(i - 3..i - 1),
    ];
    if let Some(idiom) = before.iter().find_map(|p| rules::idiom(p)) {
        valence = idiom;
    }
    if i + 1 < lower.len()
        && let Some(idiom) = rules::idiom(&phrase(i..i + 2))
    {
        valence = idiom;
    }
    if i + 2 < lower.len()
        && let Some(idiom) = rules::idiom(&phrase(i..i + 3))
    {
        valence = idiom;
    }

    for p in [phrase(i - 3..i), phrase(i - 3..i - 1), phrase(i - 2..i)] {
        if let Some(scalar) = rules::phrase_booster(&p) {
            valence += scalar;
        }
    }
    valence
}

fn scalar_inc_dec(token: &str, lower: &str, valence: f64, cap_diff: bool) -> f64 {
    let Some(mut scalar) = rules::booster(lower) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if cap_diff && is_all_caps(token) {
        scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
    }
    scalar
}

/// Sentiment before "but" is halved, after it amplified.
fn but_check(lower: &[String], sentiments: &mut [f64]) {
    let Some(pivot) = lower.iter().position(|w| w == "but") else {
        return;
    };
    for (index, sentiment) in sentiments.iter_mut().enumerate() {
        if index < pivot {
            *sentiment *= 0.5;
        } else if index > pivot {
            *sentiment *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f64 * QUESTION_WEIGHT,
        _ => QUESTION_CAP,
    };
    exclamations as f64 * EXCLAMATION_WEIGHT + question_emphasis
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    if sentiments.is_empty() {
        return PolarityScores::default();
    }

    let emphasis = punctuation_emphasis(text);
    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    let compound = round_to(rules::normalize(sum), 4);

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0usize;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += emphasis;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= emphasis;
    }

    let total = pos_sum + neg_sum.abs() + neu_count as f64;
    PolarityScores {
        neg: round_to((neg_sum / total).abs(), 3),
        neu: round_to((neu_count as f64 / total).abs(), 3),
        pos: round_to((pos_sum / total).abs(), 3),
        compound,
    }
}

/// Whitespace tokens with surrounding punctuation stripped, unless stripping
/// would leave two characters or fewer (which keeps emoticons like `:)`).
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| {
            let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                token
            } else {
                stripped
            }
        })
        .collect()
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase)
}

/// True when some, but not all, tokens are ALL CAPS.
fn is_cap_diff(tokens: &[&str]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_keeps_emoticons() {
        assert_eq!(tokenize("I love this!"), vec!["I", "love", "this"]);
        assert_eq!(tokenize("great :) ok!"), vec!["great", ":)", "ok!"]);
    }

    #[test]
    fn cap_diff_needs_mixed_case() {
        assert!(is_cap_diff(&["This", "is", "GOOD"]));
        assert!(!is_cap_diff(&["THIS", "IS", "GOOD"]));
        assert!(!is_cap_diff(&["this", "is", "good"]));
    }

    #[test]
    fn punctuation_emphasis_caps() {
        assert_eq!(punctuation_emphasis("wow"), 0.0);
        assert!((punctuation_emphasis("wow!!!!!!") - 4.0 * EXCLAMATION_WEIGHT).abs() < 1e-12);
        assert_eq!(punctuation_emphasis("what?"), 0.0);
        assert!((punctuation_emphasis("what??") - 0.36).abs() < 1e-12);
        assert_eq!(punctuation_emphasis("what????"), QUESTION_CAP);
    }

    #[test]
    fn but_shifts_weight() {
        let lower: Vec<String> = ["good", "but", "bad"].iter().map(|s| s.to_string()).collect();
        let mut sentiments = vec![2.0, 0.0, -2.0];
        but_check(&lower, &mut sentiments);
        assert_eq!(sentiments, vec![1.0, 0.0, -3.0]);
    }

    #[test]
    fn known_compound_values() {
        let analyzer = SentimentIntensityAnalyzer::new();
        // 3.2 + 0.292 emphasis, normalised
        assert_eq!(analyzer.polarity_scores("I love this!").compound, 0.6696);
        assert_eq!(analyzer.polarity_scores("This is terrible").compound, -0.5423);
    }
}
