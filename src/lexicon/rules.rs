//! Word lists and constants of the VADER heuristics.

/// Increment applied by intensifiers ("very", "really", ...).
pub(crate) const B_INCR: f64 = 0.293;
/// Decrement applied by dampeners ("slightly", "kinda", ...).
pub(crate) const B_DECR: f64 = -0.293;
/// Emphasis added to ALL-CAPS sentiment words in mixed-case text.
pub(crate) const C_INCR: f64 = 0.733;
/// Multiplier applied to negated valences.
pub(crate) const N_SCALAR: f64 = -0.74;
/// Normalisation constant approximating the maximum expected sum.
pub(crate) const ALPHA: f64 = 15.0;

pub(crate) const EXCLAMATION_WEIGHT: f64 = 0.292;
pub(crate) const MAX_EXCLAMATIONS: usize = 4;
pub(crate) const QUESTION_WEIGHT: f64 = 0.18;
pub(crate) const QUESTION_CAP: f64 = 0.96;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't", "aren't",
    "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt", "havent",
    "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't", "isn't",
    "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing",
    "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent", "oughtn't", "shan't",
    "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont", "wouldnt", "won't", "wouldn't",
    "rarely", "seldom", "despite",
];

const INTENSIFIERS: &[&str] = &[
    "absolutely", "amazingly", "awfully", "completely", "considerable", "considerably",
    "decidedly", "deeply", "effing", "enormous", "enormously", "entirely", "especially",
    "exceptional", "exceptionally", "extreme", "extremely", "fabulously", "flipping", "flippin",
    "frackin", "fracking", "fricking", "frickin", "frigging", "friggin", "fully", "fuckin",
    "fucking", "fuggin", "fugging", "greatly", "hella", "highly", "hugely", "incredible",
    "incredibly", "intensely", "major", "majorly", "more", "most", "particularly", "purely",
    "quite", "really", "remarkably", "so", "substantially", "thoroughly", "total", "totally",
    "tremendous", "tremendously", "uber", "unbelievably", "unusually", "utter", "utterly",
    "very",
];

const DAMPENERS: &[&str] = &[
    "almost", "barely", "hardly", "kinda", "kindof", "kind-of", "less", "little", "marginal",
    "marginally", "occasional", "occasionally", "partly", "scarce", "scarcely", "slight",
    "slightly", "somewhat", "sorta", "sortof", "sort-of",
];

/// Two-word dampeners, matched on the words before a sentiment word.
const DAMPENER_BIGRAMS: &[&str] = &["just enough", "kind of", "sort of"];

/// Idioms whose valence replaces that of the word they contain.
const IDIOMS: &[(&str, f64)] = &[
    ("bad ass", 1.5),
    ("beating heart", 3.1),
    ("broken heart", -2.9),
    ("bus stop", 0.0),
    ("kiss of death", -1.5),
    ("the bomb", 3.0),
    ("the shit", 3.0),
    ("to die for", 3.0),
    ("yeah right", -2.0),
];

/// Whether `word` (lowercase) negates what follows.
pub(crate) fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.contains("n't")
}

/// Booster scalar of `word` (lowercase), if it is an intensifier or dampener.
pub(crate) fn booster(word: &str) -> Option<f64> {
    if INTENSIFIERS.contains(&word) {
        Some(B_INCR)
    } else if DAMPENERS.contains(&word) {
        Some(B_DECR)
    } else {
        None
    }
}

/// Booster scalar of a multi-word phrase such as "kind of".
pub(crate) fn phrase_booster(phrase: &str) -> Option<f64> {
    DAMPENER_BIGRAMS.contains(&phrase).then_some(B_DECR)
}

/// Fixed valence of an idiom, if `phrase` is one.
pub(crate) fn idiom(phrase: &str) -> Option<f64> {
    IDIOMS
        .iter()
        .find(|(idiom, _)| *idiom == phrase)
        .map(|(_, valence)| *valence)
}

/// `s / sqrt(s² + α)`, clamped to `[-1, 1]`.
pub(crate) fn normalize(score: f64) -> f64 {
    let norm = score / (score * score + ALPHA).sqrt();
    norm.clamp(-1.0, 1.0)
}
