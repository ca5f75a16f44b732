//! Typo-tolerant product search.
//!
//! Each query word is located inside the candidate text with an approximate
//! substring search (Sellers' variant of edit distance: the match may start
//! and end anywhere in the text). The cost of a word is its error count
//! divided by its length.

use crate::domain::Product;

/// Query words shorter than this are ignored.
pub const MIN_MATCH_LEN: usize = 2;

/// Highest per-word cost still counted as a match.
pub const MATCH_THRESHOLD: f64 = 0.4;

/// Extra cost for a word matched in category or HSN code instead of the name.
pub const SECONDARY_FIELD_PENALTY: f64 = 0.1;

/// Lowercases and keeps only ASCII alphanumerics and spaces.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Smallest edit distance between `pattern` and any substring of `text`.
#[must_use]
pub fn substring_distance(pattern: &[u8], text: &[u8]) -> usize {
    if pattern.is_empty() {
        return 0;
    }
    // column[i] holds the distance between pattern[..i] and the best
    // substring ending at the current text position.
    let mut column: Vec<usize> = (0..=pattern.len()).collect();
    let mut best = column[pattern.len()];

    for &t in text {
        let mut diagonal = column[0];
        column[0] = 0;
        for i in 1..=pattern.len() {
            let substitution = diagonal + usize::from(pattern[i - 1] != t);
            let next = substitution.min(column[i] + 1).min(column[i - 1] + 1);
            diagonal = column[i];
            column[i] = next;
        }
        best = best.min(column[pattern.len()]);
    }
    best
}

/// Cost of `word` against `text`, or `None` when it is above the threshold.
fn word_cost(word: &str, text: &str) -> Option<f64> {
    #[allow(clippy::cast_precision_loss)]
    let cost = substring_distance(word.as_bytes(), text.as_bytes()) as f64 / word.len() as f64;
    (cost <= MATCH_THRESHOLD).then_some(cost)
}

#[derive(Debug, Default, Clone, Copy)]
struct Score {
    matched: usize,
    cost: f64,
}

struct Candidate {
    name: String,
    category: String,
    hsn: String,
}

impl Candidate {
    fn new(product: &Product) -> Self {
        let field = |v: Option<&String>| v.map(|s| normalize(s)).unwrap_or_default();
        Self {
            name: field(product.name.as_ref()),
            category: field(product.category.as_ref()),
            hsn: field(product.hsn_code.as_ref()),
        }
    }

    fn score(&self, words: &[&str]) -> Score {
        words.iter().fold(Score::default(), |mut score, word| {
            let cost = word_cost(word, &self.name).or_else(|| {
                [&self.category, &self.hsn]
                    .into_iter()
                    .filter_map(|text| word_cost(word, text))
                    .min_by(f64::total_cmp)
                    .map(|c| c + SECONDARY_FIELD_PENALTY)
            });
            if let Some(cost) = cost {
                score.matched += 1;
                score.cost += cost;
            }
            score
        })
    }
}

/// Returns the products matching `query`, best first.
///
/// A blank query, or one without any word of at least [`MIN_MATCH_LEN`]
/// characters, returns the input unchanged. Otherwise products matching no
/// word are dropped and the rest are ordered by matched word count, then
/// total cost, then input position.
///
/// # Examples
///
/// ```
/// use ratelist::domain::Product;
/// use ratelist::pipeline::fuzzy::fuzzy_search;
///
/// let shawl = Product { name: Some("Pashmina Shawl".into()), ..Product::default() };
/// let towel = Product { name: Some("Bath Towel".into()), ..Product::default() };
/// let hits = fuzzy_search(&[towel, shawl.clone()], "shawll");
/// assert_eq!(hits, vec![shawl]);
/// ```
#[must_use]
pub fn fuzzy_search(products: &[Product], query: &str) -> Vec<Product> {
    let normalized = normalize(query);
    let words: Vec<&str> = normalized
        .split_whitespace()
        .filter(|w| w.len() >= MIN_MATCH_LEN)
        .collect();
    if words.is_empty() {
        return products.to_vec();
    }

    let mut scored: Vec<(usize, Score)> = products
        .iter()
        .enumerate()
        .map(|(index, product)| (index, Candidate::new(product).score(&words)))
        .filter(|(_, score)| score.matched > 0)
        .collect();

    scored.sort_by(|(ia, a), (ib, b)| {
        b.matched
            .cmp(&a.matched)
            .then_with(|| a.cost.total_cmp(&b.cost))
            .then_with(|| ia.cmp(ib))
    });

    tracing::trace!(query, words = words.len(), hits = scored.len(), "fuzzy search");
    scored.into_iter().map(|(index, _)| products[index].clone()).collect()
}
