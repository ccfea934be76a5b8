//! TF-IDF ranking of free-text descriptions against a query.
//!
//! The model is fitted from scratch on every call: the corpus is whatever the
//! filter just produced, so vocabulary and document frequencies change with
//! each query.

use std::collections::HashMap;

use serde::Serialize;
use tantivy::tokenizer::{
    LowerCaser,
    SimpleTokenizer,
    StopWordFilter,
    TextAnalyzer,
    TokenStream,
};

use crate::destination::Destination;

/// Shortest token that takes part in the vocabulary.
const MIN_TOKEN_CHARS: usize = 2;

/// English stop words dropped before weighting.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again",
    "against", "all", "almost", "alone", "along", "already", "also",
    "although", "always", "am", "among", "amongst", "amoungst", "amount",
    "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before",
    "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "bill", "both", "bottom", "but", "by", "call", "can", "cannot",
    "cant", "co", "con", "could", "couldnt", "cry", "de", "describe",
    "detail", "do", "done", "down", "due", "during", "each", "eg", "eight",
    "either", "eleven", "else", "elsewhere", "empty", "enough", "etc",
    "even", "ever", "every", "everyone", "everything", "everywhere",
    "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first",
    "five", "for", "former", "formerly", "forty", "found", "four", "from",
    "front", "full", "further", "get", "give", "go", "had", "has", "hasnt",
    "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
    "hereupon", "hers", "herself", "him", "himself", "his", "how",
    "however", "hundred", "i", "ie", "if", "in", "inc", "indeed",
    "interest", "into", "is", "it", "its", "itself", "keep", "last",
    "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most",
    "mostly", "move", "much", "must", "my", "myself", "name", "namely",
    "neither", "never", "nevertheless", "next", "nine", "no", "nobody",
    "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off",
    "often", "on", "once", "one", "only", "onto", "or", "other", "others",
    "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see",
    "seem", "seemed", "seeming", "seems", "serious", "several", "she",
    "should", "show", "side", "since", "sincere", "six", "sixty", "so",
    "some", "somehow", "someone", "something", "sometime", "sometimes",
    "somewhere", "still", "such", "system", "take", "ten", "than", "that",
    "the", "their", "them", "themselves", "then", "thence", "there",
    "thereafter", "thereby", "therefore", "therein", "thereupon", "these",
    "they", "thick", "thin", "third", "this", "those", "though", "three",
    "through", "throughout", "thru", "thus", "to", "together", "too", "top",
    "toward", "towards", "twelve", "twenty", "two", "un", "under", "until",
    "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
    "whatever", "when", "whence", "whenever", "where", "whereafter",
    "whereas", "whereby", "wherein", "whereupon", "wherever", "whether",
    "which", "while", "whither", "who", "whoever", "whole", "whom", "whose",
    "why", "will", "with", "within", "without", "would", "yet", "you",
    "your", "yours", "yourself", "yourselves",
];

/// A corpus entry and its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ranked {
    /// Position of the entry in the corpus that was ranked.
    pub index: usize,
    pub score: f32,
}

fn analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(StopWordFilter::remove(
            ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()),
        ))
        .build()
}

/// Split `text` into lower-cased, stop-word-free terms.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut analyzer = analyzer();
    tokenize_with(&mut analyzer, text)
}

fn tokenize_with(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut terms = Vec::new();
    while stream.advance() {
        let term = &stream.token().text;
        if term.chars().count() >= MIN_TOKEN_CHARS {
            terms.push(term.clone());
        }
    }
    terms
}

/// Sparse vector: (term id, weight), sorted by term id.
type SparseVec = Vec<(usize, f32)>;

/// Vocabulary and smoothed inverse document frequencies fitted on a corpus.
#[derive(Debug, Clone, Default)]
pub struct TfIdfModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfIdfModel {
    /// Fit the model on pre-tokenized documents.
    pub fn fit(documents: &[Vec<String>]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut df: Vec<usize> = Vec::new();

        for doc in documents {
            let mut seen = std::collections::HashSet::new();
            for term in doc {
                let next = vocabulary.len();
                let id = *vocabulary.entry(term.clone()).or_insert(next);
                if id == df.len() {
                    df.push(0);
                }
                if seen.insert(id) {
                    df[id] += 1;
                }
            }
        }

        let n = documents.len() as f32;
        let idf = df
            .into_iter()
            .map(|d| ((1.0 + n) / (1.0 + d as f32)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Weight a document's terms against the fitted vocabulary.
    ///
    /// Terms outside the vocabulary are ignored. The result is L2-normalized
    /// unless it is all zeros.
    pub fn transform(&self, terms: &[String]) -> SparseVec {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for term in terms {
            if let Some(&id) = self.vocabulary.get(term) {
                *counts.entry(id).or_default() += 1.0;
            }
        }

        let mut vec: SparseVec = counts
            .into_iter()
            .map(|(id, tf)| (id, tf * self.idf[id]))
            .collect();
        vec.sort_unstable_by_key(|(id, _)| *id);

        let norm = vec.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut vec {
                *w /= norm;
            }
        }
        vec
    }
}

/// Dot product of two sorted sparse vectors.
fn dot(a: &[(usize, f32)], b: &[(usize, f32)]) -> f32 {
    let (mut i, mut j, mut sum) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

/// Rank `corpus` entries by cosine similarity to `query`, best first.
///
/// At most `k` entries are returned. Equal scores keep corpus order, so a
/// query sharing no terms with the corpus returns its first `k` entries.
///
/// ```
/// use wanderlist::ranker::rank;
///
/// let corpus = ["red temple in hills", "sunny beach", "ancient red temple ruins"];
/// let ranked = rank(&corpus, "red temple", 2);
/// assert_eq!(ranked.len(), 2);
/// assert_eq!(ranked[0].index, 0);
/// assert_eq!(ranked[1].index, 2);
/// ```
pub fn rank(corpus: &[&str], query: &str, k: usize) -> Vec<Ranked> {
    if corpus.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut analyzer = analyzer();
    let documents: Vec<Vec<String>> = corpus
        .iter()
        .map(|text| tokenize_with(&mut analyzer, text))
        .collect();
    let model = TfIdfModel::fit(&documents);
    let query_vec = model.transform(&tokenize_with(&mut analyzer, query));

    let mut ranked: Vec<Ranked> = documents
        .iter()
        .enumerate()
        .map(|(index, doc)| Ranked {
            index,
            score: dot(&query_vec, &model.transform(doc)),
        })
        .collect();

    // sort_by is stable: ties stay in corpus order.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(k);

    tracing::trace!(
        corpus = corpus.len(),
        vocabulary = model.vocabulary_len(),
        returned = ranked.len(),
        "ranked corpus"
    );
    ranked
}

/// Rank destinations by how well their descriptions match `query`.
pub fn rank_destinations<'a>(
    destinations: &[&'a Destination],
    query: &str,
    k: usize,
) -> Vec<(&'a Destination, f32)> {
    let corpus: Vec<&str> = destinations
        .iter()
        .map(|d| d.description.as_str())
        .collect();
    rank(&corpus, query, k)
        .into_iter()
        .map(|r| (destinations[r.index], r.score))
        .collect()
}
