//! In-memory BM25 index over a fixed corpus.
//!
//! The corpus order given to [`SparseIndex::build`] is the only mapping
//! between document positions and ids, and it is also the tie-break order
//! for equal scores. There is no incremental insert; rebuild with the full
//! corpus instead.

use super::tokenizer::normalize;
use super::types::{Document, RankedResult};
use std::collections::{HashMap, HashSet};

/// Floor applied to non-positive IDF values so that every matched term adds
/// a strictly positive amount.
const MIN_IDF: f64 = 1e-3;

/// BM25 (Okapi) parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term frequency saturation
    pub k1: f64,
    /// Document length normalization
    pub b: f64,
    /// Fraction of the average IDF used in place of negative IDF values
    pub epsilon: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: 1.5,
            b: 0.75,
            epsilon: 0.25,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SparseIndex {
    ids: Vec<String>,
    doc_lengths: Vec<u32>,
    // term -> (corpus position, term frequency), ascending by position
    postings: HashMap<String, Vec<(usize, u32)>>,
    idf: HashMap<String, f64>,
    avgdl: f64,
    params: Bm25Params,
}

impl SparseIndex {
    /// Builds an index over `corpus` with default parameters.
    pub fn build(corpus: &[Document]) -> Self {
        Self::build_with_params(corpus, Bm25Params::default())
    }

    pub fn build_with_params(corpus: &[Document], params: Bm25Params) -> Self {
        let mut ids = Vec::with_capacity(corpus.len());
        let mut doc_lengths = Vec::with_capacity(corpus.len());
        let mut postings: HashMap<String, Vec<(usize, u32)>> = HashMap::new();

        for (position, document) in corpus.iter().enumerate() {
            let tokens = normalize(&document.text);
            ids.push(document.id.clone());
            doc_lengths.push(tokens.len() as u32);

            let mut term_freqs: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *term_freqs.entry(token).or_insert(0) += 1;
            }
            for (term, tf) in term_freqs {
                postings.entry(term).or_default().push((position, tf));
            }
        }

        let total_docs = ids.len() as f64;
        let avgdl = if ids.is_empty() {
            0.0
        } else {
            doc_lengths.iter().map(|&l| l as f64).sum::<f64>() / total_docs
        };

        let idf = Self::compute_idf(&postings, total_docs, params.epsilon);

        Self {
            ids,
            doc_lengths,
            postings,
            idf,
            avgdl,
            params,
        }
    }

    fn compute_idf(
        postings: &HashMap<String, Vec<(usize, u32)>>,
        total_docs: f64,
        epsilon: f64,
    ) -> HashMap<String, f64> {
        let raw: HashMap<String, f64> = postings
            .iter()
            .map(|(term, docs)| {
                let df = docs.len() as f64;
                let idf = (total_docs - df + 0.5).ln() - (df + 0.5).ln();
                (term.clone(), idf)
            })
            .collect();

        if raw.is_empty() {
            return raw;
        }

        let average_idf = raw.values().sum::<f64>() / raw.len() as f64;
        let floor = (epsilon * average_idf).max(MIN_IDF);

        raw.into_iter()
            .map(|(term, idf)| (term, if idf > 0.0 { idf } else { floor }))
            .collect()
    }

    /// Number of documents in the corpus.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Scores every corpus document, returned in corpus order.
    ///
    /// The integer part of a score is the number of distinct query terms the
    /// document contains; the fractional part is its BM25 score squashed
    /// into `[0, 1)`. A document matching more query terms therefore always
    /// outscores one matching fewer, and BM25 orders documents within the
    /// same coverage.
    pub fn scores(&self, query_tokens: &[String]) -> Vec<f64> {
        let (bm25, matched) = self.bm25(query_tokens);
        bm25.into_iter()
            .zip(matched)
            .map(|(score, matched)| {
                if matched == 0 {
                    0.0
                } else {
                    matched as f64 + score / (1.0 + score)
                }
            })
            .collect()
    }

    /// Raw BM25 scores and the count of distinct matched query terms, both
    /// in corpus order. Repeated query tokens add to BM25 once per
    /// occurrence but are counted once as matched terms.
    fn bm25(&self, query_tokens: &[String]) -> (Vec<f64>, Vec<u32>) {
        let mut scores = vec![0.0; self.ids.len()];
        let mut matched = vec![0u32; self.ids.len()];
        if self.avgdl <= 0.0 {
            return (scores, matched);
        }

        let Bm25Params { k1, b, .. } = self.params;
        let mut seen: HashSet<&str> = HashSet::new();
        for term in query_tokens {
            let (Some(docs), Some(&idf)) = (self.postings.get(term), self.idf.get(term)) else {
                continue;
            };
            let first = seen.insert(term.as_str());
            for &(position, tf) in docs {
                let tf = tf as f64;
                let doc_len = self.doc_lengths[position] as f64;
                let denominator = tf + k1 * (1.0 - b + b * doc_len / self.avgdl);
                scores[position] += idf * (tf * (k1 + 1.0)) / denominator;
                if first {
                    matched[position] += 1;
                }
            }
        }
        (scores, matched)
    }

    /// Scores every corpus document, keyed by id.
    pub fn score_all(&self, query_tokens: &[String]) -> HashMap<String, f64> {
        self.ids
            .iter()
            .cloned()
            .zip(self.scores(query_tokens))
            .collect()
    }

    /// Returns up to `k` documents matching at least one query token, by
    /// descending score. Equal scores keep corpus order.
    pub fn top_k(&self, query_tokens: &[String], k: usize) -> Vec<RankedResult> {
        if query_tokens.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(usize, f64)> = self
            .scores(query_tokens)
            .into_iter()
            .enumerate()
            .filter(|(_, score)| score.is_finite() && *score > 0.0)
            .collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);

        ranked
            .into_iter()
            .map(|(position, score)| RankedResult::new(self.ids[position].clone(), score as f32))
            .collect()
    }

    /// Tokenizes `text` and returns its top `k` matches.
    pub fn search(&self, text: &str, k: usize) -> Vec<RankedResult> {
        self.top_k(&normalize(text), k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Document> {
        vec![
            Document::new("j1", "rust engineer building distributed storage systems"),
            Document::new("j2", "python engineer building machine learning pipelines"),
            Document::new("j3", "frontend developer react typescript design systems"),
            Document::new("j4", "rust python engineer distributed pipelines kafka"),
        ]
    }

    fn tokens(text: &str) -> Vec<String> {
        normalize(text)
    }

    #[test]
    fn test_all_terms_outrank_partial_match() {
        let index = SparseIndex::build(&corpus());
        let scores = index.score_all(&tokens("rust python"));
        assert!(scores["j4"] > scores["j1"]);
        assert!(scores["j4"] > scores["j2"]);
        assert_eq!(scores["j3"], 0.0);
    }

    #[test]
    fn test_scores_are_non_negative() {
        let index = SparseIndex::build(&corpus());
        for score in index.scores(&tokens("engineer systems rust kafka unknown")) {
            assert!(score >= 0.0);
        }
    }

    #[test]
    fn test_common_term_still_contributes() {
        // "engineer" appears in 3 of 4 documents, giving a negative raw IDF.
        let index = SparseIndex::build(&corpus());
        let results = index.top_k(&tokens("engineer"), 10);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.score > 0.0));
    }

    #[test]
    fn test_top_k_sorted_and_bounded() {
        let index = SparseIndex::build(&corpus());
        let results = index.top_k(&tokens("rust distributed systems"), 2);
        assert_eq!(results.len(), 2);
        assert!(results[0].score >= results[1].score);
        assert!(results.iter().all(|r| r.payload.is_none()));
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let docs = vec![
            Document::new("b", "golang backend"),
            Document::new("a", "golang backend"),
            Document::new("c", "haskell compiler"),
        ];
        let index = SparseIndex::build(&docs);
        let ids: Vec<_> = index.search("golang", 5).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_no_recognized_tokens_returns_empty() {
        let index = SparseIndex::build(&corpus());
        assert!(index.search("the and of", 5).is_empty());
        assert!(index.search("", 5).is_empty());
        assert!(index.search("cobol mainframe", 5).is_empty());
    }

    #[test]
    fn test_empty_corpus() {
        let index = SparseIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.search("rust", 5).is_empty());
    }

    #[test]
    fn test_repeated_query_tokens_count_each_time() {
        let index = SparseIndex::build(&corpus());
        let once = index.score_all(&tokens("kafka"))["j4"];
        let twice = index.score_all(&tokens("kafka kafka"))["j4"];
        assert!(twice > once);
        // Still one distinct matched term.
        assert!(twice < 2.0);
    }

    #[test]
    fn test_long_document_with_all_terms_beats_short_partial_match() {
        // "engineer" sits in exactly half the corpus, so its IDF is floored and
        // length normalization alone would favour the short one-term document.
        let docs = vec![
            Document::new("partial", "rust rust rust"),
            Document::new(
                "all",
                "rust engineer building large distributed storage systems platform team",
            ),
            Document::new("x", "engineer"),
            Document::new("y", "engineer"),
        ];
        let index = SparseIndex::build(&docs);
        let scores = index.score_all(&tokens("rust engineer"));
        assert!(scores["all"] > scores["partial"]);
        assert!(scores["all"] > scores["x"]);
        assert!(scores["partial"] > 0.0);

        let ids: Vec<_> = index.search("rust engineer", 4).into_iter().map(|r| r.id).collect();
        assert_eq!(ids[0], "all");
        assert_eq!(ids.len(), 4);
    }
}
