// TF-IDF model fit on a small document set (one recommendation scope)
use ahash::AHashMap;

/// A sparse, L2-normalized document row: (term index, weight), sorted by term
pub type SparseRow = Vec<(usize, f32)>;

#[derive(Debug, Clone)]
pub struct TfidfModel {
    // term -> column
    vocabulary: AHashMap<String, usize>,
    // column -> smoothed idf
    idf: Vec<f32>,
    rows: Vec<SparseRow>,
}

impl TfidfModel {
    /// Tokenize text for TF-IDF
    /// Lowercased runs of word characters, at least two characters long
    #[inline]
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|s| s.chars().count() > 1)
            .map(str::to_string)
            .collect()
    }

    /// Fit vocabulary and idf on `docs` and transform them.
    ///
    /// Returns `None` when no document contains a single token.
    pub fn fit<S: AsRef<str>>(docs: &[S]) -> Option<Self> {
        let tokenized: Vec<Vec<String>> = docs.iter().map(|d| Self::tokenize(d.as_ref())).collect();

        let mut vocabulary: AHashMap<String, usize> = AHashMap::new();
        let mut doc_freq: Vec<u32> = Vec::new();

        for tokens in &tokenized {
            let mut seen: Vec<usize> = Vec::with_capacity(tokens.len());
            for token in tokens {
                let next = vocabulary.len();
                let column = *vocabulary.entry(token.clone()).or_insert(next);
                if column == doc_freq.len() {
                    doc_freq.push(0);
                }
                seen.push(column);
            }
            seen.sort_unstable();
            seen.dedup();
            for column in seen {
                doc_freq[column] += 1;
            }
        }

        if vocabulary.is_empty() {
            return None;
        }

        // idf = ln((1 + n) / (1 + df)) + 1
        let n = tokenized.len() as f32;
        let idf: Vec<f32> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        let rows = tokenized
            .iter()
            .map(|tokens| Self::weigh(tokens, &vocabulary, &idf))
            .collect();

        Some(Self { vocabulary, idf, rows })
    }

    fn weigh(tokens: &[String], vocabulary: &AHashMap<String, usize>, idf: &[f32]) -> SparseRow {
        let mut term_freqs: AHashMap<usize, u32> = AHashMap::new();
        for token in tokens {
            if let Some(&column) = vocabulary.get(token) {
                *term_freqs.entry(column).or_insert(0) += 1;
            }
        }

        let mut row: SparseRow = term_freqs
            .into_iter()
            .map(|(column, tf)| (column, tf as f32 * idf[column]))
            .collect();
        row.sort_unstable_by_key(|&(column, _)| column);

        let norm = row.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for (_, w) in &mut row {
                *w /= norm;
            }
        }
        row
    }

    /// Cosine similarity of row `target` against every row
    pub fn similarities(&self, target: usize) -> Vec<f32> {
        let query = &self.rows[target];
        self.rows.iter().map(|row| sparse_dot(query, row)).collect()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

}

#[cfg(test)]
impl TfidfModel {
    fn cosine(&self, a: usize, b: usize) -> f32 {
        sparse_dot(&self.rows[a], &self.rows[b])
    }

    fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    fn idf(&self, term: &str) -> Option<f32> {
        self.vocabulary.get(term).map(|&column| self.idf[column])
    }
}

/// Dot product of two column-sorted sparse rows
fn sparse_dot(a: &[(usize, f32)], b: &[(usize, f32)]) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0f32;
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
