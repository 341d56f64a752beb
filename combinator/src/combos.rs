//! Subset enumeration.

/// Subsets produced by [`range_combos`], with truncation diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combos<T> {
    /// Subsets, each in input order.
    pub items: Vec<Vec<T>>,
    /// More subsets existed than the cap allowed.
    pub truncated: bool,
    /// The cap that cut enumeration short, when `truncated`.
    pub truncation_limit: Option<usize>,
}

impl<T> Combos<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            truncated: false,
            truncation_limit: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Lazy size-k subsets of a slice in lexicographic index order.
struct KCombos<'a, T> {
    source: &'a [T],
    indices: Vec<usize>,
    done: bool,
}

impl<'a, T> KCombos<'a, T> {
    fn new(source: &'a [T], k: usize) -> Self {
        Self {
            source,
            indices: (0..k).collect(),
            done: k > source.len(),
        }
    }

    fn advance(&mut self) {
        let n = self.source.len();
        let k = self.indices.len();

        // Rightmost index that can still move right.
        let Some(i) = (0..k).rev().find(|&i| self.indices[i] < n - k + i) else {
            self.done = true;
            return;
        };

        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
    }
}

impl<T: Clone> Iterator for KCombos<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let combo = self.indices.iter().map(|&i| self.source[i].clone()).collect();
        self.advance();
        Some(combo)
    }
}

/// All size-`k` subsets of `source`, in lexicographic index order.
///
/// `k == 0` yields a single empty subset; `k > source.len()` yields nothing.
pub fn k_combos<T: Clone>(source: &[T], k: usize) -> Vec<Vec<T>> {
    KCombos::new(source, k).collect()
}

/// Subsets of every size in `min..=max`, smallest sizes first, stopping at `cap`.
///
/// Truncation is reported only when at least one more subset existed.
pub fn range_combos<T: Clone>(source: &[T], min: usize, max: usize, cap: usize) -> Combos<T> {
    let mut result = Combos::empty();
    if min > max {
        return result;
    }

    let max = max.min(source.len());
    let all = (min..=max).flat_map(|k| KCombos::new(source, k));

    for combo in all {
        if result.items.len() == cap {
            result.truncated = true;
            result.truncation_limit = Some(cap);
            break;
        }
        result.items.push(combo);
    }

    result
}
