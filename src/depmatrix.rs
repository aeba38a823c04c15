/// Dense square matrix of line co-occurrence counts over the dense
/// frequent-word ids 1..=F. Cell (a, b) counts lines containing both words;
/// the diagonal counts lines containing the word at all. Built during the
/// candidate pass, read-only afterward.
#[derive(Debug)]
pub struct DepMatrix {
    breadth: usize,
    cells: Vec<u64>,
}

impl DepMatrix {
    pub fn new(frequent_words: u64) -> Self {
        let breadth = frequent_words as usize + 1;
        Self {
            breadth,
            cells: vec![0; breadth * breadth],
        }
    }

    /// Records one line's distinct frequent-word ids. Every ordered pair is
    /// bumped, so (a, b) and (b, a) move together and each word's diagonal
    /// advances once per line.
    pub fn record_line(&mut self, distinct: &[u64]) {
        for &a in distinct {
            for &b in distinct {
                self.cells[a as usize * self.breadth + b as usize] += 1;
            }
        }
    }

    pub fn co_occurrence(&self, a: u64, b: u64) -> u64 {
        self.cells[a as usize * self.breadth + b as usize]
    }

    /// Lines containing word `a`.
    pub fn occurrences(&self, a: u64) -> u64 {
        self.co_occurrence(a, a)
    }

    /// dep(a, b): share of lines with `a` that also contain `b`. A word
    /// with no recorded lines yields 0 rather than dividing by zero; that
    /// cannot happen for words that reached candidate status, but the
    /// invariant is guarded, not assumed.
    pub fn dependency(&self, a: u64, b: u64) -> f64 {
        let total = self.occurrences(a);
        if total == 0 {
            return 0.0;
        }
        self.co_occurrence(a, b) as f64 / total as f64
    }
}
