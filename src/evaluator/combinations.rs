/// Iterator over every 5-element index subset of `0..n`, in lexicographic order.
///
/// Yields C(n, 5) arrays: 1 for n = 5, 6 for n = 6, 21 for n = 7. Nothing is yielded when
/// `n < 5`.
#[derive(Debug, Clone)]
pub struct ChooseFive {
    n: usize,
    indices: [usize; 5],
    done: bool,
}

impl ChooseFive {
    pub fn new(n: usize) -> Self {
        Self { n, indices: [0, 1, 2, 3, 4], done: n < 5 }
    }

    /// Advance to the next subset; returns false once exhausted.
    fn advance(&mut self) -> bool {
        // Rightmost index that can still move: position i is capped at n - 5 + i.
        let mut i = 5;
        while i > 0 {
            i -= 1;
            if self.indices[i] < self.n - 5 + i {
                self.indices[i] += 1;
                for j in i + 1..5 {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return true;
            }
        }
        false
    }
}

impl Iterator for ChooseFive {
    type Item = [usize; 5];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices;
        if !self.advance() {
            self.done = true;
        }
        Some(current)
    }
}
