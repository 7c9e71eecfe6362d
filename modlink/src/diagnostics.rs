use std::collections::VecDeque;

/// Ring buffer of the most recent diagnostic lines.
#[derive(Debug)]
pub struct DiagnosticRing {
    cap: usize,
    lines: VecDeque<String>,
    total: u64,
}

impl DiagnosticRing {
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            lines: VecDeque::new(),
            total: 0,
        }
    }

    pub fn push_line(&mut self, line: String) {
        if self.lines.len() >= self.cap {
            let overflow = self.lines.len() + 1 - self.cap;
            for _ in 0..overflow {
                let _ = self.lines.pop_front();
            }
        }
        self.lines.push_back(line);
        self.total += 1;
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, lines: I) {
        for line in lines {
            self.push_line(line);
        }
    }

    pub fn snapshot_tail(&self, max_lines: usize) -> Vec<String> {
        let n = max_lines.min(self.lines.len());
        self.lines
            .iter()
            .skip(self.lines.len().saturating_sub(n))
            .cloned()
            .collect()
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines pushed since creation, including the ones already dropped.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_only_the_tail() {
        let mut ring = DiagnosticRing::new(2);
        ring.extend(["a", "b", "c"].map(String::from));
        assert_eq!(ring.snapshot_tail(10), vec!["b".to_string(), "c".to_string()]);
        assert_eq!(ring.snapshot_tail(1), vec!["c".to_string()]);
        assert_eq!(ring.total(), 3);
        assert_eq!(ring.last(), Some("c"));
    }
}
