use std::collections::VecDeque;

/// Number of trailing lines the parser keeps for context.
pub const DEFAULT_WINDOW: usize = 30;

/// Running window over the last `limit` input lines.
#[derive(Debug)]
pub(crate) struct LineWindow<'a> {
    limit: usize,
    lines: VecDeque<&'a str>,
    count: usize,
}

impl<'a> LineWindow<'a> {
    pub(crate) fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self { limit, lines: VecDeque::with_capacity(limit), count: 0 }
    }

    pub(crate) fn push(&mut self, line: &'a str) {
        if self.lines.len() == self.limit {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
        self.count += 1;
    }

    /// 1-based number of the most recently pushed line.
    pub(crate) fn line_number(&self) -> usize {
        self.count
    }

    pub(crate) fn current(&self) -> &'a str {
        self.lines.back().copied().unwrap_or("")
    }

    /// Up to `n` lines preceding the current one, oldest first.
    pub(crate) fn lookback(&self, n: usize) -> impl Iterator<Item = &'a str> + '_ {
        let before = self.lines.len().saturating_sub(1);
        let skip = before.saturating_sub(n);
        self.lines.iter().copied().take(before).skip(skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_trailing_lines() {
        let mut w = LineWindow::new(3);
        for line in ["a", "b", "c", "d", "e"] {
            w.push(line);
        }
        assert_eq!(w.line_number(), 5);
        assert_eq!(w.current(), "e");
        assert_eq!(w.lookback(10).collect::<Vec<_>>(), vec!["c", "d"]);
        assert_eq!(w.lookback(1).collect::<Vec<_>>(), vec!["d"]);
    }

    #[test]
    fn empty_window_has_no_current_line() {
        let w = LineWindow::new(DEFAULT_WINDOW);
        assert_eq!(w.current(), "");
        assert_eq!(w.lookback(5).count(), 0);
    }
}
