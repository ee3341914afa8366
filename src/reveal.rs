use std::iter::FusedIterator;

use crate::clock::sanitize_delta;

/// Lazy sequence of growing prefixes of a line: `""`, then one more character
/// per item, ending with the full line. A line of N characters yields N + 1
/// items. The sequence cannot be restarted.
#[derive(Debug, Clone)]
pub struct TextReveal {
    line: String,
    /// Byte offset of the next prefix end, `None` once exhausted.
    next_end: Option<usize>,
}

impl TextReveal {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            next_end: Some(0),
        }
    }

    #[inline]
    pub fn line(&self) -> &str {
        &self.line
    }

    /// No prefixes left.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.next_end.is_none()
    }

    fn remaining_chars(&self) -> usize {
        match self.next_end {
            Some(end) => self.line[end..].chars().count() + 1,
            None => 0,
        }
    }
}

impl Iterator for TextReveal {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let end = self.next_end?;
        let prefix = self.line[..end].to_string();
        self.next_end = self.line[end..]
            .chars()
            .next()
            .map(|c| end + c.len_utf8());
        Some(prefix)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining_chars();
        (n, Some(n))
    }
}

impl ExactSizeIterator for TextReveal {}

impl FusedIterator for TextReveal {}

/// Timed typewriter over a [`TextReveal`].
///
/// Starting shows the empty line and the first character at once. Each full
/// interval shows one more character, and one last interval is held after the
/// final character before the reveal completes. Leftover time in a tick is
/// dropped, so at most one character appears per tick.
#[derive(Debug, Clone)]
pub struct Typewriter {
    reveal: TextReveal,
    interval: f32,
    elapsed: f32,
    started: bool,
    complete: bool,
}

impl Typewriter {
    pub fn new(line: impl Into<String>, interval: f32) -> Self {
        Self {
            reveal: TextReveal::new(line),
            interval,
            elapsed: 0.0,
            started: false,
            complete: false,
        }
    }

    /// Prefixes to display immediately. An empty line completes here.
    pub fn start(&mut self) -> Vec<String> {
        if self.started {
            return Vec::new();
        }
        self.started = true;
        let shown: Vec<String> = self.reveal.by_ref().take(2).collect();
        if shown.len() < 2 {
            self.complete = true;
        }
        shown
    }

    /// Advance by `dt`; returns the newly revealed prefix, if any.
    pub fn tick(&mut self, dt: f32) -> Option<String> {
        if !self.started || self.complete {
            return None;
        }
        self.elapsed += sanitize_delta(dt);
        if self.elapsed < self.interval {
            return None;
        }
        self.elapsed = 0.0;
        match self.reveal.next() {
            Some(prefix) => Some(prefix),
            None => {
                self.complete = true;
                None
            }
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    #[inline]
    pub fn line(&self) -> &str {
        self.reveal.line()
    }
}
