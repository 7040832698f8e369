#![forbid(unsafe_code)]

//! Typewriter state machine.
//!
//! Cycles through an ordered list of lines: types one grapheme per tick,
//! holds the complete line, deletes one grapheme per tick, then moves on to
//! the next line (wrapping after the last).
//!
//! [`Typewriter::tick`] returns the text to display and how long to wait
//! before the next tick. The caller owns the timer.
//!
//! # Invariants
//!
//! 1. The displayed text is always a prefix of the current line, cut on a
//!    grapheme boundary.
//! 2. Typing grows the prefix by exactly one grapheme per tick; deleting
//!    shrinks it by exactly one.
//! 3. The hold delay follows the tick that completes a line, nothing else.
//! 4. Empty lines are dropped at construction; with no lines left the
//!    typewriter is idle and `tick` returns `None`.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

/// Delays driving the typewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTiming {
    /// Wait before the very first tick.
    pub start_delay: Duration,
    /// Wait after typing a grapheme.
    pub type_delay: Duration,
    /// Wait after deleting a grapheme.
    pub delete_delay: Duration,
    /// Wait after a line has been fully typed.
    pub hold_delay: Duration,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_millis(1500),
            type_delay: Duration::from_millis(80),
            delete_delay: Duration::from_millis(40),
            hold_delay: Duration::from_millis(2000),
        }
    }
}

/// Which way the cursor is currently moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Typing,
    Deleting,
}

/// One line plus the byte offsets where each grapheme ends.
#[derive(Debug, Clone)]
struct Line {
    text: String,
    ends: Vec<usize>,
}

impl Line {
    fn new(text: String) -> Self {
        let ends = text
            .grapheme_indices(true)
            .map(|(start, g)| start + g.len())
            .collect();
        Self { text, ends }
    }

    fn len(&self) -> usize {
        self.ends.len()
    }

    fn prefix(&self, graphemes: usize) -> &str {
        match graphemes {
            0 => "",
            n => &self.text[..self.ends[n.min(self.ends.len()) - 1]],
        }
    }
}

/// Result of one [`Typewriter::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTick<'a> {
    /// Text to display after this tick.
    pub text: &'a str,
    /// Wait before the next tick.
    pub delay: Duration,
}

/// Cursor over a list of lines.
#[derive(Debug, Clone)]
pub struct Typewriter {
    lines: Vec<Line>,
    timing: TypewriterTiming,
    line_index: usize,
    shown: usize,
    direction: Direction,
}

impl Typewriter {
    /// Build a typewriter over `lines`, skipping empty ones.
    pub fn new<I, S>(lines: I, timing: TypewriterTiming) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| !s.is_empty())
            .map(Line::new)
            .collect();
        Self {
            lines,
            timing,
            line_index: 0,
            shown: 0,
            direction: Direction::Typing,
        }
    }

    #[must_use]
    pub const fn timing(&self) -> &TypewriterTiming {
        &self.timing
    }

    /// True when there is nothing to type.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Index of the line currently being typed or deleted.
    #[must_use]
    pub const fn line_index(&self) -> usize {
        self.line_index
    }

    /// Number of graphemes currently shown.
    #[must_use]
    pub const fn shown(&self) -> usize {
        self.shown
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Text currently displayed.
    #[must_use]
    pub fn visible(&self) -> &str {
        self.lines
            .get(self.line_index)
            .map_or("", |line| line.prefix(self.shown))
    }

    /// Advance one step.
    pub fn tick(&mut self) -> Option<TypewriterTick<'_>> {
        let total = self.lines.get(self.line_index)?.len();
        let line = self.line_index;

        let delay = match self.direction {
            Direction::Typing => {
                self.shown += 1;
                if self.shown >= total {
                    self.shown = total;
                    self.direction = Direction::Deleting;
                    self.timing.hold_delay
                } else {
                    self.timing.type_delay
                }
            }
            Direction::Deleting => {
                self.shown = self.shown.saturating_sub(1);
                if self.shown == 0 {
                    self.direction = Direction::Typing;
                    self.line_index = (self.line_index + 1) % self.lines.len();
                    self.timing.type_delay
                } else {
                    self.timing.delete_delay
                }
            }
        };

        Some(TypewriterTick {
            text: self.lines[line].prefix(self.shown),
            delay,
        })
    }

    /// Return to the start of the first line.
    pub fn reset(&mut self) {
        self.line_index = 0;
        self.shown = 0;
        self.direction = Direction::Typing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TYPE: Duration = Duration::from_millis(80);
    const DELETE: Duration = Duration::from_millis(40);
    const HOLD: Duration = Duration::from_millis(2000);

    fn run(tw: &mut Typewriter, n: usize) -> Vec<(String, Duration)> {
        (0..n)
            .map(|_| {
                let tick = tw.tick().unwrap();
                (tick.text.to_string(), tick.delay)
            })
            .collect()
    }

    #[test]
    fn types_then_holds_then_deletes() {
        let mut tw = Typewriter::new(["abc"], TypewriterTiming::default());
        let seen = run(&mut tw, 6);
        assert_eq!(
            seen,
            vec![
                ("a".to_string(), TYPE),
                ("ab".to_string(), TYPE),
                ("abc".to_string(), HOLD),
                ("ab".to_string(), DELETE),
                ("a".to_string(), DELETE),
                ("".to_string(), TYPE),
            ]
        );
    }

    #[test]
    fn cycles_in_order_and_wraps() {
        let mut tw = Typewriter::new(["ab", "x"], TypewriterTiming::default());
        let mut completed = Vec::new();
        for _ in 0..20 {
            let tick = tw.tick().unwrap();
            if tick.delay == HOLD {
                completed.push(tick.text.to_string());
            }
        }
        assert_eq!(completed[..4].to_vec(), vec!["ab", "x", "ab", "x"]);
    }

    #[test]
    fn single_grapheme_line() {
        let mut tw = Typewriter::new(["z"], TypewriterTiming::default());
        let seen = run(&mut tw, 3);
        assert_eq!(
            seen,
            vec![
                ("z".to_string(), HOLD),
                ("".to_string(), TYPE),
                ("z".to_string(), HOLD),
            ]
        );
    }

    #[test]
    fn emoji_and_flags_are_single_steps() {
        let mut tw = Typewriter::new(["hi 🇸🇩"], TypewriterTiming::default());
        let seen = run(&mut tw, 4);
        assert_eq!(seen[3], ("hi 🇸🇩".to_string(), HOLD));
    }

    #[test]
    fn arabic_line_types_one_grapheme_per_tick() {
        let line = "من السودان إلى العالم 🇸🇩";
        let graphemes: Vec<&str> = line.graphemes(true).collect();
        let mut tw = Typewriter::new([line], TypewriterTiming::default());

        let seen = run(&mut tw, graphemes.len());
        for (i, (text, delay)) in seen.iter().enumerate() {
            assert_eq!(*text, graphemes[..=i].concat());
            let expected = if i + 1 == graphemes.len() { HOLD } else { TYPE };
            assert_eq!(*delay, expected);
        }
        assert_eq!(seen.last().map(|(t, _)| t.as_str()), Some(line));
        assert_eq!(graphemes.last(), Some(&"🇸🇩"));
        assert_eq!(tw.direction(), Direction::Deleting);
    }

    #[test]
    fn empty_lines_are_skipped() {
        let mut tw = Typewriter::new(["", "q", ""], TypewriterTiming::default());
        assert_eq!(tw.line_count(), 1);
        assert_eq!(tw.tick().unwrap().text, "q");
    }

    #[test]
    fn no_lines_means_idle() {
        let mut tw = Typewriter::new(Vec::<String>::new(), TypewriterTiming::default());
        assert!(tw.is_idle());
        assert!(tw.tick().is_none());
        assert_eq!(tw.visible(), "");
    }

    #[test]
    fn reset_returns_to_first_line() {
        let mut tw = Typewriter::new(["ab", "cd"], TypewriterTiming::default());
        run(&mut tw, 5);
        assert_eq!(tw.line_index(), 1);
        tw.reset();
        assert_eq!(tw.line_index(), 0);
        assert_eq!(tw.shown(), 0);
        assert_eq!(tw.direction(), Direction::Typing);
        assert_eq!(tw.tick().unwrap().text, "a");
    }
}
