//! Feedback adapters.

use std::{
    collections::VecDeque,
    io::{BufRead, Write},
};

use crate::{
    Result,
    ports::{FeedbackSource, MAX_RATING, MIN_RATING},
};

/// Feedback source backed by a fixed queue of ratings.
///
/// Each poll pops the next rating; an empty queue yields "no rating yet".
/// Used in tests to script a whole session.
#[derive(Debug, Clone, Default)]
pub struct QueuedFeedback {
    ratings: VecDeque<u8>,
}

impl QueuedFeedback {
    /// Create a feedback source that yields `ratings` in order.
    pub fn new(ratings: impl IntoIterator<Item = u8>) -> Self {
        Self {
            ratings: ratings.into_iter().collect(),
        }
    }

    /// Ratings not yet consumed.
    pub fn remaining(&self) -> usize {
        self.ratings.len()
    }
}

impl FeedbackSource for QueuedFeedback {
    fn poll(&mut self) -> Result<Option<u8>> {
        Ok(self.ratings.pop_front())
    }
}

/// Feedback source reading ratings from standard input.
///
/// Prompts and blocks for a line per poll; unparseable input yields
/// `Ok(None)` so the session simply asks again on the next tick.
pub struct StdinFeedback;

impl StdinFeedback {
    /// Create a stdin-backed feedback source.
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdinFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackSource for StdinFeedback {
    fn poll(&mut self) -> Result<Option<u8>> {
        print!("Rate the melody ({MIN_RATING}-{MAX_RATING}): ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;

        Ok(line.trim().parse::<u8>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_feedback_yields_in_order() {
        let mut feedback = QueuedFeedback::new([7, 3, 9]);
        assert_eq!(feedback.poll().unwrap(), Some(7));
        assert_eq!(feedback.poll().unwrap(), Some(3));
        assert_eq!(feedback.remaining(), 1);
        assert_eq!(feedback.poll().unwrap(), Some(9));
        assert_eq!(feedback.poll().unwrap(), None);
    }
}
