/// Average word length convention: five keystrokes count as one word.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Clock units (seconds) per minute when converting elapsed time for WPM.
pub const SECS_PER_MINUTE: f64 = 60.0;

/// Per-character rendering state, position by position against the
/// reference text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    /// The next expected character (one past the typed prefix).
    Current,
    Pending,
}

/// Derived statistics for one typed-prefix snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Metrics {
    pub wpm: u32,
    pub accuracy: u32,
    pub correct_keystrokes: usize,
    pub error_count: usize,
    pub total_keystrokes: usize,
}

/// Score a typed prefix against the reference text.
///
/// Every typed position is classified exactly once: a match at the same
/// index is correct, anything else (including positions beyond the end
/// of the reference) is an error. Total over its whole input domain;
/// empty strings are valid.
pub fn compute(typed: &str, reference: &str, elapsed_secs: f64) -> Metrics {
    let reference: Vec<char> = reference.chars().collect();

    let mut correct_keystrokes = 0;
    let mut error_count = 0;
    let mut total_keystrokes = 0;

    for (idx, c) in typed.chars().enumerate() {
        total_keystrokes += 1;
        match reference.get(idx) {
            Some(&expected) if expected == c => correct_keystrokes += 1,
            _ => error_count += 1,
        }
    }

    Metrics {
        wpm: words_per_minute(correct_keystrokes, elapsed_secs),
        accuracy: accuracy_percent(correct_keystrokes, total_keystrokes),
        correct_keystrokes,
        error_count,
        total_keystrokes,
    }
}

/// Correct keystrokes over elapsed seconds, in words per minute.
/// Zero elapsed time yields zero rather than a division.
pub fn words_per_minute(correct_keystrokes: usize, elapsed_secs: f64) -> u32 {
    if elapsed_secs <= 0.0 {
        return 0;
    }
    let words = correct_keystrokes as f64 / CHARS_PER_WORD;
    let minutes = elapsed_secs / SECS_PER_MINUTE;
    (words / minutes).round() as u32
}

/// Share of typed keystrokes that matched, rounded to whole percent.
/// An untouched session reads as 100%.
pub fn accuracy_percent(correct_keystrokes: usize, total_keystrokes: usize) -> u32 {
    if total_keystrokes == 0 {
        return 100;
    }
    ((correct_keystrokes as f64 / total_keystrokes as f64) * 100.0).round() as u32
}

/// Classify every position for rendering. The result covers
/// `max(len(typed), len(reference))` positions: typed positions are
/// Correct/Incorrect, the position just past the prefix (when still
/// inside the reference) is Current, the rest are Pending.
pub fn classify(typed: &str, reference: &str) -> Vec<CharState> {
    let typed: Vec<char> = typed.chars().collect();
    let reference: Vec<char> = reference.chars().collect();
    let len = typed.len().max(reference.len());

    (0..len)
        .map(|idx| {
            if idx < typed.len() {
                match reference.get(idx) {
                    Some(&expected) if expected == typed[idx] => CharState::Correct,
                    _ => CharState::Incorrect,
                }
            } else if idx == typed.len() {
                CharState::Current
            } else {
                CharState::Pending
            }
        })
        .collect()
}
