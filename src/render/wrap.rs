//! Greedy line wrapping for card text.

/// Characters-per-line and line budget for one block of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapBudget {
    pub max_chars: usize,
    pub max_lines: usize,
    /// Font size in px matching the budget.
    pub font_size: u32,
}

/// Title budgets by title length; both limits shrink as titles grow.
const TITLE_BUDGETS: [(usize, WrapBudget); 3] = [
    (24, WrapBudget { max_chars: 24, max_lines: 3, font_size: 64 }),
    (48, WrapBudget { max_chars: 22, max_lines: 3, font_size: 60 }),
    (80, WrapBudget { max_chars: 20, max_lines: 3, font_size: 56 }),
];
const LONG_TITLE: WrapBudget = WrapBudget { max_chars: 18, max_lines: 2, font_size: 52 };

pub const DESCRIPTION_BUDGET: WrapBudget = WrapBudget { max_chars: 46, max_lines: 3, font_size: 28 };

pub fn title_budget(title: &str) -> WrapBudget {
    let len = title.chars().count();
    TITLE_BUDGETS
        .iter()
        .find(|(limit, _)| len <= *limit)
        .map_or(LONG_TITLE, |(_, budget)| *budget)
}

/// Wrap `text` into at most `budget.max_lines` lines.
///
/// Words longer than a line are hyphen-split. When the words do not fit, the
/// last line ends with an ellipsis.
pub fn wrap(text: &str, budget: WrapBudget) -> Vec<String> {
    let max = budget.max_chars.max(2);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace().flat_map(|w| split_long_word(w, max)) {
        let len = current.chars().count();
        if len == 0 {
            current = word;
        } else if len + 1 + word.chars().count() <= max {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current, word));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > budget.max_lines {
        lines.truncate(budget.max_lines);
        if let Some(last) = lines.last_mut() {
            *last = with_ellipsis(last, max);
        }
    }
    lines
}

/// Chunks of at most `max` chars; every chunk but the last ends with `-`.
fn split_long_word(word: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= max {
        return vec![word.to_string()];
    }

    let step = max - 1;
    let mut parts = Vec::new();
    let mut rest = chars.as_slice();
    while rest.len() > max {
        let (head, tail) = rest.split_at(step);
        parts.push(head.iter().collect::<String>() + "-");
        rest = tail;
    }
    parts.push(rest.iter().collect());
    parts
}

/// Drop trailing words until `line…` fits in `max` chars.
fn with_ellipsis(line: &str, max: usize) -> String {
    let mut words: Vec<&str> = line.split(' ').collect();
    while words.len() > 1 && words.join(" ").chars().count() + 1 > max {
        words.pop();
    }

    let joined = words.join(" ");
    let mut out: String = joined
        .trim_end_matches(['-', ',', '.', ';', ':'])
        .chars()
        .take(max - 1)
        .collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: WrapBudget = WrapBudget { max_chars: 10, max_lines: 2, font_size: 10 };

    #[test]
    fn test_budgets_non_increasing() {
        let lengths = [5, 30, 60, 120];
        let budgets: Vec<_> = lengths.iter().map(|n| title_budget(&"x".repeat(*n))).collect();
        for pair in budgets.windows(2) {
            assert!(pair[1].max_chars <= pair[0].max_chars);
            assert!(pair[1].max_lines <= pair[0].max_lines);
        }
        assert_eq!(budgets[3], LONG_TITLE);
    }

    #[test]
    fn test_greedy_packing() {
        assert_eq!(wrap("plan your next trip", SMALL), vec!["plan your", "next trip"]);
        assert_eq!(wrap("", SMALL), Vec::<String>::new());
    }

    #[test]
    fn test_long_word_hyphenated() {
        assert_eq!(
            wrap("Donaudampfschiff", SMALL),
            vec!["Donaudamp-", "fschiff"]
        );
    }

    #[test]
    fn test_overflow_gets_ellipsis() {
        let lines = wrap("one two three four five six seven", SMALL);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "one two");
        assert_eq!(lines[1], "three…");
        assert!(lines[1].chars().count() <= 10);
    }
}
