//! [`Selection`] of numbered choices.

/// Keyword selecting all the available choices.
pub const ALL: &str = "all";

/// Choices picked out of a numbered list.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Selection {
    /// Zero-based indices of the picked choices, in the order they were
    /// entered, without duplicates.
    pub picked: Vec<usize>,

    /// Entered tokens not matching any choice.
    pub rejected: Vec<String>,
}

impl Selection {
    /// Parses the provided `input` against a list of `count` choices numbered
    /// from `1`.
    ///
    /// The `input` is either the [`ALL`] keyword (case-insensitive) or a
    /// comma-separated list of choice numbers. Blank tokens are ignored.
    #[must_use]
    pub fn parse(input: &str, count: usize) -> Self {
        let input = input.trim();
        if input.eq_ignore_ascii_case(ALL) {
            return Self {
                picked: (0..count).collect(),
                rejected: vec![],
            };
        }

        let mut selection = Self::default();
        for token in input.split(',').map(str::trim).filter(|t| !t.is_empty())
        {
            match token.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => {
                    if !selection.picked.contains(&(n - 1)) {
                        selection.picked.push(n - 1);
                    }
                }
                Ok(_) | Err(_) => selection.rejected.push(token.to_owned()),
            }
        }
        selection
    }

    /// Indicates whether nothing was picked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Selection;

    #[test]
    fn picks_listed_numbers() {
        assert_eq!(
            Selection::parse("1,3, 5", 6),
            Selection {
                picked: vec![0, 2, 4],
                rejected: vec![],
            },
        );
    }

    #[test]
    fn picks_everything_with_keyword() {
        assert_eq!(Selection::parse(" ALL ", 3).picked, vec![0, 1, 2]);
        assert_eq!(Selection::parse("all", 0).picked, Vec::<usize>::new());
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert_eq!(
            Selection::parse("0, 2, 9, x, -1", 4),
            Selection {
                picked: vec![1],
                rejected: vec!["0".into(), "9".into(), "x".into(), "-1".into()],
            },
        );
    }

    #[test]
    fn collapses_duplicates_keeping_order() {
        assert_eq!(Selection::parse("3,1,3,1", 3).picked, vec![2, 0]);
    }

    #[test]
    fn blank_input_picks_nothing() {
        let selection = Selection::parse("  ,, ", 5);

        assert!(selection.is_empty());
        assert!(selection.rejected.is_empty());
    }
}
