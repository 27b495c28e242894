use std::collections::BTreeSet;
use std::fmt;

/// Parsed form of a group filter expression.
///
/// The two reserved expressions are `""` (log nothing) and `"all"` (log
/// everything); anything else is a `|`-joined set of group tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupFilter {
    /// The empty expression: no event matches.
    #[default]
    Nothing,
    /// The `all` expression: every event matches.
    All,
    /// A set of group tokens; an event matches if it declares any of them.
    Groups(BTreeSet<String>),
}

impl GroupFilter {
    /// Parse a filter expression. Never fails: any non-reserved string is
    /// read as a token set.
    pub fn parse(expression: &str) -> Self {
        match expression {
            "" => GroupFilter::Nothing,
            "all" => GroupFilter::All,
            _ => GroupFilter::Groups(expression.split('|').map(str::to_string).collect()),
        }
    }

    /// Decide whether an event declaring `event_group` passes this filter.
    ///
    /// Tokens are compared as opaque strings, exact match only. An event
    /// with no group passes only the `all` filter.
    pub fn allows(&self, event_group: &str) -> bool {
        match self {
            GroupFilter::Nothing => false,
            GroupFilter::All => true,
            GroupFilter::Groups(tokens) => {
                !event_group.is_empty()
                    && event_group.split('|').any(|group| tokens.contains(group))
            }
        }
    }
}

impl fmt::Display for GroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupFilter::Nothing => Ok(()),
            GroupFilter::All => f.write_str("all"),
            GroupFilter::Groups(tokens) => {
                let expression = tokens.iter().cloned().collect::<Vec<_>>().join("|");
                f.write_str(&expression)
            }
        }
    }
}
