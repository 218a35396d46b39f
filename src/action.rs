use std::str::FromStr;

use encoding::EncodingRef;
use regex::Regex;

use crate::{
    error::{Error, Result},
    fixed::FixedWidth,
    replace::Replacement,
};

/// The name of every thing this tool can do to a set of files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionKind {
    Combine,
    Filter,
    Head,
    RemoveColumns,
    Repair,
    ReplacePattern,
    ReplaceValue,
    DelimToFixed,
    FixedToDelim,
    SplitLines,
    SplitValue,
    Analyze,
    SqlImport,
}

const KINDS: [ActionKind; 13] = [
    ActionKind::Combine,
    ActionKind::Filter,
    ActionKind::Head,
    ActionKind::RemoveColumns,
    ActionKind::Repair,
    ActionKind::ReplacePattern,
    ActionKind::ReplaceValue,
    ActionKind::DelimToFixed,
    ActionKind::FixedToDelim,
    ActionKind::SplitLines,
    ActionKind::SplitValue,
    ActionKind::Analyze,
    ActionKind::SqlImport,
];

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Combine => "combine",
            ActionKind::Filter => "filter",
            ActionKind::Head => "head",
            ActionKind::RemoveColumns => "remove-columns",
            ActionKind::Repair => "repair",
            ActionKind::ReplacePattern => "replace-pattern",
            ActionKind::ReplaceValue => "replace-value",
            ActionKind::DelimToFixed => "delim-to-fixed",
            ActionKind::FixedToDelim => "fixed-to-delim",
            ActionKind::SplitLines => "split-lines",
            ActionKind::SplitValue => "split-value",
            ActionKind::Analyze => "analyze",
            ActionKind::SqlImport => "sql-import",
        }
    }

    pub fn names() -> Vec<&'static str> {
        KINDS.iter().map(ActionKind::name).collect()
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    /// Case insensitive, spaces count as hyphens.
    fn from_str(s: &str) -> Result<ActionKind> {
        let name = s.trim().to_lowercase().replace(' ', "-");

        KINDS
            .iter()
            .find(|kind| kind.name() == name)
            .copied()
            .ok_or_else(|| Error::InvalidArgument(format!("unknown action: {}", s)))
    }
}

/// The options an action may need, as typed by the user.
#[derive(Debug, Default, Clone)]
pub struct ActionArgs<'a> {
    pub column: Option<&'a str>,
    pub columns: Option<&'a str>,
    pub definition: Option<&'a str>,
    pub find: Option<&'a str>,
    pub replace: Option<&'a str>,
    pub pattern: Option<&'a str>,
    pub lines: Option<&'a str>,
    pub invert: bool,
}

/// An action along with everything it needs to run. Columns are 0-based.
#[derive(Debug, Clone)]
pub enum Action {
    Combine,
    Filter {
        column: usize,
        pattern: Regex,
        invert: bool,
    },
    Head {
        lines: usize,
    },
    RemoveColumns {
        columns: Vec<usize>,
        invert: bool,
    },
    Repair,
    Replace {
        column: usize,
        replacement: Replacement,
    },
    DelimToFixed(FixedWidth),
    FixedToDelim(FixedWidth),
    SplitLines {
        lines: usize,
    },
    SplitValue {
        column: usize,
    },
    Analyze {
        limit: usize,
    },
    SqlImport {
        limit: usize,
    },
}

fn required<'a>(value: Option<&'a str>, what: &str, kind: ActionKind) -> Result<&'a str> {
    value.ok_or_else(|| {
        Error::InvalidArgument(format!("action '{}' requires --{}", kind.name(), what))
    })
}

fn number(value: &str, what: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("{} must be a number, not '{}'", what, value)))
}

fn positive(value: &str, what: &str) -> Result<usize> {
    match number(value, what)? {
        0 => Err(Error::InvalidArgument(format!("{} must be greater than zero", what))),
        n => Ok(n),
    }
}

/// Reads a 1-based column number and returns its 0-based index.
fn column(value: &str) -> Result<usize> {
    Ok(positive(value, "column")? - 1)
}

/// Reads a list like `1,3-5` of 1-based column numbers into sorted, unique
/// 0-based indexes.
pub fn parse_columns(list: &str) -> Result<Vec<usize>> {
    let mut columns = Vec::new();

    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.find('-') {
            Some(dash) => {
                let from = column(&part[..dash])?;
                let to = column(&part[dash + 1..])?;

                if from > to {
                    return Err(Error::InvalidArgument(format!("invalid column range: {}", part)));
                }

                columns.extend(from..=to);
            }
            None => columns.push(column(part)?),
        }
    }

    if columns.is_empty() {
        return Err(Error::InvalidArgument("no columns given".to_string()));
    }

    columns.sort_unstable();
    columns.dedup();

    Ok(columns)
}

impl Action {
    /// Checks that `args` has everything `kind` needs. The fixed width
    /// definition file, if any, is read with `encoding`.
    pub fn build(kind: ActionKind, args: &ActionArgs, encoding: EncodingRef) -> Result<Action> {
        let action = match kind {
            ActionKind::Combine => Action::Combine,
            ActionKind::Filter => Action::Filter {
                column: column(required(args.column, "column", kind)?)?,
                pattern: Regex::new(required(args.pattern, "pattern", kind)?)?,
                invert: args.invert,
            },
            ActionKind::Head => Action::Head {
                lines: positive(required(args.lines, "lines", kind)?, "lines")?,
            },
            ActionKind::RemoveColumns => Action::RemoveColumns {
                columns: parse_columns(required(args.columns, "columns", kind)?)?,
                invert: args.invert,
            },
            ActionKind::Repair => Action::Repair,
            ActionKind::ReplacePattern => Action::Replace {
                column: column(required(args.column, "column", kind)?)?,
                replacement: Replacement::pattern(
                    Regex::new(required(args.find.or(args.pattern), "find", kind)?)?,
                    args.replace.unwrap_or_default(),
                ),
            },
            ActionKind::ReplaceValue => Action::Replace {
                column: column(required(args.column, "column", kind)?)?,
                replacement: Replacement::Value {
                    find: required(args.find, "find", kind)?.to_string(),
                    replace: args.replace.unwrap_or_default().to_string(),
                },
            },
            ActionKind::DelimToFixed => Action::DelimToFixed(FixedWidth::from_path(
                required(args.definition, "definition", kind)?,
                encoding,
            )?),
            ActionKind::FixedToDelim => Action::FixedToDelim(FixedWidth::from_path(
                required(args.definition, "definition", kind)?,
                encoding,
            )?),
            ActionKind::SplitLines => Action::SplitLines {
                lines: positive(required(args.lines, "lines", kind)?, "lines")?,
            },
            ActionKind::SplitValue => Action::SplitValue {
                column: column(required(args.column, "column", kind)?)?,
            },
            ActionKind::Analyze => Action::Analyze {
                limit: args.lines.map(|l| number(l, "lines")).transpose()?.unwrap_or(0),
            },
            ActionKind::SqlImport => Action::SqlImport {
                limit: args.lines.map(|l| number(l, "lines")).transpose()?.unwrap_or(0),
            },
        };

        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_columns, Action, ActionArgs, ActionKind};
    use crate::{error::Error, replace::Replacement};
    use encoding::all::UTF_8;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("sql-import".parse::<ActionKind>().unwrap(), ActionKind::SqlImport);
        assert_eq!("Remove Columns".parse::<ActionKind>().unwrap(), ActionKind::RemoveColumns);
        assert_eq!("ANALYZE".parse::<ActionKind>().unwrap(), ActionKind::Analyze);

        match "explode".parse::<ActionKind>() {
            Err(Error::InvalidArgument(_)) => {}
            _ => panic!("unknown action accepted"),
        }

        for name in ActionKind::names() {
            assert_eq!(name.parse::<ActionKind>().unwrap().name(), name);
        }
    }

    #[test]
    fn test_parse_columns() {
        assert_eq!(parse_columns("1,3-5").unwrap(), vec![0, 2, 3, 4]);
        assert_eq!(parse_columns(" 4, 2 ,2").unwrap(), vec![1, 3]);
        assert!(parse_columns("0").is_err());
        assert!(parse_columns("5-3").is_err());
        assert!(parse_columns("a").is_err());
        assert!(parse_columns(",").is_err());
    }

    #[test]
    fn test_build_filter() {
        let args = ActionArgs {
            column: Some("2"),
            pattern: Some("^a"),
            invert: true,
            ..ActionArgs::default()
        };

        match Action::build(ActionKind::Filter, &args, UTF_8).unwrap() {
            Action::Filter {
                column: 1,
                pattern,
                invert: true,
            } => assert_eq!(pattern.as_str(), "^a"),
            _ => panic!("wrong action"),
        }
    }

    #[test]
    fn test_build_missing_arguments() {
        let args = ActionArgs::default();

        for kind in [
            ActionKind::Filter,
            ActionKind::Head,
            ActionKind::RemoveColumns,
            ActionKind::ReplaceValue,
            ActionKind::ReplacePattern,
            ActionKind::DelimToFixed,
            ActionKind::SplitLines,
            ActionKind::SplitValue,
        ]
        .iter()
        {
            match Action::build(*kind, &args, UTF_8) {
                Err(Error::InvalidArgument(_)) => {}
                _ => panic!("{} built without arguments", kind.name()),
            }
        }

        assert!(Action::build(ActionKind::Combine, &args, UTF_8).is_ok());
        assert!(Action::build(ActionKind::Repair, &args, UTF_8).is_ok());
    }

    #[test]
    fn test_build_invalid_arguments() {
        let zero = ActionArgs {
            lines: Some("0"),
            column: Some("0"),
            ..ActionArgs::default()
        };

        assert!(Action::build(ActionKind::Head, &zero, UTF_8).is_err());
        assert!(Action::build(ActionKind::SplitValue, &zero, UTF_8).is_err());

        let bad_pattern = ActionArgs {
            column: Some("1"),
            find: Some("(unclosed"),
            ..ActionArgs::default()
        };

        match Action::build(ActionKind::ReplacePattern, &bad_pattern, UTF_8) {
            Err(Error::InvalidPattern(_)) => {}
            _ => panic!("invalid pattern accepted"),
        }
    }

    #[test]
    fn test_build_replace_value() {
        let args = ActionArgs {
            column: Some("3"),
            find: Some("x"),
            ..ActionArgs::default()
        };

        match Action::build(ActionKind::ReplaceValue, &args, UTF_8).unwrap() {
            Action::Replace {
                column: 2,
                replacement: Replacement::Value { find, replace },
            } => {
                assert_eq!(find, "x");
                assert_eq!(replace, "");
            }
            _ => panic!("wrong action"),
        }
    }

    #[test]
    fn test_build_replace_pattern() {
        let args = ActionArgs {
            column: Some("1"),
            find: Some("f(.*)"),
            replace: Some("b\\1"),
            ..ActionArgs::default()
        };

        match Action::build(ActionKind::ReplacePattern, &args, UTF_8).unwrap() {
            Action::Replace {
                column: 0,
                replacement,
            } => assert_eq!(replacement.apply("foo"), "boo"),
            _ => panic!("wrong action"),
        }
    }

    #[test]
    fn test_build_profile_limit() {
        let args = ActionArgs {
            lines: Some("10"),
            ..ActionArgs::default()
        };

        match Action::build(ActionKind::Analyze, &args, UTF_8).unwrap() {
            Action::Analyze { limit: 10 } => {}
            _ => panic!("wrong limit"),
        }

        match Action::build(ActionKind::SqlImport, &ActionArgs::default(), UTF_8).unwrap() {
            Action::SqlImport { limit: 0 } => {}
            _ => panic!("wrong limit"),
        }
    }

    #[test]
    fn test_build_fixed() {
        let args = ActionArgs {
            definition: Some("test/assets/fixed/widths.def"),
            ..ActionArgs::default()
        };

        match Action::build(ActionKind::FixedToDelim, &args, UTF_8).unwrap() {
            Action::FixedToDelim(fixed) => assert_eq!(fixed.widths(), &[5, 3, 10]),
            _ => panic!("wrong action"),
        }
    }
}
