//! Parsing and unparsing of delimited records.
use crate::{
    codec::Codec,
    error::{Error, Result},
    Row,
};

/// The three characters that define a delimited file.
///
/// An absent `enclose` disables quoting both when reading and when writing,
/// an absent `escape` means a quoted field cannot contain the enclose
/// character.
#[derive(Debug, Clone, PartialEq)]
pub struct Dialect {
    pub delimiter: char,
    pub enclose: Option<char>,
    pub escape: Option<char>,
}

impl Dialect {
    /// Builds a dialect from user supplied strings. Each one must be a single
    /// character, except for `enclose` and `escape` which can also be empty.
    /// The two characters `\t` stand for a tab.
    pub fn new(delimiter: &str, enclose: &str, escape: &str) -> Result<Dialect> {
        let delimiter = match single_char("delimiter", delimiter)? {
            Some(c) => c,
            None => {
                return Err(Error::InvalidArgument("delimiter cannot be empty".to_string()))
            }
        };

        Ok(Dialect {
            delimiter,
            enclose: single_char("enclose", enclose)?,
            escape: single_char("escape", escape)?,
        })
    }
}

impl Default for Dialect {
    fn default() -> Dialect {
        Dialect {
            delimiter: ',',
            enclose: Some('"'),
            escape: Some('"'),
        }
    }
}

fn single_char(what: &str, value: &str) -> Result<Option<char>> {
    if value == "\\t" {
        return Ok(Some('\t'));
    }

    let mut chars = value.chars();

    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(c), None) => Ok(Some(c)),
        (Some(_), Some(_)) => Err(Error::InvalidArgument(format!(
            "{} must be a single character, got {:?}",
            what, value
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Between,
    Unquoted,
    Quoted,
}

/// Splits `text` into its fields.
///
/// Spaces between fields are skipped and every value, quoted or not, is
/// trimmed. Anything between a closing enclose character and the next
/// delimiter is discarded.
pub fn parse(text: &str, dialect: &Dialect) -> Row {
    let chars: Vec<char> = text.chars().collect();
    let mut row = Row::new();
    let mut value = String::new();
    let mut state = State::Between;
    let mut last = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if state == State::Between && c == ' ' {
            i += 1;
            continue;
        }

        last = Some(c);

        match state {
            State::Quoted => {
                let peek = chars.get(i + 1).copied();

                if dialect.escape == Some(c) && peek.is_some() && peek == dialect.enclose {
                    value.push(chars[i + 1]);
                    i += 1;
                } else if dialect.enclose == Some(c) {
                    row.push_field(value.trim());
                    value.clear();
                    state = State::Between;

                    while i < chars.len() && chars[i] != dialect.delimiter {
                        i += 1;
                    }

                    last = chars.get(i).copied();
                } else {
                    value.push(c);
                }
            }
            State::Unquoted => {
                if c == dialect.delimiter {
                    row.push_field(value.trim());
                    value.clear();
                    state = State::Between;
                } else {
                    value.push(c);
                }
            }
            State::Between => {
                if dialect.enclose == Some(c) {
                    state = State::Quoted;
                } else if c == dialect.delimiter {
                    row.push_field("");
                } else {
                    value.push(c);
                    state = State::Unquoted;
                }
            }
        }

        i += 1;
    }

    if state != State::Between || last == Some(dialect.delimiter) {
        row.push_field(value.trim());
    }

    row
}

/// Joins `fields` with the delimiter, enclosing every one of them and
/// escaping the enclose character inside them.
pub fn unparse<I, T>(fields: I, dialect: &Dialect) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut line = String::new();

    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push(dialect.delimiter);
        }

        match dialect.enclose {
            Some(enclose) => {
                line.push(enclose);

                for c in field.as_ref().chars() {
                    if c == enclose {
                        if let Some(escape) = dialect.escape {
                            line.push(escape);
                        }
                    }

                    line.push(c);
                }

                line.push(enclose);
            }
            None => line.push_str(field.as_ref()),
        }
    }

    line
}

impl Codec for Dialect {
    fn parse(&self, line: &str, _line_number: usize) -> Result<Row> {
        Ok(parse(line, self))
    }

    fn unparse(&self, row: &Row) -> String {
        unparse(row.iter(), self)
    }
}
