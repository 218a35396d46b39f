//! MySQL statements to create a table for a profiled file and load it.
use std::path::Path;

use crate::{
    delimited::Dialect,
    input::{absolute, Source},
    profile::{field::FieldProfile, Profile},
};

const INTEGER_TYPES: [(&str, u32); 5] = [
    ("TINYINT", 8),
    ("SMALLINT", 16),
    ("MEDIUMINT", 24),
    ("INT", 32),
    ("BIGINT", 64),
];

const VARCHAR_SIZES: [usize; 6] = [10, 25, 50, 100, 255, 1024];

#[cfg(windows)]
const NEWLINE: &str = "\r\n";
#[cfg(not(windows))]
const NEWLINE: &str = "\n";

/// Lower case name made of letters, digits and underscores. Runs of spaces
/// and hyphens become a single underscore.
pub fn identifier(name: &str) -> String {
    let mut ident = String::with_capacity(name.len());
    let mut in_run = false;

    for c in name.trim().to_lowercase().chars() {
        if c == ' ' || c == '-' {
            if !in_run {
                ident.push('_');
                in_run = true;
            }

            continue;
        }

        in_run = false;

        if c.is_ascii_alphanumeric() || c == '_' {
            ident.push(c);
        }
    }

    ident
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }

    escaped
}

fn integer_type(min: i128, max: i128) -> Option<String> {
    for (name, bits) in INTEGER_TYPES.iter() {
        let (low, high, extra) = if min < 0 {
            (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1, "")
        } else {
            (0, (1i128 << bits) - 1, " UNSIGNED")
        };

        if min >= low && max <= high {
            return Some(format!("{}{}", name, extra));
        }
    }

    None
}

fn varchar_type(length: usize) -> String {
    match VARCHAR_SIZES.iter().find(|size| length <= **size) {
        Some(size) => format!("VARCHAR({})", size),
        None => "TEXT".to_string(),
    }
}

fn locked_format<T>(capability: Option<&crate::profile::capability::Temporal<T>>) -> Option<&str> {
    capability.and_then(|t| t.format.as_deref())
}

/// The column type for a field, first rule that applies.
pub fn column_type(field: &FieldProfile) -> String {
    let binary = !field.values.is_empty() && field.values.keys().all(|v| v == "0" || v == "1");

    if field.boolean.is_active() && binary {
        return "TINYINT UNSIGNED".to_string();
    }

    if locked_format(field.date.active()) == Some("%Y-%m-%d") {
        return "DATE".to_string();
    }

    match locked_format(field.datetime.active()) {
        Some("%Y-%m-%d %H:%M") | Some("%Y-%m-%d %H:%M:%S") => return "DATETIME".to_string(),
        _ => {}
    }

    match locked_format(field.time.active()) {
        Some("%H:%M") | Some("%H:%M:%S") => return "TIME".to_string(),
        _ => {}
    }

    let min_length = field.length.min.unwrap_or(0);
    let max_length = field.length.max.unwrap_or(0);

    if min_length > 0 && min_length == max_length {
        return format!("CHAR({})", min_length);
    }

    if let Some(n) = field.integer.active() {
        // integers that do not fit in 64 bits end up as text
        if let (Some(min), Some(max)) = (n.min, n.max) {
            if let Some(sql) = integer_type(min, max) {
                return sql;
            }
        }
    } else if field.decimal.is_active() {
        return "DECIMAL".to_string();
    }

    varchar_type(max_length)
}

/// What the `LOAD DATA` statement needs to know about the profiled file.
#[derive(Debug, Clone)]
pub struct SqlImport {
    table: String,
    path: String,
    delimiter: String,
    enclose: String,
    terminator: String,
    headers: bool,
}

impl SqlImport {
    /// `terminator` is the line terminator found in the file, the platform's
    /// one is used if empty.
    pub fn new(source: &Source, dialect: &Dialect, terminator: &str, headers: bool) -> SqlImport {
        let table = match source {
            Source::Stdin => "tbl".to_string(),
            Source::Path(_) => identifier(&source.stem()),
        };
        let path = absolute(Path::new(&source.label()));

        SqlImport {
            table,
            path: path.to_string_lossy().to_string(),
            delimiter: dialect.delimiter.to_string(),
            enclose: dialect.enclose.map(String::from).unwrap_or_default(),
            terminator: if terminator.is_empty() { NEWLINE } else { terminator }.to_string(),
            headers,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn render(&self, profile: &Profile) -> String {
        let columns: Vec<String> = profile
            .fields
            .iter()
            .map(|field| {
                format!(
                    "\t`{}` {} {}",
                    identifier(&field.name),
                    column_type(field),
                    if field.null > 0 { "NULL" } else { "NOT NULL" }
                )
            })
            .collect();

        format!(
            "CREATE TABLE {}(\n{}\n);\n\nLOAD DATA INFILE '{}' IGNORE INTO TABLE {} FIELDS TERMINATED BY '{}' OPTIONALLY ENCLOSED BY '{}' LINES TERMINATED BY '{}'{};\n",
            self.table,
            columns.join(",\n"),
            escape(&self.path),
            self.table,
            escape(&self.delimiter),
            escape(&self.enclose),
            escape(&self.terminator),
            if self.headers { " IGNORE 1 LINES" } else { "" },
        )
    }
}
