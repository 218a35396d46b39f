use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::profile::{
    capability::{Capability, Numeric, Temporal},
    classify::{
        datetime_formats, is_boolean, is_null, parse_decimal, parse_integer, DATE_FORMATS,
        TIME_FORMATS,
    },
};

/// The type reported for a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataType {
    Boolean,
    Integer,
    Decimal,
    Date,
    Time,
    DateTime,
    Text,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Boolean => "Boolean",
            DataType::Integer => "Integer",
            DataType::Decimal => "Decimal",
            DataType::Date => "Date",
            DataType::Time => "Time",
            DataType::DateTime => "Date/Time",
            DataType::Text => "Text",
        };

        write!(f, "{}", name)
    }
}

/// Everything learned about one column of a file.
#[derive(Debug, Clone)]
pub struct FieldProfile {
    pub name: String,

    /// Length in characters of the non-blank, non-null values.
    pub length: Numeric<usize>,

    /// Lexicographically smallest and largest values.
    pub text: Option<(String, String)>,

    pub integer: Capability<Numeric<i128>>,
    pub decimal: Capability<Numeric<f64>>,
    pub date: Capability<Temporal<NaiveDate>>,
    pub time: Capability<Temporal<NaiveTime>>,
    pub datetime: Capability<Temporal<NaiveDateTime>>,
    pub boolean: Capability<()>,

    pub empty: usize,
    pub null: usize,

    /// Occurrences of every distinct value.
    pub values: HashMap<String, usize>,
}

impl FieldProfile {
    pub fn new(name: String) -> FieldProfile {
        FieldProfile {
            name,
            length: Numeric::default(),
            text: None,
            integer: Capability::default(),
            decimal: Capability::default(),
            date: Capability::default(),
            time: Capability::default(),
            datetime: Capability::default(),
            boolean: Capability::default(),
            empty: 0,
            null: 0,
            values: HashMap::new(),
        }
    }

    /// Accounts for one value of this column.
    pub fn update(&mut self, value: &str) {
        if value.is_empty() {
            self.empty += 1;
            return;
        }

        if is_null(value) {
            self.null += 1;
            return;
        }

        let length = value.chars().count();
        self.length.observe(length, length as f64);

        self.text = match self.text.take() {
            None => Some((value.to_string(), value.to_string())),
            Some((min, max)) => Some((
                if value < min.as_str() { value.to_string() } else { min },
                if value > max.as_str() { value.to_string() } else { max },
            )),
        };

        self.integer.check(|n| match parse_integer(value) {
            Some(v) => {
                n.observe(v, v as f64);
                true
            }
            None => false,
        });

        self.decimal.check(|n| match parse_decimal(value) {
            Some(v) => {
                n.observe(v, v);
                true
            }
            None => false,
        });

        self.date.check(|t| t.update(value, DATE_FORMATS));
        self.time.check(|t| t.update(value, TIME_FORMATS));
        self.datetime.check(|t| t.update(value, datetime_formats()));
        self.boolean.check(|_| is_boolean(value));

        *self.values.entry(value.to_string()).or_insert(0) += 1;
    }

    /// Called once the file ends, `rows` being the amount of data rows read.
    /// A column without a single value is plain text.
    pub fn finalize(&mut self, rows: usize) {
        if self.empty + self.null == rows {
            self.length = Numeric {
                min: Some(0),
                max: Some(0),
                ..Numeric::default()
            };
            self.text = Some((String::new(), String::new()));
            self.integer.disprove();
            self.decimal.disprove();
            self.date.disprove();
            self.time.disprove();
            self.datetime.disprove();
            self.boolean.disprove();
        }
    }

    /// The first type, in order of precedence, that fits every value.
    pub fn data_type(&self) -> DataType {
        if self.boolean.is_active() {
            DataType::Boolean
        } else if self.integer.is_active() {
            DataType::Integer
        } else if self.decimal.is_active() {
            DataType::Decimal
        } else if self.date.is_active() {
            DataType::Date
        } else if self.time.is_active() {
            DataType::Time
        } else if self.datetime.is_active() {
            DataType::DateTime
        } else {
            DataType::Text
        }
    }

    /// Distinct values, counting blanks and nulls as one value each.
    pub fn distinct(&self) -> usize {
        self.values.len() + (self.empty > 0) as usize + (self.null > 0) as usize
    }
}
