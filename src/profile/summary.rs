use crate::{
    delimited::{unparse, Dialect},
    profile::{classify::format_decimal, field::FieldProfile, Profile},
};

const LABELS: [&str; 11] = [
    "Column Name",
    "Data Type",
    "Minimum Length",
    "Average Length",
    "Maximum Length",
    "Minimum Value",
    "Average Value",
    "Maximum Value",
    "Empty Values",
    "Distinct Values",
    "Total Values",
];

fn one_decimal(value: Option<f64>, default: &str) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => default.to_string(),
    }
}

/// Minimum, average and maximum value, taken from the first type that fits
/// the column in the order integer, decimal, date, time, date/time. Other
/// columns report their text bounds.
fn value_cells(field: &FieldProfile) -> [String; 3] {
    if let Some(n) = field.integer.active() {
        [
            n.min.map(|v| v.to_string()).unwrap_or_default(),
            one_decimal(n.mean(), ""),
            n.max.map(|v| v.to_string()).unwrap_or_default(),
        ]
    } else if let Some(n) = field.decimal.active() {
        [
            n.min.map(format_decimal).unwrap_or_default(),
            n.mean().map(format_decimal).unwrap_or_default(),
            n.max.map(format_decimal).unwrap_or_default(),
        ]
    } else if let Some(t) = field.date.active() {
        temporal_cells(t.min_text(), t.max_text())
    } else if let Some(t) = field.time.active() {
        temporal_cells(t.min_text(), t.max_text())
    } else if let Some(t) = field.datetime.active() {
        temporal_cells(t.min_text(), t.max_text())
    } else {
        match field.text {
            Some((ref min, ref max)) => [min.clone(), String::new(), max.clone()],
            None => Default::default(),
        }
    }
}

fn temporal_cells(min: Option<&str>, max: Option<&str>) -> [String; 3] {
    [
        min.unwrap_or_default().to_string(),
        String::new(),
        max.unwrap_or_default().to_string(),
    ]
}

fn cells(field: &FieldProfile, rows: usize) -> Vec<String> {
    let [min_value, avg_value, max_value] = value_cells(field);

    vec![
        field.name.clone(),
        field.data_type().to_string(),
        field.length.min.unwrap_or(0).to_string(),
        one_decimal(field.length.mean(), "0"),
        field.length.max.unwrap_or(0).to_string(),
        min_value,
        avg_value,
        max_value,
        (field.empty + field.null).to_string(),
        field.distinct().to_string(),
        rows.to_string(),
    ]
}

/// Renders the statistics table: one line per statistic, one column per
/// field after the label column.
pub fn render(profile: &Profile, dialect: &Dialect) -> String {
    let mut table: Vec<Vec<String>> = LABELS.iter().map(|l| vec![l.to_string()]).collect();

    for field in profile.fields.iter() {
        for (line, cell) in table.iter_mut().zip(cells(field, profile.rows)) {
            line.push(cell);
        }
    }

    let mut text = String::new();

    for line in table.iter() {
        text.push_str(&unparse(line, dialect));
        text.push('\n');
    }

    text
}
