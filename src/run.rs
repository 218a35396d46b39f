//! Runs an action over a list of inputs.
use std::path::Path;

use tracing::{debug, info};

use crate::{
    action::Action,
    codec::Codec,
    config::Config,
    error::{Error, Result},
    input::{InputStream, Source},
    output::{expand, Output},
    profile::{Profiler, SqlImport},
    split::{SplitBy, SplitTarget},
    RowStream,
};

/// Runs `action` over every input in order, writing to `output` (a template
/// where `{f}` and `{e}` are replaced by the name and extension of each
/// input) or to the standard output if there is none.
///
/// Returns the amount of data rows processed.
pub fn run(action: &Action, inputs: &[Source], output: Option<&str>, config: &Config) -> Result<usize> {
    match action {
        Action::SplitLines { lines } => split(SplitBy::Lines(*lines), inputs, config),
        Action::SplitValue { column } => split(SplitBy::Value(*column), inputs, config),
        Action::Analyze { limit } => profile(*limit, false, inputs, output, config),
        Action::SqlImport { limit } => profile(*limit, true, inputs, output, config),
        _ => rewrite(action, inputs, output, config),
    }
}

/// Writes the header, if asked to and there is one, and then every row of
/// `stream` using `codec`.
fn drain<S, C>(stream: S, codec: &C, out: &mut Output, write_headers: bool) -> Result<usize>
where
    S: RowStream,
    C: Codec,
{
    if write_headers {
        if let Some(headers) = stream.headers() {
            out.write_line(&codec.unparse(headers))?;
        }
    }

    let mut count = 0;

    for row in stream {
        out.write_line(&codec.unparse(&row?))?;
        count += 1;
    }

    Ok(count)
}

fn rewrite_one(
    action: &Action,
    source: &Source,
    config: &Config,
    out: &mut Output,
    write_headers: bool,
) -> Result<usize> {
    let dialect = &config.dialect;

    match action {
        Action::Combine | Action::Repair => {
            let stream = InputStream::open(source, dialect.clone(), config)?;

            drain(stream, dialect, out, write_headers)
        }
        Action::Filter {
            column,
            pattern,
            invert,
        } => {
            let stream = InputStream::open(source, dialect.clone(), config)?
                .filter(*column, pattern.clone(), *invert);

            drain(stream, dialect, out, write_headers)
        }
        Action::Head { lines } => {
            let stream = InputStream::open(source, dialect.clone(), config)?.head(*lines);

            drain(stream, dialect, out, write_headers)
        }
        Action::RemoveColumns { columns, invert } => {
            let stream =
                InputStream::open(source, dialect.clone(), config)?.del(columns.clone(), *invert)?;

            drain(stream, dialect, out, write_headers)
        }
        Action::Replace {
            column,
            replacement,
        } => {
            let stream = InputStream::open(source, dialect.clone(), config)?
                .replace(*column, replacement.clone());

            drain(stream, dialect, out, write_headers)
        }
        Action::DelimToFixed(fixed) => {
            let stream = InputStream::open(source, dialect.clone(), config)?;

            drain(stream, fixed, out, write_headers)
        }
        Action::FixedToDelim(fixed) => {
            let stream = InputStream::open(source, fixed.clone(), config)?;

            drain(stream, dialect, out, write_headers)
        }
        Action::SplitLines { .. }
        | Action::SplitValue { .. }
        | Action::Analyze { .. }
        | Action::SqlImport { .. } => Err(Error::InvalidArgument(format!(
            "{:?} does not rewrite its input",
            action
        ))),
    }
}

fn rewrite(action: &Action, inputs: &[Source], output: Option<&str>, config: &Config) -> Result<usize> {
    let mut total = 0;

    for (index, source) in inputs.iter().enumerate() {
        let target = output.map(|t| expand(t, source)).transpose()?;
        let individual = match (output, target.as_ref()) {
            (Some(template), Some(target)) => template != target,
            _ => false,
        };
        // every input after the first one appends to a shared output
        let first = index == 0 || individual;

        let mut out = match target {
            None => Output::stdout(config.encoding),
            Some(ref path) if source.is_same_file(path) => {
                debug!(file = %source, "rewriting in place");

                Output::in_place(Path::new(path), config.encoding)?
            }
            Some(ref path) => Output::create(Path::new(path), !first, config.encoding)?,
        };

        let count = rewrite_one(action, source, config, &mut out, first)?;

        out.finish()?;

        info!(file = %source, rows = count, "processed file");

        total += count;
    }

    Ok(total)
}

fn split(by: SplitBy, inputs: &[Source], config: &Config) -> Result<usize> {
    let mut total = 0;

    for source in inputs {
        let mut rows = InputStream::open(source, config.dialect.clone(), config)?
            .split(by, SplitTarget::new(source, config.encoding), config.dialect.clone())?
            .into_iter();
        let mut count = 0;

        for row in &mut rows {
            row?;
            count += 1;
        }

        info!(file = %source, rows = count, outputs = rows.outputs().len(), "split file");

        total += count;
    }

    Ok(total)
}

/// Makes sure every input gets an output of its own that is not itself.
fn profile_targets(inputs: &[Source], output: Option<&str>) -> Result<Vec<Option<String>>> {
    let mut targets = Vec::with_capacity(inputs.len());

    for source in inputs {
        let target = match output {
            Some(template) => {
                let target = expand(template, source)?;

                if inputs.len() > 1 && target == template {
                    return Err(Error::SharedOutput);
                }

                if source.is_same_file(&target) {
                    return Err(Error::SameInputOutput(Path::new(&target).to_path_buf()));
                }

                Some(target)
            }
            None => None,
        };

        targets.push(target);
    }

    Ok(targets)
}

fn profile(
    limit: usize,
    sql: bool,
    inputs: &[Source],
    output: Option<&str>,
    config: &Config,
) -> Result<usize> {
    let targets = profile_targets(inputs, output)?;
    let mut total = 0;

    for (source, target) in inputs.iter().zip(targets) {
        let stream = InputStream::open(source, config.dialect.clone(), config)?;
        let mut profiler = Profiler::new(stream.source(), stream.headers());
        let mut rows = stream.into_iter();

        profiler.consume(&mut rows, limit)?;

        let terminator = rows.line_terminator();
        let profile = profiler.finish();

        let text = if profile.rows == 0 {
            "No data found.\n".to_string()
        } else if sql {
            profile.sql(&SqlImport::new(source, &config.dialect, terminator, config.headers))
        } else {
            profile.summary(&config.dialect)
        };

        let mut out = match target {
            Some(ref path) => Output::create(Path::new(path), false, config.encoding)?,
            None => Output::stdout(config.encoding),
        };

        out.write_str(&text)?;
        out.finish()?;

        info!(file = %source, rows = profile.rows, "profiled file");

        total += profile.rows;
    }

    Ok(total)
}
