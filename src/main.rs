use std::process;

use clap::{App, Arg, ArgMatches};
use tracing_subscriber::EnvFilter;

use csvdart::{run, Action, ActionArgs, ActionKind, Config, Dialect, Result, Source};

fn execute(matches: &ArgMatches) -> Result<usize> {
    let kind: ActionKind = matches.value_of("action").unwrap_or_default().parse()?;
    let dialect = Dialect::new(
        matches.value_of("delim").unwrap_or(","),
        matches.value_of("enclose").unwrap_or("\""),
        matches.value_of("escape").unwrap_or("\""),
    )?;
    let config = Config::new(
        dialect,
        matches.value_of("encoding").unwrap_or("utf-8"),
        matches.is_present("headers"),
    )?;

    let args = ActionArgs {
        column: matches.value_of("column"),
        columns: matches.value_of("columns"),
        definition: matches.value_of("definition"),
        find: matches.value_of("find"),
        replace: matches.value_of("replace"),
        pattern: matches.value_of("pattern"),
        lines: matches.value_of("lines"),
        invert: matches.is_present("invert"),
    };
    let action = Action::build(kind, &args, config.encoding)?;

    let inputs: Vec<Source> = match matches.values_of("input") {
        Some(values) => values.map(Source::from).collect(),
        None => vec![Source::Stdin],
    };

    run(&action, &inputs, matches.value_of("output"), &config)
}

fn main() {
    let action_help = format!("What to do with the input files: {}", ActionKind::names().join(", "));

    let matches = App::new("csvdart")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Analyze and manipulate delimited and fixed width data files")
        .arg(
            Arg::with_name("action")
                .short("a")
                .long("action")
                .value_name("ACTION")
                .help(&action_help)
                .required(true),
        )
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .value_name("INPUT")
                .help("Input files, standard input if none or '-'")
                .multiple(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("OUTPUT")
                .help("Output file, {f} and {e} are replaced by the input's name and extension"),
        )
        .arg(
            Arg::with_name("column")
                .long("column")
                .value_name("N")
                .help("Column to work on, starting at 1"),
        )
        .arg(
            Arg::with_name("columns")
                .long("columns")
                .value_name("LIST")
                .help("Columns to remove, like 1,3-5"),
        )
        .arg(
            Arg::with_name("definition")
                .long("definition")
                .value_name("FILE")
                .help("Fixed width definition, one column width per line"),
        )
        .arg(
            Arg::with_name("find")
                .long("find")
                .value_name("TEXT")
                .help("Text to replace, a regular expression for replace-pattern"),
        )
        .arg(
            Arg::with_name("replace")
                .long("replace")
                .value_name("TEXT")
                .help("Replacement text, \\1 or $1 refers to the first group of a pattern"),
        )
        .arg(
            Arg::with_name("pattern")
                .long("pattern")
                .value_name("REGEX")
                .help("Regular expression rows must match for filter"),
        )
        .arg(
            Arg::with_name("lines")
                .long("lines")
                .value_name("N")
                .help("Amount of rows for head and split-lines, row limit for analyze and sql-import"),
        )
        .arg(
            Arg::with_name("invert")
                .long("invert")
                .help("Keep the rows or columns that would be dropped instead"),
        )
        .arg(
            Arg::with_name("delim")
                .short("d")
                .long("delim")
                .value_name("CHAR")
                .default_value(",")
                .help("Field delimiter, \\t for tabs"),
        )
        .arg(
            Arg::with_name("enclose")
                .short("e")
                .long("enclose")
                .value_name("CHAR")
                .default_value("\"")
                .help("Character enclosing fields, may be empty"),
        )
        .arg(
            Arg::with_name("escape")
                .short("s")
                .long("escape")
                .value_name("CHAR")
                .default_value("\"")
                .help("Character escaping the enclose character, may be empty"),
        )
        .arg(
            Arg::with_name("encoding")
                .short("c")
                .long("encoding")
                .value_name("ENCODING")
                .default_value("utf-8")
                .help("Encoding of the input and output files"),
        )
        .arg(
            Arg::with_name("headers")
                .short("H")
                .long("headers")
                .help("The first line of each file is a header"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .conflicts_with("verbose")
                .help("Only report errors"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Report every file processed"),
        )
        .get_matches();

    let quiet = matches.is_present("quiet");
    let level = if quiet {
        "error"
    } else if matches.is_present("verbose") {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match execute(&matches) {
        Ok(count) => {
            if !quiet {
                eprintln!("Processed {} records successfully", count);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
