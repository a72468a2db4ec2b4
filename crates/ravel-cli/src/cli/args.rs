//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the same definition can be composed
//! into several commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};
use crate::commands::param::{parse_binding, parse_graph, parse_prefix};

/// Query file (positional, "-" for stdin).
pub fn query_path_arg() -> Arg {
    Arg::new("query_path")
        .value_name("QUERY")
        .value_parser(value_parser!(PathBuf))
        .help("Query file (use \"-\" for stdin)")
}

/// Inline query text (-q/--query).
pub fn query_text_arg() -> Arg {
    Arg::new("query_text")
        .short('q')
        .long("query")
        .value_name("TEXT")
        .conflicts_with("query_path")
        .help("Inline query text")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostics")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Treat warnings as errors")
}

/// Machine-readable output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the summary as JSON")
}

/// Parameter binding (-p/--param NAME=VALUE), repeatable.
pub fn param_arg() -> Arg {
    Arg::new("param")
        .short('p')
        .long("param")
        .value_name("NAME=VALUE")
        .action(ArgAction::Append)
        .value_parser(parse_binding)
        .help("Bind a parameter: <iri>, \"text\", \"text\"@lang, \"lex\"^^<dt>, number or boolean")
}

/// Default graph (--from URI), repeatable.
pub fn from_arg() -> Arg {
    Arg::new("from")
        .long("from")
        .value_name("GRAPH")
        .action(ArgAction::Append)
        .value_parser(parse_graph)
        .help("Add a FROM graph")
}

/// Named graph (--from-named URI), repeatable.
pub fn from_named_arg() -> Arg {
    Arg::new("from_named")
        .long("from-named")
        .value_name("GRAPH")
        .action(ArgAction::Append)
        .value_parser(parse_graph)
        .help("Add a FROM NAMED graph")
}

/// Replace or append LIMIT (--limit).
pub fn limit_arg() -> Arg {
    Arg::new("limit")
        .long("limit")
        .value_name("N")
        .value_parser(value_parser!(u64))
        .help("Set the LIMIT clause")
}

/// Replace or append OFFSET (--offset).
pub fn offset_arg() -> Arg {
    Arg::new("offset")
        .long("offset")
        .value_name("N")
        .value_parser(value_parser!(u64))
        .help("Set the OFFSET clause")
}

/// Declare used-but-undeclared prefixes (--auto-prefix).
pub fn auto_prefix_arg() -> Arg {
    Arg::new("auto_prefix")
        .long("auto-prefix")
        .action(ArgAction::SetTrue)
        .help("Declare undeclared prefixes from the known namespaces")
}

/// Extra namespace (--prefix PREFIX=IRI), repeatable.
pub fn prefix_arg() -> Arg {
    Arg::new("prefix")
        .long("prefix")
        .value_name("PREFIX=IRI")
        .action(ArgAction::Append)
        .value_parser(parse_prefix)
        .help("Make a namespace known to --auto-prefix")
}

/// Projected variable (--var).
pub fn var_arg() -> Arg {
    Arg::new("var")
        .long("var")
        .value_name("NAME")
        .help("Variable to project (defaults to the primary variable)")
}

/// Verbosity (-v, -vv, -vvv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .global(true)
        .help("Log to stderr (-v info, -vv debug, -vvv trace; RUST_LOG overrides)")
}
