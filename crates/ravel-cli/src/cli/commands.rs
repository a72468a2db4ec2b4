//! Command builders for the CLI.
//!
//! `bind`, `count` and `project` share the rewrite flags: whatever text they
//! print is produced from the query after binding and scoping.

use clap::Command;

use super::args::*;

fn with_query_input(cmd: Command) -> Command {
    cmd.arg(query_path_arg()).arg(query_text_arg())
}

fn with_rewrite_args(cmd: Command) -> Command {
    cmd.arg(param_arg())
        .arg(from_arg())
        .arg(from_named_arg())
        .arg(limit_arg())
        .arg(offset_arg())
        .arg(auto_prefix_arg())
        .arg(prefix_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("ravel")
        .about("Inspect and rewrite parameterized SPARQL queries")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(check_command())
        .subcommand(bind_command())
        .subcommand(count_command())
        .subcommand(project_command())
}

/// Classify a query and report lexical problems.
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Classify a query and report problems")
        .override_usage(
            "\
  ravel check <QUERY>
  ravel check -q <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  ravel check people.rq                       # form, variables, parameters
  ravel check people.rq --json                # same, as JSON
  ravel check -q 'ASK { @s ?p ?o }' --strict  # unbound parameters fail"#,
        )
        .arg(json_arg())
        .arg(strict_arg())
        .arg(color_arg());
    with_query_input(cmd)
}

/// Bind parameters and print the rewritten query.
pub fn bind_command() -> Command {
    let cmd = Command::new("bind")
        .about("Bind parameters and print the rewritten query")
        .override_usage(
            "\
  ravel bind <QUERY> [-p NAME=VALUE]...
  ravel bind -q <TEXT> [-p NAME=VALUE]...",
        )
        .after_help(
            r#"EXAMPLES:
  ravel bind people.rq -p person='<http://example.org/bob>'
  ravel bind people.rq -p name='"Bob"@en' --limit 10
  ravel bind -q 'SELECT * FROM @g { ?s ?p ?o }' -p g='<http://example.org/g>'
  ravel bind people.rq --auto-prefix --prefix foaf=http://xmlns.com/foaf/0.1/"#,
        );
    with_rewrite_args(with_query_input(cmd))
}

/// Print the COUNT query over the primary variable.
pub fn count_command() -> Command {
    let cmd = Command::new("count")
        .about("Print the COUNT(DISTINCT) query over the primary variable")
        .after_help(
            r#"EXAMPLES:
  ravel count people.rq
  ravel count -q 'SELECT ?s { ?s a @class }' -p class='<http://example.org/Person>'"#,
        );
    with_rewrite_args(with_query_input(cmd))
}

/// Print the SELECT DISTINCT projection of one variable.
pub fn project_command() -> Command {
    let cmd = Command::new("project")
        .about("Print the SELECT DISTINCT projection of one variable")
        .after_help(
            r#"EXAMPLES:
  ravel project people.rq
  ravel project people.rq --var friend"#,
        )
        .arg(var_arg());
    with_rewrite_args(with_query_input(cmd))
}
