//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` structs mirror the command `*Args` but are populated from clap;
//! the `From` impls resolve presentation choices such as color.

use std::path::PathBuf;

use clap::ArgMatches;
use ravel_core::Uri;

use super::ColorChoice;
use crate::commands::bind::BindArgs;
use crate::commands::check::CheckArgs;
use crate::commands::count::CountArgs;
use crate::commands::param::{Binding, PrefixDecl};
use crate::commands::project::ProjectArgs;
use crate::commands::run_common::RewriteArgs;

pub struct CheckParams {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub json: bool,
    pub strict: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            query_path: m.get_one::<PathBuf>("query_path").cloned(),
            query_text: m.get_one::<String>("query_text").cloned(),
            json: m.get_flag("json"),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            query_path: p.query_path,
            query_text: p.query_text,
            json: p.json,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

/// Query input plus the rewrite flags shared by bind, count and project.
pub struct RewriteParams {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub bindings: Vec<Binding>,
    pub from: Vec<Uri>,
    pub from_named: Vec<Uri>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub auto_prefix: bool,
    pub prefixes: Vec<PrefixDecl>,
}

impl RewriteParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            query_path: m.get_one::<PathBuf>("query_path").cloned(),
            query_text: m.get_one::<String>("query_text").cloned(),
            bindings: many(m, "param"),
            from: many(m, "from"),
            from_named: many(m, "from_named"),
            limit: m.get_one::<u64>("limit").copied(),
            offset: m.get_one::<u64>("offset").copied(),
            auto_prefix: m.get_flag("auto_prefix"),
            prefixes: many(m, "prefix"),
        }
    }
}

impl From<RewriteParams> for RewriteArgs {
    fn from(p: RewriteParams) -> Self {
        Self {
            query_path: p.query_path,
            query_text: p.query_text,
            bindings: p.bindings,
            from: p.from,
            from_named: p.from_named,
            limit: p.limit,
            offset: p.offset,
            // An explicit --prefix only makes sense if prefixes get declared.
            auto_prefix: p.auto_prefix || !p.prefixes.is_empty(),
            prefixes: p.prefixes,
        }
    }
}

pub struct BindParams {
    pub rewrite: RewriteParams,
}

impl BindParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            rewrite: RewriteParams::from_matches(m),
        }
    }
}

impl From<BindParams> for BindArgs {
    fn from(p: BindParams) -> Self {
        Self {
            rewrite: p.rewrite.into(),
        }
    }
}

pub struct CountParams {
    pub rewrite: RewriteParams,
}

impl CountParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            rewrite: RewriteParams::from_matches(m),
        }
    }
}

impl From<CountParams> for CountArgs {
    fn from(p: CountParams) -> Self {
        Self {
            rewrite: p.rewrite.into(),
        }
    }
}

pub struct ProjectParams {
    pub rewrite: RewriteParams,
    pub variable: Option<String>,
}

impl ProjectParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            rewrite: RewriteParams::from_matches(m),
            variable: m.get_one::<String>("var").cloned(),
        }
    }
}

impl From<ProjectParams> for ProjectArgs {
    fn from(p: ProjectParams) -> Self {
        Self {
            rewrite: p.rewrite.into(),
            variable: p.variable,
        }
    }
}

fn many<T: Clone + Send + Sync + 'static>(m: &ArgMatches, id: &str) -> Vec<T> {
    m.get_many::<T>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
