use std::fmt::Write;
use std::path::PathBuf;

use ravel_sparql::rewrite::GraphRole;
use ravel_sparql::{QueryDescriptor, QueryForm};
use serde::Serialize;

use super::query_loader::load_query_source;
use super::run_common::fail;

pub struct CheckArgs {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub json: bool,
    pub strict: bool,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    let source = load_query_source(args.query_path.as_deref(), args.query_text.as_deref())
        .unwrap_or_else(|msg| fail(msg));
    if source.text.trim().is_empty() {
        fail("query cannot be empty");
    }

    let descriptor = QueryDescriptor::parse(&source.text);
    let summary = QuerySummary::of(&descriptor);
    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(e),
        }
    } else {
        print!("{}", summary.render_text());
    }

    let diagnostics = descriptor.rewriter().lint();
    if !diagnostics.is_empty() {
        eprint!(
            "{}",
            diagnostics
                .printer(&source.text)
                .path(&source.name)
                .colored(args.color)
                .render()
        );
    }

    let failed = diagnostics.has_errors() || (args.strict && diagnostics.has_warnings());
    if failed {
        std::process::exit(1);
    }
}

/// What `check` reports about a query.
#[derive(Debug, Serialize)]
pub struct QuerySummary<'a> {
    pub form: QueryForm,
    pub provides_statements: bool,
    pub wildcard: bool,
    pub variables: &'a [String],
    pub primary: Option<&'a str>,
    pub prefixes: Vec<PrefixView<'a>>,
    pub parameters: Vec<ParameterView<'a>>,
    pub from: Vec<&'a str>,
    pub from_named: Vec<&'a str>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub ordered: bool,
}

#[derive(Debug, Serialize)]
pub struct PrefixView<'a> {
    pub prefix: &'a str,
    /// `None` when the prefix is used but never declared.
    pub namespace: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct ParameterView<'a> {
    pub name: &'a str,
    pub bound: bool,
    /// `"from"` or `"from_named"` for parameters in dataset position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<&'static str>,
}

impl<'a> QuerySummary<'a> {
    pub fn of(descriptor: &'a QueryDescriptor) -> Self {
        let rewriter = descriptor.rewriter();

        let mut prefixes: Vec<PrefixView<'a>> = rewriter
            .declared_prefixes()
            .iter()
            .map(|(prefix, namespace)| PrefixView {
                prefix,
                namespace: Some(namespace.as_str()),
            })
            .collect();
        prefixes.extend(rewriter.undeclared_prefixes().map(|prefix| PrefixView {
            prefix,
            namespace: None,
        }));

        let parameters = rewriter
            .parameters()
            .map(|(name, value)| ParameterView {
                name,
                bound: value.is_some(),
                dataset: rewriter
                    .dataset_parameters()
                    .find(|(dataset, _)| *dataset == name)
                    .map(|(_, role)| match role {
                        GraphRole::Default => "from",
                        GraphRole::Named => "from_named",
                    }),
            })
            .collect();

        Self {
            form: descriptor.form(),
            provides_statements: descriptor.provides_statements(),
            wildcard: descriptor.is_wildcard(),
            variables: descriptor.global_variables(),
            primary: descriptor.primary_variable(),
            prefixes,
            parameters,
            from: rewriter.default_graphs().iter().map(|g| g.as_str()).collect(),
            from_named: rewriter.named_graphs().iter().map(|g| g.as_str()).collect(),
            limit: descriptor.limit(),
            offset: descriptor.offset(),
            ordered: descriptor.has_order_by(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let mut line = |key: &str, value: String| {
            let value = if value.is_empty() { "-".to_owned() } else { value };
            let _ = writeln!(out, "{:<12}{}", key, value);
        };

        line("form", self.form.to_string());
        line("statements", yes_no(self.provides_statements));
        let variables = self.variables.iter().map(|v| format!("?{v}"));
        line(
            "variables",
            if self.wildcard {
                std::iter::once("*".to_owned()).chain(variables).collect::<Vec<_>>().join(" ")
            } else {
                variables.collect::<Vec<_>>().join(" ")
            },
        );
        line("primary", self.primary.map(|v| format!("?{v}")).unwrap_or_default());
        line(
            "prefixes",
            join(self.prefixes.iter().map(|p| match p.namespace {
                Some(_) => format!("{}:", p.prefix),
                None => format!("{}: (undeclared)", p.prefix),
            })),
        );
        line(
            "parameters",
            join(self.parameters.iter().map(|p| {
                let mut text = format!("@{}", p.name);
                if let Some(dataset) = p.dataset {
                    let _ = write!(text, " [{dataset}]");
                }
                if !p.bound {
                    text.push_str(" (unbound)");
                }
                text
            })),
        );
        line("from", join(self.from.iter().map(|g| format!("<{g}>"))));
        line("from named", join(self.from_named.iter().map(|g| format!("<{g}>"))));
        line("limit", self.limit.map(|n| n.to_string()).unwrap_or_default());
        line("offset", self.offset.map(|n| n.to_string()).unwrap_or_default());
        line("order by", yes_no(self.ordered));
        out
    }
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_owned()
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}
