//! Shared logic for the commands that print rewritten query text.

use std::path::PathBuf;

use ravel_core::{NamespaceRegistry, Uri};
use ravel_sparql::QueryDescriptor;

use super::param::{Binding, PrefixDecl};
use super::query_loader::{QuerySource, load_query_source};

pub struct RewriteArgs {
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

/// Print `error: ...` and exit with status 1.
pub fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", message);
    std::process::exit(1);
}

pub fn load_or_exit(args: &RewriteArgs) -> QuerySource {
    let source = load_query_source(args.query_path.as_deref(), args.query_text.as_deref())
        .unwrap_or_else(|msg| fail(msg));
    if source.text.trim().is_empty() {
        fail("query cannot be empty");
    }
    source
}

/// Apply bindings, dataset, prefixes and paging, in that order.
pub fn rewrite(text: &str, args: &RewriteArgs) -> ravel_sparql::Result<QueryDescriptor> {
    let mut descriptor = QueryDescriptor::parse(text);

    for binding in &args.bindings {
        tracing::debug!(parameter = %binding.name, "binding");
        descriptor.bind(&binding.name, &binding.value)?;
    }
    for graph in &args.from {
        descriptor.add_default_graph(graph);
    }
    for graph in &args.from_named {
        descriptor.add_named_graph(graph);
    }

    if args.auto_prefix {
        let mut registry = NamespaceRegistry::global().read().clone();
        for decl in &args.prefixes {
            registry.register(decl.prefix.clone(), decl.namespace.clone());
        }
        descriptor.declare_prefixes(&registry)?;
    }

    if let Some(limit) = args.limit {
        descriptor.set_limit(limit);
    }
    if let Some(offset) = args.offset {
        descriptor.set_offset(offset);
    }
    Ok(descriptor)
}

/// Load, check for lexical errors and rewrite, or exit.
pub fn prepare_or_exit(args: &RewriteArgs) -> QueryDescriptor {
    let source = load_or_exit(args);
    let descriptor = rewrite(&source.text, args).unwrap_or_else(|e| fail(e));

    let diagnostics = descriptor.rewriter().diagnostics();
    if diagnostics.has_errors() {
        let colored = std::io::IsTerminal::is_terminal(&std::io::stderr());
        eprint!(
            "{}",
            diagnostics
                .printer(&source.text)
                .path(&source.name)
                .colored(colored)
                .render()
        );
        std::process::exit(1);
    }
    descriptor
}
