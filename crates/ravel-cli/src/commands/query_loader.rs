use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Query text together with the name diagnostics should show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySource {
    pub name: String,
    pub text: String,
}

pub fn load_query_source(
    query_path: Option<&Path>,
    query_text: Option<&str>,
) -> Result<QuerySource, String> {
    if let Some(text) = query_text {
        return Ok(QuerySource {
            name: "<query>".to_owned(),
            text: text.to_owned(),
        });
    }

    if let Some(path) = query_path {
        if path.as_os_str() == "-" {
            return load_stdin();
        }
        return load_file(path);
    }

    Err("query is required: use a positional argument, -q/--query, or \"-\" for stdin".to_owned())
}

fn load_stdin() -> Result<QuerySource, String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {}", e))?;
    Ok(QuerySource {
        name: "<stdin>".to_owned(),
        text: buf,
    })
}

fn load_file(path: &Path) -> Result<QuerySource, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    Ok(QuerySource {
        name: path.to_string_lossy().into_owned(),
        text,
    })
}
