use ravel_sparql::serialize::serialize_uri_projection;

use super::run_common::{RewriteArgs, fail, prepare_or_exit};

pub struct ProjectArgs {
    pub rewrite: RewriteArgs,
    pub variable: Option<String>,
}

pub fn run(args: ProjectArgs) {
    let descriptor = prepare_or_exit(&args.rewrite);
    match serialize_uri_projection(&descriptor, args.variable.as_deref()) {
        Ok(text) => println!("{}", text),
        Err(e) => fail(e),
    }
}
