use ravel_sparql::serialize::serialize_count;

use super::run_common::{RewriteArgs, fail, prepare_or_exit};

pub struct CountArgs {
    pub rewrite: RewriteArgs,
}

pub fn run(args: CountArgs) {
    let descriptor = prepare_or_exit(&args.rewrite);
    match serialize_count(&descriptor) {
        Ok(text) => println!("{}", text),
        Err(e) => fail(e),
    }
}
