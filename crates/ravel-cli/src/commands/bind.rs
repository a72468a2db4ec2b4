use super::run_common::{RewriteArgs, fail, prepare_or_exit};

pub struct BindArgs {
    pub rewrite: RewriteArgs,
}

pub fn run(args: BindArgs) {
    let descriptor = prepare_or_exit(&args.rewrite);
    match descriptor.serialize() {
        Ok(text) => println!("{}", text),
        Err(e) => fail(e),
    }
}
