mod cli;
mod commands;
mod logging;

use cli::{BindParams, CheckParams, CountParams, ProjectParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();
    logging::init(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        Some(("bind", m)) => {
            let params = BindParams::from_matches(m);
            commands::bind::run(params.into());
        }
        Some(("count", m)) => {
            let params = CountParams::from_matches(m);
            commands::count::run(params.into());
        }
        Some(("project", m)) => {
            let params = ProjectParams::from_matches(m);
            commands::project::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
