use apiprobe::app::{self, Outcome};
use apiprobe::logging;
use apiprobe::settings::load_from_cli;
use std::process::ExitCode;
use tracing::debug;

fn main() -> ExitCode {
    let settings = match load_from_cli() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::from(Outcome::SetupError.code());
        }
    };

    logging::init(settings.verbose);
    debug!(output = ?settings.output, quiet = settings.quiet, "settings loaded");

    let outcome = match app::run(&settings) {
        Ok(outcome) => outcome,
        Err(err) => {
            if !settings.silent {
                eprintln!("Error: {err}");
            }
            Outcome::SetupError
        }
    };
    ExitCode::from(outcome.code())
}
