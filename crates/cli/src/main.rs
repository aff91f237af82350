use std::process::ExitCode;

fn main() -> ExitCode {
    tradespend_cli::run()
}
