use std::process::ExitCode;

fn main() -> ExitCode {
    spectral_analysis::cli::run()
}
