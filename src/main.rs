use std::process::ExitCode;

fn main() -> ExitCode {
    match specbuild::run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("specbuild error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
