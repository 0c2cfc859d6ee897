use std::process::ExitCode;

fn main() -> ExitCode {
    match errflags::cli::run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(errflags::errors::get_exit_code(&e))
        }
    }
}
