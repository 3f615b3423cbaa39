use std::process::ExitCode;

fn main() -> ExitCode {
    match covid19_curves::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("covid19: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
