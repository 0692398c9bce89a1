use std::process::ExitCode;

fn main() -> ExitCode {
    match notebook_tui::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "notebook exited with an error");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
