mod platform;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match platform::run_app().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
