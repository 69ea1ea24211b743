use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    match bbox_buddy::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
