//! SmartCut CLI
//!
//! # Usage
//!
//! ```bash
//! smartcut plan --input movie.mkv --at 00:01:30.250
//! smartcut keyframes --input movie.mkv --at 90 --window 5
//! smartcut encoder-args --encoder h264_nvenc --index 2 --quality 18
//! smartcut encoders --json
//! ```

use std::process::ExitCode;

use clap::Parser;
use smartcut_cli::cli::Cli;
use smartcut_cli::{DomainError, SmartCutError};

/// Exit status for errors the user can act on (bad input, no usable keyframe)
const EXIT_USER_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match domain_error(&err) {
            Some(domain) if domain.is_user_facing() || matches!(domain, DomainError::BadArgs(_)) => {
                eprintln!("{}", domain);
                ExitCode::from(EXIT_USER_ERROR)
            }
            _ => {
                eprintln!("Error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn domain_error(err: &anyhow::Error) -> Option<&DomainError> {
    err.chain().find_map(|cause| {
        cause.downcast_ref::<DomainError>().or_else(|| {
            match cause.downcast_ref::<SmartCutError>() {
                Some(SmartCutError::Domain(domain)) => Some(domain),
                _ => None,
            }
        })
    })
}
