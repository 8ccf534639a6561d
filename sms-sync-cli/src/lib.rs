//! # sms-sync
//!
//! Command line front end for catalog reconciliation.
//!
//! ```text
//! sms-sync fetch (videos|channels) [--base-name NAME]
//! sms-sync genupdatejob videos --base URL [--base-image-url URL] [--strip-leading N] [--output FILE] <csv> <metadata>...
//! sms-sync genupdatejob channels [--output FILE] <csv> <metadata>...
//! sms-sync genupdatejob videos_in_channels [--output FILE] <csv> <metadata>...
//! sms-sync applyupdatejob [--log-file FILE] [<update>]
//! sms-sync tidy [--output FILE] <metadata>...
//! ```
//!
//! Credentials are read from `JWPLAYER_API_KEY` and `JWPLAYER_API_SECRET`,
//! optionally through a `.env` file.

pub mod cli;
pub mod commands;

use core_runtime::Error as RuntimeError;

/// Process exit status for generic failures
pub const EXIT_FAILURE: u8 = 1;

/// Process exit status for missing credentials
pub const EXIT_MISSING_CREDENTIALS: u8 = 3;

/// Exit status for a failed run
///
/// Usage errors never get here: clap exits with status 2 itself.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    let missing_capability = error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<RuntimeError>(),
            Some(RuntimeError::CapabilityMissing { .. })
        )
    });

    if missing_capability {
        EXIT_MISSING_CREDENTIALS
    } else {
        EXIT_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use core_runtime::config::Credentials;

    #[test]
    fn test_missing_credentials_exit_code() {
        let error = Credentials::from_lookup(|_| None)
            .context("Failed to load credentials")
            .unwrap_err();
        assert_eq!(exit_code(&error), EXIT_MISSING_CREDENTIALS);
    }

    #[test]
    fn test_other_failures_exit_code() {
        let error = anyhow::anyhow!("listing file is not JSON");
        assert_eq!(exit_code(&error), EXIT_FAILURE);
    }
}
