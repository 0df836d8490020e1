//! Process lifecycle and the external sign-in command.

use crate::config::SignInConfig;
use crate::errors::SignInError;
use crate::ports::{ProcessControl, SignInFlow};
use crate::update::installed_path;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;

/// Exits or replaces the running process.
pub struct SystemProcess {
    args: Vec<String>,
}

impl SystemProcess {
    /// Relaunches reuse this process's command-line arguments.
    pub fn from_env() -> Self {
        Self {
            args: std::env::args().skip(1).collect(),
        }
    }

    fn binary_path() -> Option<PathBuf> {
        std::env::current_exe().ok().map(installed_path)
    }
}

impl ProcessControl for SystemProcess {
    fn terminate(&self) {
        tracing::info!("Quitting");
        std::process::exit(0);
    }

    fn relaunch(&self) {
        let Some(binary_path) = Self::binary_path() else {
            tracing::warn!("Cannot relaunch: executable path unknown");
            return;
        };
        tracing::info!(binary = %binary_path.display(), "Relaunching installed binary");

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            let err = std::process::Command::new(&binary_path)
                .args(&self.args)
                .exec();
            tracing::warn!("Failed to exec new binary: {}", err);
        }

        #[cfg(not(unix))]
        {
            match std::process::Command::new(&binary_path)
                .args(&self.args)
                .spawn()
            {
                Ok(_) => std::process::exit(0),
                Err(e) => tracing::warn!("Failed to start new binary: {}", e),
            }
        }
    }
}

/// Runs the configured sign-in command. Its output goes to the terminal, but
/// stdin stays with the command reader, so the command must not prompt
/// (`gh auth login --web` prints its one-time code and opens the browser).
pub struct CommandSignIn {
    command: Option<String>,
    args: Vec<String>,
}

impl CommandSignIn {
    pub fn new(config: &SignInConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
        }
    }
}

#[async_trait]
impl SignInFlow for CommandSignIn {
    async fn sign_in(&self) -> Result<(), SignInError> {
        let command = self.command.as_deref().ok_or(SignInError::NotConfigured)?;
        tracing::info!(command, "Starting sign-in");

        let status = tokio::process::Command::new(command)
            .args(&self.args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| SignInError::Failed(format!("could not run {}: {}", command, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(SignInError::Failed(format!("{} exited with {}", command, status)))
        }
    }
}
