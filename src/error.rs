//! Error types for recipe loading and replay.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors ([`RecipeError`], [`ReplayError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! Error
//! ├── Recipe(RecipeError)     recipe layout, TOML schema, package names
//! ├── Replay(ReplayError)     replay of commands, uploads, after-actions
//! └── Transport(anyhow)       process spawning and SSH plumbing
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the provisioning engine.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum Error {
    /// Recipe loading error (missing files, schema violations, naming).
    #[error("Recipe error: {0}")]
    Recipe(#[from] RecipeError),

    /// Replay error (failed commands, failed uploads, unresolved actions).
    #[error("Replay error: {0}")]
    Replay(#[from] ReplayError),

    /// Transport-level failure (spawning processes, SSH plumbing).
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Errors that arise while locating and loading recipes.
#[derive(Error, Debug)]
pub enum RecipeError {
    /// The distribution's recipe directory does not exist.
    #[error("Recipe directory not found: {}", path.display())]
    MissingRecipeDir {
        /// The directory that was expected to exist.
        path: PathBuf,
    },

    /// No recipe file exists for the requested package.
    #[error("No recipe for package '{package}' at {}", path.display())]
    MissingRecipeFile {
        /// The package that was requested.
        package: String,
        /// The recipe file that was expected to exist.
        path: PathBuf,
    },

    /// The recipe file exists but declares a different package name.
    #[error("Package '{package}' is not defined by {}", path.display())]
    UndefinedPackage {
        /// The package that was requested.
        package: String,
        /// The recipe file that declared a different name.
        path: PathBuf,
    },

    /// The recipe file does not match the expected schema.
    #[error("Invalid recipe {}: {source}", path.display())]
    InvalidRecipe {
        /// The offending recipe file.
        path: PathBuf,
        /// Underlying TOML deserialization error.
        source: toml::de::Error,
    },

    /// Installation was requested but no install command is configured.
    #[error("No install command configured for distribution '{distribution}'")]
    MissingInstallCommand {
        /// The distribution whose common recipe lacks an install command.
        distribution: String,
    },

    /// An I/O error occurred while reading a recipe file.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while replaying recorded setup against a transport.
#[derive(Error, Debug)]
pub enum ReplayError {
    /// A config entry reached replay without contents.
    #[error("No contents staged for config file {path}")]
    MissingContents {
        /// Destination path of the half-built entry.
        path: String,
    },

    /// An after-action factory chain never produced commands.
    #[error("After-action factory did not resolve within {limit} invocations")]
    AfterActionUnresolved {
        /// The resolution depth that was exhausted.
        limit: usize,
    },

    /// A replayed command exited non-zero.
    #[error("`{command}` failed (exit {}): {stderr}", code.unwrap_or(-1))]
    CommandFailed {
        /// The command line that failed.
        command: String,
        /// Exit code, if the process reported one.
        code: Option<i32>,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// A config upload exited non-zero.
    #[error("Upload of {path} failed (exit {}): {stderr}", code.unwrap_or(-1))]
    UploadFailed {
        /// Destination path of the failed upload.
        path: String,
        /// Exit code, if the process reported one.
        code: Option<i32>,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    // -----------------------------------------------------------------------
    // RecipeError
    // -----------------------------------------------------------------------

    #[test]
    fn recipe_error_missing_dir_display() {
        let e = RecipeError::MissingRecipeDir {
            path: PathBuf::from("/srv/recipes/arch"),
        };
        assert_eq!(e.to_string(), "Recipe directory not found: /srv/recipes/arch");
    }

    #[test]
    fn recipe_error_missing_file_display() {
        let e = RecipeError::MissingRecipeFile {
            package: "nginx".to_string(),
            path: PathBuf::from("/srv/recipes/arch/nginx.toml"),
        };
        assert_eq!(
            e.to_string(),
            "No recipe for package 'nginx' at /srv/recipes/arch/nginx.toml"
        );
    }

    #[test]
    fn recipe_error_undefined_package_display() {
        let e = RecipeError::UndefinedPackage {
            package: "nginx".to_string(),
            path: PathBuf::from("/srv/recipes/arch/nginx.toml"),
        };
        assert_eq!(
            e.to_string(),
            "Package 'nginx' is not defined by /srv/recipes/arch/nginx.toml"
        );
    }

    #[test]
    fn recipe_error_invalid_recipe_has_source() {
        use std::error::Error as StdError;
        let source = toml::from_str::<toml::Table>("not = = toml")
            .expect_err("malformed TOML should not parse");
        let e = RecipeError::InvalidRecipe {
            path: PathBuf::from("bad.toml"),
            source,
        };
        assert!(e.to_string().starts_with("Invalid recipe bad.toml:"));
        assert!(e.source().is_some());
    }

    #[test]
    fn recipe_error_missing_install_command_display() {
        let e = RecipeError::MissingInstallCommand {
            distribution: "arch".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "No install command configured for distribution 'arch'"
        );
    }

    #[test]
    fn recipe_error_io_has_source() {
        use std::error::Error as StdError;
        let e = RecipeError::Io {
            path: PathBuf::from("common.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.to_string().contains("common.toml"));
        assert!(e.source().is_some());
    }

    // -----------------------------------------------------------------------
    // ReplayError
    // -----------------------------------------------------------------------

    #[test]
    fn replay_error_missing_contents_display() {
        let e = ReplayError::MissingContents {
            path: "/etc/app.conf".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "No contents staged for config file /etc/app.conf"
        );
    }

    #[test]
    fn replay_error_after_action_unresolved_display() {
        let e = ReplayError::AfterActionUnresolved { limit: 8 };
        assert_eq!(
            e.to_string(),
            "After-action factory did not resolve within 8 invocations"
        );
    }

    #[test]
    fn replay_error_command_failed_display() {
        let e = ReplayError::CommandFailed {
            command: "pacman -S nginx".to_string(),
            code: Some(1),
            stderr: "target not found".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "`pacman -S nginx` failed (exit 1): target not found"
        );
    }

    #[test]
    fn replay_error_command_failed_without_code() {
        let e = ReplayError::CommandFailed {
            command: "true".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert!(e.to_string().contains("exit -1"));
    }

    #[test]
    fn replay_error_upload_failed_display() {
        let e = ReplayError::UploadFailed {
            path: "/etc/app.conf".to_string(),
            code: Some(2),
            stderr: "tee: permission denied".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Upload of /etc/app.conf failed (exit 2): tee: permission denied"
        );
    }

    // -----------------------------------------------------------------------
    // Error conversions
    // -----------------------------------------------------------------------

    #[test]
    fn error_from_recipe_error() {
        let recipe_err = RecipeError::MissingInstallCommand {
            distribution: "arch".to_string(),
        };
        let e: Error = recipe_err.into();
        assert!(e.to_string().contains("Recipe error"));
        assert!(e.to_string().contains("arch"));
    }

    #[test]
    fn error_from_replay_error() {
        let replay_err = ReplayError::MissingContents {
            path: "/etc/x".to_string(),
        };
        let e: Error = replay_err.into();
        assert!(e.to_string().contains("Replay error"));
    }

    #[test]
    fn error_from_anyhow_is_transparent() {
        let e: Error = anyhow::anyhow!("ssh binary not found").into();
        assert_eq!(e.to_string(), "ssh binary not found");
    }

    // -----------------------------------------------------------------------
    // Send + Sync bounds
    // -----------------------------------------------------------------------

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<Error>();
        assert_send_sync::<RecipeError>();
        assert_send_sync::<ReplayError>();
    }

    // -----------------------------------------------------------------------
    // anyhow conversion
    // -----------------------------------------------------------------------

    #[test]
    fn recipe_error_converts_to_anyhow() {
        let e = RecipeError::MissingRecipeDir {
            path: PathBuf::from("/nowhere"),
        };
        let _anyhow_err: anyhow::Error = e.into();
    }

    #[test]
    fn replay_error_converts_to_anyhow() {
        let e = ReplayError::AfterActionUnresolved { limit: 8 };
        let _anyhow_err: anyhow::Error = e.into();
    }
}
