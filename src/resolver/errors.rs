//! Resolution error types and diagnostics.
//!
//! Every variant here is fatal: it aborts the pass before any artifact is
//! written. Recoverable conditions (unreadable license files, unknown
//! platforms) never reach this type.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Fatal error during platform resolution.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error("conflicting override for `{package}:{option}` on `{platform}`")]
    #[diagnostic(
        code(carimbo::options::conflict),
        help("Each option may be set once per package; remove one of the declarations")
    )]
    ConflictingOverride {
        package: String,
        option: String,
        first: String,
        second: String,
        platform: String,
    },

    #[error("required dependency `{package}` is not installed for `{platform}`")]
    #[diagnostic(
        code(carimbo::resolve::missing_dependency),
        help("Re-run the package installer for this platform")
    )]
    MissingDependency { package: String, platform: String },

    #[error("exclusive group `{group}` resolved to {} packages on `{platform}`", .chosen.len())]
    #[diagnostic(code(carimbo::resolve::exclusive_group))]
    ExclusiveGroup {
        group: String,
        platform: String,
        chosen: Vec<String>,
    },

    #[error("invalid pinned version `{version}` for `{package}`")]
    #[diagnostic(code(carimbo::resolve::invalid_version))]
    InvalidVersion {
        package: String,
        version: String,
        message: String,
    },

    #[error("unknown archive format `{name}`")]
    #[diagnostic(code(carimbo::options::archive_format))]
    UnknownArchiveFormat { name: String, valid: Vec<String> },

    #[error("invalid option key `{key}`, expected `package:option`")]
    #[diagnostic(code(carimbo::options::key))]
    InvalidOptionKey { key: String },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::ConflictingOverride {
                package,
                option,
                first,
                second,
                platform,
            } => Diagnostic::error(format!(
                "conflicting override for `{}:{}`",
                package, option
            ))
            .with_context(format!("platform: {}", platform))
            .with_context(format!("first set to `{}`", first))
            .with_context(format!("then set to `{}`", second))
            .with_suggestion(format!(
                "Declare `{}` once for `{}` on each platform",
                option, package
            )),

            ResolveError::MissingDependency { package, platform } => {
                Diagnostic::error(format!("required dependency `{}` is not installed", package))
                    .with_context(format!("platform: {}", platform))
                    .with_suggestion(
                        "Re-run the package installer for this platform".to_string(),
                    )
                    .with_suggestion(format!(
                        "Check that `{}` is listed in the installed packages file",
                        package
                    ))
            }

            ResolveError::ExclusiveGroup {
                group,
                platform,
                chosen,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "exclusive group `{}` must resolve to exactly one package",
                    group
                ))
                .with_context(format!("platform: {}", platform));

                if chosen.is_empty() {
                    diag = diag.with_context("no member applies".to_string());
                } else {
                    diag = diag.with_context(format!("resolved: {}", chosen.join(", ")));
                }

                diag.with_suggestion(
                    "Make the group members' conditions complementary".to_string(),
                )
            }

            ResolveError::InvalidVersion {
                package,
                version,
                message,
            } => Diagnostic::error(format!(
                "invalid pinned version `{}` for `{}`",
                version, package
            ))
            .with_context(message.clone()),

            ResolveError::UnknownArchiveFormat { name, valid } => {
                Diagnostic::error(format!("unknown archive format `{}`", name))
                    .with_context(format!("valid formats: {}", valid.join(", ")))
                    .with_suggestion(
                        "Set `archive_format` in .carimbo/config.toml or pass --archive-format"
                            .to_string(),
                    )
            }

            ResolveError::InvalidOptionKey { key } => {
                Diagnostic::error(format!("invalid option key `{}`", key))
                    .with_context("keys in [options] have the form `package:option`".to_string())
                    .with_suggestion(format!("Write it as `\"<package>:{}\" = <value>`", key))
            }
        }
    }
}
