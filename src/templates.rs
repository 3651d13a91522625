//! Embedded recipe templates for the `generate` subcommand.

/// Render the starter `common.toml` for a new distribution directory.
#[must_use]
pub fn common_template(distribution: &str) -> String {
    COMMON_TEMPLATE.replace("{distribution}", distribution)
}

/// Render the starter recipe file for a package.
#[must_use]
pub fn recipe_template(package: &str) -> String {
    RECIPE_TEMPLATE.replace("{package}", package)
}

const COMMON_TEMPLATE: &str = r#"# Shared configuration for the {distribution} distribution.
#
# `install_command` is prefixed to the package names passed to `setup`.
# An optional [setup] table here is replayed around every install.

install_command = "echo please set the install command for {distribution}"

# [setup]
# commands = [{ sudo = "true" }]
"#;

const RECIPE_TEMPLATE: &str = r#"# Recipe for {package}. The name defaults to this file's stem.
#
# name = "{package}"
# aliases = []

[setup]
commands = []

# [[setup.config]]
# path = "/etc/{package}.conf"
# contents = """
# """
# commands = [{ sudo = "systemctl restart {package}" }]

# [setup.after]
# commands = []
"#;
