//! TOML recipe loading.
//!
//! Recipes for a distribution live under `<root>/<distribution>/`: one
//! `<package>.toml` per package, plus an optional `common.toml` holding
//! the install command and any distribution-wide setup. A package recipe
//! looks like:
//!
//! ```toml
//! name = "nginx"
//! aliases = ["nginx-mod-stream"]
//!
//! [setup]
//! commands = [{ sudo = "systemctl enable nginx" }]
//!
//! [[setup.config]]
//! path = "/etc/nginx/nginx.conf"
//! contents = "worker_processes auto;\n"
//! commands = [{ sudo = "systemctl reload nginx" }]
//!
//! [setup.after]
//! commands = [{ sudo = "systemctl restart nginx" }]
//! ```
//!
//! `name` defaults to the file stem when omitted. Config entries accept
//! an optional `host` key to scope them to a single target host.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::RecipeError;
use crate::recipe::config::ConfigFile;
use crate::recipe::package::Package;
use crate::recipe::setup::Setup;

/// One step in a recorded command list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum StepDoc {
    /// Run as the connecting user.
    Run(String),
    /// Run as root.
    Sudo(String),
}

/// A config entry as written in a recipe file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDoc {
    path: String,
    host: Option<String>,
    contents: Option<String>,
    #[serde(default)]
    commands: Vec<StepDoc>,
}

/// The `[setup.after]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AfterDoc {
    #[serde(default)]
    commands: Vec<StepDoc>,
}

/// The `[setup]` table shared by package and common recipes.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SetupDoc {
    #[serde(default)]
    commands: Vec<StepDoc>,
    #[serde(default, rename = "config")]
    configs: Vec<ConfigDoc>,
    after: Option<AfterDoc>,
}

/// A whole `<package>.toml` document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecipeDoc {
    name: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    setup: SetupDoc,
}

/// A whole `common.toml` document.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommonDoc {
    install_command: Option<String>,
    setup: Option<SetupDoc>,
}

/// The distribution-wide recipe loaded from `common.toml`.
#[derive(Debug, Default)]
pub struct CommonRecipe {
    /// Command line used to install packages, if configured.
    pub install_command: Option<String>,
    /// Setup replayed around every install, if configured.
    pub setup: Option<Setup>,
}

/// Load the recipe for `package` from `<root>/<distribution>/<package>.toml`.
///
/// # Errors
///
/// Returns [`RecipeError::MissingRecipeDir`] if the distribution directory
/// does not exist, [`RecipeError::MissingRecipeFile`] if the package has no
/// recipe, [`RecipeError::UndefinedPackage`] if the recipe declares a name
/// other than `package`, and [`RecipeError::InvalidRecipe`] on schema
/// violations.
pub fn load_package(
    root: &Path,
    distribution: &str,
    package: &str,
) -> Result<Package, RecipeError> {
    let dir = distribution_dir(root, distribution)?;
    let path = dir.join(format!("{package}.toml"));
    if !path.is_file() {
        return Err(RecipeError::MissingRecipeFile {
            package: package.to_string(),
            path,
        });
    }
    let doc: RecipeDoc = read_doc(&path)?;

    // The file stem names the package when the recipe does not.
    let declared = doc.name.unwrap_or_else(|| package.to_string());
    if declared != package {
        return Err(RecipeError::UndefinedPackage {
            package: package.to_string(),
            path,
        });
    }

    let mut result = Package::new(declared);
    for alias in doc.aliases {
        result = result.alias(alias);
    }
    *result.setup_mut() = build_setup(doc.setup);
    Ok(result)
}

/// Load `<root>/<distribution>/common.toml`.
///
/// A missing `common.toml` yields an empty [`CommonRecipe`]; the
/// distribution directory itself must exist.
///
/// # Errors
///
/// Returns [`RecipeError::MissingRecipeDir`] if the distribution directory
/// does not exist, and [`RecipeError::InvalidRecipe`] on schema violations.
pub fn load_common(root: &Path, distribution: &str) -> Result<CommonRecipe, RecipeError> {
    let dir = distribution_dir(root, distribution)?;
    let path = dir.join("common.toml");
    if !path.is_file() {
        return Ok(CommonRecipe::default());
    }
    let doc: CommonDoc = read_doc(&path)?;
    Ok(CommonRecipe {
        install_command: doc.install_command,
        setup: doc.setup.map(build_setup),
    })
}

fn distribution_dir(root: &Path, distribution: &str) -> Result<PathBuf, RecipeError> {
    let dir = root.join(distribution);
    if dir.is_dir() {
        Ok(dir)
    } else {
        Err(RecipeError::MissingRecipeDir { path: dir })
    }
}

fn read_doc<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, RecipeError> {
    let contents = std::fs::read_to_string(path).map_err(|source| RecipeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| RecipeError::InvalidRecipe {
        path: path.to_path_buf(),
        source,
    })
}

fn build_setup(doc: SetupDoc) -> Setup {
    let mut setup = Setup::new();
    for step in doc.commands {
        match step {
            StepDoc::Run(command) => setup.run(command),
            StepDoc::Sudo(command) => setup.sudo(command),
        };
    }
    for ConfigDoc {
        path,
        host,
        contents,
        commands,
    } in doc.configs
    {
        match host {
            Some(host) => {
                let mut scope = setup.host(host);
                fill_entry(scope.config(path), contents, commands);
            }
            None => fill_entry(setup.config(path), contents, commands),
        }
    }
    if let Some(after) = doc.after {
        for step in after.commands {
            match step {
                StepDoc::Run(command) => setup.after().run(command),
                StepDoc::Sudo(command) => setup.after().sudo(command),
            };
        }
    }
    setup
}

fn fill_entry(entry: &mut ConfigFile, contents: Option<String>, commands: Vec<StepDoc>) {
    if let Some(text) = contents {
        entry.contents(text);
    }
    for step in commands {
        match step {
            StepDoc::Run(command) => entry.run(command),
            StepDoc::Sudo(command) => entry.sudo(command),
        };
    }
}
