// Command-line interface

use std::ffi::OsString;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use url::Url;

use crate::config::DiscoverySettings;
use crate::domain::template::{UriTemplate, Variables};
use crate::services::ServiceDiscovery;

pub fn command() -> Command {
    Command::new("halkit")
        .about("Expand URI templates and resolve HAL links")
        .subcommand_required(true)
        .subcommand(
            Command::new("expand")
                .about("Expand a URI template")
                .arg(template_arg())
                .arg(var_arg())
                .arg(json_arg())
                .arg(
                    Arg::new("base")
                        .short('b')
                        .long("base")
                        .value_name("URL")
                        .help("Resolve the expansion against this URL"),
                ),
        )
        .subcommand(
            Command::new("vars")
                .about("List the variables a URI template references")
                .arg(template_arg()),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve a named entry from a HAL root document")
                .arg(Arg::new("name").required(true).value_name("NAME"))
                .arg(
                    Arg::new("document")
                        .short('d')
                        .long("document")
                        .value_name("FILE")
                        .help("Path to a HAL root document (JSON)"),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("CONFIG")
                        .help("Path to a YAML file with api_root, overlay and underlay entries"),
                )
                .arg(
                    Arg::new("api_root")
                        .long("api-root")
                        .value_name("URL")
                        .help("API root that relative links resolve against"),
                )
                .arg(var_arg())
                .arg(json_arg()),
        )
}

fn template_arg() -> Arg {
    Arg::new("template").required(true).value_name("TEMPLATE")
}

fn var_arg() -> Arg {
    Arg::new("var")
        .short('v')
        .long("var")
        .value_name("NAME=VALUE")
        .action(ArgAction::Append)
        .help("Bind a string variable (repeatable)")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .short('j')
        .long("json")
        .value_name("OBJECT")
        .help("Bind variables from a JSON object; arrays are lists, objects are maps")
}

/// Parse `args` and run the selected subcommand, returning its output
pub fn run_from<I, T>(args: I) -> Result<String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    run(&matches)
}

pub fn run(matches: &ArgMatches) -> Result<String> {
    match matches.subcommand() {
        Some(("expand", sub)) => expand(sub),
        Some(("vars", sub)) => {
            let template = parse_template(sub)?;
            Ok(template.variable_names().join("\n"))
        }
        Some(("resolve", sub)) => resolve(sub),
        _ => bail!("Unknown subcommand"),
    }
}

fn expand(matches: &ArgMatches) -> Result<String> {
    let template = parse_template(matches)?;
    let vars = variables(matches)?;

    match matches.get_one::<String>("base") {
        Some(base) => {
            let base = Url::parse(base).with_context(|| format!("Invalid base URL '{}'", base))?;
            Ok(template.expand_url(&vars, Some(&base))?.to_string())
        }
        None => Ok(template.expand(&vars)),
    }
}

fn resolve(matches: &ArgMatches) -> Result<String> {
    let name = matches
        .get_one::<String>("name")
        .context("Missing entry name")?;
    let config_path = matches.get_one::<String>("config").map(Path::new);
    let api_root = matches.get_one::<String>("api_root");

    let mut discovery = match (config_path, api_root) {
        (None, Some(api_root)) => {
            let url = Url::parse(api_root)
                .with_context(|| format!("Invalid API root '{}'", api_root))?;
            ServiceDiscovery::new(url)
        }
        (maybe_path, maybe_root) => {
            let mut settings = DiscoverySettings::load(maybe_path)
                .context("Could not read discovery settings (pass --config or --api-root)")?;
            if let Some(root) = maybe_root {
                settings.api_root = root.clone();
            }
            ServiceDiscovery::from_settings(&settings)?
        }
    };

    if let Some(path) = matches.get_one::<String>("document") {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read document '{}'", path))?;
        let document: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("Document '{}' is not valid JSON", path))?;
        discovery.load_root(&document)?;
    }

    let vars = variables(matches)?;
    Ok(discovery.url_for(name, &vars)?.to_string())
}

fn parse_template(matches: &ArgMatches) -> Result<UriTemplate> {
    let source = matches
        .get_one::<String>("template")
        .context("Missing template")?;
    Ok(UriTemplate::parse(source)?)
}

/// Variables from `--json`, then `--var` pairs on top
fn variables(matches: &ArgMatches) -> Result<Variables> {
    let mut vars = match matches.get_one::<String>("json") {
        Some(text) => {
            let value: serde_json::Value =
                serde_json::from_str(text).context("--json is not valid JSON")?;
            match Variables::from_json(&value) {
                Some(vars) => vars,
                None => bail!("--json must be a JSON object"),
            }
        }
        None => Variables::new(),
    };

    if let Some(pairs) = matches.get_many::<String>("var") {
        for pair in pairs {
            let Some((name, value)) = pair.split_once('=') else {
                bail!("Invalid variable '{}': expected NAME=VALUE", pair);
            };
            vars.insert(name, value);
        }
    }

    Ok(vars)
}
