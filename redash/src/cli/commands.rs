//! Command table and dispatch
//!
//! Each command name maps to a typed handler. Positional arguments arrive
//! as strings and are parsed by the handler; an empty string stands for an
//! optional argument that was not supplied.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::RedashClient;
use crate::cli::args::Cli;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{Overrides, Settings};
use crate::domain::{QueryId, QueryUpdate};
use crate::infrastructure::di::ServiceContainer;

/// Handler invoked with the positional arguments of a command.
pub type Handler = fn(&RedashClient, &[String]) -> CliResult<Value>;

/// One entry of the command table.
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    handler: Handler,
}

impl CommandSpec {
    fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }

    /// Check arity, then run the handler.
    pub fn invoke(&self, client: &RedashClient, args: &[String]) -> CliResult<Value> {
        if args.len() < self.min_args || args.len() > self.max_args {
            return Err(CliError::InvalidArgs(format!(
                "{} takes {} argument(s), got {}; usage: {} {}",
                self.name,
                arity(self.min_args, self.max_args),
                args.len(),
                self.name,
                self.usage
            )));
        }
        (self.handler)(client, args)
    }
}

fn arity(min: usize, max: usize) -> String {
    if min == max {
        min.to_string()
    } else {
        format!("{}..{}", min, max)
    }
}

pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "create_query",
        aliases: &[],
        usage: "NAME DATA_SOURCE_NAME QUERY [DESCRIPTION] [PUBLISH]",
        min_args: 3,
        max_args: 5,
        handler: create_query,
    },
    CommandSpec {
        name: "update_query",
        aliases: &[],
        usage: "QUERY_ID [NAME] [DATA_SOURCE_NAME] [QUERY] [DESCRIPTION] [PUBLISH]",
        min_args: 1,
        max_args: 6,
        handler: update_query,
    },
    CommandSpec {
        name: "upsert_query",
        aliases: &["update_or_create_query"],
        usage: "QUERY_ID [NAME] [DATA_SOURCE_NAME] [QUERY] [DESCRIPTION] [PUBLISH]",
        min_args: 1,
        max_args: 6,
        handler: upsert_query,
    },
    CommandSpec {
        name: "get_query_by_id",
        aliases: &[],
        usage: "QUERY_ID",
        min_args: 1,
        max_args: 1,
        handler: get_query_by_id,
    },
    CommandSpec {
        name: "query_exists",
        aliases: &[],
        usage: "QUERY_ID",
        min_args: 1,
        max_args: 1,
        handler: query_exists,
    },
    CommandSpec {
        name: "list_data_sources",
        aliases: &["get_data_sources"],
        usage: "",
        min_args: 0,
        max_args: 0,
        handler: list_data_sources,
    },
    CommandSpec {
        name: "get_data_source_by_name",
        aliases: &[],
        usage: "NAME",
        min_args: 1,
        max_args: 1,
        handler: get_data_source_by_name,
    },
];

/// Look up a command by name or alias.
pub fn find_command(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.matches(name))
}

/// Run one named command against a client and return its JSON result.
pub fn dispatch(client: &RedashClient, name: &str, args: &[String]) -> CliResult<Value> {
    let spec = find_command(name).ok_or_else(|| CliError::UnknownCommand(name.to_string()))?;
    spec.invoke(client, args)
}

/// Entry point used by `main`: resolve settings, build the client, run the
/// command and print its result.
#[instrument(skip(cli))]
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(name) = cli.command.as_deref() else {
        return Ok(());
    };
    // Unknown names are rejected before any configuration or network work.
    let spec = find_command(name).ok_or_else(|| CliError::UnknownCommand(name.to_string()))?;

    let overrides = Overrides {
        service_url: cli.host.clone(),
        api_key: cli.api_key.clone(),
    };
    let settings = Settings::load(&overrides)?;
    debug!("settings: {:?}", settings);

    let container = ServiceContainer::new(settings)?;
    let client = container.client();

    let result = spec.invoke(&client, &cli.command_args)?;
    output::json(&result)?;
    Ok(())
}

// ============================================================
// HANDLERS
// ============================================================

fn create_query(client: &RedashClient, args: &[String]) -> CliResult<Value> {
    let name = required(args, 0, "name")?;
    let data_source_name = required(args, 1, "data_source_name")?;
    let query = required(args, 2, "query")?;
    let description = optional(args, 3).unwrap_or_default();
    let publish = publish_flag(args, 4)?;

    let created = client.create_query(name, data_source_name, query, &description, publish)?;
    to_json(&created)
}

fn update_query(client: &RedashClient, args: &[String]) -> CliResult<Value> {
    let query_id = query_id(args, 0)?;
    let update = query_update(args)?;

    let updated = client.update_query(query_id, &update)?;
    to_json(&updated)
}

fn upsert_query(client: &RedashClient, args: &[String]) -> CliResult<Value> {
    let query_id = query_id(args, 0)?;
    let update = query_update(args)?;

    let query = client.upsert_query(query_id, &update)?;
    to_json(&query)
}

fn get_query_by_id(client: &RedashClient, args: &[String]) -> CliResult<Value> {
    let query = client.get_query_by_id(query_id(args, 0)?)?;
    to_json(&query)
}

fn query_exists(client: &RedashClient, args: &[String]) -> CliResult<Value> {
    let exists = client.query_exists(query_id(args, 0)?)?;
    Ok(Value::Bool(exists))
}

fn list_data_sources(client: &RedashClient, _args: &[String]) -> CliResult<Value> {
    to_json(&client.list_data_sources()?)
}

fn get_data_source_by_name(client: &RedashClient, args: &[String]) -> CliResult<Value> {
    let data_source = client.get_data_source_by_name(required(args, 0, "name")?)?;
    to_json(&data_source)
}

// ============================================================
// ARGUMENT PARSING
// ============================================================

/// `QUERY_ID [NAME] [DATA_SOURCE_NAME] [QUERY] [DESCRIPTION] [PUBLISH]`
fn query_update(args: &[String]) -> CliResult<QueryUpdate> {
    Ok(QueryUpdate {
        name: optional(args, 1),
        data_source_name: optional(args, 2),
        query: optional(args, 3),
        description: optional(args, 4),
        publish: publish_flag(args, 5)?,
    })
}

fn required<'a>(args: &'a [String], index: usize, field: &str) -> CliResult<&'a str> {
    args.get(index)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CliError::InvalidArgs(format!("{} is required", field)))
}

fn optional(args: &[String], index: usize) -> Option<String> {
    args.get(index).filter(|value| !value.is_empty()).cloned()
}

fn query_id(args: &[String], index: usize) -> CliResult<QueryId> {
    let raw = required(args, index, "query_id")?;
    raw.trim()
        .parse()
        .map_err(|_| CliError::InvalidArgs(format!("query_id must be an integer, got {:?}", raw)))
}

/// Defaults to publishing when the argument is absent.
fn publish_flag(args: &[String], index: usize) -> CliResult<bool> {
    match optional(args, index) {
        Some(raw) => parse_bool(&raw),
        None => Ok(true),
    }
}

fn parse_bool(raw: &str) -> CliResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(CliError::InvalidArgs(format!(
            "publish must be true or false, got {:?}",
            raw
        ))),
    }
}

fn to_json<T: Serialize>(value: &T) -> CliResult<Value> {
    Ok(serde_json::to_value(value)?)
}
