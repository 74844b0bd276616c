//! # Form Builder CLI
//!
//! Command-line host for the form builder engine.
//!
//! ## Usage
//!
//! ```bash
//! form-builder new "Contact form"
//! form-builder list
//! form-builder export <form-id>
//! form-builder style <form-id> <node-id> display=flex gap=8px
//! form-builder demo
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Resolved configuration (data directory, log format, canvas size)
//! - `run` - Executes one [`Command`] against a [`FormStore`]
//! - `demo` - Scripted drag/drop/resize session against fixed measurements

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod demo;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use builder_core::{
    BoxSize, FormDocument, FormEditor, FormId, FormRepository, FormStore, NodeId, Style,
};
use builder_core::style::is_property_name;
use clap::{Parser, Subcommand, ValueEnum};

pub use demo::run_demo;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Command-line arguments for form-builder.
#[derive(Debug, Clone, Parser)]
#[command(name = "form-builder")]
#[command(about = "Visual form builder: stored forms, markup export and demo sessions")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding one JSON document per form
    #[arg(long, env = "FORM_BUILDER_DATA_DIR", default_value = "./forms")]
    pub data_dir: PathBuf,

    /// Log output format
    #[arg(long, env = "FORM_BUILDER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Canvas width in pixels for the demo session
    #[arg(long, default_value = "1280")]
    pub canvas_width: f64,

    /// Canvas height in pixels for the demo session
    #[arg(long, default_value = "720")]
    pub canvas_height: f64,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Operations on stored forms.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an empty form
    New {
        /// Display name
        name: String,
    },
    /// List stored forms
    List,
    /// Print a form document as JSON
    Show {
        /// Form id
        id: String,
    },
    /// Print a form as markup
    Export {
        /// Form id
        id: String,
    },
    /// Delete a form
    Delete {
        /// Form id
        id: String,
    },
    /// Merge `key=value` pairs into a node's style
    Style {
        /// Form id
        id: String,
        /// Node id
        node: String,
        /// Assignments; values are parsed as JSON, falling back to plain strings
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// Build a sample form through a scripted editing session and save it
    Demo {
        /// Display name
        #[arg(default_value = "Demo form")]
        name: String,
    },
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Form storage directory.
    pub data_dir: PathBuf,
    /// Log output format.
    pub log_format: LogFormat,
    /// Canvas content box used by the demo session.
    pub canvas: BoxSize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./forms"),
            log_format: LogFormat::Text,
            canvas: BoxSize::new(1280.0, 720.0),
        }
    }
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            data_dir: args.data_dir.clone(),
            log_format: args.log_format,
            canvas: BoxSize::new(args.canvas_width, args.canvas_height),
        }
    }
}

/// Open the store in `config.data_dir` and load every saved form.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or read.
pub fn open_store(config: &CliConfig) -> anyhow::Result<FormStore> {
    let store = FormStore::with_data_dir(&config.data_dir)
        .with_context(|| format!("opening form store at {}", config.data_dir.display()))?;
    store.load_all().context("loading saved forms")?;
    Ok(store)
}

/// Execute `command`, writing its output to `out`.
///
/// # Errors
///
/// Returns an error for unknown ids, malformed arguments and storage failures.
pub fn run(
    config: &CliConfig,
    store: &FormStore,
    command: &Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::New { name } => {
            let id = store.create(FormDocument::new(name.as_str()))?;
            writeln!(out, "{id}")?;
        }
        Command::List => {
            for summary in store.list() {
                writeln!(
                    out,
                    "{}  {:<24}  {} nodes",
                    summary.id, summary.name, summary.node_count
                )?;
            }
        }
        Command::Show { id } => {
            let doc = store.read(parse_form(id)?)?;
            writeln!(out, "{}", doc.to_json()?)?;
        }
        Command::Export { id } => {
            let doc = store.read(parse_form(id)?)?;
            let editor = FormEditor::default().with_tree(doc.tree)?;
            writeln!(out, "{}", editor.export_markup())?;
        }
        Command::Delete { id } => {
            store.delete(parse_form(id)?)?;
            writeln!(out, "deleted {id}")?;
        }
        Command::Style {
            id,
            node,
            assignments,
        } => {
            let form = parse_form(id)?;
            let node = NodeId::parse(node).with_context(|| format!("invalid node id {node:?}"))?;
            let patch = parse_assignments(assignments)?;
            let doc = store.read(form)?;
            let mut editor = FormEditor::default();
            editor.load_document(&doc)?;
            if !editor.merge_style(node, &patch) {
                bail!("node {node} not found in form {form}");
            }
            store.update(form, editor.tree())?;
            writeln!(out, "updated {node}")?;
        }
        Command::Demo { name } => {
            let id = run_demo(store, name, config.canvas)?;
            let doc = store.read(id)?;
            writeln!(out, "{id}")?;
            writeln!(out, "{}", builder_core::export_markup(&doc.tree))?;
        }
    }
    Ok(())
}

fn parse_form(id: &str) -> anyhow::Result<FormId> {
    FormId::parse(id).with_context(|| format!("invalid form id {id:?}"))
}

/// Parse `key=value` pairs into a style patch.
///
/// # Errors
///
/// Returns an error for an assignment without `=` or with a key that is not
/// a plain property name.
pub fn parse_assignments(assignments: &[String]) -> anyhow::Result<Style> {
    let mut patch = Style::new();
    for assignment in assignments {
        let Some((key, raw)) = assignment.split_once('=') else {
            bail!("expected key=value, got {assignment:?}");
        };
        let key = key.trim();
        if !is_property_name(key) {
            bail!("invalid style key {key:?} in {assignment:?}");
        }
        let value = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        patch.set(key, value);
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &std::path::Path) -> CliConfig {
        CliConfig {
            data_dir: dir.to_path_buf(),
            ..CliConfig::default()
        }
    }

    fn run_to_string(config: &CliConfig, store: &FormStore, command: &Command) -> String {
        let mut out = Vec::new();
        run(config, store, command, &mut out).expect("command should succeed");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn test_args_defaults() {
        let args = CliArgs::parse_from(["form-builder", "list"]);
        let config = CliConfig::from(&args);
        assert_eq!(config.data_dir, PathBuf::from("./forms"));
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.canvas, BoxSize::new(1280.0, 720.0));
    }

    #[test]
    fn test_args_style_command() {
        let args = CliArgs::parse_from([
            "form-builder",
            "--log-format",
            "json",
            "style",
            "form",
            "node",
            "display=flex",
        ]);
        assert_eq!(args.log_format, LogFormat::Json);
        assert!(matches!(args.command, Command::Style { ref assignments, .. } if assignments.len() == 1));
    }

    #[test]
    fn test_parse_assignments() {
        let patch = parse_assignments(&["display=flex".into(), "opacity=0.5".into(), "text=\"hi\"".into()])
            .expect("valid");
        assert_eq!(patch.get_str("display"), Some("flex"));
        assert_eq!(patch.get("opacity"), Some(&serde_json::json!(0.5)));
        assert_eq!(patch.get_str("text"), Some("hi"));
        assert!(parse_assignments(&["novalue".into()]).is_err());
        assert!(parse_assignments(&["=x".into()]).is_err());
        assert!(parse_assignments(&["a}}><Div=x".into()]).is_err());
        assert!(parse_assignments(&["font size=12px".into()]).is_err());
    }

    #[test]
    fn test_new_list_delete() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config(dir.path());
        let store = open_store(&config).expect("store");

        let id = run_to_string(&config, &store, &Command::New { name: "Signup".into() });
        let id = id.trim().to_string();
        let listing = run_to_string(&config, &store, &Command::List);
        assert!(listing.contains("Signup"));
        assert!(listing.contains(&id));

        run_to_string(&config, &store, &Command::Delete { id: id.clone() });
        assert!(run_to_string(&config, &store, &Command::List).is_empty());
    }

    #[test]
    fn test_demo_then_style_and_export() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config(dir.path());
        let store = open_store(&config).expect("store");

        let output = run_to_string(&config, &store, &Command::Demo { name: "Demo".into() });
        let id = output.lines().next().expect("id line").to_string();
        assert!(output.contains("<Section"));
        assert!(output.contains("<Input"));

        let doc = store.read(FormId::parse(&id).expect("form id")).expect("saved");
        let root = doc.tree.roots().next().expect("root").id;
        run_to_string(
            &config,
            &store,
            &Command::Style {
                id: id.clone(),
                node: root.to_string(),
                assignments: vec!["backgroundColor=#ff0000".into()],
            },
        );
        let markup = run_to_string(&config, &store, &Command::Export { id });
        assert!(markup.contains(r##"backgroundColor: "#ff0000""##));
    }

    #[test]
    fn test_forms_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config(dir.path());
        let id = {
            let store = open_store(&config).expect("store");
            run_to_string(&config, &store, &Command::New { name: "Kept".into() })
        };
        let store = open_store(&config).expect("store");
        let shown = run_to_string(&config, &store, &Command::Show { id: id.trim().into() });
        assert!(shown.contains("\"Kept\""));
    }

    #[test]
    fn test_unknown_form_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config(dir.path());
        let store = open_store(&config).expect("store");
        let mut out = Vec::new();
        let result = run(
            &config,
            &store,
            &Command::Export {
                id: FormId::new().to_string(),
            },
            &mut out,
        );
        assert!(result.is_err());
    }
}
