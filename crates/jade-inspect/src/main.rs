//! Content inspection tool for JADE messages.
//!
//! Reads message content in one of the standard languages, decodes it
//! through a content manager exactly as an agent would, and prints the
//! abstract tree as JSON. Validation follows the `content` section of the
//! configuration, so the tool doubles as a checker for hand-written SL.
//!
//! # Startup Sequence
//!
//! 1. Parse the command line
//! 2. Load configuration from `--config` (or `JADE_CONTENT_CONFIG`), else
//!    `jade-content.yaml` when present
//! 3. Initialize structured logging (tracing)
//! 4. Build the content manager and register the standard languages
//! 5. Decode, validate and print the input

mod args;
mod error;

use std::io::{self, Read, Write};
use std::path::Path;

use clap::Parser;
use jade_content::{ContentConfig, ContentError, ContentManager, LanguageCodec, LoggingConfig};
use jade_types::{AclMessage, Performative};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::error::InspectError;

/// Configuration file looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "jade-content.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the arguments, the configuration or the content
/// cannot be processed.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    init_logging(&config.logging);
    info!("jade-inspect starting");
    run(&args, &config)?;
    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<ContentConfig, InspectError> {
    let path = explicit.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if path.exists() {
        Ok(ContentConfig::from_file(path)?)
    } else if explicit.is_some() {
        Err(InspectError::Usage {
            message: format!("config file {} does not exist", path.display()),
        })
    } else {
        Ok(ContentConfig::default())
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(args: &Args, config: &ContentConfig) -> Result<(), InspectError> {
    let manager = ContentManager::from_config(&config.content);
    jade_codec::register_standard_languages(&manager)?;
    manager.register_ontology(jade_content::basic_ontology())?;
    manager.register_ontology(jade_codec::sl_ontology().map_err(ContentError::from)?)?;

    let language = args
        .language
        .clone()
        .unwrap_or_else(|| config.inspect.language.clone());
    let ontology = args.ontology.clone().or_else(|| config.inspect.ontology.clone());
    let Some(codec) = manager.lookup_language(&language)? else {
        return Err(InspectError::Usage {
            message: format!(
                "unknown language {language}; available: {}",
                manager.language_names()?.join(", ")
            ),
        });
    };

    let input = match &args.input {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut buffer = Vec::new();
            io::stdin().lock().read_to_end(&mut buffer)?;
            buffer
        }
    };

    let mut msg = AclMessage::new(Performative::Inform);
    msg.set_language(language.as_str());
    if let Some(ontology) = &ontology {
        msg.set_ontology(ontology.as_str());
    }
    match codec {
        LanguageCodec::Text(_) => {
            let text = String::from_utf8(input).map_err(|e| InspectError::Usage {
                message: format!("{language} content must be UTF-8: {e}"),
            })?;
            msg.set_content(text.trim());
        }
        LanguageCodec::Binary(_) => msg.set_byte_sequence_content(input),
    }

    let content = manager.extract_abs_content(&msg)?;
    info!(
        language = %language,
        content = %content.type_name(),
        grounded = content.is_grounded(),
        validated = manager.validation_mode(),
        "content decoded"
    );
    if !content.is_grounded() {
        warn!("content contains unbound variables");
    }

    let rendered = if config.inspect.pretty {
        serde_json::to_string_pretty(&content)?
    } else {
        serde_json::to_string(&content)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}
