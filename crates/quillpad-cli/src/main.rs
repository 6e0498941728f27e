use anyhow::{Context, Result};
use quillpad_config::{Config, EditorSettings};
use quillpad_engine::{DocumentStore, Editor, EditorOptions, load_into};
use std::{env, process};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Html,
    Json,
    List,
}

fn editor_options(settings: &EditorSettings) -> EditorOptions {
    EditorOptions {
        root_tag: settings.root_tag.clone(),
        move_debounce_ms: settings.move_debounce_ms,
        crop_min_size: settings.crop_min_size,
        image_style: settings.image_style.clone(),
    }
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} [--json | --list] [document-key]");
    process::exit(1);
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("quillpad-cli");

    let mut output = Output::Html;
    let mut key = None;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--json" => output = Output::Json,
            "--list" => output = Output::List,
            "-h" | "--help" => usage(program),
            flag if flag.starts_with("--") => usage(program),
            value if key.is_none() => key = Some(value.to_string()),
            _ => usage(program),
        }
    }

    let config_path = Config::config_path();
    log::info!("Config path: {}", config_path.display());
    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            eprintln!("Error: No config file found");
            eprintln!(
                "Create {} with at least: documents_path = \"~/quillpad\"",
                config_path.display()
            );
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let store = DocumentStore::new(&config.documents_path);
    if output == Output::List {
        for key in store.keys()? {
            println!("{key}");
        }
        return Ok(());
    }

    let key = key.unwrap_or_else(|| config.document_key.clone());
    let mut editor = Editor::new(editor_options(&config.editor));
    let Some(report) = load_into(&mut editor, &store, &key)? else {
        eprintln!(
            "Error: No document '{key}' in {}",
            config.documents_path.display()
        );
        process::exit(1);
    };
    if !report.is_clean() {
        log::warn!(
            "Skipped {} malformed nodes while loading '{key}'",
            report.dropped
        );
    }

    match output {
        Output::Json => {
            let json = serde_json::to_string_pretty(&editor.serialize_current_document())
                .context("Failed to serialize document")?;
            println!("{json}");
        }
        Output::Html | Output::List => println!("{}", editor.render_html()),
    }
    Ok(())
}
