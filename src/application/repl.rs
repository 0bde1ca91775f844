use std::io::Write;

use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Event;
use crate::domain::models::Phase;
use crate::domain::models::Tab;
use crate::domain::services::AnalyticsService;
use crate::domain::services::Orchestrator;
use crate::domain::services::PrefData;
use crate::domain::services::Prefs;
use crate::domain::services::UiState;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /models - Lists all models from the catalog.
- /model (/m) [MODEL_ID] - Sets the active model.
- /templates - Lists all artifact templates from the catalog.
- /template (/t) [TEMPLATE_ID] - Sets the artifact template, or auto to let the model pick.
- /tab [code|artifact] - Switches the active view.
- /open (/o) - Prints the URL of the last executed artifact.
- /stop (/s) - Stops an in-flight generation without executing anything.
- /quit /exit (/q) - Exit artifex.
- /help (/h) - Provides this help menu.

Anything else is submitted as a prompt. Submitting while a generation is in
flight cancels it; the latest submission always wins.
        "#;

    return text.trim().to_string();
}

fn prompt() {
    print!("{} ", Paint::blue(">"));
    let _ = std::io::stdout().flush();
}

fn print_error(text: &str) {
    println!("{} {text}", Paint::red("error:"));
}

async fn persist(
    orchestrator: &Orchestrator,
    prefs: &Prefs,
    pref_data: &mut PrefData,
) -> Result<()> {
    pref_data.chat_input = orchestrator.pending_input.to_string();
    pref_data.model_config = orchestrator.model_config.clone();
    pref_data.model_config.model = Config::get(ConfigKey::Model);
    return prefs.save(pref_data).await;
}

fn submit(orchestrator: &mut Orchestrator) {
    orchestrator.submit();

    if orchestrator.phase == Phase::AwaitingAuth {
        print_error(
            "you are not signed in. Set a user id with --user-id or the config file, then resubmit. Your input was kept.",
        );
        prompt();
    }
}

async fn handle_line(
    orchestrator: &mut Orchestrator,
    prefs: &Prefs,
    pref_data: &mut PrefData,
    line: &str,
) -> Result<bool> {
    if line.is_empty() {
        if orchestrator.pending_input.is_empty() {
            prompt();
            return Ok(true);
        }

        // A restored pending input from the last run, submitted as-is.
        submit(orchestrator);
        persist(orchestrator, prefs, pref_data).await?;
        return Ok(true);
    }

    if line == "/quit" || line == "/exit" || line == "/q" {
        return Ok(false);
    }

    if line == "/help" || line == "/h" {
        println!("{}", help_text());
        prompt();
        return Ok(true);
    }

    if line == "/stop" || line == "/s" {
        orchestrator.stop();
        prompt();
        return Ok(true);
    }

    if line == "/models" {
        for entry in &orchestrator.catalogs().models {
            println!("- {} ({}, {})", entry.id, entry.name, entry.provider);
        }
        prompt();
        return Ok(true);
    }

    if line == "/templates" {
        for (id, entry) in &orchestrator.catalogs().templates {
            println!("- {} ({})", id, entry.name);
        }
        prompt();
        return Ok(true);
    }

    if let Some(id) = line.strip_prefix("/model ").or_else(|| {
        return line.strip_prefix("/m ");
    }) {
        let id = id.trim();
        if orchestrator.catalogs().find_model(id).is_none() {
            print_error(&format!(
                "no model named {id} in the catalog. Use /models to list them."
            ));
            prompt();
            return Ok(true);
        }

        Config::set(ConfigKey::Model, id);
        persist(orchestrator, prefs, pref_data).await?;
        println!("Model set to {id}.");
        prompt();
        return Ok(true);
    }

    if let Some(id) = line.strip_prefix("/template ").or_else(|| {
        return line.strip_prefix("/t ");
    }) {
        let id = id.trim();
        if !orchestrator.catalogs().has_template(id) {
            print_error(&format!(
                "no template named {id} in the catalog. Use /templates to list them."
            ));
            prompt();
            return Ok(true);
        }

        Config::set(ConfigKey::Template, id);
        println!("Template set to {id}.");
        prompt();
        return Ok(true);
    }

    if let Some(tab) = line.strip_prefix("/tab ") {
        match tab.trim() {
            "code" => orchestrator.tab = Tab::Code,
            "artifact" => orchestrator.tab = Tab::Artifact,
            other => {
                print_error(&format!("unknown tab {other}, expected code or artifact"));
                prompt();
                return Ok(true);
            }
        }
        render_active_tab(orchestrator);
        prompt();
        return Ok(true);
    }

    if line == "/open" || line == "/o" {
        match orchestrator.result.as_ref().and_then(|result| {
            return result.url.clone();
        }) {
            Some(url) => {
                println!("{url}");
                AnalyticsService::capture(
                    "external_link_click",
                    serde_json::json!({
                        "template": Config::get(ConfigKey::Template),
                        "model": Config::get(ConfigKey::Model),
                    }),
                );
            }
            None => print_error("no executed artifact with a URL yet"),
        }
        prompt();
        return Ok(true);
    }

    if line.starts_with('/') {
        print_error(&format!("unknown command {line}. Use /help."));
        prompt();
        return Ok(true);
    }

    orchestrator.set_input(line);
    submit(orchestrator);
    persist(orchestrator, prefs, pref_data).await?;
    return Ok(true);
}

fn render_active_tab(orchestrator: &Orchestrator) {
    match orchestrator.tab {
        Tab::Code => {
            let code = orchestrator.draft.code.as_deref().unwrap_or("");
            if code.is_empty() {
                println!("No generated code yet.");
            } else {
                println!("{code}");
            }
        }
        Tab::Artifact => match orchestrator.result.as_ref() {
            Some(result) => {
                if let Some(url) = &result.url {
                    println!("Running at {url}");
                }
                if !result.stdout.is_empty() {
                    println!("{}", result.stdout);
                }
                if !result.stderr.is_empty() {
                    eprintln!("{}", result.stderr);
                }
                if let Some(exit_code) = result.exit_code {
                    println!("Exited with code {exit_code}.");
                }
            }
            None => println!("No execution result yet."),
        },
    }
}

fn render_transition(orchestrator: &Orchestrator, before: &Phase) {
    match &orchestrator.phase {
        Phase::Generating(_) => {
            let title = orchestrator.draft.title.as_deref().unwrap_or("...");
            let code_len = orchestrator.draft.code.as_deref().unwrap_or("").len();
            print!(
                "\r{} {title} ({code_len} bytes of code)",
                Paint::cyan("streaming:")
            );
            let _ = std::io::stdout().flush();
        }
        Phase::Dispatching(_) => {
            if !matches!(before, Phase::Dispatching(_)) {
                println!();
                println!(
                    "{} artifact complete, running in sandbox...",
                    Paint::green("ok:")
                );
            }
        }
        Phase::Done => {
            if *before != Phase::Done {
                if let Some(meta) = orchestrator.messages().last().and_then(|message| {
                    return message.meta.clone();
                }) {
                    if let Some(title) = meta.title {
                        println!("{} {title}", Paint::green("done:"));
                    }
                    if let Some(description) = meta.description {
                        println!("{description}");
                    }
                }
                render_active_tab(orchestrator);
            }
        }
        Phase::Failed(reason) => {
            if *before != orchestrator.phase {
                println!();
                print_error(&reason.to_string());
            }
        }
        _ => {}
    }

    if !UiState::project(orchestrator).is_loading && before.is_loading() {
        prompt();
    }
}

pub async fn start(
    mut orchestrator: Orchestrator,
    mut rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let prefs = Prefs::default();
    let mut pref_data = prefs.load().await;

    orchestrator.model_config = pref_data.model_config.clone();
    if !pref_data.chat_input.is_empty() {
        orchestrator.set_input(&pref_data.chat_input);
        println!(
            "Restored pending input from your last run. Press enter to submit it:\n  {}",
            pref_data.chat_input
        );
    }

    println!(
        "artifex, model {} with template {}. /help for commands.",
        Config::get(ConfigKey::Model),
        Config::get(ConfigKey::Template)
    );
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(text) => {
                        if !handle_line(&mut orchestrator, &prefs, &mut pref_data, text.trim()).await? {
                            break;
                        }
                    }
                    None => break,
                }
            }
            event = rx.recv() => {
                if let Some(event) = event {
                    let before = orchestrator.phase.clone();
                    orchestrator.handle_event(event);
                    render_transition(&orchestrator, &before);
                }
            }
        }
    }

    return Ok(());
}
