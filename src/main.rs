use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use uniadvisor::api::ApiClient;
use uniadvisor::config::Config;
use uniadvisor::markup::{extract, DisplayState, RecommendationBlock};
use uniadvisor::state::{AdvisorSession, JsonFileStore, SelectionSets, SessionUpdate};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let client = ApiClient::new(&config);
    let store = Arc::new(JsonFileStore::new(config.session_dir.clone()));
    let mut session = AdvisorSession::new(client, "default").with_store(store);
    session.load()?;

    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_updates(update_rx));

    let mut selections = SelectionSets::new();
    let mut last_blocks: Vec<RecommendationBlock> = Vec::new();

    println!("uniadvisor — ask about universities. Commands: /compare <name>, /save <name>, /list, /quit");
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input == "/quit" {
            break;
        }
        if let Some(name) = input.strip_prefix("/compare ") {
            toggle_by_name(&mut selections, &last_blocks, name.trim(), true);
            prompt()?;
            continue;
        }
        if let Some(name) = input.strip_prefix("/save ") {
            toggle_by_name(&mut selections, &last_blocks, name.trim(), false);
            prompt()?;
            continue;
        }
        if input == "/list" {
            print_selections(&selections);
            prompt()?;
            continue;
        }

        if let Some(reply) = session.send_message(input, Some(&update_tx)).await? {
            last_blocks = extract(&reply.content).blocks;
        }
        prompt()?;
    }

    drop(update_tx);
    let _ = printer.await;
    Ok(())
}

async fn print_updates(mut update_rx: mpsc::UnboundedReceiver<SessionUpdate>) {
    let mut placeholder_shown = false;
    while let Some(update) = update_rx.recv().await {
        match update {
            SessionUpdate::UserMessage(_) => {
                placeholder_shown = false;
            }
            SessionUpdate::Display(DisplayState::Working { .. }) => {
                if !placeholder_shown {
                    println!("… generating recommendations …");
                    placeholder_shown = true;
                }
            }
            SessionUpdate::Display(_) => {}
            SessionUpdate::TurnFinished { message, blocks } => {
                match uniadvisor::markup::render(&message.content, false) {
                    DisplayState::Prose(text) => println!("\nadvisor> {text}\n"),
                    DisplayState::Rendered { prose, .. } => println!("\nadvisor> {prose}\n"),
                    DisplayState::Working { visible, .. } => println!("\nadvisor> {visible}\n"),
                }
                for block in &blocks {
                    print_block(block);
                }
            }
        }
    }
}

fn print_block(block: &RecommendationBlock) {
    println!("  ┌ {}", block.name);
    if let Some(country) = &block.country {
        println!("  │ country: {country}");
    }
    if let Some(city) = &block.city {
        println!("  │ city: {city}");
    }
    if let Some(program) = &block.program {
        println!("  │ program: {program}");
    }
    if let Some(tuition) = &block.tuition_annual {
        println!("  │ tuition/yr: {tuition}");
    }
    if let Some(deadline) = &block.application_deadline {
        println!("  │ deadline: {deadline}");
    }
    if let Some(fit) = &block.why_good_fit {
        println!("  │ fit: {fit}");
    }
    if let Some(link) = &block.official_link {
        println!("  │ link: {link}");
    }
    println!("  └");
}

fn toggle_by_name(
    selections: &mut SelectionSets,
    last_blocks: &[RecommendationBlock],
    name: &str,
    compare: bool,
) {
    let Some(block) = last_blocks.iter().find(|block| block.name == name) else {
        println!("no recommendation named '{name}' in the last reply");
        return;
    };
    if compare {
        selections.toggle_compare(block);
        println!(
            "compare list: {}",
            selections
                .compared()
                .iter()
                .map(|b| b.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    } else {
        selections.toggle_saved(block);
        println!(
            "saved list: {}",
            selections
                .saved()
                .iter()
                .map(|b| b.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
}

fn print_selections(selections: &SelectionSets) {
    println!("comparing:");
    for block in selections.compared() {
        print_block(block);
    }
    println!("saved:");
    for block in selections.saved() {
        print_block(block);
    }
}

fn prompt() -> Result<()> {
    print!("you> ");
    std::io::stdout().flush()?;
    Ok(())
}
