use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use easel_canvas::{CanvasConfig, HttpCanvas};
use easel_engine::{Project, ProjectBriefing, ProjectId, SyncEngine, SyncOptions};
use serde::Deserialize;

/// One entry of a `row` input file
#[derive(Deserialize)]
struct RowInput {
    project: Project,
    #[serde(default)]
    briefing: ProjectBriefing,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

fn engine_from(matches: &ArgMatches) -> anyhow::Result<SyncEngine> {
    let base_url = matches.get_one::<String>("base-url").unwrap().clone();
    let board = match matches.get_one::<String>("board") {
        Some(board) => board.clone(),
        None => std::env::var("EASEL_BOARD")
            .map_err(|_| anyhow::anyhow!("--board or EASEL_BOARD is required"))?,
    };
    let token = match matches.get_one::<String>("token") {
        Some(token) => token.clone(),
        None => std::env::var("EASEL_CANVAS_TOKEN")
            .map_err(|_| anyhow::anyhow!("--token or EASEL_CANVAS_TOKEN is required"))?,
    };
    let canvas = HttpCanvas::new(CanvasConfig::new(base_url, board, token));
    Ok(SyncEngine::new(Arc::new(canvas)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Command::new("easel")
        .version(easel_engine::VERSION)
        .about("Mirror studio projects onto a shared canvas board")
        .arg_required_else_help(true)
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .default_value("https://canvas.example.com/api/v2")
                .help("Canvas REST endpoint"),
        )
        .arg(
            Arg::new("board")
                .long("board")
                .global(true)
                .help("Board identifier; falls back to EASEL_BOARD"),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .global(true)
                .help("Bearer token; falls back to EASEL_CANVAS_TOKEN"),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .global(true)
                .default_value("easel=info")
                .help("Log filter, overridden by RUST_LOG"),
        )
        .subcommand(Command::new("init").about("Create or adopt the timeline frame"))
        .subcommand(
            Command::new("sync")
                .about("Sync projects from a JSON file onto the timeline")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of projects"),
                )
                .arg(
                    Arg::new("mark-reviewed")
                        .long("mark-reviewed")
                        .action(ArgAction::SetTrue)
                        .help("Render the review mark even when the tracker lags"),
                ),
        )
        .subcommand(
            Command::new("row")
                .about("Create briefing rows from a JSON file")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of {project, briefing} entries"),
                ),
        )
        .subcommand(
            Command::new("version")
                .about("Add the next version frame to a project's row")
                .arg(
                    Arg::new("project")
                        .long("project")
                        .required(true)
                        .help("Project identifier"),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Project name, needed when the engine starts cold"),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a project's card and briefing row from the board")
                .arg(
                    Arg::new("project")
                        .long("project")
                        .required(true)
                        .help("Project identifier"),
                ),
        )
        .subcommand(Command::new("sweep").about("Remove duplicate project cards"));

    let matches = cli.get_matches();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(matches.get_one::<String>("log").unwrap())
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match matches.subcommand() {
        Some(("init", args)) => {
            let engine = engine_from(args)?;
            let timeline = engine.initialize_timeline().await?;
            println!("{}", serde_json::to_string_pretty(&timeline)?);
        }
        Some(("sync", args)) => {
            let engine = engine_from(args)?;
            engine.initialize_timeline().await?;
            let projects: Vec<Project> = read_json(args.get_one::<PathBuf>("file").unwrap())?;
            let options =
                SyncOptions::default().with_mark_as_reviewed(args.get_flag("mark-reviewed"));
            for project in &projects {
                let card = engine.sync_project(project, options).await?;
                println!(
                    "{} -> ({:.0}, {:.0}) [{}]",
                    project.id, card.x, card.y, card.status
                );
            }
        }
        Some(("row", args)) => {
            let engine = engine_from(args)?;
            engine.initialize_timeline().await?;
            let inputs: Vec<RowInput> = read_json(args.get_one::<PathBuf>("file").unwrap())?;
            for input in &inputs {
                let row = engine
                    .create_project_row(&input.project, &input.briefing)
                    .await?;
                println!(
                    "{} -> row at y {:.0}, {} version frame(s)",
                    input.project.id,
                    row.row_y,
                    row.versions.len()
                );
            }
        }
        Some(("version", args)) => {
            let engine = engine_from(args)?;
            let project = ProjectId::new(args.get_one::<String>("project").unwrap().clone());
            let name = args.get_one::<String>("name").map(String::as_str);
            match engine.add_version(&project, name).await? {
                Some(version) => {
                    println!("v{} at ({:.0}, {:.0})", version.number, version.x, version.y);
                }
                None => println!("no briefing row found for {project}"),
            }
        }
        Some(("remove", args)) => {
            let engine = engine_from(args)?;
            engine.initialize_timeline().await?;
            let project = ProjectId::new(args.get_one::<String>("project").unwrap().clone());
            engine.remove_project(&project).await?;
            println!("{project} removed");
        }
        Some(("sweep", args)) => {
            let engine = engine_from(args)?;
            engine.initialize_timeline().await?;
            let removed = engine.cleanup_duplicates().await?;
            println!("{removed} duplicate card(s) removed");
        }
        _ => {}
    }

    Ok(())
}
