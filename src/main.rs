use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use eventadmin::{
    api::{ApiClient, ResponseListService, TagService},
    cli::{Cli, Commands, OutputFormat, TagCommand},
    config::Config,
    errors::AdminError,
    i18n::{load_translator, Translator},
    models::value_to_text,
    response_table::{
        export::{render_text_table, write_csv},
        ProjectorConfig, QuestionSelection, ResponseListPage, ResponseProjector,
    },
    tags::{TagDraft, TagField},
    tui,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "eventadmin=info");
    }

    let cli = Cli::parse();

    let config = Config::from_env()?.with_overrides(
        cli.api_url.as_deref(),
        cli.event_id,
        cli.event_key.as_deref(),
    );

    // The TUI owns the terminal, so it only logs to the file
    init_logging(&config.log_file, !matches!(cli.command, Commands::Tui))?;

    config.validate()?;
    let translator: Arc<dyn Translator> = Arc::from(load_translator(config.locale_file.as_deref())?);

    if let Err(e) = run(cli.command, config, translator).await {
        error!("{:#}", e);
        return Err(e);
    }

    Ok(())
}

fn init_logging(log_file: &Path, to_stderr: bool) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let directory = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", log_file.display()))?;
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();

    Ok(())
}

async fn run(command: Commands, config: Config, translator: Arc<dyn Translator>) -> Result<()> {
    match command {
        Commands::Responses {
            select,
            format,
            csv,
            include_unsubmitted,
        } => {
            let format = Commands::parse_output_format(&format)?;
            let client = ApiClient::new(&config)?;

            let mut projector_config = ProjectorConfig::new(client.base_url());
            if let Some(key) = &config.event_key {
                projector_config = projector_config.with_event_key(key);
            }

            let mut page = ResponseListPage::new(ResponseProjector::new(projector_config))
                .with_selection(QuestionSelection::from_ids(select));
            if include_unsubmitted {
                page.toggle_include_unsubmitted();
            }

            page.refresh(&client).await.context("Failed to load responses")?;
            let columns = page.columns();
            info!("Projected {} responses into {} columns", page.rows().len(), columns.len());

            match format {
                OutputFormat::Text => print!("{}", render_text_table(page.rows(), &columns)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(page.rows())?),
            }

            if let Some(path) = csv {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("Cannot create CSV file: {}", path.display()))?;
                write_csv(page.rows(), &columns, file)?;
                info!("Wrote {} rows to {}", page.rows().len(), path.display());
            }
        }

        Commands::Questions => {
            let client = ApiClient::new(&config)?;
            let questions = client.fetch_questions().await?;
            println!("Found {} questions:", questions.len());
            for question in questions {
                let value = value_to_text(&question.value);
                if value.is_empty() {
                    println!("{:>6}  {}", question.question_id, question.headline);
                } else {
                    println!("{:>6}  {} ({})", question.question_id, question.headline, value);
                }
            }
        }

        Commands::Tags { action } => {
            let client = ApiClient::new(&config)?;
            let event_id = config.event_id.ok_or(AdminError::MissingEvent)?;

            match action {
                TagCommand::List => {
                    let tags = client.get_tag_list(event_id).await?;
                    println!("Found {} tags:", tags.len());
                    for tag in tags {
                        let names = tag
                            .name
                            .iter()
                            .map(|(lang, name)| format!("{}={}", lang, name))
                            .collect::<Vec<_>>()
                            .join("; ");
                        println!(
                            "{:>6}  {:<13} {}",
                            tag.id.map(|id| id.to_string()).unwrap_or_default(),
                            tag.tag_type.as_str(),
                            names
                        );
                    }
                }
                TagCommand::Add {
                    tag_type,
                    name,
                    description,
                } => {
                    let draft = build_draft(None, &tag_type, &name, &description)?;
                    let tag = draft.to_tag(event_id, &config.languages)?;
                    let saved = client.add_tag(&tag).await?;
                    println!("{}: {:?}", translator.t("Tag saved"), saved.id);
                }
                TagCommand::Update {
                    id,
                    tag_type,
                    name,
                    description,
                } => {
                    let draft = build_draft(Some(id), &tag_type, &name, &description)?;
                    let tag = draft.to_tag(event_id, &config.languages)?;
                    client.update_tag(&tag).await?;
                    println!("{}: {}", translator.t("Tag saved"), id);
                }
                TagCommand::Delete { id } => {
                    client.delete_tag(event_id, id).await?;
                    println!("{}: {}", translator.t("Tag deleted"), id);
                }
            }
        }

        Commands::Tui => {
            tui::run_tui(config, translator).await?;
        }
    }

    Ok(())
}

fn build_draft(id: Option<i64>, tag_type: &str, names: &[String], descriptions: &[String]) -> Result<TagDraft> {
    let mut draft = TagDraft::new();
    draft.id = id;
    draft.update_dropdown(TagCommand::parse_tag_type(tag_type)?);
    for (lang, text) in TagCommand::parse_translations(names)? {
        draft.update_text_field(TagField::Name, &lang, &text);
    }
    for (lang, text) in TagCommand::parse_translations(descriptions)? {
        draft.update_text_field(TagField::Description, &lang, &text);
    }
    Ok(draft)
}
