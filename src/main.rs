mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use coursedeck::catalog::CatalogRepository;
use coursedeck::config::Config;
use coursedeck::db::Database;
use coursedeck::navigation::Key;
use coursedeck::sheets::StaticSource;
use coursedeck::types::EntityRef;
use coursedeck::CourseDeck;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coursedeck=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        config.storage.database_url = Some(url);
    }

    let mut deck = match &cli.offline {
        Some(path) => {
            let source = StaticSource::from_file(path, &config.sheets).await?;
            let db = Database::connect(config.storage.database_url.as_deref()).await?;
            db.run_migrations().await?;
            CourseDeck::with_parts(config, Arc::new(source), Arc::new(db)).await?
        }
        None => CourseDeck::connect(config).await?,
    };

    match cli.command {
        Commands::Courses => {
            deck.refresh().await?;
            for course in deck.catalog().courses() {
                let price = if deck.purchases().contains(&course.id) { "OWNED".to_string() } else { deck.format_price(&course.price) };
                println!("{}\t{}\t{}\t{}", course.id, course.title, price, deck.resolve_thumbnail(EntityRef::Course(course)));
            }
        }
        Commands::Tree => {
            deck.refresh().await?;
            print_tree(deck.catalog());
        }
        Commands::Browse { keys } => {
            deck.refresh().await?;
            let nav = deck.navigator_mut();
            println!("{}", serde_json::to_string(&nav.view())?);
            for raw in keys {
                let key: Key = raw.parse().map_err(anyhow::Error::msg)?;
                match nav.handle_key(key) {
                    Ok(view) => println!("{}", serde_json::to_string(&view)?),
                    Err(e) => println!("{}", serde_json::json!({ "key": raw, "rejected": e.to_string() })),
                }
            }
            if let Some(details) = deck.details_for_current() {
                println!("{}", serde_json::to_string(&details)?);
            }
        }
        Commands::Buy { course_id } => {
            deck.refresh().await?;
            let course = deck.catalog().course(&course_id).map(|c| c.title.clone());
            if deck.purchase(&course_id).await.with_context(|| format!("buying {course_id}"))? {
                println!("Purchased {}", course.unwrap_or(course_id));
            } else {
                println!("Nothing to buy: {} is free or already owned", course.unwrap_or(course_id));
            }
        }
        Commands::Purchases => {
            for id in deck.purchases() {
                println!("{id}");
            }
        }
        Commands::Theme { token } => match token {
            Some(token) => {
                deck.set_theme(&token).await?;
                println!("{token}");
            }
            None => println!("{}", deck.theme().await?),
        },
    }
    Ok(())
}

fn print_tree(catalog: &CatalogRepository) {
    for course in catalog.courses() {
        println!("{} [{}] {}", course.id, course.price, course.title);
        for module in catalog.modules_of(&course.id) {
            let lessons = catalog.lessons_of(&module.id);
            let duration = CatalogRepository::aggregate_duration(lessons.iter().copied());
            println!("  {} {} ({} lessons, {})", module.id, module.title, lessons.len(), duration);
            for lesson in lessons {
                let duration = if lesson.duration.is_empty() { "-" } else { lesson.duration.as_str() };
                println!("    {} {} {}", lesson.id, lesson.title, duration);
            }
        }
    }
}
