use anyhow::Context;
use clap::{Parser, Subcommand};
use filmworks::detail::{error_message, load_work, WorkDetail};
use filmworks::options::{load_remote_options, OptionSource};
use filmworks::support::{category_faqs, category_title, FaqDirectory};
use filmworks::url_sync::split_location;
use filmworks::{
    build_url, parse_filters, ClientConfig, Facet, FacetOptionSet, MemoryHistory, StrapiClient,
    WorksGallery, GALLERY_PATH,
};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "filmworks", version, about = "Browse the wrap studio's works and FAQ from the terminal")]
struct Cli {
    /// Content API origin (defaults to $STRAPI_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List works for a gallery location, e.g. "/works?filmType=ppf&carModel=BMW"
    Works {
        #[arg(default_value = GALLERY_PATH)]
        location: String,
        #[arg(long, default_value_t = 25)]
        page_size: u32,
    },
    /// Show one work by slug
    Work { slug: String },
    /// Show the option lists for every facet
    Options,
    /// List FAQ categories, or search questions
    Faq {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List the questions in one FAQ category
    FaqCategory { id: String },
    /// Print the canonical URL and API query for a location (no network)
    Url { location: String },
}

fn config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut cfg = match &cli.base_url {
        Some(base_url) => ClientConfig {
            base_url: base_url.clone(),
            ..Default::default()
        },
        None => ClientConfig::from_env()?,
    };
    if let Some(ms) = cli.timeout_ms {
        cfg.timeout_ms = ms;
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::Url { location } = &cli.command {
        let (path, query) = split_location(location);
        let filters = parse_filters(query);
        println!("url:   {}", build_url(path, &filters));
        let api = filmworks::Query::new()
            .predicate(filters.predicate())
            .populate("*")
            .to_query_string();
        println!("query: {}", api);
        return Ok(());
    }

    let client = StrapiClient::new(config(&cli)?).context("Failed to create content client")?;

    match cli.command {
        Command::Works { location, page_size } => {
            let history = MemoryHistory::new(&location);
            let mut gallery = WorksGallery::open_with(client, history, &location, page_size);
            gallery.settled().await;
            gallery.options_loaded().await;

            let view = gallery.view();
            if let Some(err) = &view.error {
                eprintln!("{}", err);
                eprintln!("reload: {}", gallery.recovery_url());
                std::process::exit(1);
            }
            let options = gallery.options();
            for work in &view.works {
                let film = work
                    .film_type
                    .as_deref()
                    .map(|v| options.label_for(Facet::FilmType, v).unwrap_or(v))
                    .unwrap_or("-");
                println!("{:<40} {:<12} {}", work.name, film, work.slug);
            }
            if let Some(p) = view.pagination {
                println!("-- page {}/{} ({} works)", p.page, p.page_count, p.total);
            }
        }
        Command::Work { slug } => match load_work(&client, &slug).await {
            Ok(work) => {
                let detail = WorkDetail::from_work(&work);
                println!("{}", detail.title);
                for badge in &detail.badges {
                    println!("  {}", badge);
                }
                for url in &detail.image_urls {
                    println!("  {}", client.config().media_url(url));
                }
            }
            Err(e) => {
                eprintln!("{}", error_message(&e));
                std::process::exit(1);
            }
        },
        Command::Options => {
            let slots = Mutex::new(FacetOptionSet::default());
            load_remote_options(&client, &slots).await;
            let options = slots.into_inner().unwrap_or_else(|e| e.into_inner());
            for facet in Facet::ALL {
                let list = options.get(facet);
                let origin = match list.source {
                    OptionSource::Static => "static",
                    OptionSource::Fallback => "fallback",
                    OptionSource::Remote => "remote",
                };
                println!("{} ({}, {})", facet.title(), facet.key(), origin);
                for opt in &list.options {
                    println!("  {:<24} {}", opt.label, opt.value);
                }
            }
        }
        Command::Faq { search, page } => {
            let mut dir = FaqDirectory::new(client);
            match search {
                Some(term) => {
                    dir.search(&term).await;
                    if page > 1 {
                        dir.change_page(page).await;
                    }
                }
                None => dir.load().await,
            }
            if let Some(err) = &dir.error {
                eprintln!("發生錯誤: {}", err);
                std::process::exit(1);
            }
            if dir.is_empty() {
                println!("沒有找到相關的問題");
            }
            for category in &dir.categories {
                println!("[{}] {}", category.id, category.title);
            }
            for faq in &dir.faqs {
                println!("Q: {}", faq.question);
            }
            let pages = dir.page_numbers();
            if !pages.is_empty() {
                println!("-- page {}/{}", dir.pagination.page, pages.len());
            }
        }
        Command::FaqCategory { id } => {
            let faqs = category_faqs(&client, &id).await?;
            println!("{}", category_title(&faqs));
            if faqs.is_empty() {
                println!("此類別下沒有問題");
            }
            for faq in &faqs {
                println!("Q: {}", faq.question);
                println!("A: {}", faq.answer);
            }
        }
        Command::Url { .. } => {}
    }

    Ok(())
}
