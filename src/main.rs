use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wanderlist::{
    CatalogCache,
    CatalogDb,
    DataDir,
    Error,
    Planner,
    Result,
    Transcript,
    cli::{self, Cli, Command, FilterArgs, SettingsAction},
    filter::{self, Criteria},
    import,
    months,
    planner::{self, TOP_K_SETTING},
    render,
};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("WANDERLIST_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }
    if let Command::Months(args) = &cli.command {
        return cmd_months(args);
    }

    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;
    let catalog_db = CatalogDb::open(&data_dir.catalog_db())?;

    match cli.command {
        Command::Import(args) => cmd_import(&catalog_db, &args)?,
        Command::Settings { action } => cmd_settings(&catalog_db, action)?,
        Command::Status(args) => cmd_status(&catalog_db, &data_dir, args.json)?,
        Command::Browse(args) => cmd_browse(&load_planner(catalog_db)?, &args)?,
        Command::Ask(args) => cmd_ask(&load_planner(catalog_db)?, &args)?,
        Command::Chat(args) => cmd_chat(&load_planner(catalog_db)?, &args)?,
        Command::Show(args) => cmd_show(&load_planner(catalog_db)?, &args)?,
        Command::Options(args) => {
            cmd_options(&load_planner(catalog_db)?, args.json)?;
        }
        Command::Months(_) | Command::Completions(_) => {}
    }

    Ok(())
}

/// Load the catalog once and build a planner using the stored `top_k`.
fn load_planner(catalog_db: CatalogDb) -> Result<Planner> {
    let top_k =
        planner::parse_top_k(catalog_db.get_setting(TOP_K_SETTING)?.as_deref())?;
    let cache = CatalogCache::new(catalog_db);
    Ok(Planner::new(cache.get()?).with_top_k(top_k))
}

fn criteria(filters: &FilterArgs) -> Result<Criteria> {
    let month = filter::travel_month(filters.date.as_deref())?;
    Ok(Criteria::for_month(month)
        .with_categories(filters.categories.clone())
        .with_regions(filters.states.clone()))
}

fn planner_for(planner: &Planner, count: Option<usize>) -> Result<Planner> {
    match count {
        Some(0) => Err(Error::Config("count must be at least 1".into())),
        Some(k) => Ok(planner.clone().with_top_k(k)),
        None => Ok(planner.clone()),
    }
}

fn cmd_import(catalog_db: &CatalogDb, args: &cli::ImportArgs) -> Result<()> {
    let rows = import::read_rows(&args.file)?;
    let count = if args.replace {
        catalog_db.replace_rows(&rows)?
    } else {
        catalog_db.insert_rows(&rows)?
    };
    let total = catalog_db.count()?;

    println!(
        "Imported {count} destination(s) from {} ({total} in catalog)",
        args.file.display()
    );
    Ok(())
}

fn cmd_browse(planner: &Planner, args: &cli::BrowseArgs) -> Result<()> {
    let criteria = criteria(&args.filters)?;
    let dests = planner.browse(&criteria);

    let mut out = io::stdout().lock();
    if args.json {
        render::destinations_json(&mut out, &dests)?;
    } else {
        writeln!(out, "Best places to visit in {}:\n", criteria.month)?;
        render::destinations_human(&mut out, &dests)?;
    }
    Ok(())
}

fn cmd_ask(planner: &Planner, args: &cli::AskArgs) -> Result<()> {
    let criteria = criteria(&args.filters)?;
    let planner = planner_for(planner, args.count)?;
    let mut transcript = Transcript::new();
    let answer = planner.ask(&mut transcript, &criteria, &args.query);

    let mut out = io::stdout().lock();
    if args.json {
        render::answer_json(&mut out, &answer)?;
    } else {
        if let Some(reply) = transcript.last() {
            writeln!(out, "{}\n", reply.content)?;
        }
        render::answer_human(&mut out, &answer)?;
    }
    Ok(())
}

fn cmd_chat(planner: &Planner, args: &cli::ChatArgs) -> Result<()> {
    let criteria = criteria(&args.filters)?;
    let planner = planner_for(planner, args.count)?;
    let mut transcript = Transcript::new();

    eprintln!(
        "Planning for {}. Ask about a place, /history to review, /quit to leave.",
        criteria.month
    );

    let stdin = io::stdin();
    let mut out = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let query = line.trim();
        match query {
            "" => continue,
            "/quit" | "/exit" => break,
            "/history" => {
                render::transcript_human(&mut out, &transcript)?;
                continue;
            }
            _ => {}
        }

        let answer = planner.ask(&mut transcript, &criteria, query);
        if let Some(reply) = transcript.last() {
            writeln!(out, "{}", reply.content)?;
        }
        if !answer.is_empty() {
            render::answer_human(&mut out, &answer)?;
        }
        out.flush()?;
    }

    Ok(())
}

fn cmd_show(planner: &Planner, args: &cli::ShowArgs) -> Result<()> {
    let glob = globset::GlobBuilder::new(&args.pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::Config(format!("invalid glob pattern: {e}")))?
        .compile_matcher();

    let matches: Vec<_> = planner
        .catalog()
        .destinations()
        .iter()
        .filter(|d| glob.is_match(&d.name))
        .collect();

    if matches.is_empty() && !args.json {
        return Err(Error::NotFound {
            kind: "destination",
            name: args.pattern.clone(),
        });
    }

    let mut out = io::stdout().lock();
    if args.json {
        render::destinations_json(&mut out, &matches)?;
    } else {
        render::destinations_human(&mut out, &matches)?;
    }
    Ok(())
}

fn cmd_options(planner: &Planner, json: bool) -> Result<()> {
    let catalog = planner.catalog();
    let categories = catalog.categories();
    let states = catalog.regions();

    if json {
        println!(
            "{}",
            serde_json::json!({ "categories": categories, "states": states })
        );
    } else {
        println!("Categories:");
        for category in &categories {
            println!("  {category}");
        }
        println!("States:");
        for state in &states {
            println!("  {state}");
        }
    }
    Ok(())
}

fn cmd_months(args: &cli::MonthsArgs) -> Result<()> {
    let expansion = months::expand(Some(&args.raw));
    let mut out = io::stdout().lock();
    if args.json {
        serde_json::to_writer(&mut out, &expansion)?;
        writeln!(out)?;
    } else {
        render::expansion_human(&mut out, &expansion)?;
    }
    Ok(())
}

fn cmd_settings(catalog_db: &CatalogDb, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show { json } => {
            let settings = catalog_db.list_settings()?;
            if json {
                let map: serde_json::Map<String, serde_json::Value> = settings
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::String(v)))
                    .collect();
                println!("{}", serde_json::Value::Object(map));
            } else if settings.is_empty() {
                println!("No settings stored.");
            } else {
                for (key, value) in &settings {
                    println!("{key}\t{value}");
                }
            }
        }
        SettingsAction::Set { key, value } => {
            if key != TOP_K_SETTING {
                return Err(Error::Config(format!("unknown setting '{key}'")));
            }
            planner::parse_top_k(Some(&value))?;
            catalog_db.set_setting(&key, value.trim())?;
            println!("Set {key} = {}", value.trim());
        }
        SettingsAction::Clear { key } => {
            if !catalog_db.remove_setting(&key)? {
                return Err(Error::NotFound {
                    kind: "setting",
                    name: key,
                });
            }
            println!("Cleared {key}");
        }
    }
    Ok(())
}

fn cmd_status(
    catalog_db: &CatalogDb,
    data_dir: &DataDir,
    json: bool,
) -> Result<()> {
    let count = catalog_db.count()?;
    let top_k =
        planner::parse_top_k(catalog_db.get_setting(TOP_K_SETTING)?.as_deref())?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "data_dir": data_dir.root().display().to_string(),
                "data_dir_source": data_dir.origin().to_string(),
                "destinations": count,
                "top_k": top_k,
            })
        );
    } else {
        println!(
            "Data directory: {} (from {})",
            data_dir.root().display(),
            data_dir.origin()
        );
        println!("Destinations: {count}");
        println!("Results per query: {top_k}");
    }
    Ok(())
}
