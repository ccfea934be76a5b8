use std::path::{Path, PathBuf};
use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::Value;
use wanderlist::{
    CatalogCache,
    CatalogDb,
    Planner,
    Transcript,
    filter::Criteria,
    import,
    months::Month,
    transcript::Role,
};

const FIXTURE: &str = r#"[
    {
        "NAME": "Hampi",
        "STATE": "Karnataka",
        "CATEGORY": "Heritage",
        "DESCRIPTION": "ancient red temple ruins among boulders",
        "BEST_VISIT_MONTHS": "Oct-Feb",
        "OPENING_TIME": "06:00",
        "CLOSING_TIME": "18:00",
        "GOOGLE_MAPS_LINK": "https://maps.example.com/hampi",
        "IMAGE_URL": "https://img.example.com/hampi.jpg"
    },
    {
        "NAME": "Goa Beaches",
        "STATE": "Goa",
        "CATEGORY": "Beach",
        "DESCRIPTION": "sunny beach shacks and water sports",
        "BEST_VISIT_MONTHS": "Nov-Feb",
        "IMAGE_URL": "not a link"
    },
    {
        "NAME": "Ooty",
        "STATE": "Tamil Nadu",
        "CATEGORY": "Hill Station",
        "DESCRIPTION": "tea gardens and a toy train through the hills",
        "BEST_VISIT_MONTHS": "Mar–Jun"
    },
    {
        "NAME": "Madurai",
        "STATE": "Tamil Nadu",
        "CATEGORY": "Temple",
        "DESCRIPTION": "towering red temple gopurams",
        "BEST_VISIT_MONTHS": "Oct-Mar, Xyz"
    }
]"#;

fn setup_fixture(data_dir: &Path) -> Result<CatalogDb, Box<dyn std::error::Error>> {
    let file = data_dir.join("destinations.json");
    std::fs::write(&file, FIXTURE)?;

    let rows = import::read_rows(&file)?;
    let db = CatalogDb::open(&data_dir.join("catalog.redb"))?;
    db.replace_rows(&rows)?;
    Ok(db)
}

fn names(dests: &[&wanderlist::Destination]) -> Vec<String> {
    dests.iter().map(|d| d.name.clone()).collect()
}

#[test]
fn browse_by_month_wraps_year() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::tempdir()?;
    let db = setup_fixture(tempdir.path())?;
    let cache = CatalogCache::new(db);
    let planner = Planner::new(cache.get()?);

    let january = planner.browse(&Criteria::for_month(Month::Jan));
    assert_eq!(names(&january), vec!["Hampi", "Goa Beaches", "Madurai"]);

    let june = planner.browse(&Criteria::for_month(Month::Jun));
    assert_eq!(names(&june), vec!["Ooty"]);

    let regional = planner.browse(
        &Criteria::for_month(Month::Mar).with_regions(vec!["Tamil Nadu".into()]),
    );
    assert_eq!(names(&regional), vec!["Ooty", "Madurai"]);
    Ok(())
}

#[test]
fn ask_ranks_and_records_the_session() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::tempdir()?;
    let db = setup_fixture(tempdir.path())?;
    let cache = CatalogCache::new(db);
    let planner = Planner::new(cache.get()?).with_top_k(2);
    let mut transcript = Transcript::new();

    let answer =
        planner.ask(&mut transcript, &Criteria::for_month(Month::Jan), "red temple");
    let ranked: Vec<&str> =
        answer.results.iter().map(|(d, _)| d.name.as_str()).collect();
    assert_eq!(ranked.len(), 2);
    assert!(ranked.contains(&"Hampi"));
    assert!(ranked.contains(&"Madurai"));
    assert_eq!(answer.candidates, 3);

    let empty =
        planner.ask(&mut transcript, &Criteria::for_month(Month::Aug), "beach");
    assert!(empty.is_empty());

    let roles: Vec<Role> = transcript.messages().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
    assert_eq!(transcript.messages()[1].content, "Top results for: 'red temple'");
    Ok(())
}

#[test]
fn options_come_from_the_catalog() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::tempdir()?;
    let db = setup_fixture(tempdir.path())?;
    let catalog = CatalogCache::new(db).get()?;

    assert_eq!(
        catalog.categories(),
        vec!["Heritage", "Beach", "Hill Station", "Temple"]
    );
    assert_eq!(catalog.regions(), vec!["Karnataka", "Goa", "Tamil Nadu"]);

    let madurai = &catalog.destinations()[3];
    assert_eq!(madurai.unparsed_months, vec!["Xyz".to_string()]);
    assert!(madurai.months.contains(Month::Jan));
    Ok(())
}

#[test]
fn cli_import_then_browse_and_ask() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::tempdir()?;
    let file = tempdir.path().join("destinations.json");
    std::fs::write(&file, FIXTURE)?;
    let bin = wanderlist_bin()?;

    let import = Command::new(&bin)
        .arg("import")
        .arg(&file)
        .env("WANDERLIST_DATA_DIR", tempdir.path())
        .output()?;
    assert!(import.status.success(), "{}", String::from_utf8_lossy(&import.stderr));

    let browse = Command::new(&bin)
        .args(["browse", "--date", "2025-01-10", "--json"])
        .env("WANDERLIST_DATA_DIR", tempdir.path())
        .output()?;
    assert!(browse.status.success());
    let value: Value = serde_json::from_slice(&browse.stdout)?;
    let listed: Vec<&str> = value
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|d| d.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(listed, vec!["Hampi", "Goa Beaches", "Madurai"]);
    assert_eq!(value[1]["image"]["status"], "unavailable");

    let ask = Command::new(&bin)
        .args(["ask", "beach", "--date", "2025-01-10", "-n", "1", "--json"])
        .env("WANDERLIST_DATA_DIR", tempdir.path())
        .output()?;
    assert!(ask.status.success());
    let value: Value = serde_json::from_slice(&ask.stdout)?;
    assert_eq!(value["result_count"], 1);
    assert_eq!(value["results"][0]["name"], "Goa Beaches");

    let bad_date = Command::new(&bin)
        .args(["browse", "--date", "10/01/2025"])
        .env("WANDERLIST_DATA_DIR", tempdir.path())
        .output()?;
    assert!(!bad_date.status.success());
    Ok(())
}

#[test]
fn cli_chat_session_keeps_history() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::tempdir()?;
    setup_fixture(tempdir.path())?;
    let bin = wanderlist_bin()?;

    let mut child = Command::new(&bin)
        .args(["chat", "--date", "2025-01-10", "-n", "2"])
        .env("WANDERLIST_DATA_DIR", tempdir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(b"red temple\n\n/history\n/quit\nbeach\n")?;
    let output = child.wait_with_output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout)?;
    let reply = stdout
        .find("Top results for: 'red temple'")
        .expect("assistant reply");
    let user = stdout.find("user: red temple").expect("history user line");
    let assistant = stdout
        .find("assistant: Top results for: 'red temple'")
        .expect("history assistant line");
    assert!(reply < user && user < assistant);
    assert!(stdout.contains("Hampi"));

    // Input after /quit is never answered.
    assert!(!stdout.contains("'beach'"));
    Ok(())
}

#[test]
fn cli_chat_ends_at_eof() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::tempdir()?;
    setup_fixture(tempdir.path())?;
    let bin = wanderlist_bin()?;

    let mut child = Command::new(&bin)
        .args(["chat", "--date", "2025-08-10"])
        .env("WANDERLIST_DATA_DIR", tempdir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;
    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(b"beach\n")?;
    let output = child.wait_with_output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("No destinations matched your query. Try being more specific."));
    Ok(())
}

fn wanderlist_bin() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(bin) = option_env!("CARGO_BIN_EXE_wanderlist") {
        return Ok(PathBuf::from(bin));
    }

    let mut path = std::env::current_exe()?;
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("wanderlist");

    if cfg!(windows) {
        path.set_extension("exe");
    }

    Ok(path)
}
