use anyhow::{Context, Result, bail};
use screenplay_config::Config;
use screenplay_engine::exchange;
use screenplay_engine::reports::{PlotKind, ReportKind, ReportTable, format_duration};
use screenplay_engine::{CounterSnapshot, ScriptSession};
use std::{env, path::PathBuf, process};

const USAGE: &str = "\
Usage: screenplay-cli <script.json> [command] [--csv]

Commands:
  counters                 Page, word, character and duration totals (default)
  cast                     Cast report
  scenes                   Scene report
  locations                Location report
  summary                  Summary report
  dialogue <CHARACTER>     Every line spoken by one character
  plot <structure|activity>  Plot data as JSON
  correct [output.json]    Run the corrector and write the blocks back out";

#[derive(Debug, PartialEq)]
enum Command {
    Counters,
    Report(ReportKind),
    Plot(PlotKind),
    Correct(Option<PathBuf>),
}

#[derive(Debug)]
struct Args {
    script: PathBuf,
    command: Command,
    csv: bool,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let csv = args.iter().any(|a| a == "--csv");
    let positional: Vec<&str> = args
        .iter()
        .skip(1)
        .filter(|a| *a != "--csv")
        .map(String::as_str)
        .collect();

    let Some((script, rest)) = positional.split_first() else {
        bail!("No script file given");
    };

    let command = match rest {
        [] | ["counters"] => Command::Counters,
        ["cast"] => Command::Report(ReportKind::Cast),
        ["scenes"] => Command::Report(ReportKind::Scene),
        ["locations"] => Command::Report(ReportKind::Location),
        ["summary"] => Command::Report(ReportKind::Summary),
        ["dialogue", name] => Command::Report(ReportKind::CharacterDialogue(name.to_string())),
        ["plot", "structure"] => Command::Plot(PlotKind::StoryStructure),
        ["plot", "activity"] => Command::Plot(PlotKind::CharactersActivity),
        ["correct"] => Command::Correct(None),
        ["correct", out] => Command::Correct(Some(PathBuf::from(out))),
        other => bail!("Unknown command: {}", other.join(" ")),
    };

    Ok(Args {
        script: PathBuf::from(script),
        command,
        csv,
    })
}

fn print_counters(counters: &CounterSnapshot) {
    println!("Pages:                       {}", counters.pages);
    println!("Words:                       {}", counters.words);
    println!("Characters (with spaces):    {}", counters.characters_with_spaces);
    println!("Characters (without spaces): {}", counters.characters_without_spaces);
    println!("Duration:                    {}", format_duration(counters.duration));
}

fn print_table(table: &ReportTable, csv: bool) {
    if csv {
        print!("{}", table.to_csv());
    } else {
        println!("{table}");
    }
}

fn run(args: Args, config: Config) -> Result<()> {
    let json = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read {}", args.script.display()))?;
    let records = exchange::from_json(&json)?;
    let template = config.load_template()?;
    log::info!("Using template {}", template.name());

    let mut session = ScriptSession::import(
        records,
        template,
        config.chronometry.clone(),
        config.corrector.clone(),
    )?;
    log::info!(
        "Loaded {} blocks from {}",
        session.document().len(),
        args.script.display()
    );

    match args.command {
        Command::Counters => print_counters(&session.counters()),
        Command::Report(kind) => {
            let table = session.report(&kind, &config.reports)?;
            print_table(&table, args.csv);
        }
        Command::Plot(kind) => {
            let plot = session.plot(kind, &config.reports);
            println!("{}", serde_json::to_string_pretty(&plot)?);
        }
        Command::Correct(output) => {
            session.correct()?;
            let out = exchange::to_json(&session.export())?;
            let target = output.unwrap_or_else(|| args.script.clone());
            std::fs::write(&target, out)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            log::info!("Wrote corrected script to {}", target.display());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::info!("No config at {}, using defaults", config_path.display());
            Config::default()
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    run(parsed, config)
}
