//! ProfesorIA CLI
//!
//! Generates a personalized course from a short form and lets the learner
//! work through it in the terminal.

mod command;

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use command::{Command, HELP};
use profesor_core::{
    Config, CourseData, CourseFormat, CourseLevel, ProfesorError, QuizId, Session, UserInput,
};
use profesor_gemini::GeminiClient;
use profesor_render::{export_course, MarkdownRenderer};
use tracing_subscriber::EnvFilter;

/// ProfesorIA - personalized courses generated on demand
///
/// Describe what you want to learn and get a full course with units,
/// lessons, quick tests, a final assessment and practical projects.
#[derive(Parser, Debug)]
#[command(name = "profesor")]
#[command(version, about, long_about = None)]
struct Args {
    /// Topic of the course
    #[arg(long)]
    topic: Option<String>,

    /// Current level: principiante, intermedio or avanzado
    #[arg(long, value_parser = parse_level)]
    level: Option<CourseLevel>,

    /// Who the learner is
    #[arg(long)]
    profile: Option<String>,

    /// What the learner wants to achieve
    #[arg(long)]
    goal: Option<String>,

    /// Time available for studying
    #[arg(long = "time", value_name = "TIME")]
    time_available: Option<String>,

    /// Preferred format: lecturas, ejercicios, esquemas or mixto
    #[arg(long, value_parser = parse_format)]
    format: Option<CourseFormat>,

    /// Path to configuration file (default: profesor.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Open a saved course JSON instead of generating one
    #[arg(long, value_name = "FILE")]
    course: Option<PathBuf>,

    /// Write course.md and course.json to DIR and exit
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_level(s: &str) -> Result<CourseLevel, String> {
    CourseLevel::parse(s)
        .ok_or_else(|| format!("unknown level '{s}' (principiante, intermedio, avanzado)"))
}

fn parse_format(s: &str) -> Result<CourseFormat, String> {
    CourseFormat::parse(s)
        .ok_or_else(|| format!("unknown format '{s}' (lecturas, ejercicios, esquemas, mixto)"))
}

/// What the interactive loop asks the caller to do next.
enum Flow {
    /// Back to the form for a new course.
    Home,
    /// Leave the program.
    Quit,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Views go to stdout; keep logs out of them.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tracing::debug!(config = ?args.config, course = ?args.course, "Starting ProfesorIA");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut session = Session::new();
    let mut client: Option<GeminiClient> = None;
    let mut presets = Some(&args);

    if let Some(path) = &args.course {
        let course = CourseData::load(path)
            .with_context(|| format!("Failed to load course from '{}'", path.display()))?;
        session.load_course(course)?;
    }

    loop {
        if session.active().is_none() {
            let Some(user_input) = read_form(&mut input, presets.take())? else {
                return Ok(());
            };
            if client.is_none() {
                client = Some(GeminiClient::from_config(&config)?);
            }
            let Some(generator) = client.as_ref() else {
                continue;
            };

            println!("\nGenerando tu curso personalizado...\n");
            if let Err(e) = session.create_course(generator, &user_input).await {
                println!("{}\n", e.user_message());
                continue;
            }
        }

        if let Some(dir) = &args.export {
            let active = session.active().ok_or(ProfesorError::NoCourseLoaded)?;
            export(active.course(), dir)?;
            return Ok(());
        }

        match interact(&mut session, &mut input, &config)? {
            Flow::Home => continue,
            Flow::Quit => return Ok(()),
        }
    }
}

/// Loads configuration from a file or the current directory.
fn load_config(config_path: Option<&Path>) -> anyhow::Result<Config> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Ok(Config::load_from_file(path)?)
        }
        None => Ok(Config::load()?),
    }
}

// ============================================================================
// Form
// ============================================================================

/// Asks for every course field, using command-line values when present.
///
/// Returns `None` when input ends before the form is complete.
fn read_form(input: &mut impl BufRead, presets: Option<&Args>) -> io::Result<Option<UserInput>> {
    println!("Crea tu curso personalizado\n");

    let Some(topic) = required(
        input,
        "¿Qué quieres aprender?",
        presets.and_then(|a| a.topic.as_deref()),
    )?
    else {
        return Ok(None);
    };
    let Some(level) = choice(
        input,
        "Nivel actual",
        presets.and_then(|a| a.level),
        &CourseLevel::ALL,
        CourseLevel::parse,
    )?
    else {
        return Ok(None);
    };
    let Some(profile) = required(
        input,
        "Tu perfil",
        presets.and_then(|a| a.profile.as_deref()),
    )?
    else {
        return Ok(None);
    };
    let Some(goal) = required(
        input,
        "Tu objetivo",
        presets.and_then(|a| a.goal.as_deref()),
    )?
    else {
        return Ok(None);
    };
    let Some(time_available) = required(
        input,
        "Tiempo disponible",
        presets.and_then(|a| a.time_available.as_deref()),
    )?
    else {
        return Ok(None);
    };
    let Some(format) = choice(
        input,
        "Formato preferido",
        presets.and_then(|a| a.format),
        &CourseFormat::ALL,
        CourseFormat::parse,
    )?
    else {
        return Ok(None);
    };

    Ok(Some(UserInput {
        topic,
        level,
        profile,
        goal,
        time_available,
        format,
    }))
}

fn prompt(input: &mut impl BufRead, label: &str) -> io::Result<Option<String>> {
    print!("{label} ");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Reads a field that may not be blank.
fn required(
    input: &mut impl BufRead,
    label: &str,
    preset: Option<&str>,
) -> io::Result<Option<String>> {
    if let Some(value) = preset.map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(Some(value.to_string()));
    }
    loop {
        let Some(answer) = prompt(input, &format!("{label}:"))? else {
            return Ok(None);
        };
        if !answer.is_empty() {
            return Ok(Some(answer));
        }
        println!("  Este campo es obligatorio.");
    }
}

/// Reads one of `options` by number or name; blank picks the default.
fn choice<T: Copy + Default + Display>(
    input: &mut impl BufRead,
    label: &str,
    preset: Option<T>,
    options: &[T],
    parse: fn(&str) -> Option<T>,
) -> io::Result<Option<T>> {
    if preset.is_some() {
        return Ok(preset);
    }
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    loop {
        let Some(answer) = prompt(input, &format!("{label} [{}]:", T::default()))? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(Some(T::default()));
        }
        let by_number = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| options.get(i).copied());
        if let Some(value) = by_number.or_else(|| parse(&answer)) {
            return Ok(Some(value));
        }
        println!("  Opción no válida.");
    }
}

// ============================================================================
// Course loop
// ============================================================================

fn interact(
    session: &mut Session,
    input: &mut impl BufRead,
    config: &Config,
) -> anyhow::Result<Flow> {
    show_current(session);
    println!("Escribe `h` para ver los comandos.");

    loop {
        let Some(line) = prompt(input, ">")? else {
            return Ok(Flow::Quit);
        };
        if line.is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        match execute(session, command, config) {
            Ok(Some(flow)) => return Ok(flow),
            Ok(None) => {}
            Err(e) => println!("{e}"),
        }
    }
}

fn execute(
    session: &mut Session,
    command: Command,
    config: &Config,
) -> anyhow::Result<Option<Flow>> {
    match command {
        Command::Navigate(event) => {
            session.navigate(event)?;
            show_current(session);
        }
        Command::Answer { question, option } => {
            let id = current_quiz(session)?;
            session.select_answer(id, question, option)?;
            show_current(session);
        }
        Command::Reveal => {
            let id = current_quiz(session)?;
            session.reveal(id)?;
            show_current(session);
        }
        Command::Sidebar => {
            if let Some(active) = session.active() {
                println!("{}", MarkdownRenderer::new(active).sidebar());
            }
        }
        Command::Export(dir) => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.output_dir));
            let active = session.active().ok_or(ProfesorError::NoCourseLoaded)?;
            export(active.course(), &dir)?;
        }
        Command::Reset => {
            session.reset();
            return Ok(Some(Flow::Home));
        }
        Command::Quit => return Ok(Some(Flow::Quit)),
        Command::Help => println!("{HELP}"),
    }
    Ok(None)
}

fn current_quiz(session: &Session) -> Result<QuizId, ProfesorError> {
    session
        .active()
        .map(profesor_core::ActiveCourse::current_quiz_id)
        .ok_or(ProfesorError::NoCourseLoaded)
}

fn show_current(session: &Session) {
    if let Some(active) = session.active() {
        println!("\n{}", MarkdownRenderer::new(active).current_view());
    }
}

fn export(course: &CourseData, dir: &Path) -> anyhow::Result<()> {
    let files = export_course(course, dir)
        .with_context(|| format!("Failed to export course to '{}'", dir.display()))?;
    tracing::info!(dir = %dir.display(), "Course exported");
    println!("Curso exportado:");
    println!("  {}", files.markdown.display());
    println!("  {}", files.json.display());
    Ok(())
}
