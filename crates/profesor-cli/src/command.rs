//! Interactive commands typed while a course is open.

use std::path::PathBuf;

use anyhow::{anyhow, bail};
use profesor_core::{LessonKey, NavEvent};

/// Help text listing every command.
pub const HELP: &str = "\
Comandos:
  n, next          siguiente lección (marca la actual como completada)
  p, prev          lección anterior
  g U L            ir a la lección L de la unidad U
  f, final         evaluación final
  a Q O            responder la pregunta Q con la opción O (1 = A, 2 = B...)
  r, reveal        ver resultados del test
  s, sidebar       índice y progreso
  e, export [DIR]  exportar course.md y course.json
  x, reset         crear otro curso
  q, quit          salir
  h, help          esta ayuda";

/// A parsed command. Indices are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move through the course.
    Navigate(NavEvent),
    /// Select an option in the quiz on screen.
    Answer {
        /// Question index.
        question: usize,
        /// Option index.
        option: usize,
    },
    /// Reveal the results of the quiz on screen.
    Reveal,
    /// Show the sidebar.
    Sidebar,
    /// Export the course, to the configured directory if none is given.
    Export(Option<PathBuf>),
    /// Discard the course and return to the form.
    Reset,
    /// Leave the program.
    Quit,
    /// Show the help text.
    Help,
}

impl Command {
    /// Parses one input line. Numbers typed by the learner are one-based.
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            bail!("Escribe un comando (h para ayuda)");
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_lowercase().as_str() {
            "n" | "next" => Self::Navigate(NavEvent::Next),
            "p" | "prev" => Self::Navigate(NavEvent::Prev),
            "f" | "final" => Self::Navigate(NavEvent::ShowFinal),
            "g" | "goto" => {
                let [unit, lesson] = two_numbers(&args, "g U L")?;
                Self::Navigate(NavEvent::JumpTo(LessonKey::new(unit, lesson)))
            }
            "a" | "answer" => {
                let [question, option] = two_numbers(&args, "a Q O")?;
                Self::Answer { question, option }
            }
            "r" | "reveal" => Self::Reveal,
            "s" | "sidebar" => Self::Sidebar,
            "e" | "export" => Self::Export(args.first().map(PathBuf::from)),
            "x" | "reset" => Self::Reset,
            "q" | "quit" => Self::Quit,
            "h" | "help" | "?" => Self::Help,
            other => bail!("Comando desconocido '{other}' (h para ayuda)"),
        };
        Ok(command)
    }
}

/// Parses exactly two one-based numbers into zero-based indices.
fn two_numbers(args: &[&str], usage: &str) -> anyhow::Result<[usize; 2]> {
    let [first, second] = args else {
        bail!("Uso: {usage}");
    };
    Ok([one_based(first)?, one_based(second)?])
}

fn one_based(arg: &str) -> anyhow::Result<usize> {
    let n: usize = arg
        .parse()
        .map_err(|_| anyhow!("'{arg}' no es un número"))?;
    n.checked_sub(1)
        .ok_or_else(|| anyhow!("Los números empiezan en 1"))
}
