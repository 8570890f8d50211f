use clap::{Parser, Subcommand};
use royalbit_quiznote::cli;
use royalbit_quiznote::error::QnoteResult;
use royalbit_quiznote::excel::EXPORT_FILENAME;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "quiznote")]
#[command(about = "Draw random questions from a spreadsheet and save notes on them.")]
#[command(long_about = "QuizNote - Question sheet note-taking
Upload an .xlsx with a 'Question' column, draw a random question,
attach a note, and get an updated workbook with the note appended.

COMMANDS:
  inspect  - Check that a sheet is a valid question sheet
  draw     - Print one random question
  note     - Append a note and write the updated .xlsx
  session  - Interactive draw / note / save loop

EXAMPLES:
  quiznote inspect questions.xlsx
  quiznote draw questions.xlsx --seed 7
  quiznote note questions.xlsx --note \"Easy\" -o updated_file.xlsx
  quiznote session questions.xlsx")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a sheet is a valid question sheet
    Inspect {
        /// Path to Excel file (.xlsx)
        file: PathBuf,
    },

    /// Print one random question from the sheet
    Draw {
        /// Path to Excel file (.xlsx)
        file: PathBuf,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Show verbose loading steps
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Append a note to a question and write the updated workbook.

Without --question a random question is drawn (use --seed to make the
draw reproducible). With --question the text must match a value of the
'Question' column exactly.

The original file is never modified; the updated workbook is written to
--output (default: updated_file.xlsx).

EXAMPLES:
  quiznote note questions.xlsx --note \"Easy\"
  quiznote note questions.xlsx -q \"What is 2+2?\" --note \"4\" -o out.xlsx")]
    /// Append a note and write the updated .xlsx
    Note {
        /// Path to Excel file (.xlsx)
        file: PathBuf,

        /// Note text (must not be blank)
        #[arg(long)]
        note: String,

        /// Question to annotate (default: a random question)
        #[arg(short, long)]
        question: Option<String>,

        /// Seed for the random draw
        #[arg(long)]
        seed: Option<u64>,

        /// Output Excel file path (.xlsx)
        #[arg(short, long, default_value = EXPORT_FILENAME)]
        output: PathBuf,

        /// Show verbose loading steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Interactive draw / note / save loop on stdin
    Session {
        /// Path to Excel file (.xlsx)
        file: PathBuf,

        /// Where 'save' writes the updated workbook
        #[arg(short, long, default_value = EXPORT_FILENAME)]
        output: PathBuf,
    },
}

fn run(cli: Cli) -> QnoteResult<()> {
    match cli.command {
        Commands::Inspect { file } => cli::inspect(file),

        Commands::Draw {
            file,
            seed,
            verbose,
        } => cli::draw(file, seed, verbose),

        Commands::Note {
            file,
            note,
            question,
            seed,
            output,
            verbose,
        } => cli::note(file, note, question, seed, output, verbose),

        Commands::Session { file, output } => cli::session(file, output),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", cli::render_error(&e));
            ExitCode::FAILURE
        }
    }
}
