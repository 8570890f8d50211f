use crate::core::{append_note, pick_random_question_with, validate};
use crate::error::{QnoteError, QnoteResult, Severity};
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::session::Session;
use crate::types::{CellValue, Table, QUESTION_COLUMN};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

const SESSION_HELP: &str = "Commands:
  draw | d          Draw a random question
  note <text>       Type a note for the shown question
  save | s          Save the note and write the updated file
  help | h          Show this help
  quit | q          Leave the session";

/// Render an error the way the interactive UI shows it
pub fn render_error(err: &QnoteError) -> String {
    let message = err.to_string();
    match err.severity() {
        Severity::Info => format!("ℹ️  {}", message).cyan().to_string(),
        Severity::Warning => format!("⚠️  {}", message).yellow().to_string(),
        Severity::Error => format!("❌ {}", message).red().to_string(),
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Import the first sheet of `file` and check it is a usable question sheet
fn load_questions(file: &Path, verbose: bool) -> QnoteResult<Table> {
    if verbose {
        println!("{}", "📖 Reading Excel file...".cyan());
    }
    let table = ExcelImporter::new(file).import()?;
    if verbose {
        println!(
            "   Sheet '{}': {} columns, {} rows",
            table.sheet_name,
            table.columns().len(),
            table.row_count()
        );
    }
    validate(&table)?;
    Ok(table)
}

/// Refuse to write the updated workbook over the sheet it was read from
fn ensure_distinct_output(file: &Path, output: &Path) -> QnoteResult<()> {
    if let (Ok(source), Ok(target)) = (file.canonicalize(), output.canonicalize()) {
        if source == target {
            return Err(QnoteError::Validation(format!(
                "Output '{}' is the source workbook; choose a different --output",
                output.display()
            )));
        }
    }
    Ok(())
}

/// Execute the inspect command - load, validate and summarize a sheet
pub fn inspect(file: PathBuf) -> QnoteResult<()> {
    println!("{}", "🔍 QuizNote - Inspect".bold().green());
    println!("   File: {}\n", file.display());

    let table = ExcelImporter::new(&file).import()?;

    println!("   Sheet:   {}", table.sheet_name.bright_blue().bold());
    println!("   Columns: {}", table.columns().join(", ").cyan());
    println!("   Rows:    {}", table.row_count().to_string().bold());
    println!();

    validate(&table)?;
    println!("{}", "✅ Ready: question sheet is valid".bold().green());
    Ok(())
}

/// Execute the draw command - print one random question
pub fn draw(file: PathBuf, seed: Option<u64>, verbose: bool) -> QnoteResult<()> {
    let table = load_questions(&file, verbose)?;
    let question = pick_random_question_with(&table, &mut rng_from(seed))?;

    println!("{}", "Question:".bold().cyan());
    println!("{}", question);
    Ok(())
}

/// Execute the note command - append a note and write the updated workbook
pub fn note(
    file: PathBuf,
    note: String,
    question: Option<String>,
    seed: Option<u64>,
    output: PathBuf,
    verbose: bool,
) -> QnoteResult<()> {
    println!("{}", "📝 QuizNote - Add note".bold().green());
    println!("   File: {}", file.display());
    println!("   Output: {}\n", output.display());

    ensure_distinct_output(&file, &output)?;
    let table = load_questions(&file, verbose)?;

    let question = match question {
        Some(text) => find_question(&table, &text)?,
        None => pick_random_question_with(&table, &mut rng_from(seed))?,
    };
    println!("   Question: {}", question.to_string().bright_blue());

    let updated = append_note(&table, &question, &note)?;
    ExcelExporter::new(&updated).export(&output)?;

    println!(
        "{}",
        format!("✅ Note saved successfully! ({} rows)", updated.row_count())
            .bold()
            .green()
    );
    Ok(())
}

/// Look up a question by its displayed text
fn find_question(table: &Table, text: &str) -> QnoteResult<CellValue> {
    table
        .column_values(QUESTION_COLUMN)
        .and_then(|values| values.into_iter().find(|v| v.to_string() == text).cloned())
        .ok_or_else(|| {
            QnoteError::Validation(format!("Question '{}' is not in the sheet", text))
        })
}

/// Execute the session command - interactive draw/note/save loop on stdin
pub fn session(file: PathBuf, output: PathBuf) -> QnoteResult<()> {
    ensure_distinct_output(&file, &output)?;
    let table = load_questions(&file, false)?;
    let mut session = Session::with_table(table)?;

    println!("{}", "🎲 QuizNote - Interactive session".bold().green());
    println!("   File: {}", file.display());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_session(stdin.lock(), stdout.lock(), &mut session, &output)
}

/// Drive a session from line-oriented input until `quit` or end of input.
///
/// Errors from individual commands are printed and the loop continues.
pub fn run_session<R: BufRead, W: Write>(
    input: R,
    mut out: W,
    session: &mut Session,
    output: &Path,
) -> QnoteResult<()> {
    writeln!(out, "{}", SESSION_HELP)?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        let (command, rest) = match line.trim_start().split_once(' ') {
            Some((cmd, rest)) => (cmd, rest),
            None => (line.trim(), ""),
        };

        let result = match command {
            "" => continue,
            "quit" | "q" | "exit" => break,
            "help" | "h" | "?" => {
                writeln!(out, "{}", SESSION_HELP)?;
                continue;
            }
            "draw" | "d" => session.draw_question().map(|question| {
                format!("{}\n{}", "Question:".bold().cyan(), question)
            }),
            "note" | "n" => session
                .enter_note(rest)
                .map(|()| "Note ready. Type 'save' to store it.".to_string()),
            "save" | "s" => save_to(session, output),
            other => Err(QnoteError::InvalidState(format!(
                "Unknown command '{}'. Type 'help' for commands.",
                other
            ))),
        };

        match result {
            Ok(message) => writeln!(out, "{}", message)?,
            Err(e) => writeln!(out, "{}", render_error(&e))?,
        }
    }

    Ok(())
}

fn save_to(session: &mut Session, output: &Path) -> QnoteResult<String> {
    let download = session.save_note()?;
    std::fs::write(output, &download.bytes)?;
    Ok(format!(
        "{} Updated file written to {}",
        "✅ Note saved successfully!".green(),
        output.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn session_with(questions: &[&str]) -> Session {
        let mut table = Table::new("Sheet1", vec!["Question".to_string()]);
        for q in questions {
            table.push_row(vec![(*q).into()]);
        }
        Session::with_table(table).unwrap()
    }

    fn run(script: &str, session: &mut Session, output: &Path) -> String {
        let mut out = Vec::new();
        run_session(Cursor::new(script.to_string()), &mut out, session, output).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_session_draw_note_save_writes_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("updated_file.xlsx");
        let mut session = session_with(&["What is 2+2?"]);

        let text = run("draw\nnote Easy\nsave\nquit\n", &mut session, &output);

        assert!(text.contains("What is 2+2?"));
        assert!(text.contains("Note saved successfully!"));
        let written = ExcelImporter::new(&output).import().unwrap();
        assert_eq!(written.row_count(), 2);
        assert_eq!(written.get(1, "Note"), Some(&CellValue::text("Easy")));
    }

    #[test]
    fn test_session_save_without_note_warns() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.xlsx");
        let mut session = session_with(&["q1"]);

        let text = run("d\ns\n", &mut session, &output);

        assert!(text.contains("Please enter a note before saving."));
        assert!(!output.exists());
    }

    #[test]
    fn test_session_note_before_draw_warns() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with(&["q1"]);
        let text = run("note too early\n", &mut session, &dir.path().join("o.xlsx"));
        assert!(text.contains("Draw a question before adding a note."));
    }

    #[test]
    fn test_session_unknown_command_continues() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with(&["q1"]);
        let text = run("frobnicate\ndraw\n", &mut session, &dir.path().join("o.xlsx"));
        assert!(text.contains("Unknown command 'frobnicate'"));
        assert!(text.contains("q1"));
    }

    #[test]
    fn test_session_stops_at_quit() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with(&["q1"]);
        run("quit\ndraw\n", &mut session, &dir.path().join("o.xlsx"));
        assert!(session.current_question().is_none());
    }

    #[test]
    fn test_find_question_matches_display_text() {
        let mut table = Table::new("Sheet1", vec!["Question".to_string()]);
        table.push_row(vec![CellValue::Number(42.0)]);
        table.push_row(vec!["Capital of France?".into()]);

        assert_eq!(find_question(&table, "42").unwrap(), CellValue::Number(42.0));
        assert!(matches!(
            find_question(&table, "missing"),
            Err(QnoteError::Validation(_))
        ));
    }

    #[test]
    fn test_output_must_differ_from_source() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("q.xlsx");
        std::fs::write(&source, b"placeholder").unwrap();

        let err = ensure_distinct_output(&source, &source).unwrap_err();
        assert!(matches!(err, QnoteError::Validation(_)));

        // Same file reached through a different spelling
        let aliased = dir.path().join(".").join("q.xlsx");
        assert!(ensure_distinct_output(&source, &aliased).is_err());

        assert!(ensure_distinct_output(&source, &dir.path().join("out.xlsx")).is_ok());
    }

    #[test]
    fn test_render_error_includes_message() {
        let rendered = render_error(&QnoteError::EmptyTable);
        assert!(rendered.contains("Your uploaded spreadsheet is empty."));
    }
}
