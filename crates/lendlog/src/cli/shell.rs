//! Interactive shell.
//!
//! Keeps a [`Library`] open and reads one command per line, the way a single
//! page stays open between clicks. The add-book form persists between
//! commands until a submit succeeds.

use std::io::{self, Write};

use crate::app::{Confirm, Intent, Library};
use crate::book::BookId;
use crate::error::Result;
use crate::storage::BookStorage;
use crate::view::{Renderer, RowAction};

/// Prompt shown before each command.
pub const PROMPT: &str = "lendlog> ";

const HELP: &str = "\
Commands:
  title <text>     set the title field
  author <text>    set the author field
  year <text>      set the year field
  form             show the form fields
  submit           add the book described by the form
  add              fill in the form field by field, then submit
  rent <id>        mark a book as rented
  return <id>      mark a book as returned
  remove <id>      remove a book (asks first)
  list             show the shelf
  help             show this help
  quit             leave the shell";

/// A form field the shell can fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Title field.
    Title,
    /// Author field.
    Author,
    /// Year field.
    Year,
}

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Nothing typed.
    Blank,
    /// Set a form field.
    Field(FormField, String),
    /// Show the form.
    Form,
    /// Fill in the form interactively, then submit.
    Add,
    /// Act on the shelf.
    Intent(Intent),
    /// Show the shelf.
    List,
    /// Show the help text.
    Help,
    /// Leave the shell.
    Quit,
}

/// Parse one line of input.
///
/// # Errors
///
/// Returns a message for the user if the command or its id is not understood.
pub fn parse_line(line: &str) -> std::result::Result<ShellCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ShellCommand::Blank);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let command = match word.to_lowercase().as_str() {
        "title" => ShellCommand::Field(FormField::Title, rest.to_string()),
        "author" => ShellCommand::Field(FormField::Author, rest.to_string()),
        "year" => ShellCommand::Field(FormField::Year, rest.to_string()),
        "form" => ShellCommand::Form,
        "submit" => ShellCommand::Intent(Intent::Submit),
        "add" => ShellCommand::Add,
        "rent" => ShellCommand::Intent(RowAction::Rent.intent(parse_id(rest)?)),
        "return" => ShellCommand::Intent(RowAction::Return.intent(parse_id(rest)?)),
        "remove" => ShellCommand::Intent(Intent::Remove(parse_id(rest)?)),
        "list" | "ls" => ShellCommand::List,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => {
            return Err(format!(
                "Unknown command '{other}'. Type 'help' for a list of commands."
            ))
        }
    };
    Ok(command)
}

fn parse_id(text: &str) -> std::result::Result<BookId, String> {
    if text.is_empty() {
        return Err("A book id is required.".to_string());
    }
    text.parse()
        .map_err(|_| format!("'{text}' is not a book id."))
}

/// Run the shell until `quit` or end of input.
///
/// `read_line` appends the next input line to the buffer and returns the
/// number of bytes read, `0` at end of input.
///
/// # Errors
///
/// Returns an error if reading input, saving or drawing fails.
pub fn run<S, R, C, F, W>(library: &mut Library<S, R, C>, mut read_line: F, mut out: W) -> Result<()>
where
    S: BookStorage,
    R: Renderer,
    C: Confirm,
    F: FnMut(&mut String) -> io::Result<usize>,
    W: Write,
{
    library.refresh()?;

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let mut line = String::new();
        if read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        match parse_line(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => execute(library, command, &mut read_line, &mut out)?,
            Err(message) => writeln!(out, "{message}")?,
        }
    }
    Ok(())
}

fn execute<S, R, C, F, W>(
    library: &mut Library<S, R, C>,
    command: ShellCommand,
    read_line: &mut F,
    out: &mut W,
) -> Result<()>
where
    S: BookStorage,
    R: Renderer,
    C: Confirm,
    F: FnMut(&mut String) -> io::Result<usize>,
    W: Write,
{
    match command {
        ShellCommand::Blank | ShellCommand::Quit => {}
        ShellCommand::Field(field, value) => {
            let form = library.form_mut();
            match field {
                FormField::Title => form.title = value,
                FormField::Author => form.author = value,
                FormField::Year => form.year = value,
            }
        }
        ShellCommand::Form => {
            let form = library.form();
            writeln!(out, "Title:  {}", form.title)?;
            writeln!(out, "Author: {}", form.author)?;
            writeln!(out, "Year:   {}", form.year)?;
        }
        ShellCommand::Add => {
            for field in [FormField::Title, FormField::Author, FormField::Year] {
                let label = match field {
                    FormField::Title => "Title: ",
                    FormField::Author => "Author: ",
                    FormField::Year => "Year: ",
                };
                write!(out, "{label}")?;
                out.flush()?;

                let mut value = String::new();
                if read_line(&mut value)? == 0 {
                    writeln!(out)?;
                    return Ok(());
                }
                let value = value.trim_end_matches(['\r', '\n']).to_string();
                execute(library, ShellCommand::Field(field, value), read_line, out)?;
            }
            library.submit()?;
        }
        ShellCommand::Intent(intent) => {
            library.dispatch(intent)?;
        }
        ShellCommand::List => library.redraw()?,
        ShellCommand::Help => writeln!(out, "{HELP}")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, Cursor};

    use super::*;
    use crate::app::AssumeYes;
    use crate::book::BookStatus;
    use crate::notify::Notifier;
    use crate::storage::{MemorySlots, SlotArchive};
    use crate::view::TextRenderer;

    type ShellLibrary = Library<SlotArchive<MemorySlots>, TextRenderer<Vec<u8>>, AssumeYes>;

    fn library() -> ShellLibrary {
        Library::open(
            SlotArchive::new(MemorySlots::new()),
            TextRenderer::new(Vec::new()),
            AssumeYes,
            Notifier::default(),
        )
        .unwrap()
    }

    fn run_script(library: &mut ShellLibrary, script: &str) -> String {
        let mut input = Cursor::new(script.to_string());
        let mut out = Vec::new();
        run(library, |buf| input.read_line(buf), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_blank_and_quit() {
        assert_eq!(parse_line("   \n"), Ok(ShellCommand::Blank));
        assert_eq!(parse_line("quit"), Ok(ShellCommand::Quit));
        assert_eq!(parse_line("EXIT"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn test_parse_field_keeps_inner_spaces() {
        assert_eq!(
            parse_line("author  Frank Herbert \n"),
            Ok(ShellCommand::Field(
                FormField::Author,
                "Frank Herbert".to_string()
            ))
        );
        assert_eq!(
            parse_line("year"),
            Ok(ShellCommand::Field(FormField::Year, String::new()))
        );
    }

    #[test]
    fn test_parse_intents() {
        assert_eq!(parse_line("submit"), Ok(ShellCommand::Intent(Intent::Submit)));
        assert_eq!(parse_line("rent 12"), Ok(ShellCommand::Intent(Intent::Rent(12))));
        assert_eq!(
            parse_line("return 12"),
            Ok(ShellCommand::Intent(Intent::Return(12)))
        );
        assert_eq!(
            parse_line("remove 12"),
            Ok(ShellCommand::Intent(Intent::Remove(12)))
        );
    }

    #[test]
    fn test_parse_status_commands_follow_row_actions() {
        let rent = RowAction::for_status(BookStatus::Available);
        let ret = RowAction::for_status(BookStatus::Rented);

        assert_eq!(
            parse_line(&format!("{} 3", rent.label())),
            Ok(ShellCommand::Intent(rent.intent(3)))
        );
        assert_eq!(
            parse_line(&format!("{} 3", ret.label())),
            Ok(ShellCommand::Intent(ret.intent(3)))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("rent").unwrap_err().contains("required"));
        assert!(parse_line("rent dune").unwrap_err().contains("not a book id"));
        assert!(parse_line("borrow 1").unwrap_err().contains("Unknown command"));
    }

    #[test]
    fn test_shell_renders_on_start_and_quits() {
        let mut library = library();
        let out = run_script(&mut library, "quit\n");

        assert_eq!(out, PROMPT);
        let rendered = String::from_utf8(library.renderer().output().clone()).unwrap();
        assert_eq!(rendered, "No books registered yet.\n");
    }

    #[test]
    fn test_shell_form_submit() {
        let mut library = library();
        run_script(
            &mut library,
            "title Dune\nauthor Frank Herbert\nyear 1965\nsubmit\n",
        );

        let books = library.shelf().all();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].author, "Frank Herbert");
        assert_eq!(library.form().title, "");
    }

    #[test]
    fn test_shell_add_prompts_each_field() {
        let mut library = library();
        let out = run_script(&mut library, "add\nDune\nHerbert\n1965\nlist\n");

        assert!(out.contains("Title: Author: Year: "));
        assert_eq!(library.shelf().len(), 1);
        let rendered = String::from_utf8(library.renderer().output().clone()).unwrap();
        assert!(rendered.contains("[success] Book added successfully!"));
    }

    #[test]
    fn test_shell_rent_return_remove() {
        let mut library = library();
        *library.form_mut() = crate::app::BookForm::new("Dune", "Herbert", "1965");
        library.submit().unwrap();
        let id = library.shelf().all()[0].id;

        run_script(&mut library, &format!("rent {id}\n"));
        assert_eq!(library.shelf().find(id).unwrap().status, BookStatus::Rented);

        run_script(&mut library, &format!("return {id}\nremove {id}\n"));
        assert!(library.shelf().is_empty());
    }

    #[test]
    fn test_shell_reports_bad_input() {
        let mut library = library();
        let out = run_script(&mut library, "frobnicate\nhelp\n");

        assert!(out.contains("Unknown command 'frobnicate'"));
        assert!(out.contains("Commands:"));
    }

    #[test]
    fn test_shell_form_command() {
        let mut library = library();
        let out = run_script(&mut library, "title Emma\nform\n");

        assert!(out.contains("Title:  Emma"));
        assert!(out.contains("Author: \n"));
    }
}
