//! CLI probe for the journal core.
//!
//! # Responsibility
//! - Exercise the full parse → merge → persist → export pipeline from a
//!   terminal, without any course-page host.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Blocks are read from a text file, separated by blank lines, in the same
//! labeled format authors type into the course page.

use journal_core::db::open_db;
use journal_core::{storage_key, JournalService, NoteBlock, RenderedBlock, SqliteStateRepository};
use std::process::ExitCode;

const USAGE: &str = "usage: journal_cli <db-path> <page-url> <command>
commands:
  ingest <blocks-file>   parse authoring blocks and merge them in
  respond <section> <entry> <text>
                         record a response by render indices
  print [--take-action]  write the printable HTML document to stdout
  mail                   write the mail body to stdout
  show                   list sections and entries";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("journal_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let (db_path, page_url, command) = match args {
        [db_path, page_url, command, ..] => (db_path, page_url, command.as_str()),
        _ => return Err(USAGE.to_string()),
    };
    let rest = &args[3..];

    let conn = open_db(db_path).map_err(|err| format!("cannot open `{db_path}`: {err}"))?;
    let repo = SqliteStateRepository::new(&conn);
    let mut service =
        JournalService::open(repo, storage_key(page_url)).map_err(|err| err.to_string())?;

    match command {
        "ingest" => {
            let path = rest.first().ok_or("ingest needs a blocks file")?;
            let text = std::fs::read_to_string(path)
                .map_err(|err| format!("cannot read `{path}`: {err}"))?;
            let blocks: Vec<NoteBlock> = text
                .split("\n\n")
                .map(NoteBlock::from_text)
                .filter(|block| !block.lines.is_empty())
                .collect();

            let outcome = service
                .process_blocks(&blocks)
                .map_err(|err| err.to_string())?;
            for rendered in &outcome.rendered {
                match rendered {
                    RenderedBlock::Entry {
                        section_index,
                        entry_index,
                        prompt,
                        ..
                    } => println!("entry [{section_index}.{entry_index}] {prompt}"),
                    RenderedBlock::Buttons(config) => {
                        println!("buttons course_title={:?}", config.course_title)
                    }
                }
            }
            Ok(())
        }
        "respond" => match rest {
            [section, entry, text] => {
                let section = section.parse::<usize>().map_err(|e| e.to_string())?;
                let entry = entry.parse::<usize>().map_err(|e| e.to_string())?;
                service
                    .record_response(section, entry, text)
                    .map_err(|err| err.to_string())
            }
            _ => Err("respond needs <section> <entry> <text>".to_string()),
        },
        "print" => {
            let take_action_only = rest.first().is_some_and(|flag| flag == "--take-action");
            println!("{}", service.print_document(take_action_only));
            Ok(())
        }
        "mail" => {
            println!("{}", service.mail_body());
            Ok(())
        }
        "show" => {
            for (s, section) in service.store().sections.iter().enumerate() {
                println!("[{s}] {} (order {})", section.title, section.order);
                for (e, entry) in section.entries.iter().enumerate() {
                    let marker = if entry.is_take_action { "*" } else { " " };
                    println!("  [{s}.{e}]{marker} {} => {:?}", entry.prompt, entry.response);
                }
            }
            Ok(())
        }
        other => Err(format!("unknown command `{other}`\n{USAGE}")),
    }
}
