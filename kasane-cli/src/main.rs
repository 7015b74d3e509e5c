//! Interactive composer driver.
//!
//! Reads commands from stdin, one per line, and prints the preedit around
//! the cursor as `left[focused]right` after each command. Cursor and mode
//! commands are listed in the long help; any other line is inserted as keys.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use kasane_engine::{Table, TransliterationType};
use kasane_im::{Composer, Request, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kasane", version, about = "Interactive composer driver")]
#[command(long_about = "Interactive composer driver.

Commands:
  <    cursor left          <<   cursor to beginning
  >    cursor right         >>   cursor to end
  <>   toggle input mode
  >a<  half ascii   >A<  full ascii   >k<  half katakana
  >K<  full katakana   >h<  hiragana
  !    delete one character leftward
  !!   erase the composition
Anything else is inserted as keys. EOF exits.")]
struct Args {
    /// Preedit conversion table file (TSV). The embedded romaji-to-hiragana
    /// table is used when omitted.
    #[arg(long)]
    table: Option<PathBuf>,

    /// Print the full query surface as one JSON object per command instead
    /// of the bare preedit.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let table = match &args.table {
        Some(path) => Arc::new(
            Table::load_from_file(path)
                .with_context(|| format!("loading table {}", path.display()))?,
        ),
        None => Arc::clone(Table::shared_default()),
    };
    let settings = Settings::load().unwrap_or_default();
    let mut composer = Composer::new(table, Request::default(), settings);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let command = line?;
        match command.as_str() {
            "<" => composer.move_cursor_left(),
            "<<" => composer.move_cursor_to_beginning(),
            ">" => composer.move_cursor_right(),
            ">>" => composer.move_cursor_to_end(),
            "<>" => composer.toggle_input_mode(),
            ">a<" => composer.set_input_mode(TransliterationType::HalfAscii),
            ">A<" => composer.set_input_mode(TransliterationType::FullAscii),
            ">k<" => composer.set_input_mode(TransliterationType::HalfKatakana),
            ">K<" => composer.set_input_mode(TransliterationType::FullKatakana),
            ">h<" | ">H<" => composer.set_input_mode(TransliterationType::Hiragana),
            "!" => composer.backspace(),
            "!!" => composer.edit_erase(),
            _ => {
                composer.insert_character(&command);
            }
        }
        if args.json {
            print_json(&composer);
        } else {
            let (left, focused, right) = composer.get_preedit();
            println!("{left}[{focused}]{right}");
        }
    }
    Ok(())
}

fn print_json(composer: &Composer) {
    let data = composer.create_composer_data();
    let (base, expanded) = data.get_queries_for_prediction();
    let value = serde_json::json!({
        "preedit": data.get_string_for_preedit(),
        "cursor": data.get_cursor(),
        "conversion_query": data.get_query_for_conversion(),
        "prediction_query": data.get_query_for_prediction(),
        "prediction_base": base,
        "prediction_expanded": expanded.iter().collect::<Vec<_>>(),
        "raw": data.get_raw_string(),
        "transliterations": data.get_transliterations(),
    });
    println!("{value}");
}
