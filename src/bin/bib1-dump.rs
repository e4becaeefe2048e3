use std::fs;
use std::process::ExitCode;

use clap::Parser;

use lectern::PackIndex;
use lectern::bib1::MAGIC;

/// Dump BIB1 pack files for debugging
#[derive(Parser, Debug)]
#[command(name = "bib1-dump")]
#[command(
    about = "Dumps BIB1 pack indexes. Prints the header summary, optional per-book and per-chapter tables, and resolves individual verses against the text blob"
)]
struct Args {
    /// Index file (e.g. BIBLE.IDX)
    index: String,

    /// Companion text blob (e.g. BIBLE.BIN); required for --verse
    #[arg(short, long)]
    bin: Option<String>,

    /// Print the per-book table
    #[arg(long)]
    books: bool,

    /// Print the per-chapter table (can be large)
    #[arg(long)]
    chapters: bool,

    /// Resolve one verse: BOOK CHAPTER VERSE, all 0-based
    #[arg(short, long, num_args = 3, value_names = ["BOOK", "CHAPTER", "VERSE"])]
    verse: Option<Vec<usize>>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let data = fs::read(&args.index).map_err(|e| e.to_string())?;

    if data.len() < 4 || data[0..4] != MAGIC {
        eprintln!("Not a BIB1 index. First bytes:");
        for byte in data.iter().take(16) {
            eprint!("{byte:02X} ");
        }
        eprintln!();
        return Err("unknown file format".to_string());
    }

    let index = PackIndex::parse(&data).map_err(|e| e.to_string())?;

    println!("File: {}", args.index);
    println!("Version: {}", index.version());
    println!("Books: {}", index.book_count());
    println!("Chapters: {}", index.chapter_count());
    println!("Verses: {}", index.verse_count());
    println!("Text size: {} bytes", index.text_size());
    println!("Index size: {} bytes", data.len());

    if args.books {
        println!();
        println!("{:>4}  {:>13}  {:>8}", "book", "first_chapter", "chapters");
        for b in 0..index.book_count() {
            println!(
                "{:>4}  {:>13}  {:>8}",
                b,
                index.book_first_chapter(b).unwrap_or(0),
                index.book_chapter_count(b).unwrap_or(0)
            );
        }
    }

    if args.chapters {
        println!();
        println!("{:>7}  {:>11}  {:>6}", "chapter", "first_verse", "verses");
        for c in 0..index.chapter_count() {
            println!(
                "{:>7}  {:>11}  {:>6}",
                c,
                index.chapter_first_verse(c).unwrap_or(0),
                index.chapter_verse_count(c).unwrap_or(0)
            );
        }
    }

    if let Some(coords) = &args.verse {
        let (book, chapter, verse) = (coords[0], coords[1], coords[2]);
        let bin = args
            .bin
            .as_deref()
            .ok_or("resolving a verse requires --bin")?;
        let blob = fs::read(bin).map_err(|e| e.to_string())?;
        let text = index
            .verse_text(&blob, book, chapter, verse)
            .map_err(|e| e.to_string())?;
        println!();
        println!("({book},{chapter},{verse}): {text}");
    }

    Ok(())
}
