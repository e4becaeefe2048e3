//! lectern - corpus packing, search, and inspection

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use lectern::corpus::sanitize::{find_control_chars, sanitize_value};
use lectern::corpus::{load_value, read_document};
use lectern::{Corpus, Reference, load_path, pack, search};

#[derive(Parser)]
#[command(name = "lectern")]
#[command(version, about = "Verse corpus indexing, search, and packing", long_about = None)]
#[command(after_help = "EXAMPLES:
    lectern info corpus.json               Validate and summarize a corpus
    lectern pack corpus.json --out-dir cd  Write BIBLE.BIN + BIBLE.IDX
    lectern search corpus.json \"haja luz\"  Find verses by phrase
    lectern sanitize dirty.json clean.json Repair control characters")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a corpus document and print a summary
    Info {
        /// Corpus document (JSON)
        corpus: String,
    },
    /// Pack a corpus into a BIB1 index and text blob
    Pack {
        /// Corpus document (JSON)
        corpus: String,

        /// Output directory (created if missing)
        #[arg(long, default_value = ".")]
        out_dir: String,

        /// Text blob filename
        #[arg(long, default_value = "BIBLE.BIN")]
        out_bin: String,

        /// Index filename
        #[arg(long, default_value = "BIBLE.IDX")]
        out_idx: String,

        /// Suppress output messages
        #[arg(short, long)]
        quiet: bool,
    },
    /// Search a corpus for a literal phrase (case-insensitive)
    Search {
        /// Corpus document (JSON)
        corpus: String,

        /// Phrase to look for
        query: String,

        /// Maximum hits to print
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Repair known control characters in a corpus document
    Sanitize {
        /// Input document (JSON)
        input: String,

        /// Repaired document to write (minified JSON)
        output: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Info { corpus } => run_info(&corpus),
        Command::Pack {
            corpus,
            out_dir,
            out_bin,
            out_idx,
            quiet,
        } => run_pack(&corpus, &out_dir, &out_bin, &out_idx, quiet),
        Command::Search {
            corpus,
            query,
            limit,
        } => run_search(&corpus, &query, limit),
        Command::Sanitize { input, output } => run_sanitize(&input, &output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load(path: &str) -> Result<Corpus, String> {
    load_path(path).map_err(|e| e.to_string())
}

fn run_info(path: &str) -> Result<(), String> {
    let corpus = load(path)?;

    println!("File: {path}");
    println!("Books: {}", corpus.book_count());
    println!("Chapters: {}", corpus.chapter_count());
    println!("Verses: {}", corpus.verse_count());
    if let Some(first) = corpus.books.first() {
        println!(
            "First book: {} ({} chapters)",
            first.name,
            first.chapter_count()
        );
    }
    if let Some(last) = corpus.books.last() {
        println!(
            "Last book: {} ({} chapters)",
            last.name,
            last.chapter_count()
        );
    }

    Ok(())
}

fn run_pack(
    path: &str,
    out_dir: &str,
    bin_name: &str,
    idx_name: &str,
    quiet: bool,
) -> Result<(), String> {
    let corpus = load(path)?;
    let packed = pack(&corpus).map_err(|e| e.to_string())?;
    packed
        .write_to_dir(out_dir, bin_name, idx_name)
        .map_err(|e| e.to_string())?;

    if !quiet {
        let stats = packed.stats();
        let dir = std::path::Path::new(out_dir);
        println!(
            "Wrote: {} ({} bytes)",
            dir.join(bin_name).display(),
            stats.text_bytes
        );
        println!(
            "Wrote: {} ({} bytes)",
            dir.join(idx_name).display(),
            stats.index_bytes
        );
        println!(
            "Books: {}  Chapters: {}  Verses: {}",
            stats.books, stats.chapters, stats.verses
        );
        println!("Longest verse record: {} bytes", stats.max_verse_bytes);
    }

    Ok(())
}

fn run_search(path: &str, query: &str, limit: usize) -> Result<(), String> {
    let corpus = load(path)?;
    let hits = search(&corpus, query);

    for hit in hits.iter().take(limit) {
        let reference = Reference {
            book: hit.book,
            chapter: hit.chapter,
            verse: hit.verse,
        };
        let text = corpus.verse(hit.book, hit.chapter, hit.verse).unwrap_or("");
        println!("{}  {}", corpus.format_reference(reference), text);
    }

    if hits.len() > limit {
        println!("... and {} more", hits.len() - limit);
    }
    println!("{} hit(s)", hits.len());

    Ok(())
}

fn run_sanitize(input: &str, output: &str) -> Result<(), String> {
    let mut document = read_document(input).map_err(|e| e.to_string())?;
    let stats = sanitize_value(&mut document);

    let leftovers = find_control_chars(&document);
    if !leftovers.is_empty() {
        eprintln!("Control characters remain after repair:");
        for hit in leftovers.iter().take(50) {
            eprintln!("  {hit}");
        }
        if leftovers.len() > 50 {
            eprintln!("  ... and {} more", leftovers.len() - 50);
        }
        return Err(format!(
            "{} control characters remain; extend the repair table",
            leftovers.len()
        ));
    }

    // The repaired document must still be a loadable corpus
    load_value(&document).map_err(|e| e.to_string())?;

    let json = serde_json::to_string(&document).map_err(|e| e.to_string())?;
    std::fs::write(output, json).map_err(|e| e.to_string())?;

    println!("Replacements:");
    println!("  newline -> space : {}", stats.newline_to_space);
    println!("  U+0096  -> '-'   : {}", stats.dash_en);
    println!("  U+0097  -> ' - ' : {}", stats.dash_em);
    println!("  E,U+009E -> 'Ê'  : {}", stats.circumflex_upper);
    println!("  e,U+009E -> 'ê'  : {}", stats.circumflex_lower);
    println!("  i,U+0085 -> 'í'  : {}", stats.acute_i);
    println!("Strings changed: {}", stats.strings_changed);
    println!("Wrote: {output}");

    Ok(())
}
