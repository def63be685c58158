use std::fs::File;
use std::path::PathBuf;

use anyhow::*;
use camino::Utf8PathBuf;
use log::*;
use memmap2::Mmap;
use structopt::*;

use piz::read::FileMetadata;
use piz::ZipArchive;
use zip_chapters::*;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "chapters",
    about = "Lists the chapters of a .zip file in reading order"
)]
struct Opt {
    /// Pass multiple times for additional verbosity (info, debug, trace)
    #[structopt(short, long, parse(from_occurrences))]
    verbosity: usize,

    /// Where to remember the last chapter opened from each archive
    #[structopt(short, long, default_value = ".chapters")]
    state: Utf8PathBuf,

    /// The origin to scope saved state and object URLs to
    #[structopt(long, default_value = "null")]
    origin: String,

    /// Turn one chapter's pages into object URLs (and remember it).
    /// Pass "last" to reopen the chapter opened last time.
    #[structopt(short, long)]
    open: Option<String>,

    #[structopt(name("ZIP file"))]
    zip_path: PathBuf,
}

fn main() -> Result<()> {
    let args = Opt::from_args();

    let mut errlog = stderrlog::new();
    errlog.verbosity(args.verbosity + 1);
    errlog.init()?;

    info!("Memory mapping {:#?}", &args.zip_path);
    let zip_file = File::open(&args.zip_path).context("Couldn't open zip file")?;
    let mapping = unsafe { Mmap::map(&zip_file).context("Couldn't mmap zip file")? };

    let archive = ZipArchive::with_prepended_data(&mapping)
        .context("Couldn't load archive")?
        .0;
    let chapters = match decompress_and_sort(&archive)? {
        Some(c) => c,
        None => {
            warn!("{} is empty", args.zip_path.display());
            return Ok(());
        }
    };

    match &args.open {
        None => print_chapters(&chapters),
        Some(wanted) => {
            let mut store = FileStore::open(&args.state, &args.origin)?;
            open_chapter(&archive, &chapters, wanted, &args, &mut store)
        }
    }
}

fn print_chapters(chapters: &[Chapter<FileMetadata>]) -> Result<()> {
    for chapter in chapters {
        let number = chapter.number().map(|n| n.value()).unwrap_or_default();
        println!("{} (#{}, {} pages)", chapter.label, number, chapter.len());
        for entry in &chapter.entries {
            println!("    {}", entry.path);
        }
    }
    Ok(())
}

fn open_chapter(
    archive: &ZipArchive,
    chapters: &[Chapter<FileMetadata>],
    wanted: &str,
    args: &Opt,
    store: &mut dyn KeyValueStore,
) -> Result<()> {
    let key = args.zip_path.to_string_lossy();
    let label = if wanted == "last" {
        store
            .get(&key)?
            .with_context(|| format!("No chapter of {} opened yet", key))?
    } else {
        wanted.to_owned()
    };

    let chapter = chapters
        .iter()
        .find(|c| c.label == label)
        .with_context(|| format!("No chapter {} in {}", label, key))?;

    let registry = BlobRegistry::new(args.origin.as_str());
    for entry in &chapter.entries {
        let url = create_url(archive, entry, &registry)?;
        println!("{}\t{}", url, entry.path);
    }
    info!(
        "Registered {} object URLs for {}",
        registry.len(),
        registry.origin()
    );

    store.save(&key, chapter.label)?;
    Ok(())
}
