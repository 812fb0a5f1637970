//! Reindex command implementation.

use std::path::Path;

use notegraph_core::cache::DiskCache;

use super::{load_config, with_engine};
use crate::ReindexArgs;

/// Run the reindex command.
pub fn run(config: Option<&Path>, profile: Option<&str>, args: ReindexArgs) {
    let rc = load_config(config, profile);
    let cache = DiskCache::new(&rc.cache_dir);

    println!("Indexing vault: {}", rc.vault_root.display());

    let cache_path = with_engine(&rc, !args.no_cache, |engine| {
        // A forced rebuild skips the cache on open; write the fresh entries here.
        if args.no_cache
            && let Err(e) = cache.save(engine.root(), engine.cache_entries())
        {
            eprintln!("Error writing cache: {}", e);
            std::process::exit(1);
        }

        if args.verbose {
            for note in engine.notes() {
                println!(
                    "  {} ({} out, {} in)",
                    note.path,
                    note.outgoing_links.len(),
                    note.incoming_links.len()
                );
            }
        }

        let stats = engine.stats();
        let links = engine.link_stats();
        println!();
        println!("Indexing complete:");
        println!("  Files found:    {}", stats.files_found);
        println!("  From cache:     {}", stats.cache_hits);
        println!("  Parsed:         {}", stats.parsed);
        if stats.read_failures > 0 {
            println!("  Unreadable:     {}", stats.read_failures);
        }
        println!("  Links:          {}", links.total_links);
        println!("  Broken links:   {}", links.unresolved);
        println!("  Duration:       {}ms", stats.duration_ms);

        cache.cache_path(engine.root())
    });

    println!();
    println!("Cache stored at: {}", cache_path.display());
}
