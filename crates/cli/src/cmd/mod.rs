pub mod doctor;
pub mod layout;
pub mod links;
pub mod orphans;
pub mod output;
pub mod reindex;
pub mod resolve;
pub mod tasks;

use std::path::Path;

use notegraph_core::cache::DiskCache;
use notegraph_core::config::loader::ConfigLoader;
use notegraph_core::config::types::ResolvedConfig;
use notegraph_core::vault::FsVault;
use notegraph_core::GraphEngine;

/// Load configuration or exit with status 1.
pub fn load_config(config: Option<&Path>, profile: Option<&str>) -> ResolvedConfig {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    }
}

/// Open the configured vault, run `f` on the engine, then flush pending cache writes.
///
/// With `use_cache` false the existing cache is neither read nor written.
pub fn with_engine<T>(
    rc: &ResolvedConfig,
    use_cache: bool,
    f: impl FnOnce(&GraphEngine<FsVault>) -> T,
) -> T {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            std::process::exit(1);
        }
    };

    runtime.block_on(async {
        let source = match FsVault::with_exclusions(&rc.vault_root, rc.excluded_folders.clone()) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("Error opening vault: {}", e);
                std::process::exit(1);
            }
        };
        let cache = use_cache.then(|| DiskCache::new(&rc.cache_dir));

        let mut engine = match GraphEngine::open(source, cache).await {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("Error reading vault: {}", e);
                std::process::exit(1);
            }
        };

        let result = f(&engine);
        engine.flush().await;
        result
    })
}
