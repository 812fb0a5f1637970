use notegraph_core::cache::DiskCache;
use notegraph_core::config::loader::{ConfigLoader, default_config_path};
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            println!("OK   ngraph doctor");
            println!(
                "path: {}",
                config.map_or_else(
                    || default_config_path().display().to_string(),
                    |p| p.display().to_string()
                )
            );
            println!("profile: {}", rc.active_profile);
            println!(
                "vault_root: {}{}",
                rc.vault_root.display(),
                if rc.vault_root.is_dir() { "" } else { " (missing)" }
            );
            println!("cache_dir: {}", rc.cache_dir.display());

            let cache_file = rc
                .vault_root
                .canonicalize()
                .map(|root| DiskCache::new(&rc.cache_dir).cache_path(&root));
            match cache_file {
                Ok(file) if file.exists() => println!("cache_file: {}", file.display()),
                _ => println!("cache_file: (none yet, run 'ngraph reindex')"),
            }

            if !rc.excluded_folders.is_empty() {
                let excluded: Vec<String> =
                    rc.excluded_folders.iter().map(|p| p.display().to_string()).collect();
                println!("excluded_folders: {}", excluded.join(", "));
            }
            println!("logging.level: {}", rc.logging.level);
            if let Some(file) = &rc.logging.file {
                println!("logging.file: {}", file.display());
            }
        }
        Err(e) => {
            println!("FAIL ngraph doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}
