use std::path::Path;

use notegraph_core::index::{Anchor, resolve_anchor};

use super::{load_config, with_engine};
use crate::ResolveArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: ResolveArgs) {
    let rc = load_config(config, profile);

    let found = with_engine(&rc, true, |engine| {
        let Some(resolved) = resolve_anchor(&args.reference, engine.notes()) else {
            match engine.resolve(&args.reference) {
                Some(note) => eprintln!("'{}' names a heading or block {} does not have", args.reference, note.path),
                None => eprintln!("No note matches '{}'", args.reference),
            }
            return false;
        };

        println!("{}", resolved.note.path);
        println!("title: {}", resolved.note.title);
        match resolved.anchor {
            Anchor::Note => {}
            Anchor::Heading(h) => println!("heading: {} (line {})", h.text, h.line),
            Anchor::Block(b) => println!("block: ^{} (line {})", b.id, b.line),
        }
        true
    });
    if !found {
        std::process::exit(1);
    }
}
