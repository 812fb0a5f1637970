//! Vault file discovery and the collaborator contract the engine reads through.
//!
//! This module provides the recursive markdown walker, per-file stats keyed by
//! vault-relative path, and [`FsVault`], the filesystem implementation of
//! [`VaultSource`].

pub mod source;
pub mod walker;

pub use source::{FileChange, FileStat, FsVault, VaultSource};
pub use walker::{VaultError, VaultWalker, WalkedFile, is_note_path};
