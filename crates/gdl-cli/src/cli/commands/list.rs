//! `gdl list` – build a manifest from a Drive folder tree.

use anyhow::Result;
use gdl_core::config::GdlConfig;
use gdl_core::lister::{self, HttpDriveApi, SkipRules};
use std::path::PathBuf;

#[derive(Debug)]
pub struct ListArgs {
    pub api_key: String,
    pub folder_id: String,
    pub root: Option<String>,
    pub output: Option<PathBuf>,
}

pub fn run_list(cfg: &GdlConfig, args: ListArgs) -> Result<()> {
    let list_cfg = cfg.list_or_default();
    let root = args.root.unwrap_or_else(|| list_cfg.root_path.clone());
    let output = args.output.unwrap_or_else(|| list_cfg.output.clone());
    let rules = SkipRules::from(&list_cfg);

    let api = HttpDriveApi::new(args.api_key).with_connect_timeout(cfg.connect_timeout());
    let entries = lister::list_tree(&api, &args.folder_id, &root, &rules)?;
    lister::write_manifest(&output, &entries)?;
    println!("Wrote {} entries to {}", entries.len(), output.display());
    Ok(())
}
