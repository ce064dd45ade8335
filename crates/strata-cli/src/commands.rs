use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use strata_store::{digest_of, FsObjectStore, Layout, ObjectKind, ObjectStore};
use strata_types::ObjectId;
use strata_worktree::TreeBuilder;

use crate::cli::*;
use crate::render;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(args),
        Command::HashObject(args) => cmd_hash_object(args, format),
        Command::CatFile(args) => cmd_cat_file(args),
        Command::LsTree(args) => cmd_ls_tree(args, format),
        Command::WriteTree(_) => cmd_write_tree(format),
    }
}

/// Store over the repository rooted in the current directory.
fn open_store() -> FsObjectStore {
    FsObjectStore::new(Layout::new("."))
}

fn print_digest(id: ObjectId, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{id}"),
        OutputFormat::Json => println!("{}", serde_json::json!({ "digest": id.to_hex() })),
    }
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let root = args.path.unwrap_or_else(|| PathBuf::from("."));
    let layout = Layout::new(&root);
    layout
        .bootstrap()
        .with_context(|| format!("failed to initialize repository in {}", root.display()))?;
    println!(
        "{} Initialized empty Strata repository in {}",
        "✓".green().bold(),
        layout.meta_dir().display().to_string().bold()
    );
    Ok(())
}

fn cmd_hash_object(args: HashObjectArgs, format: OutputFormat) -> anyhow::Result<()> {
    let content = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let id = if args.write {
        open_store().write_object(ObjectKind::Blob, &content)?
    } else {
        digest_of(ObjectKind::Blob, &content)
    };
    print_digest(id, format);
    Ok(())
}

fn cmd_cat_file(args: CatFileArgs) -> anyhow::Result<()> {
    if !args.pretty {
        bail!("cat-file requires -p");
    }
    let id = ObjectId::from_hex(&args.object)?;
    let object = open_store().read(&id)?;
    let mut stdout = std::io::stdout();
    stdout.write_all(&object.data)?;
    stdout.flush()?;
    Ok(())
}

fn cmd_ls_tree(args: LsTreeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = ObjectId::from_hex(&args.object)?;
    let tree = open_store().read_tree(&id)?;
    match format {
        OutputFormat::Text => {
            let listing = render::render_tree(&tree.entries, args.name_only);
            if !listing.is_empty() {
                println!("{listing}");
            }
        }
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = render::sort_for_display(&tree.entries)
                .into_iter()
                .map(|e| {
                    if args.name_only {
                        serde_json::json!(e.name)
                    } else {
                        serde_json::json!({
                            "mode": e.mode.display_str(),
                            "type": e.mode.object_kind().as_str(),
                            "digest": e.object_id.to_hex(),
                            "name": e.name,
                        })
                    }
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

fn cmd_write_tree(format: OutputFormat) -> anyhow::Result<()> {
    let store = Arc::new(open_store());
    let exclude = store.layout().dir_name().to_string();
    let builder = TreeBuilder::with_exclude(store, exclude);
    let id = builder.snapshot(std::path::Path::new("."))?;
    print_digest(id, format);
    Ok(())
}
