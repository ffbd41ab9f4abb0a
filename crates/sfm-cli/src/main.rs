use anyhow::Context as _;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sfm_core::{
    BackupMode, ExpeditionFilter, Outcome, PathResolver, SaveConfig, SaveError, SaveManager,
};
use std::path::PathBuf;

mod prompt;

use prompt::TerminalPrompter;

#[derive(Parser, Debug)]
#[command(
    name = "sfm-cli",
    about = "Back up, restore and delete copies of a game's save folder",
    version
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(ClapArgs, Debug)]
struct GlobalArgs {
    /// Save folder to use for this run (not persisted; see set-path)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Back up whole account folders or individual EXPEDITION_* files
    #[arg(long, global = true, value_enum, default_value_t = ModeArg::Directory)]
    mode: ModeArg,
    /// Save file extension used in files mode
    #[arg(long, global = true, default_value = "sav")]
    ext: String,
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Directory,
    Files,
}

impl From<ModeArg> for BackupMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Directory => BackupMode::Directory,
            ModeArg::Files => BackupMode::Files,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Persist the save folder location
    SetPath(SetPathArgs),
    /// Show the resolved config file, save folder and backup store
    Paths,
    /// List live saves and backups
    List(ListArgs),
    /// List expedition tags found in live save names
    Tags(TagsArgs),
    /// Back up a live entry
    Save(SaveArgs),
    /// Restore a backup over the live save (asks first)
    Load(ConfirmArgs),
    /// Delete a backup (asks first)
    Delete(ConfirmArgs),
    /// Open the save folder in the file manager
    Open,
}

#[derive(ClapArgs, Debug)]
struct SetPathArgs {
    /// Existing directory holding the game's saves
    path: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct ListArgs {
    /// Only show entries for this expedition tag ("All" shows everything)
    #[arg(long)]
    filter: Option<String>,
    /// Emit JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(ClapArgs, Debug)]
struct TagsArgs {
    /// Emit JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(ClapArgs, Debug)]
struct SaveArgs {
    /// Live entry to back up (account folder or save file); directory mode
    /// defaults to the first account folder
    entry: Option<String>,
    /// Backup name (directory mode) or prefix (files mode); prompts if absent
    #[arg(long)]
    name: Option<String>,
}

#[derive(ClapArgs, Debug)]
struct ConfirmArgs {
    /// Backup entry name as shown by `list`
    backup: Option<String>,
    /// Answer yes to the confirmation
    #[arg(short, long, default_value_t = false)]
    yes: bool,
}

#[derive(Serialize)]
struct ListingJson<'a> {
    save_root: String,
    mode: String,
    live: &'a [String],
    backups: &'a [String],
}

fn main() {
    let cli = Cli::parse();
    let _logger = init_logging(cli.global.verbose);
    let res = match cli.cmd.unwrap_or(Cmd::List(ListArgs {
        filter: None,
        json: false,
    })) {
        Cmd::SetPath(a) => cmd_set_path(a),
        Cmd::Paths => cmd_paths(&cli.global),
        Cmd::List(a) => cmd_list(&cli.global, a),
        Cmd::Tags(a) => cmd_tags(&cli.global, a),
        Cmd::Save(a) => cmd_save(&cli.global, a),
        Cmd::Load(a) => cmd_load(&cli.global, a),
        Cmd::Delete(a) => cmd_delete(&cli.global, a),
        Cmd::Open => cmd_open(&cli.global),
    };
    if let Err(e) = res {
        eprintln!("error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn init_logging(verbose: u8) -> Option<flexi_logger::LoggerHandle> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    match flexi_logger::Logger::try_with_env_or_str(level).and_then(|l| l.start()) {
        Ok(h) => Some(h),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    }
}

fn exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<SaveError>() {
        Some(SaveError::InvalidPath(_) | SaveError::NoDefaultLocation) => 2,
        Some(SaveError::NoSelection(_) | SaveError::EmptyName | SaveError::InvalidName(_)) => 3,
        Some(SaveError::NotFound(_) | SaveError::AccountFolderNotFound(_)) => 4,
        Some(SaveError::Io { .. }) => 5,
        None => 1,
    }
}

fn resolver() -> anyhow::Result<PathResolver> {
    Ok(PathResolver::from_env()?)
}

fn manager(g: &GlobalArgs) -> anyhow::Result<SaveManager> {
    let root = match &g.root {
        Some(r) => r.clone(),
        None => resolver()?.resolve()?,
    };
    let cfg = SaveConfig::new(root, g.mode.into()).with_extension(&g.ext);
    Ok(SaveManager::new(cfg))
}

fn cmd_set_path(args: SetPathArgs) -> anyhow::Result<()> {
    let r = resolver()?;
    let saved = r.set_path(&args.path)?;
    println!("Save folder set to {}", saved.display());
    Ok(())
}

fn cmd_paths(g: &GlobalArgs) -> anyhow::Result<()> {
    let r = resolver()?;
    let mgr = manager(g)?;
    let cfg = mgr.config();
    println!("config file:    {}", r.config_file().display());
    println!(
        "save folder:    {}{}",
        cfg.save_root.display(),
        if cfg.root_exists() { "" } else { " (missing)" }
    );
    println!("backup store:   {}", cfg.store_dir().display());
    println!("mode:           {}", cfg.mode);
    if cfg.root_exists() {
        match mgr.account_folder()? {
            Some(p) => println!("account folder: {}", p.display()),
            None => println!("account folder: none"),
        }
    }
    Ok(())
}

fn cmd_list(g: &GlobalArgs, args: ListArgs) -> anyhow::Result<()> {
    let mgr = manager(g)?;
    let filter = args
        .filter
        .as_deref()
        .map(ExpeditionFilter::parse)
        .unwrap_or_default();
    let snap = mgr.refresh(&filter)?;
    if args.json {
        let out = ListingJson {
            save_root: mgr.config().save_root.display().to_string(),
            mode: mgr.config().mode.to_string(),
            live: &snap.live,
            backups: &snap.backups,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    println!("Live saves ({}):", mgr.config().save_root.display());
    for n in &snap.live {
        println!("  {}", n);
    }
    println!("Backups ({}):", mgr.config().store_dir().display());
    for n in &snap.backups {
        println!("  {}", n);
    }
    Ok(())
}

fn cmd_tags(g: &GlobalArgs, args: TagsArgs) -> anyhow::Result<()> {
    let mgr = manager(g)?;
    let tags = sfm_core::list_expedition_tags(mgr.config())?;
    if args.json {
        println!("{}", serde_json::to_string(&tags)?);
    } else {
        for t in tags {
            println!("{}", t);
        }
    }
    Ok(())
}

fn cmd_save(g: &GlobalArgs, args: SaveArgs) -> anyhow::Result<()> {
    let mgr = manager(g)?;
    let mut p = TerminalPrompter::new(false, args.name);
    match mgr.save_backup(args.entry.as_deref(), &mut p)? {
        Outcome::Completed(name) => println!("Backup '{}' saved.", name),
        Outcome::Cancelled => println!("Cancelled."),
    }
    Ok(())
}

fn cmd_load(g: &GlobalArgs, args: ConfirmArgs) -> anyhow::Result<()> {
    let mgr = manager(g)?;
    let mut p = TerminalPrompter::new(args.yes, None);
    match mgr.load_backup(args.backup.as_deref(), &mut p)? {
        Outcome::Completed(live) => {
            println!("Backup loaded successfully into {}", live.display())
        }
        Outcome::Cancelled => println!("Cancelled."),
    }
    Ok(())
}

fn cmd_delete(g: &GlobalArgs, args: ConfirmArgs) -> anyhow::Result<()> {
    let mgr = manager(g)?;
    let mut p = TerminalPrompter::new(args.yes, None);
    let name = args.backup.clone().unwrap_or_default();
    match mgr.delete_backup(args.backup.as_deref(), &mut p)? {
        Outcome::Completed(()) => println!("Backup '{}' deleted successfully.", name.trim()),
        Outcome::Cancelled => println!("Cancelled."),
    }
    Ok(())
}

fn cmd_open(g: &GlobalArgs) -> anyhow::Result<()> {
    let mgr = manager(g)?;
    let root = mgr.existing_root()?;
    opener::open(root).with_context(|| format!("opening {}", root.display()))?;
    Ok(())
}
