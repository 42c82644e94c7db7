mod camera;
mod cli;
mod clock;
mod config;
mod file;
mod library;
mod model;
mod notify;
mod stash_error;
mod upload;

use crate::camera::{CameraSource, TerminalPicker};
use crate::cli::{build_cli, AddCmd, CliCommand, GlobalArgs, PhotoCmd};
use crate::clock::SystemClock;
use crate::config::Config;
use crate::file::LocalFilesystem;
use crate::library::PhotoLibrary;
use crate::notify::TerminalNotifier;
use crate::stash_error::{Result, StashError};
use crate::upload::UploadClient;
use std::process::exit;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let matches = build_cli();
    let (name, sub_matches) = match matches.subcommand() {
        (name, Some(sub_matches)) => (name, sub_matches),
        _ => {
            eprintln!("No command was provided, run `photo-stash help` to learn more");
            exit(1);
        }
    };

    let result = match CliCommand::from_str(name) {
        Ok(cmd) => run(cmd, sub_matches).await,
        Err(invalid_cmd) => Err(StashError::Config(format!("Command {} is not valid", invalid_cmd))),
    };

    match result {
        Ok(_) => exit(0),
        Err(err) => {
            eprintln!("❌  Failed due to error='{}'", err);
            exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cmd: CliCommand, matches: &clap::ArgMatches<'_>) -> Result<()> {
    let global = GlobalArgs::build(matches);
    let config = Config::resolve(global.data_dir.as_deref(), global.endpoint.as_deref())?;
    tracing::debug!(?config, %cmd, "starting");

    let add = match cmd {
        CliCommand::ADD => Some(AddCmd::build(matches)),
        _ => None,
    };
    let source = add.as_ref().and_then(|c| c.source.clone());

    let mut library = PhotoLibrary::new(
        Arc::new(LocalFilesystem::new(config.data_dir)),
        Arc::new(TerminalPicker::new(source)),
        Arc::new(TerminalNotifier),
        Arc::new(SystemClock),
        UploadClient::new(config.upload_url)?,
    );

    // every command starts from a fresh listing, as the screen does on activation
    library.load_files().await?;

    match cmd {
        CliCommand::LIST => list_photos(&library),
        CliCommand::ADD => {
            let prompt = add.map(|c| c.prompt).unwrap_or(true);
            let source = if prompt { CameraSource::Prompt } else { CameraSource::Photos };
            match library.select_image(source).await? {
                Some(name) => println!("📷 stored {}", name),
                None => println!("No photo selected"),
            }
        }
        CliCommand::UPLOAD => {
            let c = PhotoCmd::build(matches);
            let photo = library.find(&c.name)?;
            library.start_upload(&photo).await?;
        }
        CliCommand::DELETE => {
            let c = PhotoCmd::build(matches);
            let photo = library.find(&c.name)?;
            library.delete_image(&photo).await?;
        }
    }

    Ok(())
}

fn list_photos(library: &PhotoLibrary) {
    let images = library.images();
    println!("🖼  found {} photos:", images.len());
    images.iter().for_each(|p| println!("\t{}\t{}", p.name, p.path));
}
