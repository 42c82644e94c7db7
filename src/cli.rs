use std::fmt;
use std::str::FromStr;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

static VERSION: &str = "0.1.0";
static AUTHOR: &str = "apmaros";
static DESCRIPTION: &str = "Keeps photos in a private folder and uploads them on demand";
const LIST: &str = "list";
const ADD: &str = "add";
const UPLOAD: &str = "upload";
const DELETE: &str = "delete";
pub(crate) const DATA_DIR: &str = "data-dir";
pub(crate) const ENDPOINT: &str = "endpoint";
const ENDPOINT_SHORT: &str = "e";
pub(crate) const SOURCE: &str = "source";
const SOURCE_SHORT: &str = "s";
pub(crate) const NO_PROMPT: &str = "no-prompt";
pub(crate) const NAME: &str = "name";
const NAME_SHORT: &str = "n";

fn name_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(NAME)
        .short(NAME_SHORT)
        .long(NAME)
        .takes_value(true)
        .help("File name of a stored photo, as printed by `list`")
        .required(true)
}

pub(crate) fn build_app<'a, 'b>() -> App<'a, 'b> {
    App::new("photo-stash")
        .version(VERSION)
        .author(AUTHOR)
        .about(DESCRIPTION)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(Arg::with_name(DATA_DIR)
            .long(DATA_DIR)
            .takes_value(true)
            .global(true)
            .help("Private data folder holding stored-images (overrides PHOTO_STASH_DATA_DIR)"))
        .arg(Arg::with_name(ENDPOINT)
            .short(ENDPOINT_SHORT)
            .long(ENDPOINT)
            .takes_value(true)
            .global(true)
            .help("Upload url (overrides PHOTO_STASH_UPLOAD_URL)"))
        .subcommand(SubCommand::with_name(LIST)
            .about("Lists stored photos"))
        .subcommand(SubCommand::with_name(ADD)
            .about("Stores a new photo from a file or url")
            .arg(Arg::with_name(SOURCE)
                .short(SOURCE_SHORT)
                .long(SOURCE)
                .takes_value(true)
                .help("Path or http(s) url of the photo, asked for when missing"))
            .arg(Arg::with_name(NO_PROMPT)
                .long(NO_PROMPT)
                .takes_value(false)
                .help("Never ask for a photo, do nothing without --source")))
        .subcommand(SubCommand::with_name(UPLOAD)
            .about("Uploads a stored photo")
            .arg(name_arg()))
        .subcommand(SubCommand::with_name(DELETE)
            .about("Deletes a stored photo")
            .arg(name_arg()))
}

pub(crate) fn build_cli<'a>() -> ArgMatches<'a> {
    build_app().get_matches()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum CliCommand {
    LIST,
    ADD,
    UPLOAD,
    DELETE,
}

impl FromStr for CliCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            LIST => Ok(Self::LIST),
            ADD => Ok(Self::ADD),
            UPLOAD => Ok(Self::UPLOAD),
            DELETE => Ok(Self::DELETE),
            _ => Err(s.to_owned()),
        }
    }
}

impl fmt::Display for CliCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CliCommand::LIST => LIST,
            CliCommand::ADD => ADD,
            CliCommand::UPLOAD => UPLOAD,
            CliCommand::DELETE => DELETE,
        };
        write!(f, "{}", name)
    }
}

pub(crate) struct GlobalArgs {
    pub(crate) data_dir: Option<String>,
    pub(crate) endpoint: Option<String>,
}

impl GlobalArgs {
    /// Global args are propagated into the subcommand's matches.
    pub(crate) fn build(matches: &ArgMatches) -> Self {
        let data_dir = matches.value_of(DATA_DIR).map(String::from);
        let endpoint = matches.value_of(ENDPOINT).map(String::from);

        GlobalArgs { data_dir, endpoint }
    }
}

pub(crate) struct AddCmd {
    pub(crate) source: Option<String>,
    pub(crate) prompt: bool,
}

impl AddCmd {
    pub(crate) fn build(matches: &ArgMatches) -> Self {
        let source = matches.value_of(SOURCE).map(String::from);
        let prompt = !matches.is_present(NO_PROMPT);

        AddCmd { source, prompt }
    }
}

/// Shared by `upload` and `delete`.
pub(crate) struct PhotoCmd {
    pub(crate) name: String,
}

impl PhotoCmd {
    pub(crate) fn build(matches: &ArgMatches) -> Self {
        // safe to unwrap, name is required
        let name = matches.value_of(NAME).unwrap().to_owned();

        PhotoCmd { name }
    }
}
