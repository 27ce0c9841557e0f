// Entrypoint for the CLI application.
// - Parses options, resolves login data, logs in once and hands the client
//   to the matching handler in `ui`.
// - Returns `anyhow::Result` so every failure reaches the user with its
//   context chain.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use lychee_upload::config::LoginConfig;
use lychee_upload::ui::{self, AccessRequest};
use lychee_upload::{logging, LycheeClient};

/// Upload photos to a Lychee gallery and manage its albums.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Lychee server address, e.g. https://photos.example.org
    #[arg(long, global = true)]
    server: Option<String>,

    #[arg(long, global = true)]
    user: Option<String>,

    #[arg(long, global = true)]
    password: Option<String>,

    /// Properties file with `server`, `username` and `password` keys.
    /// Defaults to ~/.config/lycheeupload.conf
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Prompt for the password if neither options nor config supply one
    #[arg(long, global = true)]
    ask_password: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload an image (jpg, jpeg, png, gif) into an album
    #[command(short_flag = 'u')]
    Upload { file: PathBuf, album_id: String },

    /// List the standard albums on the server
    #[command(short_flag = 'l')]
    List,

    /// Print the smart albums as JSON
    SmartAlbums,

    /// Create a new album and print its id
    #[command(short_flag = 'c')]
    CreateAlbum { title: String },

    /// Set password and visibility flags of an album
    SetAccess {
        album_id: String,

        /// Album password; omit to clear it
        #[arg(long)]
        album_password: Option<String>,

        #[arg(long)]
        downloadable: bool,

        /// List the album on the gallery page
        #[arg(long)]
        visible: bool,

        /// Make the album reachable without logging in
        #[arg(long)]
        public: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let overrides = LoginConfig {
        server: args.server,
        username: args.user,
        password: args.password,
    };
    let creds = ui::resolve_credentials(args.config.as_deref(), overrides, args.ask_password)?;

    let client = LycheeClient::login(&creds.server, &creds.username, &creds.password)
        .with_context(|| format!("Error while logging in to {}. Check your login data", creds.server))?;

    match args.command {
        Command::Upload { file, album_id } => ui::upload(&client, &file, &album_id),
        Command::List => ui::list_albums(&client),
        Command::SmartAlbums => ui::print_smart_albums(&client),
        Command::CreateAlbum { title } => ui::create_album(&client, &title),
        Command::SetAccess {
            album_id,
            album_password,
            downloadable,
            visible,
            public,
            yes,
        } => {
            let access = AccessRequest {
                password: album_password,
                downloadable,
                visible,
                public,
            };
            ui::set_access(&client, &album_id, &access, yes)
        }
    }
}
