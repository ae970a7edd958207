use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgMatches, Command, value_parser};

pub mod api;
pub mod command_handlers;
pub mod config;
pub mod locale;
pub mod models;
pub mod session;
pub mod suggestions;
pub mod upload;
pub mod utils;

use config::Config;
use locale::Language;

fn cli() -> Command {
    Command::new("fotky-board")
        .about("Photo upload and song suggestion server for the Fotky 9.C page")
        .subcommand(
            Command::new("serve")
                .about("Serve the web app, the upload API and uploaded files (default)")
                .arg(Arg::new("host").long("host").help("Address to bind"))
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_parser(value_parser!(u16))
                        .help("Port to use"),
                )
                .arg(Arg::new("upload-dir").long("upload-dir").help("Where uploads are stored"))
                .arg(Arg::new("static-dir").long("static-dir").help("Built single page app"))
                .arg(
                    Arg::new("max-upload-size")
                        .long("max-upload-size")
                        .help("Per-file limit, e.g. 10MB or 52428800"),
                ),
        )
        .subcommand(
            Command::new("search")
                .about("Look up song candidates")
                .arg(Arg::new("query").required(true).num_args(1..)),
        )
        .subcommand(
            Command::new("board")
                .about("Suggest and vote on songs in the terminal")
                .arg(
                    Arg::new("user")
                        .long("user")
                        .help("Voter id, defaults to $USER"),
                ),
        )
        .subcommand(
            Command::new("upload")
                .about("Upload files to a running server")
                .arg(Arg::new("files").required(true).num_args(1..))
                .arg(
                    Arg::new("server")
                        .long("server")
                        .default_value("http://localhost:3000"),
                )
                .arg(
                    Arg::new("lang")
                        .long("lang")
                        .value_parser(value_parser!(Language))
                        .default_value("cs"),
                ),
        )
}

fn serve_config(matches: Option<&ArgMatches>) -> Config {
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Environment misconfigured: {}", e);
            process::exit(1);
        }
    };
    let Some(matches) = matches else {
        return config;
    };

    if let Some(host) = matches.get_one::<String>("host") {
        config.host = host.clone();
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.port = *port;
    }
    if let Some(dir) = matches.get_one::<String>("upload-dir") {
        config.upload_dir = PathBuf::from(dir);
    }
    if let Some(dir) = matches.get_one::<String>("static-dir") {
        config.static_dir = PathBuf::from(dir);
    }
    if let Some(size) = matches.get_one::<String>("max-upload-size") {
        match config::parse_size(size) {
            Some(bytes) => config.max_upload_size = bytes,
            None => {
                eprintln!("Invalid --max-upload-size value: {}", size);
                process::exit(1);
            }
        }
    }
    config
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("search", sub)) => {
            let query = sub
                .get_many::<String>("query")
                .unwrap_or_default()
                .cloned()
                .collect::<Vec<_>>()
                .join(" ");
            command_handlers::search(&query);
        }
        Some(("board", sub)) => {
            let user = sub
                .get_one::<String>("user")
                .cloned()
                .unwrap_or_else(|| utils::get_env("USER", Some("current-user")));
            command_handlers::board(&user);
        }
        Some(("upload", sub)) => {
            let files: Vec<String> = sub
                .get_many::<String>("files")
                .unwrap_or_default()
                .cloned()
                .collect();
            let server = sub
                .get_one::<String>("server")
                .map(String::as_str)
                .unwrap_or("http://localhost:3000");
            let language = sub.get_one::<Language>("lang").copied().unwrap_or_default();
            command_handlers::upload(server, &files, language);
        }
        Some(("serve", sub)) => command_handlers::serve(serve_config(Some(sub))),
        _ => command_handlers::serve(serve_config(None)),
    }
}
