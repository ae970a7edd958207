use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, bail};
use colored::Colorize;
use reqwest::blocking::{Client, multipart};
use slog::{error, info};

use crate::api;
use crate::config::Config;
use crate::locale::{Language, Text};
use crate::models::UploadResponse;
use crate::session::{HELP, Outcome, Session};
use crate::suggestions::{FabricatedSearch, SearchProvider};
use crate::utils;

pub fn serve(config: Config) {
    let logger = utils::get_logger();

    let system = actix_web::rt::System::new();
    if let Err(e) = system.block_on(api::start_server(config, logger.clone())) {
        error!(logger, "Failed to start API server"; "error" => e.to_string());
        std::process::exit(1);
    }
    info!(logger, "Server stopped");
}

pub fn search(query: &str) {
    let hits = match FabricatedSearch.search(query) {
        Ok(hits) => hits,
        Err(e) => {
            println!("{}", format!("Error searching: {}", e).yellow());
            return;
        }
    };

    if hits.is_empty() {
        println!("\nNo results.");
        return;
    }

    println!("Results for \"{}\":", query.trim());
    for hit in &hits {
        println!(
            "\t- {} by {} [{}]",
            hit.title.bold(),
            hit.artist,
            hit.source.to_string().cyan()
        );
    }
}

/// Interactive song board for a single visitor, fed from stdin.
pub fn board(user_id: &str) {
    let mut session = Session::new(user_id, FabricatedSearch);
    println!("{}", HELP.dimmed());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{} ", format!("[{}]>", session.preferences().language).cyan());
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                println!("{}", format!("Error reading input: {}", e).yellow());
                break;
            }
            None => break,
        };
        match session.execute(&line) {
            Outcome::Continue(output) => {
                for out in output {
                    println!("{}", out);
                }
            }
            Outcome::Quit => break,
        }
    }
}

/// Sends files to a running server, printing the toast the page would show.
pub fn upload(server: &str, paths: &[String], language: Language) {
    match post_files(server, paths) {
        Ok(response) => {
            let (title, description) = language.upload_summary(response.files.len());
            println!("{}: {}", title.green(), description);
            for file in &response.files {
                println!("\t- {}{}", server.trim_end_matches('/'), file.path);
            }
        }
        Err(e) => {
            println!(
                "{}: {}",
                language.text(Text::ErrorUploading).red(),
                language.text(Text::ErrorUploadingFiles)
            );
            println!("{}", format!("{:#}", e).yellow());
        }
    }
}

fn post_files(server: &str, paths: &[String]) -> anyhow::Result<UploadResponse> {
    let mut form = multipart::Form::new();
    for path in paths {
        if !Path::new(path).is_file() {
            bail!("File '{}' does not exist", path);
        }
        form = form
            .file(api::FILES_FIELD, path)
            .with_context(|| format!("failed to read {}", path))?;
    }

    let url = format!("{}/api/upload", server.trim_end_matches('/'));
    let resp = Client::new()
        .post(&url)
        .multipart(form)
        .send()
        .with_context(|| format!("request to {} failed", url))?;

    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        bail!("server answered {}: {}", status, body);
    }
    serde_json::from_str(&body).context("unexpected upload response")
}
