//! Command-line client for the SnipStore API.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use serde_json::Value;
use snipstore_core::DEFAULT_CLI_SERVER_URL;
use std::io::{self, Read};


#[derive(Parser)]
#[command(name = "snip", about = "SnipStore CLI", version)]
struct Cli {
    /// Server URL (can also be set via SNIP_SERVER env var)
    #[arg(short, long, env = "SNIP_SERVER")]
    server: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Request timeout in seconds
    #[arg(short = 't', long, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Store a snippet read from a file or stdin
    New {
        #[arg(short, long)]
        file: Option<String>,
        #[arg(short, long)]
        language: Option<String>,
        #[arg(long)]
        title: Option<String>,
    },
    /// Print a stored snippet
    Get { id: String },
    /// Check that the server is up
    Ping,
}

fn error_message_for_response(status: reqwest::StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return value
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or(body)
            .to_string();
    }

    body.to_string()
}

async fn ensure_success_or_exit(res: reqwest::Response, action: &str) -> reqwest::Response {
    let status = res.status();
    if status.is_success() {
        return res;
    }

    let body = match res.text().await {
        Ok(body) => body,
        Err(err) => format!("failed to read error response body: {}", err),
    };
    let message = error_message_for_response(status, &body);
    eprintln!("{} failed ({}): {}", action, status, message);
    std::process::exit(1);
}

fn exit_with(action: &str, message: String) -> ! {
    eprintln!("{} failed: {}", action, message);
    std::process::exit(1);
}

fn create_body(content: String, language: Option<String>, title: Option<String>) -> Value {
    let mut body = serde_json::json!({ "content": content });
    if let Some(language) = language {
        body["language"] = language.into();
    }
    if let Some(title) = title {
        body["title"] = title.into();
    }
    body
}

fn format_new_output(snippet: &Value, json: bool) -> Result<String, String> {
    if json {
        return serde_json::to_string_pretty(snippet)
            .map_err(|err| format!("response encoding error: {}", err));
    }

    snippet
        .get("id")
        .and_then(Value::as_str)
        .map(|id| format!("Created: {}", id))
        .ok_or_else(|| "response missing 'id' field".to_string())
}

fn format_get_output(snippet: &Value, json: bool) -> Result<String, String> {
    if json {
        return serde_json::to_string_pretty(snippet)
            .map_err(|err| format!("response encoding error: {}", err));
    }

    snippet
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| "response missing 'content' field".to_string())
}

fn api_url(server: &str, segments: &[&str]) -> Result<reqwest::Url, String> {
    let mut url = reqwest::Url::parse(server)
        .map_err(|err| format!("Invalid server URL '{}': {}", server, err))?;
    let mut path = url
        .path_segments_mut()
        .map_err(|_| "Server URL cannot be used as an API base".to_string())?;
    path.pop_if_empty();
    for segment in segments {
        path.push(segment);
    }
    drop(path);
    Ok(url)
}

fn normalize_server(server: String) -> String {
    if let Ok(mut url) = reqwest::Url::parse(&server) {
        let should_normalize_localhost =
            url.scheme().eq_ignore_ascii_case("http") && url.host_str() == Some("localhost");
        if should_normalize_localhost && url.set_host(Some("127.0.0.1")).is_err() {
            return server;
        }
        let mut normalized = url.to_string();
        while normalized.ends_with('/') {
            normalized.pop();
        }
        return normalized;
    }
    server
}

fn resolve_server(server: Option<String>) -> String {
    server
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_CLI_SERVER_URL.to_string())
}

fn read_content(file: Option<String>) -> io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        server,
        json,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout))
        .build()?;
    let server = normalize_server(resolve_server(server));

    let (action, output) = match command {
        Commands::Completions { .. } => return Ok(()),
        Commands::New {
            file,
            language,
            title,
        } => {
            let endpoint = api_url(&server, &["api", "snippet"])
                .unwrap_or_else(|message| exit_with("New", message));
            let content = read_content(file)?;
            let body = create_body(content, language, title);

            let res = client.post(endpoint).json(&body).send().await?;
            let res = ensure_success_or_exit(res, "New").await;
            let snippet: Value = res.json().await?;
            ("New", format_new_output(&snippet, json))
        }
        Commands::Get { id } => {
            let endpoint = api_url(&server, &["api", "snippet", id.as_str()])
                .unwrap_or_else(|message| exit_with("Get", message));
            let res = client.get(endpoint).send().await?;
            let res = ensure_success_or_exit(res, "Get").await;
            let snippet: Value = res.json().await?;
            ("Get", format_get_output(&snippet, json))
        }
        Commands::Ping => {
            let endpoint =
                api_url(&server, &["ping"]).unwrap_or_else(|message| exit_with("Ping", message));
            let res = client.get(endpoint).send().await?;
            let res = ensure_success_or_exit(res, "Ping").await;
            let reply: Value = res.json().await?;
            let output = if json {
                serde_json::to_string_pretty(&reply)
                    .map_err(|err| format!("response encoding error: {}", err))
            } else {
                Ok(format!("{} is up", server))
            };
            ("Ping", output)
        }
    };

    match output {
        Ok(output) => println!("{}", output),
        Err(message) => exit_with(action, message),
    }

    Ok(())
}
