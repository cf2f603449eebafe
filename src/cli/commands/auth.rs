use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use std::io::Write;

use crate::api::users::{LoginResponse, UserResponse};
use crate::cli::client::ApiClient;
use crate::cli::config::{load_session, save_session};
use crate::cli::utils::{output_json, output_success, print_user};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register a new account")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Display name")]
        name: String,
        #[arg(long = "major-year", help = "Major and class year, e.g. 'Physics, 2027'")]
        major_year: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Interests shown on your profile")]
        interests: Option<String>,
        #[arg(long, help = "Avatar URL")]
        avatar: Option<String>,
    },

    #[command(about = "Log in and save the session")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Clear the saved session")]
    Logout,

    #[command(about = "Show the logged-in user's profile")]
    Whoami,

    #[command(about = "Show current session status")]
    Status,
}

pub async fn handle(
    cmd: AuthCommands,
    server: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut session = load_session()?;
    let client = ApiClient::from_session(&session, server);

    match cmd {
        AuthCommands::Register {
            username,
            name,
            major_year,
            password,
            interests,
            avatar,
        } => {
            let password = password_or_prompt(password)?;
            let payload = client
                .post(
                    "/api/users",
                    json!({
                        "username": username,
                        "password": password,
                        "name": name,
                        "majorYear": major_year,
                        "interests": interests,
                        "avatar": avatar,
                    }),
                )
                .await?;

            match output_format {
                OutputFormat::Json => output_json(&payload)?,
                OutputFormat::Text => {
                    let user: UserResponse = serde_json::from_value(payload)?;
                    output_success(&output_format, &format!("Registered {}", user.username))?;
                    print_user(&user);
                }
            }
            Ok(())
        }

        AuthCommands::Login { username, password } => {
            let password = password_or_prompt(password)?;
            let payload = client
                .post(
                    "/api/users/login",
                    json!({ "username": username, "password": password }),
                )
                .await?;

            let login: LoginResponse = serde_json::from_value(payload.clone())?;
            session.login(login.token, login.user.id, login.user.username.clone());
            save_session(&session)?;

            match output_format {
                OutputFormat::Json => output_json(&payload)?,
                OutputFormat::Text => {
                    output_success(&output_format, &format!("Logged in as {}", login.user.username))?
                }
            }
            Ok(())
        }

        AuthCommands::Logout => {
            session.logout();
            save_session(&session)?;
            output_success(&output_format, "Logged out")
        }

        AuthCommands::Whoami => {
            let user_id = session
                .user_id
                .context("Not logged in; run `quad auth login` first")?;

            let payload = client.get(&format!("/api/users/{}", user_id)).await?;
            match output_format {
                OutputFormat::Json => output_json(&payload)?,
                OutputFormat::Text => {
                    let user: UserResponse = serde_json::from_value(payload)?;
                    print_user(&user);
                }
            }
            Ok(())
        }

        AuthCommands::Status => {
            match output_format {
                OutputFormat::Json => output_json(&serde_json::to_value(&session)?)?,
                OutputFormat::Text => {
                    println!("server: {}", session.server);
                    match (&session.username, &session.logged_in_at) {
                        (Some(username), Some(at)) => {
                            println!("logged in as {} since {}", username, at.format("%Y-%m-%d %H:%M"))
                        }
                        _ => println!("not logged in"),
                    }
                }
            }
            Ok(())
        }
    }
}

fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    print!("Password: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
