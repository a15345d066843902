//! CLI front end for the ProConect marketplace.

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use proconect_client::storage::get_data_dir;
use proconect_client::types::{AnuncioTipo, Urgencia};
use proconect_client::types::models::Ordem;
use proconect_client::{ApiClient, ClientConfig, LoadingEvent};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend base URL (defaults to the local development backend in debug builds)
    #[arg(long, env = "PROCONECT_API_BASE", global = true)]
    api_base: Option<String>,
    /// Per-attempt request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Logs in and stores the session under the data directory
    Login {
        /// E-mail or CPF
        email: String,
        #[arg(long, env = "PROCONECT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forgets the stored session
    Logout,
    /// Shows the logged-in user
    Whoami,
    /// Service listings
    #[command(subcommand)]
    Anuncios(AnunciosCmd),
    /// Proposals on listings
    #[command(subcommand)]
    Propostas(PropostasCmd),
    /// Conversations and messages
    #[command(subcommand)]
    Conversas(ConversasCmd),
    /// Professional directory
    #[command(subcommand)]
    Profissionais(ProfissionaisCmd),
    /// Polls own listings and prints new proposals until Ctrl-C
    Watch {
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum AnunciosCmd {
    /// Public listings
    List(ListFilters),
    /// Listings owned by the logged-in user
    Mine,
    Show { id: i64 },
    Create(NovoAnuncioArgs),
    Delete { id: i64 },
}

#[derive(Args, Debug)]
pub struct ListFilters {
    #[arg(long)]
    pub busca: Option<String>,
    /// Category name
    #[arg(long)]
    pub categoria: Option<String>,
    #[arg(long)]
    pub categoria_id: Option<i64>,
    #[arg(long)]
    pub urgencia: Option<Urgencia>,
    #[arg(long)]
    pub tipo: Option<AnuncioTipo>,
    /// recentes, antigos, menor_preco or maior_preco
    #[arg(long, default_value = "recentes")]
    pub ordem: Ordem,
}

#[derive(Args, Debug)]
pub struct NovoAnuncioArgs {
    #[arg(long)]
    pub titulo: String,
    #[arg(long)]
    pub descricao: String,
    #[arg(long)]
    pub categoria_id: i64,
    #[arg(long)]
    pub localizacao: Option<String>,
    #[arg(long)]
    pub preco_min: Option<f64>,
    #[arg(long)]
    pub preco_max: Option<f64>,
    #[arg(long)]
    pub prazo: Option<String>,
    #[arg(long, default_value = "normal")]
    pub urgencia: Urgencia,
    #[arg(long, default_value = "oportunidade")]
    pub tipo: AnuncioTipo,
    /// Repeatable
    #[arg(long = "requisito")]
    pub requisitos: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum PropostasCmd {
    List {
        /// Proposals of one of your listings
        #[arg(long)]
        anuncio: Option<i64>,
        /// Proposals received on your listings
        #[arg(long)]
        recebidas: bool,
    },
    Send {
        anuncio_id: i64,
        #[arg(long)]
        valor: Option<f64>,
        #[arg(long)]
        mensagem: Option<String>,
    },
    Withdraw { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ConversasCmd {
    List,
    /// Prints a conversation and marks received messages as read
    Read { id: i64 },
    Send { id: i64, texto: String },
}

#[derive(Subcommand, Debug)]
pub enum ProfissionaisCmd {
    List {
        #[arg(long)]
        busca: Option<String>,
        #[arg(long)]
        categoria: Option<String>,
        #[arg(long)]
        localizacao: Option<String>,
        #[arg(long)]
        avaliacao_minima: Option<f64>,
    },
}

fn build_client(cli: &Cli) -> Result<ApiClient> {
    let config = match &cli.api_base {
        Some(url) => ClientConfig::new(url).with_data_dir(get_data_dir()?),
        None => ClientConfig::from_env()?,
    };
    let client = ApiClient::new(config.with_timeout_secs(cli.timeout_secs))
        .context("building API client failed")?;
    client.set_on_token_expired(|| warn!("Sessão expirada. Rode `proconect login` novamente."));
    Ok(client)
}

/// Mirror loading start/end pairs into the debug log.
fn trace_loading(client: &ApiClient) {
    let mut events = client.loading().subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(LoadingEvent::Start(entry)) => debug!(
                    "[{}] {}",
                    entry.title.as_deref().unwrap_or("conectando"),
                    entry.message.as_deref().unwrap_or_default()
                ),
                Ok(LoadingEvent::End(id)) => debug!("[{}] done", id),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber =
        FmtSubscriber::builder().with_env_filter(filter).with_writer(std::io::stderr).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();
    let client = Arc::new(build_client(&cli)?);
    trace_loading(&client);

    match cli.command {
        Commands::Login { email, password } => commands::login(&client, &email, &password).await?,
        Commands::Logout => commands::logout(&client)?,
        Commands::Whoami => commands::whoami(&client).await?,
        Commands::Anuncios(cmd) => commands::anuncios(&client, cmd).await?,
        Commands::Propostas(cmd) => commands::propostas(&client, cmd).await?,
        Commands::Conversas(cmd) => commands::conversas(&client, cmd).await?,
        Commands::Profissionais(cmd) => commands::profissionais(&client, cmd).await?,
        Commands::Watch { interval_secs } => commands::watch(Arc::clone(&client), interval_secs).await?,
    }

    Ok(())
}
