use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mentorlink_config::AppConfig;
use mentorlink_database::{
    ConnectionRepository, ConnectionStatus, CreateConnectionRequest, CreateMessageRequest,
    CreateProfileRequest, MessageRepository, ProfileRepository, ProfileRole,
};
use mentorlink_gateway::{create_router, GatewayState};
use mentorlink_runtime::{shutdown_signal, telemetry, BackendServices};
use sqlx::{Row, SqlitePool};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "mentorlink-server")]
#[command(about = "Mentorlink chat backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP and WebSocket server (default)
    Serve,
    /// Insert demo profiles and an accepted connection
    SeedData,
    /// Print the contents of the store
    DumpData,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing()?;

    let cli = Cli::parse();
    let config = mentorlink_config::load().context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::SeedData => seed_data(config).await,
        Command::DumpData => dump_data(config).await,
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    info!("starting mentorlink backend");

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(services.db_pool, config.storage.clone(), &config.relay);
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn seed_data(config: AppConfig) -> Result<()> {
    let services = BackendServices::initialise(&config).await?;
    let profiles = ProfileRepository::new(services.db_pool.clone());
    let connections = ConnectionRepository::new(services.db_pool.clone());
    let messages = MessageRepository::new(services.db_pool.clone());

    let mentor = profiles
        .create(&CreateProfileRequest {
            email: "maya.mentor@example.com".to_string(),
            display_name: "Maya Mentor".to_string(),
            role: ProfileRole::Mentor,
            avatar_path: Some("avatars/maya.png".to_string()),
        })
        .await?;
    let student = profiles
        .create(&CreateProfileRequest {
            email: "sam.student@example.com".to_string(),
            display_name: "Sam Student".to_string(),
            role: ProfileRole::Student,
            avatar_path: None,
        })
        .await?;

    let connection = connections
        .create(&CreateConnectionRequest {
            mentor_id: mentor.public_id.clone(),
            student_id: student.public_id.clone(),
        })
        .await?;
    connections
        .set_status(&connection.public_id, ConnectionStatus::Accepted)
        .await?;

    messages
        .insert(&CreateMessageRequest {
            sender_id: student.public_id.clone(),
            receiver_id: mentor.public_id.clone(),
            content: "Hi Maya, could we review my project this week?".to_string(),
        })
        .await?;
    messages
        .insert(&CreateMessageRequest {
            sender_id: mentor.public_id.clone(),
            receiver_id: student.public_id.clone(),
            content: "Of course, send it over!".to_string(),
        })
        .await?;

    println!("seeded mentor   {} <{}>", mentor.public_id, mentor.email);
    println!("seeded student  {} <{}>", student.public_id, student.email);
    println!("seeded accepted connection {}", connection.public_id);
    Ok(())
}

async fn dump_data(config: AppConfig) -> Result<()> {
    let services = BackendServices::initialise(&config).await?;
    let pool = services.db_pool;

    dump_profiles(&pool).await?;
    dump_connections(&pool).await?;
    dump_messages(&pool).await?;
    Ok(())
}

async fn dump_profiles(pool: &SqlitePool) -> Result<()> {
    println!("profiles:");
    let rows = sqlx::query(
        "SELECT public_id, email, display_name, role FROM profiles ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    for row in rows {
        let public_id: String = row.try_get("public_id")?;
        let email: String = row.try_get("email")?;
        let display_name: String = row.try_get("display_name")?;
        let role: String = row.try_get("role")?;
        println!("  {public_id}  {role:<8} {display_name} <{email}>");
    }
    Ok(())
}

async fn dump_connections(pool: &SqlitePool) -> Result<()> {
    println!("connections:");
    let rows = sqlx::query(
        "SELECT public_id, mentor_id, student_id, status FROM connections ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    for row in rows {
        let public_id: String = row.try_get("public_id")?;
        let mentor_id: String = row.try_get("mentor_id")?;
        let student_id: String = row.try_get("student_id")?;
        let status: String = row.try_get("status")?;
        println!("  {public_id}  {status:<9} mentor={mentor_id} student={student_id}");
    }
    Ok(())
}

async fn dump_messages(pool: &SqlitePool) -> Result<()> {
    println!("messages:");
    let rows = sqlx::query(
        "SELECT public_id, sender_id, receiver_id, content, created_at
         FROM messages ORDER BY created_at, id",
    )
    .fetch_all(pool)
    .await?;
    for row in rows {
        let public_id: String = row.try_get("public_id")?;
        let sender_id: String = row.try_get("sender_id")?;
        let receiver_id: String = row.try_get("receiver_id")?;
        let content: String = row.try_get("content")?;
        let created_at: String = row.try_get("created_at")?;
        println!("  {public_id}  {created_at}  {sender_id} -> {receiver_id}: {content}");
    }
    Ok(())
}
