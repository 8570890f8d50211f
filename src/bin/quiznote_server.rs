//! QuizNote API Server binary
//!
//! HTTP REST API for the question sheet note-taking flow.

use clap::Parser;
use royalbit_quiznote::api::server::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SESSION_TTL_SECS};
use royalbit_quiznote::api::{run_api_server, ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "quiznote-server")]
#[command(version)]
#[command(author = "RoyalBit Inc. <admin@royalbit.ca>")]
#[command(about = "QuizNote API Server - draw random questions from a spreadsheet and save notes")]
#[command(long_about = r#"
QuizNote API Server

Each client starts a session, uploads an .xlsx question sheet, draws
random questions, saves notes and downloads the updated workbook:
  - POST   /api/v1/sessions              - Start a session
  - GET    /api/v1/sessions/:id          - Session status
  - DELETE /api/v1/sessions/:id          - End a session
  - POST   /api/v1/sessions/:id/upload   - Upload .xlsx (multipart field 'file')
  - POST   /api/v1/sessions/:id/draw     - Draw a random question
  - POST   /api/v1/sessions/:id/note     - Save a note {"note": "..."}
  - GET    /api/v1/sessions/:id/download - Download updated_file.xlsx

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Example usage:
  quiznote-server                           # Start on localhost:8080
  quiznote-server --host 0.0.0.0 --port 3000
  quiznote-server --session-ttl-secs 900    # Drop sessions idle for 15 minutes

  curl -X POST http://localhost:8080/api/v1/sessions
  curl -F file=@questions.xlsx http://localhost:8080/api/v1/sessions/<id>/upload
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "QUIZNOTE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "QUIZNOTE_PORT")]
    port: u16,

    /// Maximum accepted request body size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "QUIZNOTE_MAX_UPLOAD_BYTES")]
    max_upload_bytes: usize,

    /// Seconds a session may sit idle before it is dropped
    #[arg(long, default_value_t = DEFAULT_SESSION_TTL_SECS, env = "QUIZNOTE_SESSION_TTL_SECS")]
    session_ttl_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        max_upload_bytes: args.max_upload_bytes,
        session_ttl_secs: args.session_ttl_secs,
    };

    run_api_server(config).await
}
