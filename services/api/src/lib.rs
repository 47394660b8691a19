mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use swap_credits::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
