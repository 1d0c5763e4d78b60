use crate::api::routes;
use crate::api::AppState;
use std::net::SocketAddr;

/// Starts and runs the HTTP server using Axum web framework
///
/// # Arguments
/// * `state` - Shared pool and serializer exposed to the handlers
/// * `port` - Port number to listen on for incoming HTTP connections
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Ok if the server ran to
///   completion, Error if binding or serving fails
pub async fn launch_server(
    state: AppState,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
