//! HTTP view server: the page (or anything else) polls rendered presence here.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /health` | `{status, service}` |
//! | `GET /presence` | current [`PageView`](crate::presence::PageView) |
//! | `GET /phase` | `{phase, ...}` of the running client |

mod routes;

pub use routes::{create_router, create_router_with_state, AppState};

/// Bind and serve until `shutdown` resolves.
pub async fn serve<F>(router: axum::Router, addr: &str, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Serving presence view on http://{}", listener.local_addr()?);
    axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;
    Ok(())
}
