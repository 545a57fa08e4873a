use axum::Router;
use blogwright_axum::{AppState, router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// The blog application: every page route, static files and the session
/// middleware, ready to be served or mounted elsewhere.
pub struct BlogService {
    router: Router,
}

impl BlogService {
    pub fn new(state: AppState) -> Self {
        Self {
            router: router(state),
        }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert into a traced router that can be nested into another application.
    pub fn as_router(self) -> Router {
        self.with_trace_layer().router
    }

    /// Serve the blog on `listener` until the process is stopped.
    pub async fn run_standalone(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let router = self.as_router();

        tracing::info!("Blog listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}
