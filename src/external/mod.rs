pub mod google_places;
pub mod messenger;

pub use google_places::GooglePlacesClient;
pub use messenger::MessengerClient;

/// Serves `app` on an ephemeral local port and returns its base url.
#[cfg(test)]
pub(crate) async fn spawn_fake(app: axum::Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(
        axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service()),
    );

    format!("http://{}", addr)
}
