use events::{redis::RedisEventSource, run_bus_reader, EventPublisher};
use log::{error, info};
use relay::Dispatcher;
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!(
        "Subscribing to channel [{}] on {}",
        config.events_channel(),
        config.redis_url()
    );

    let source = match RedisEventSource::connect(config.redis_url(), config.events_channel()).await {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to subscribe to the event bus: {e}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(config);

    let publisher = EventPublisher::new()
        .with_handler(Arc::new(Dispatcher::new(Arc::clone(&app_state.registry))));

    let bus_reader = tokio::spawn(async move { run_bus_reader(source, &publisher).await });

    tokio::select! {
        result = web::init_server(app_state) => match result {
            Ok(()) => error!("Server stopped unexpectedly"),
            Err(e) => error!("Server failed: {e}"),
        },
        result = bus_reader => match result {
            Ok(Ok(())) => error!("Event bus subscription ended"),
            Ok(Err(e)) => error!("Event bus reader failed: {e}"),
            Err(e) => error!("Event bus reader task panicked: {e}"),
        },
    }

    std::process::exit(1);
}
