use message_bus::{InMemoryBus, MessageBus, NatsBus};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use pipeline_rs::{
    config::{BusType, Config, StoreType},
    listener,
    routes::{router, AppState},
    store::{EventStore, InMemoryStore, PostgresStore},
    topology,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    tracing::info!("Starting pipeline service...");

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration from environment");

    tracing::info!(
        host = %config.host,
        port = config.port,
        "Configuration loaded"
    );

    // Correlation store
    let store: Arc<dyn EventStore> = match config.store_type {
        StoreType::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL required for STORE_TYPE=postgres");
            tracing::info!("Connecting to database and running migrations...");
            Arc::new(
                PostgresStore::connect(database_url)
                    .await
                    .expect("Failed to initialize Postgres store"),
            )
        }
        StoreType::Memory => {
            tracing::info!("Using in-memory correlation store");
            Arc::new(InMemoryStore::new())
        }
    };

    // Message bus
    let bus: Arc<dyn MessageBus> = match config.bus_type {
        BusType::Nats => {
            let nats_url = config
                .nats_url
                .as_deref()
                .expect("NATS_URL required for BUS_TYPE=nats");
            tracing::info!(url = %nats_url, "Connecting to NATS");
            let client = async_nats::connect(nats_url)
                .await
                .expect("Failed to connect to NATS");
            Arc::new(NatsBus::new(client))
        }
        BusType::InMemory => {
            tracing::info!("Using in-memory message bus");
            Arc::new(InMemoryBus::new())
        }
    };

    // Shared shutdown flag for every consumer task
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let channels = config.channels.clone();
    let mut tasks = Vec::new();

    // Pipeline 1: content transformation
    tasks.push(topology::spawn_pipeline(
        bus.clone(),
        channels.input.clone(),
        config.topology_group.clone(),
        "content-transformation",
        shutdown_rx.clone(),
        {
            let out = channels.transformed.clone();
            move |payload| topology::transform::emissions(&out, payload)
        },
    ));

    // Pipeline 2: schema conversion
    tasks.push(topology::spawn_pipeline(
        bus.clone(),
        channels.legacy_events.clone(),
        config.topology_group.clone(),
        "schema-conversion",
        shutdown_rx.clone(),
        {
            let out = channels.json_converted.clone();
            move |payload| topology::convert::emissions(&out, payload)
        },
    ));

    // Pipeline 3: routing and division
    tasks.push(topology::spawn_pipeline(
        bus.clone(),
        channels.actions.clone(),
        config.topology_group.clone(),
        "routing-division",
        shutdown_rx.clone(),
        {
            let out_a = channels.action_a.clone();
            let out_b = channels.action_b.clone();
            move |payload| topology::route::emissions(&out_a, &out_b, payload)
        },
    ));

    // Pipeline 4: inbound message fan-out
    tasks.push(topology::spawn_pipeline(
        bus.clone(),
        channels.inbound_message.clone(),
        config.topology_group.clone(),
        "inbound-message-fanout",
        shutdown_rx.clone(),
        {
            let out_chat = channels.create_chat.clone();
            let out_message = channels.create_message.clone();
            move |payload| topology::fanout::emissions(&out_chat, &out_message, payload)
        },
    ));

    // Persistence listeners, one per output channel
    tasks.extend(listener::spawn_listeners(
        bus.clone(),
        store.clone(),
        &channels,
        &config.listener_group,
        &shutdown_rx,
    ));

    // HTTP surface: ingress + query/admin + health
    let app = router(AppState {
        bus,
        store,
        channels,
    });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT");
    tracing::info!(%addr, "Pipeline service listening");

    let tcp = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(tcp, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received, draining HTTP");
        })
        .await
        .expect("Server failed");

    // HTTP is drained; stop pulling new records and let in-flight ones finish
    let _ = shutdown_tx.send(true);
    for task in tasks {
        let _ = task.await;
    }

    tracing::info!("Pipeline service stopped");
}
