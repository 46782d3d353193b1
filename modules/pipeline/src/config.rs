use std::env;

#[derive(Debug, Clone)]
pub enum BusType {
    Nats,
    InMemory,
}

impl BusType {
    pub fn from_env() -> Self {
        match env::var("BUS_TYPE")
            .unwrap_or_else(|_| "inmemory".to_string())
            .to_lowercase()
            .as_str()
        {
            "nats" => BusType::Nats,
            "inmemory" => BusType::InMemory,
            _ => {
                tracing::warn!("Unknown BUS_TYPE, defaulting to inmemory");
                BusType::InMemory
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum StoreType {
    Postgres,
    Memory,
}

impl StoreType {
    pub fn from_env() -> Self {
        match env::var("STORE_TYPE")
            .unwrap_or_else(|_| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => StoreType::Postgres,
            "memory" => StoreType::Memory,
            _ => {
                tracing::warn!("Unknown STORE_TYPE, defaulting to memory");
                StoreType::Memory
            }
        }
    }
}

/// Names of every channel the topology and the persistence listener touch.
///
/// Pipeline logic never hard-codes a channel name; everything flows from here.
#[derive(Debug, Clone)]
pub struct Channels {
    pub input: String,
    pub legacy_events: String,
    pub actions: String,
    pub inbound_message: String,
    pub transformed: String,
    pub json_converted: String,
    pub action_a: String,
    pub action_b: String,
    pub create_chat: String,
    pub create_message: String,
}

impl Default for Channels {
    fn default() -> Self {
        Self {
            input: "input".to_string(),
            legacy_events: "legacy-events".to_string(),
            actions: "actions".to_string(),
            inbound_message: "inbound-message".to_string(),
            transformed: "transformed".to_string(),
            json_converted: "json-converted".to_string(),
            action_a: "action-a".to_string(),
            action_b: "action-b".to_string(),
            create_chat: "create-chat".to_string(),
            create_message: "create-message".to_string(),
        }
    }
}

impl Channels {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            input: env_or("CHANNEL_INPUT", &defaults.input),
            legacy_events: env_or("CHANNEL_LEGACY_EVENTS", &defaults.legacy_events),
            actions: env_or("CHANNEL_ACTIONS", &defaults.actions),
            inbound_message: env_or("CHANNEL_INBOUND_MESSAGE", &defaults.inbound_message),
            transformed: env_or("CHANNEL_TRANSFORMED", &defaults.transformed),
            json_converted: env_or("CHANNEL_JSON_CONVERTED", &defaults.json_converted),
            action_a: env_or("CHANNEL_ACTION_A", &defaults.action_a),
            action_b: env_or("CHANNEL_ACTION_B", &defaults.action_b),
            create_chat: env_or("CHANNEL_CREATE_CHAT", &defaults.create_chat),
            create_message: env_or("CHANNEL_CREATE_MESSAGE", &defaults.create_message),
        }
    }
}

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bus_type: BusType,
    pub nats_url: Option<String>,
    pub store_type: StoreType,
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub topology_group: String,
    pub listener_group: String,
    pub channels: Channels,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let bus_type = BusType::from_env();
        let store_type = StoreType::from_env();

        let nats_url = match bus_type {
            BusType::Nats => Some(
                env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string()),
            ),
            BusType::InMemory => None,
        };

        let database_url = match store_type {
            StoreType::Postgres => Some(
                env::var("DATABASE_URL")
                    .map_err(|_| "DATABASE_URL must be set for STORE_TYPE=postgres".to_string())?,
            ),
            StoreType::Memory => None,
        };

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "PORT must be a valid u16".to_string())?;

        let topology_group =
            env::var("TOPOLOGY_GROUP").unwrap_or_else(|_| "topology-engine".to_string());

        let listener_group =
            env::var("LISTENER_GROUP").unwrap_or_else(|_| "persistence-listener".to_string());

        Ok(Config {
            bus_type,
            nats_url,
            store_type,
            database_url,
            host,
            port,
            topology_group,
            listener_group,
            channels: Channels::from_env(),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
