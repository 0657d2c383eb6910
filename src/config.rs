use std::env;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub endpoint: String,
    pub project_id: String,
    pub api_key: String,
    pub database_id: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            endpoint: required("APPWRITE_ENDPOINT")?,
            project_id: required("APPWRITE_PROJECT_ID")?,
            api_key: required("APPWRITE_API_KEY")?,
            database_id: required("DATABASE_ID")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Collections {
    pub bookings: String,
    pub appointments: String,
    pub subscriptions: String,
    pub settings: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            bookings: "bookings".to_string(),
            appointments: "appointments".to_string(),
            subscriptions: "subscriptions".to_string(),
            settings: "gym_settings".to_string(),
        }
    }
}

impl Collections {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bookings: env::var("BOOKINGS_COLLECTION").unwrap_or(defaults.bookings),
            appointments: env::var("APPOINTMENTS_COLLECTION").unwrap_or(defaults.appointments),
            subscriptions: env::var("SUBSCRIPTIONS_COLLECTION").unwrap_or(defaults.subscriptions),
            settings: env::var("SETTINGS_COLLECTION").unwrap_or(defaults.settings),
        }
    }
}

pub fn server_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8080)
}

fn required(name: &str) -> Result<String, String> {
    env::var(name).map_err(|_| format!("{name} must be set"))
}
