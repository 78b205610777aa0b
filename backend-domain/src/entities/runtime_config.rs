#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub seed_scooters: u32,
    pub log_dir: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            seed_scooters: 0,
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: String,
}
