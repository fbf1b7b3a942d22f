use std::{env, fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr};

pub struct WebConfig {
    pub bind_address: SocketAddr,
    pub upload_directory: PathBuf,
    pub max_upload_bytes: usize,
    pub verify_submitted_price: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 5001)),
            upload_directory: PathBuf::from("uploads"),
            max_upload_bytes: 10 * 1024 * 1024,
            verify_submitted_price: false,
        }
    }
}

impl WebConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads every setting through `lookup`, falling back to the default for
    /// missing or unparsable values.
    pub fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            bind_address: try_load(&lookup, "BIND_ADDRESS", defaults.bind_address),
            upload_directory: try_load(
                &lookup,
                "UPLOAD_DIRECTORY",
                defaults.upload_directory,
            ),
            max_upload_bytes: try_load(
                &lookup,
                "MAX_UPLOAD_BYTES",
                defaults.max_upload_bytes,
            ),
            verify_submitted_price: try_load(
                &lookup,
                "VERIFY_SUBMITTED_PRICE",
                defaults.verify_submitted_price,
            ),
        }
    }
}

fn try_load<L, T>(lookup: &L, key: &str, default: T) -> T
where
    L: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|why| {
            log::warn!("Invalid {key} value {raw:?} ({why}), using default");
            default
        }),
        None => {
            log::info!("{key} not set, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, path::PathBuf};

    use super::WebConfig;

    fn config(vars: &[(&str, &str)]) -> WebConfig {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        WebConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = config(&[]);
        assert_eq!(config.bind_address.port(), 5001);
        assert_eq!(config.upload_directory, PathBuf::from("uploads"));
        assert!(!config.verify_submitted_price);
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let config = config(&[
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("UPLOAD_DIRECTORY", "/var/lib/bus-pass/photos"),
            ("MAX_UPLOAD_BYTES", "lots"),
            ("VERIFY_SUBMITTED_PRICE", "true"),
        ]);
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(
            config.upload_directory,
            PathBuf::from("/var/lib/bus-pass/photos")
        );
        assert_eq!(config.max_upload_bytes, WebConfig::default().max_upload_bytes);
        assert!(config.verify_submitted_price);
    }
}
