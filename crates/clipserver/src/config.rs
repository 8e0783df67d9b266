use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(120);

const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "https://clipper-x-mu.vercel.app",
    "http://127.0.0.1:5500",
];

/// Process-wide settings, read once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Externally advertised origin, without a trailing slash.
    pub base_url: String,
    /// Scratch space for raw downloads and the served clip store.
    pub download_dir: PathBuf,
    pub cors_origins: Vec<String>,
    pub yt_dlp_path: PathBuf,
    pub ffmpeg_path: PathBuf,
    /// How long a clip stays downloadable.
    pub retention: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = match var("HOST") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid HOST; falling back to 0.0.0.0");
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            }),
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match var("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid PORT; falling back to {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let base_url = var("BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        let cors_origins = match var("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        let retention = match var("CLIP_RETENTION_SECS") {
            Some(raw) => raw.parse().map(Duration::from_secs).unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid CLIP_RETENTION_SECS; using default");
                DEFAULT_RETENTION
            }),
            None => DEFAULT_RETENTION,
        };

        let download_dir = var("DOWNLOAD_DIR").unwrap_or_else(|| "download".to_string());

        Self {
            host,
            port,
            base_url,
            download_dir: PathBuf::from(download_dir),
            cors_origins,
            yt_dlp_path: PathBuf::from(var("YT_DLP_PATH").unwrap_or_else(|| "yt-dlp".to_string())),
            ffmpeg_path: PathBuf::from(var("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string())),
            retention,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Public link for a file in the download directory.
    pub fn download_url(&self, file_name: &str) -> String {
        format!("{}/download/{}", self.base_url, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.download_dir, PathBuf::from("download"));
        assert_eq!(config.cors_origins.len(), 3);
        assert!(config.cors_origins.contains(&"https://clipper-x-mu.vercel.app".to_string()));
        assert_eq!(config.retention, Duration::from_secs(120));
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn base_url_follows_port_unless_set() {
        let config = config_from(&[("PORT", "9100")]);
        assert_eq!(config.base_url, "http://localhost:9100");

        let config = config_from(&[("PORT", "9100"), ("BASE_URL", "https://clips.example.com/")]);
        assert_eq!(config.base_url, "https://clips.example.com");
        assert_eq!(
            config.download_url("clipped_1.mp4"),
            "https://clips.example.com/download/clipped_1.mp4"
        );
    }

    #[test]
    fn bad_numbers_fall_back() {
        let config = config_from(&[("PORT", "eighty"), ("CLIP_RETENTION_SECS", "-3")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.retention, DEFAULT_RETENTION);
    }

    #[test]
    fn cors_origins_split_on_commas() {
        let config = config_from(&[("CORS_ORIGINS", "https://a.test, https://b.test,,")]);
        assert_eq!(config.cors_origins, vec!["https://a.test", "https://b.test"]);
    }
}
