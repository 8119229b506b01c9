//! Turns a free-text query or link into a queue entry, and a queue entry into
//! a directly streamable audio URL, using the `yt-dlp` command-line tool.

use serde::Deserialize;
use serenity::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::session::QueueEntry;
use super::{MusicError, MusicResult};

/// Title shown for entries queued from a raw link, before resolution.
pub const LINK_PLACEHOLDER_TITLE: &str = "링크에서 재생 중...";

/// Top search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub link: String,
    pub title: String,
}

/// The outcome of resolving a page URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStream {
    /// Direct media URL for the transcoder.
    pub stream_url: String,
    pub title: Option<String>,
}

/// Search and resolution backend.
#[async_trait]
pub trait TrackSource: Send + Sync {
    /// The best match for `query`, if any.
    async fn search(&self, query: &str) -> MusicResult<Option<SearchHit>>;

    /// Resolves a page URL into a streamable audio URL.
    async fn resolve(&self, locator: &str) -> MusicResult<ResolvedStream>;
}

/// Links are played as given, everything else is searched.
pub fn is_direct_link(query: &str) -> bool {
    query.starts_with("https://") || query.starts_with("http://") || query.starts_with("www.")
}

/// Builds the queue entry for a `play` query. Direct links skip the search.
pub async fn entry_for_query(source: &dyn TrackSource, query: &str) -> MusicResult<QueueEntry> {
    let query = query.trim();
    if is_direct_link(query) {
        debug!("Query is a direct link, skipping search: {}", query);
        return Ok(QueueEntry::new(query, LINK_PLACEHOLDER_TITLE));
    }

    match source.search(query).await? {
        Some(hit) => {
            info!("Search for '{}' matched '{}'", query, hit.title);
            Ok(QueueEntry::new(hit.link, hit.title))
        }
        None => Err(MusicError::NoMatch(query.to_string())),
    }
}

/// Fixed `yt-dlp` options used when resolving a stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionPolicy {
    pub format: String,
    pub audio_format: String,
    pub audio_quality: String,
    pub retries: u32,
    pub fragment_retries: u32,
    pub allow_playlists: bool,
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self {
            format: "bestaudio/best".to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "192K".to_string(),
            retries: 3,
            fragment_retries: 3,
            allow_playlists: false,
        }
    }
}

impl ExtractionPolicy {
    pub fn resolve_args(&self, locator: &str) -> Vec<String> {
        let mut args = vec![
            "-j".to_string(),
            "--no-warnings".to_string(),
            "-f".to_string(),
            self.format.clone(),
            "--audio-format".to_string(),
            self.audio_format.clone(),
            "--audio-quality".to_string(),
            self.audio_quality.clone(),
            "--retries".to_string(),
            self.retries.to_string(),
            "--fragment-retries".to_string(),
            self.fragment_retries.to_string(),
        ];
        if !self.allow_playlists {
            args.push("--no-playlist".to_string());
        }
        args.push(locator.to_string());
        args
    }

    pub fn search_args(&self, query: &str) -> Vec<String> {
        vec![
            "-j".to_string(),
            "--no-warnings".to_string(),
            "--no-playlist".to_string(),
            format!("ytsearch1:{query}"),
        ]
    }
}

#[derive(Deserialize)]
struct YtDlpInfo {
    title: Option<String>,
    url: Option<String>,
    webpage_url: Option<String>,
    original_url: Option<String>,
}

fn parse_info(stdout: &[u8]) -> MusicResult<Option<YtDlpInfo>> {
    let text = String::from_utf8_lossy(stdout);
    let Some(line) = text.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return Ok(None);
    };
    serde_json::from_str(line)
        .map(Some)
        .map_err(|e| MusicError::AudioSourceError(format!("Failed to parse video metadata: {}", e)))
}

pub(crate) fn parse_search_output(stdout: &[u8]) -> MusicResult<Option<SearchHit>> {
    Ok(parse_info(stdout)?.and_then(|info| {
        let link = info.webpage_url.or(info.original_url)?;
        Some(SearchHit {
            link,
            title: info.title.unwrap_or_else(|| "Unknown Title".to_string()),
        })
    }))
}

pub(crate) fn parse_resolve_output(stdout: &[u8]) -> MusicResult<ResolvedStream> {
    let info = parse_info(stdout)?
        .ok_or_else(|| MusicError::AudioSourceError("yt-dlp returned no metadata".to_string()))?;
    let stream_url = info
        .url
        .ok_or_else(|| MusicError::AudioSourceError("No streamable audio format".to_string()))?;
    Ok(ResolvedStream {
        stream_url,
        title: info.title,
    })
}

/// `TrackSource` backed by the `yt-dlp` executable.
pub struct YtDlp {
    program: String,
    policy: ExtractionPolicy,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YtDlp {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            policy: ExtractionPolicy::default(),
        }
    }

    async fn run(&self, args: Vec<String>) -> MusicResult<Vec<u8>> {
        debug!("Running {} {:?}", self.program, args);
        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                MusicError::AudioSourceError(format!("Failed to execute {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("{} exited with {}: {}", self.program, output.status, stderr.trim());
            return Err(MusicError::AudioSourceError(stderr.trim().to_string()));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl TrackSource for YtDlp {
    async fn search(&self, query: &str) -> MusicResult<Option<SearchHit>> {
        info!("Searching YouTube for: {}", query);
        let stdout = self.run(self.policy.search_args(query)).await?;
        parse_search_output(&stdout)
    }

    async fn resolve(&self, locator: &str) -> MusicResult<ResolvedStream> {
        info!("Resolving stream for: {}", locator);
        let stdout = self.run(self.policy.resolve_args(locator)).await?;
        parse_resolve_output(&stdout)
    }
}
