//! Mock implementations for external dependencies.

#[cfg(feature = "music")]
pub use track_source::MockSource;

#[cfg(feature = "music")]
mod track_source {
    use dmz_bot::music::MusicResult;
    use dmz_bot::music::TrackSource;
    use dmz_bot::music::source::{ResolvedStream, SearchHit};
    use mockall::mock;
    use serenity::async_trait;

    mock! {
        pub Source {}

        #[async_trait]
        impl TrackSource for Source {
            async fn search(&self, query: &str) -> MusicResult<Option<SearchHit>>;
            async fn resolve(&self, locator: &str) -> MusicResult<ResolvedStream>;
        }
    }
}
