use tracing::debug;

use crate::models::{MovieMetadata, MovieSubmission};

#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    fn has_credential(&self) -> bool;

    /// Looks `title` up and returns the normalized field set. Failures come
    /// back as an all-empty set.
    async fn search_and_fetch(&self, title: &str) -> MovieMetadata;
}

/// Fills empty year/plot/poster/genre fields of `submission` from `source`.
///
/// At most one lookup is made, and only when a field is missing and the
/// source has a credential. Submitted values are never overwritten.
pub async fn enrich<S>(source: &S, mut submission: MovieSubmission) -> MovieSubmission
where
    S: MetadataSource + ?Sized,
{
    let missing = [&submission.year, &submission.plot, &submission.poster, &submission.genre]
        .iter()
        .any(|v| v.is_empty());

    if !missing || !source.has_credential() {
        return submission;
    }

    debug!(title = %submission.title, "enriching submission");
    let meta = source.search_and_fetch(&submission.title).await;

    fill(&mut submission.year, meta.year);
    fill(&mut submission.plot, meta.plot);
    fill(&mut submission.poster, meta.poster);
    fill(&mut submission.genre, meta.genre);
    submission
}

fn fill(field: &mut String, value: String) {
    if field.is_empty() {
        *field = value;
    }
}
