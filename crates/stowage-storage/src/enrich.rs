//! Background metadata enrichment shared by the handlers.

use stowage_core::{UploadFile, UploadResult};

/// Run `enrich` on a blocking thread and return the enriched result.
///
/// The payload is already stored when this runs, so a failed task never
/// fails the upload: the result comes back without dimensions and with its
/// file path as thumbnail.
pub(crate) async fn enrich_on_blocking_thread<F>(
    file: &UploadFile,
    result: UploadResult,
    enrich: F,
) -> UploadResult
where
    F: FnOnce(&UploadFile, &mut UploadResult) + Send + 'static,
{
    let mut fallback = result.clone();
    fallback.thumb_path = Some(fallback.file_path.clone());

    let file = file.clone();
    let task = tokio::task::spawn_blocking(move || {
        let mut result = result;
        enrich(&file, &mut result);
        result
    });

    match task.await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(
                error = %e,
                key = %fallback.key,
                "Image metadata task failed, keeping upload without metadata"
            );
            fallback
        }
    }
}
