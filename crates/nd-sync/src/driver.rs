//! The sync pass: render, detect changes, re-host images, write.

use tracing::{debug, info, warn};

use nd_render::{ImageRef, Page, PageRenderer, RenderOptions, sanitize_title};
use nd_storage::Sink;

use crate::error::SyncError;
use crate::images::{ImageFetcher, extension_for};
use crate::state::SyncState;

/// Layout options for sink paths.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Prefix for rendered documents (e.g. "source/_posts").
    pub posts_dir: String,
    /// Prefix for re-hosted images.
    pub images_dir: String,
}

/// Result of one sync pass.
#[derive(Debug, Default)]
pub struct SyncOutcome {
    /// Sink paths written, in order.
    pub written: Vec<String>,
    /// Documents skipped because they were unchanged.
    pub skipped: usize,
    /// Images rewritten to re-hosted URLs.
    pub images_rehosted: usize,
    /// Render warnings plus per-document failures.
    pub warnings: Vec<String>,
}

/// Result of a dry-run pass (nothing written, no state change).
#[derive(Debug, Default)]
pub struct DryRunOutcome {
    /// Sink paths that would be written.
    pub pending: Vec<String>,
    /// Documents that would be skipped as unchanged.
    pub skipped: usize,
    /// Render warnings.
    pub warnings: Vec<String>,
}

/// Drives one workspace through render → change detection → sink.
///
/// A failure on one document is downgraded to a warning so the rest of the
/// workspace still syncs; state records only successful writes and is saved
/// once at the end of the pass.
pub struct Syncer<'a> {
    sink: &'a dyn Sink,
    state: SyncState,
    options: SyncOptions,
    images: Option<ImageFetcher>,
}

impl<'a> Syncer<'a> {
    #[must_use]
    pub fn new(sink: &'a dyn Sink, state: SyncState, options: SyncOptions) -> Self {
        Self {
            sink,
            state,
            options,
            images: None,
        }
    }

    /// Enable image re-hosting through the sink.
    ///
    /// Without a fetcher, rendered documents keep their source image URLs.
    #[must_use]
    pub fn with_image_fetcher(mut self, fetcher: ImageFetcher) -> Self {
        self.images = Some(fetcher);
        self
    }

    /// Render the workspace and write changed documents to the sink.
    pub fn sync_workspace(
        &mut self,
        page: &Page,
        render: &RenderOptions,
    ) -> Result<SyncOutcome, SyncError> {
        let output = PageRenderer::new(render).render_workspace(page);
        let mut outcome = SyncOutcome::default();
        outcome
            .warnings
            .extend(output.warnings.iter().map(ToString::to_string));

        for doc in &output.documents {
            if !self.state.needs_update(&doc.page_id, doc.last_edited_time) {
                debug!("unchanged, skipping {}", doc.path);
                outcome.skipped += 1;
                continue;
            }

            let mut content = doc.content.clone();
            for (index, image) in output
                .images
                .iter()
                .filter(|img| img.page_id == doc.page_id)
                .enumerate()
            {
                match self.rehost(image, index) {
                    Ok(Some(hosted_url)) => {
                        content = content.replace(&image.url, &hosted_url);
                        outcome.images_rehosted += 1;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        // Keep the source URL; a missing image is not worth
                        // losing the document over.
                        warn!("image re-hosting failed for {}: {err}", image.url);
                        outcome.warnings.push(format!("image {}: {err}", image.url));
                    }
                }
            }

            let path = join_prefix(&self.options.posts_dir, &doc.path);
            let message = format!("Sync from Notion: {}", doc.path);
            match self.sink.put(&path, &content, &message) {
                Ok(()) => {
                    info!("wrote {path}");
                    self.state.record(doc.page_id.clone(), doc.last_edited_time);
                    outcome.written.push(path);
                }
                Err(err) => {
                    warn!("failed to write {path}: {err}");
                    outcome.warnings.push(format!("{path}: {err}"));
                }
            }
        }

        self.state.save()?;
        Ok(outcome)
    }

    /// Report what a sync pass would write, without touching sink or state.
    #[must_use]
    pub fn dry_run(&self, page: &Page, render: &RenderOptions) -> DryRunOutcome {
        let output = PageRenderer::new(render).render_workspace(page);
        let mut outcome = DryRunOutcome::default();
        outcome
            .warnings
            .extend(output.warnings.iter().map(ToString::to_string));

        for doc in &output.documents {
            if self.state.needs_update(&doc.page_id, doc.last_edited_time) {
                outcome
                    .pending
                    .push(join_prefix(&self.options.posts_dir, &doc.path));
            } else {
                outcome.skipped += 1;
            }
        }
        outcome
    }

    /// Download an image and upload it through the sink.
    ///
    /// Returns the rewritten URL, or `None` when no fetcher is configured.
    /// Images already present at the target path are not re-uploaded; the
    /// deterministic `{page}-{index}.{ext}` name makes repeat passes cheap.
    fn rehost(&self, image: &ImageRef, index: usize) -> Result<Option<String>, SyncError> {
        let Some(fetcher) = &self.images else {
            return Ok(None);
        };

        let stem = sanitize_title(&image.page_title);
        let filename = format!("{stem}-{}.{}", index + 1, extension_for(&image.url));
        let path = join_prefix(&self.options.images_dir, &format!("{stem}/{filename}"));

        if self.sink.exists(&path) {
            debug!("image already hosted: {path}");
        } else {
            let data = fetcher.download(&image.url)?;
            self.sink
                .put_binary(&path, &data, &format!("Add image: {filename}"))?;
        }
        Ok(Some(format!("/{path}")))
    }
}

/// Join a directory prefix onto a relative path.
fn join_prefix(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        path.to_owned()
    } else {
        format!("{prefix}/{path}")
    }
}
