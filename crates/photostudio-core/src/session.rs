//! Editor session: the loaded images plus the current settings snapshot.

use crate::collection::{ImageCollection, ImageId, IngestReport};
use crate::encode::ExportFormat;
use crate::export::{
    export_batch, export_single, share, BatchItem, BatchReport, DownloadSink, ExportOutcome,
    ShareOutcome, ShareTarget,
};
use crate::filter::{build_filter_chain, FilterChain};
use crate::preset::find_preset;
use crate::render::{render, RenderOptions, RenderedOutput};
use crate::settings::AdjustmentSettings;

/// Images and settings for one editor.
///
/// Settings are replaced wholesale on every change; operations that render
/// take a copy, so a render never sees a partial update.
#[derive(Debug, Default)]
pub struct EditorSession {
    images: ImageCollection,
    settings: AdjustmentSettings,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &ImageCollection {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut ImageCollection {
        &mut self.images
    }

    /// Decode and append files. See [`ImageCollection::ingest`].
    pub fn ingest<I, N, B>(&mut self, files: I) -> IngestReport
    where
        I: IntoIterator<Item = (N, B)>,
        N: Into<String>,
        B: AsRef<[u8]>,
    {
        self.images.ingest(files)
    }

    pub fn select(&mut self, index: usize) -> bool {
        self.images.select(index)
    }

    pub fn remove(&mut self, id: ImageId) -> bool {
        self.images.remove(id).is_some()
    }

    pub fn settings(&self) -> AdjustmentSettings {
        self.settings
    }

    /// Replace the settings with a sanitized copy of `settings`.
    pub fn update(&mut self, settings: AdjustmentSettings) {
        self.settings = settings.sanitized();
    }

    /// Change settings through a closure applied to the current snapshot.
    pub fn update_with(&mut self, f: impl FnOnce(&mut AdjustmentSettings)) {
        let mut next = self.settings;
        f(&mut next);
        self.update(next);
    }

    /// Reset every field to neutral.
    pub fn reset(&mut self) {
        self.settings = AdjustmentSettings::default();
    }

    /// Apply a preset by name. Returns false for an unknown name.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        match find_preset(name) {
            Some(preset) => {
                self.settings = preset.apply_to(&self.settings);
                true
            }
            None => false,
        }
    }

    /// Filter chain for the current settings.
    pub fn filter_chain(&self) -> FilterChain {
        build_filter_chain(&self.settings.adjustments)
    }

    /// Render the active image. `None` when nothing is loaded.
    pub fn render_active(&self, options: &RenderOptions) -> Option<RenderedOutput> {
        self.images
            .active()
            .map(|image| render(image, &self.settings, options))
    }

    pub fn export_active(
        &self,
        format: ExportFormat,
        timestamp_ms: u64,
        sink: &mut dyn DownloadSink,
    ) -> ExportOutcome {
        export_single(self.images.active(), &self.settings, format, timestamp_ms, sink)
    }

    /// Export every loaded image with the current settings.
    pub fn export_batch(&self, sink: &mut dyn DownloadSink) -> BatchReport {
        let settings = self.settings;
        export_batch(
            self.images.iter().map(|image| BatchItem { image, settings }),
            sink,
        )
    }

    pub fn share_active(&self, target: &mut dyn ShareTarget) -> ShareOutcome {
        share(self.images.active(), &self.settings, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Raster;
    use crate::export::ExportArtifact;
    use crate::settings::CropRect;

    fn session_with(n: usize) -> EditorSession {
        let mut session = EditorSession::new();
        for i in 0..n {
            let v = (i * 40) as u8;
            session
                .images_mut()
                .push(format!("photo{i}.jpeg"), Raster::from_rgb(12, 8, &[v; 12 * 8 * 3]));
        }
        session
    }

    #[test]
    fn test_update_sanitizes() {
        let mut session = EditorSession::new();
        let mut settings = AdjustmentSettings::new();
        settings.adjustments.saturation = 900.0;
        settings.crop = CropRect { x: 2.0, y: 0.0, w: 1.0, h: 1.0 };
        session.update(settings);

        assert_eq!(session.settings().adjustments.saturation, 300.0);
        assert_eq!(session.settings().crop.x, 1.0);
    }

    #[test]
    fn test_update_with() {
        let mut session = EditorSession::new();
        session.update_with(|s| s.rotate = 400.0);
        assert_eq!(session.settings().rotate, 180.0);

        session.reset();
        assert!(session.settings().is_identity());
    }

    #[test]
    fn test_apply_preset_keeps_geometry() {
        let mut session = EditorSession::new();
        session.update_with(|s| {
            s.rotate = 15.0;
            s.scale = 0.5;
        });

        assert!(session.apply_preset("mono"));
        assert_eq!(session.settings().adjustments.grayscale, 100.0);
        assert!(session.apply_preset("Original"));
        assert_eq!(session.settings().adjustments.grayscale, 0.0);
        assert_eq!(session.settings().rotate, 15.0);
        assert_eq!(session.settings().scale, 0.5);

        assert!(!session.apply_preset("nope"));
    }

    #[test]
    fn test_render_active_empty() {
        let session = EditorSession::new();
        assert!(session.render_active(&RenderOptions::default()).is_none());
    }

    #[test]
    fn test_render_active_follows_selection() {
        let mut session = session_with(3);
        session.select(2);
        let out = session.render_active(&RenderOptions::default()).unwrap();
        assert_eq!(out.raster.pixel(0, 0), [80, 80, 80, 255]);
    }

    #[test]
    fn test_filter_chain_reflects_settings() {
        let mut session = EditorSession::new();
        session.update_with(|s| s.adjustments.invert = 100.0);
        assert!(session.filter_chain().to_css().ends_with("invert(100%)"));
    }

    #[test]
    fn test_export_active_empty() {
        let session = EditorSession::new();
        let mut calls = 0;
        let outcome = session.export_active(ExportFormat::Png, 0, &mut |_: ExportArtifact| calls += 1);
        assert_eq!(outcome, ExportOutcome::NothingToExport);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_export_batch_leaves_settings_and_selection() {
        let mut session = session_with(4);
        session.select(1);
        session.apply_preset("Vivid Pop");
        let before = session.settings();

        let mut names = Vec::new();
        let report = session.export_batch(&mut |a: ExportArtifact| names.push(a.filename));

        assert_eq!(
            names,
            ["photo0-batch.jpg", "photo1-batch.jpg", "photo2-batch.jpg", "photo3-batch.jpg"]
        );
        assert_eq!(report.delivered.len(), 4);
        assert_eq!(session.settings(), before);
        assert_eq!(session.images().active_index(), Some(1));
    }

    #[test]
    fn test_remove_through_session() {
        let mut session = session_with(2);
        let id = session.images().active().unwrap().id();
        assert!(session.remove(id));
        assert!(!session.remove(id));
        assert_eq!(session.images().len(), 1);
    }
}
