//! GPU textures mirroring the live previews of the session.

use eco_core::{PreviewId, PreviewStore};
use eframe::egui;
use std::collections::HashMap;

#[derive(Default)]
pub(super) struct PreviewTextures {
    textures: HashMap<PreviewId, egui::TextureHandle>,
}

impl PreviewTextures {
    /// Frees textures whose preview was revoked and uploads the current one.
    pub(super) fn sync(
        &mut self,
        ctx: &egui::Context,
        store: &PreviewStore,
        current: Option<PreviewId>,
    ) {
        self.textures.retain(|id, _| store.is_live(*id));

        if let Some(id) = current
            && !self.textures.contains_key(&id)
            && let Some(preview) = store.get(id)
            && let Some(img) = &preview.image
        {
            let size = [img.width() as usize, img.height() as usize];
            let color = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
            let name = format!("preview:{}", preview.name);
            let tex = ctx.load_texture(name, color, egui::TextureOptions::LINEAR);
            self.textures.insert(id, tex);
        }
    }

    pub(super) fn get(&self, id: PreviewId) -> Option<&egui::TextureHandle> {
        self.textures.get(&id)
    }

    pub(super) fn clear(&mut self) {
        self.textures.clear();
    }
}
