use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{
    assets::loader::ImageLoader,
    assets::resolve::{asset_path, resolve_asset},
    descriptor::model::LayerStack,
    foundation::error::CompositeError,
    render::canvas::Canvas,
};

/// Why an overlay was left out of a composite.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The overlay's asset file does not exist.
    Missing {
        /// Path that was probed.
        path: PathBuf,
    },
    /// The asset exists but could not be read or decoded.
    Decode {
        /// Path of the asset.
        path: PathBuf,
        /// Loader message.
        message: String,
    },
}

/// An overlay that was skipped while compositing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedLayer {
    /// 1-based layer index in the descriptor.
    pub index: usize,
    /// Logical asset name of the layer.
    pub file_stem: String,
    /// Cause of the skip.
    pub reason: SkipReason,
}

impl std::fmt::Display for SkippedLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            SkipReason::Missing { path } => write!(
                f,
                "layer {} ('{}'): asset not found: {}",
                self.index,
                self.file_stem,
                path.display()
            ),
            SkipReason::Decode { path, message } => write!(
                f,
                "layer {} ('{}'): cannot load {}: {message}",
                self.index,
                self.file_stem,
                path.display()
            ),
        }
    }
}

/// Result of compositing one [`LayerStack`].
#[derive(Debug)]
pub struct Composite {
    /// Final pixels, ready to be handed to the output writer.
    pub canvas: Canvas,
    /// Overlays left out, in stack order.
    pub skipped: Vec<SkippedLayer>,
}

/// Render `stack` onto a canvas the size of its base image.
///
/// Only a missing or undecodable base is fatal. Overlays that cannot be resolved or
/// loaded are skipped with a warning and recorded in [`Composite::skipped`]; the remaining
/// overlays keep their relative order.
pub fn composite(
    stack: &LayerStack,
    asset_dir: &Path,
    loader: &impl ImageLoader,
) -> Result<Composite, CompositeError> {
    let base_path = resolve_asset(&stack.base.file_stem, asset_dir).ok_or_else(|| {
        CompositeError::MissingBase {
            path: asset_path(&stack.base.file_stem, asset_dir),
        }
    })?;
    let base = loader
        .load(&base_path)
        .map_err(|e| CompositeError::DecodeFailure {
            path: base_path.clone(),
            message: e.to_string(),
        })?;
    tracing::debug!(
        base = %base_path.display(),
        width = base.width,
        height = base.height,
        "base loaded"
    );

    let mut canvas = Canvas::from_base(&base);
    let mut skipped = Vec::new();

    for layer in &stack.overlays {
        let Some(path) = resolve_asset(&layer.file_stem, asset_dir) else {
            let skip = SkippedLayer {
                index: layer.index,
                file_stem: layer.file_stem.clone(),
                reason: SkipReason::Missing {
                    path: asset_path(&layer.file_stem, asset_dir),
                },
            };
            tracing::warn!("{skip}");
            skipped.push(skip);
            continue;
        };

        let placed = loader
            .load(&path)
            .and_then(|overlay| canvas.composite_at(&overlay, layer.x, layer.y));
        match placed {
            Ok(Some(region)) => {
                tracing::debug!(
                    index = layer.index,
                    file = %layer.file_stem,
                    ?region,
                    "overlay composited"
                );
            }
            Ok(None) => {
                tracing::debug!(
                    index = layer.index,
                    file = %layer.file_stem,
                    x = layer.x,
                    y = layer.y,
                    "overlay lies entirely outside the canvas"
                );
            }
            Err(e) => {
                let skip = SkippedLayer {
                    index: layer.index,
                    file_stem: layer.file_stem.clone(),
                    reason: SkipReason::Decode {
                        path,
                        message: e.to_string(),
                    },
                };
                tracing::warn!("{skip}");
                skipped.push(skip);
            }
        }
    }

    Ok(Composite { canvas, skipped })
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
