//! layermerge assembles final images from `.ipt` layer descriptors.
//!
//! A descriptor names a base image and an ordered list of overlays with pixel offsets. The
//! engine turns descriptor text into a [`LayerStack`], resolves each layer to a `<stem>.png`
//! asset, and alpha-composites the overlays onto a copy of the base.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: `descriptor text -> LayerStack` ([`parse_descriptor`]). A dedicated literal
//!    parser; nothing in the descriptor is executed.
//! 2. **Resolve**: `stem -> Option<path>` ([`resolve_asset`]). Missing overlays are skipped,
//!    a missing base is fatal.
//! 3. **Composite**: `LayerStack -> Canvas` ([`composite`]) with source-over blending and
//!    clipping of off-canvas pixels.
//! 4. **Save**: `Canvas -> .png` ([`save_canvas`]), written to a temporary file and renamed.
//!
//! The [`process_dir`] / [`process_dirs`] batch driver runs the pipeline over directories of
//! descriptors, and [`find_png_only_dirs`] / [`prune_empty_dirs`] maintain output trees.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod batch;
mod descriptor;
mod foundation;
mod render;

pub use assets::decode::{Raster, decode_image};
pub use assets::loader::{CachedImageLoader, FsImageLoader, ImageLoader};
pub use assets::resolve::{IMAGE_EXTENSION, asset_path, resolve_asset};
pub use batch::driver::{
    BatchOpts, BatchReport, DirReport, FileFailure, FileOutcome, enumerate_descriptor_files,
    merge_descriptor, output_path_for, process_dir, process_dirs,
};
pub use batch::tree::{
    PngOnlyDir, PruneReport, find_png_only_dirs, is_effectively_empty, prune_empty_dirs,
};
pub use descriptor::model::{
    BaseRef, DESCRIPTOR_EXTENSION, LayerRef, LayerStack, parse_descriptor,
};
pub use descriptor::parser::DESCRIPTOR_ROOT;
pub use foundation::error::{Axis, CompositeError, MergeError, MergeResult, ParseError};
pub use render::blend::{Rgba8, over, over_row_in_place};
pub use render::canvas::{Canvas, Region};
pub use render::compositor::{Composite, SkipReason, SkippedLayer, composite};
pub use render::output::{ensure_parent_dir, save_canvas};
