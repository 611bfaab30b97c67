use std::ffi::OsString;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rayon::prelude::*;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::GerberError;
use crate::geometry::BoundingBox;
use crate::layer::GerberLayer;

/// The complete fabrication set of a board: one Gerber file per layer plus a zip archive bundling them.
///
/// Layers are created through the named factories and are never removed. The design's bounding box is computed on
/// first request and cached for the lifetime of the design, so all primitives must be added before it is queried.
#[derive(Debug)]
pub struct GerberDesign {
    prefix: PathBuf,
    layers: Vec<GerberLayer>,
    bounding_box: OnceCell<BoundingBox>,
}

impl GerberDesign {
    /// `prefix` is the path of the output files without extension, e.g. `out/coil` gives `out/coil.gtl`.
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            layers: Vec::new(),
            bounding_box: OnceCell::new(),
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn layers(&self) -> &[GerberLayer] {
        &self.layers
    }

    pub fn top_copper(&mut self) -> &mut GerberLayer {
        self.layer("gtl")
    }

    pub fn bottom_copper(&mut self) -> &mut GerberLayer {
        self.layer("gbl")
    }

    pub fn top_solder_mask(&mut self) -> &mut GerberLayer {
        self.layer("gts")
    }

    pub fn bottom_solder_mask(&mut self) -> &mut GerberLayer {
        self.layer("gbs")
    }

    pub fn top_silkscreen(&mut self) -> &mut GerberLayer {
        self.layer("gto")
    }

    pub fn bottom_silkscreen(&mut self) -> &mut GerberLayer {
        self.layer("gbo")
    }

    /// Inner copper layer `n`, written as `g<n>l`.
    pub fn layer_n(&mut self, n: u32) -> &mut GerberLayer {
        self.layer(&format!("g{}l", n))
    }

    pub fn drill(&mut self) -> &mut GerberLayer {
        self.layer("xln")
    }

    pub fn outline(&mut self) -> &mut GerberLayer {
        self.layer("gko")
    }

    fn layer(&mut self, extension: &str) -> &mut GerberLayer {
        let filename = self.filename(extension);
        let position = match self
            .layers
            .iter()
            .position(|layer| layer.filename() == filename)
        {
            Some(position) => position,
            None => {
                debug!("new layer. filename: {}", filename.display());
                self.layers.push(GerberLayer::new(filename));
                self.layers.len() - 1
            }
        };
        &mut self.layers[position]
    }

    fn filename(&self, extension: &str) -> PathBuf {
        let mut filename = OsString::from(self.prefix.as_os_str());
        filename.push(".");
        filename.push(extension);
        PathBuf::from(filename)
    }

    pub fn archive_filename(&self) -> PathBuf {
        self.filename("zip")
    }

    /// Writes every layer to its own file and into `<prefix>.zip`.
    ///
    /// Stops at the first failure, files written before it are left in place.
    #[profiling::function]
    pub fn write_gerber(&self) -> Result<(), GerberError> {
        let archive_path = self.archive_filename();
        let archive_file = File::create(&archive_path).map_err(|source| GerberError::Io {
            path: archive_path.clone(),
            source,
        })?;
        let mut archive = ZipWriter::new(archive_file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for layer in &self.layers {
            let path = layer.filename();

            let mut buffer = Vec::new();
            layer
                .write_gerber(&mut buffer)
                .map_err(|source| GerberError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;

            let mut file = File::create(path).map_err(|source| GerberError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            file.write_all(&buffer)
                .map_err(|source| GerberError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;

            archive.start_file(entry_name(path), options)?;
            archive
                .write_all(&buffer)
                .map_err(|source| GerberError::Io {
                    path: archive_path.clone(),
                    source,
                })?;
        }

        archive.finish()?;

        info!(
            "wrote design. layers: {}, archive: {}",
            self.layers.len(),
            archive_path.display()
        );
        Ok(())
    }

    /// Writes only the archive, into a caller-supplied sink, returning the sink once the archive is finished.
    #[profiling::function]
    pub fn write_archive<W: Write + Seek>(&self, sink: W) -> Result<W, GerberError> {
        let mut archive = ZipWriter::new(sink);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for layer in &self.layers {
            let mut buffer = Vec::new();
            layer.write_gerber(&mut buffer)?;

            archive.start_file(entry_name(layer.filename()), options)?;
            archive.write_all(&buffer)?;
        }

        let sink = archive.finish()?;
        info!("wrote archive. layers: {}", self.layers.len());
        Ok(sink)
    }

    /// Union of all layers' bounding boxes, computed once.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box_using(GerberLayer::bounding_box)
    }

    /// Fans `layer_bounding_box` out over the layers in parallel, merging each result under a lock.
    /// Only the first call does any work, later calls return the cached union.
    #[profiling::function]
    pub(crate) fn bounding_box_using<F>(&self, layer_bounding_box: F) -> BoundingBox
    where
        F: Fn(&GerberLayer) -> BoundingBox + Sync,
    {
        *self.bounding_box.get_or_init(|| {
            let union = Mutex::new(BoundingBox::default());
            self.layers.par_iter().for_each(|layer| {
                let bbox = layer_bounding_box(layer);
                union.lock().join(&bbox);
            });
            let union = union.into_inner();
            debug!("design bounding box. bbox: {:?}", union);
            union
        })
    }
}

/// Archive entries are keyed by the layer's file name, without any directories of the prefix.
fn entry_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod design_tests {
    use std::io::{Cursor, Read};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rstest::rstest;
    use zip::ZipArchive;

    use super::*;
    use crate::primitive::{ArcPrimitive, CirclePrimitive, LinePrimitive};
    use crate::spacial::Position;
    use crate::types::ApertureShape;

    fn design() -> GerberDesign {
        let mut design = GerberDesign::new("board");
        design
            .top_copper()
            .add(CirclePrimitive::new(Position::new(10.0, 10.0), 2.0));
        design.bottom_copper().add(LinePrimitive::new(
            Position::new(-5.0, 0.0),
            Position::new(5.0, 0.0),
            ApertureShape::Circle,
            1.0,
        ));
        design.outline().add(ArcPrimitive::new(
            Position::origin(),
            20.0,
            ApertureShape::Circle,
            1.0,
            1.0,
            0.0,
            360.0,
            0.1,
        ));
        design
    }

    #[rstest]
    #[case::top_copper(GerberDesign::top_copper, "board.gtl")]
    #[case::bottom_copper(GerberDesign::bottom_copper, "board.gbl")]
    #[case::top_solder_mask(GerberDesign::top_solder_mask, "board.gts")]
    #[case::bottom_solder_mask(GerberDesign::bottom_solder_mask, "board.gbs")]
    #[case::top_silkscreen(GerberDesign::top_silkscreen, "board.gto")]
    #[case::bottom_silkscreen(GerberDesign::bottom_silkscreen, "board.gbo")]
    #[case::drill(GerberDesign::drill, "board.xln")]
    #[case::outline(GerberDesign::outline, "board.gko")]
    fn test_layer_filenames(#[case] factory: fn(&mut GerberDesign) -> &mut GerberLayer, #[case] expected: &str) {
        let mut design = GerberDesign::new("board");

        let layer = factory(&mut design);

        assert_eq!(layer.filename(), Path::new(expected));
    }

    #[test]
    fn test_inner_layer_filename() {
        let mut design = GerberDesign::new("out/board");

        assert_eq!(design.layer_n(2).filename(), Path::new("out/board.g2l"));
        assert_eq!(design.archive_filename(), Path::new("out/board.zip"));
    }

    #[test]
    fn test_factory_returns_existing_layer() {
        // given
        let mut design = GerberDesign::new("board");
        design
            .top_copper()
            .add(CirclePrimitive::new(Position::origin(), 1.0));

        // when
        design
            .top_copper()
            .add(CirclePrimitive::new(Position::new(1.0, 1.0), 1.0));

        // then
        assert_eq!(design.layers().len(), 1);
        assert_eq!(design.layers()[0].primitives().len(), 2);
    }

    #[test]
    fn test_bounding_box_is_union_of_layers() {
        let bbox = design().bounding_box();

        assert!((bbox.min.x - -20.0).abs() <= 1e-3);
        assert!((bbox.min.y - -20.0).abs() <= 1e-3);
        assert!((bbox.max.x - 20.0).abs() <= 1e-3);
        assert!((bbox.max.y - 20.0).abs() <= 1e-3);
    }

    #[test]
    fn test_bounding_box_is_computed_once() {
        // given
        let design = design();
        let calls = AtomicUsize::new(0);
        let counting = |layer: &GerberLayer| {
            calls.fetch_add(1, Ordering::SeqCst);
            layer.bounding_box()
        };

        // when
        let first = design.bounding_box_using(&counting);
        let second = design.bounding_box_using(&counting);
        let third = design.bounding_box();

        // then
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(first.min.x.to_bits(), second.min.x.to_bits());
        assert_eq!(first.max.y.to_bits(), second.max.y.to_bits());
        assert_eq!(first, third);
    }

    #[test]
    fn test_archive_into_caller_supplied_sink() {
        // given
        let design = design();

        // when
        let sink = design.write_archive(Cursor::new(Vec::new())).unwrap();

        // then
        let mut archive = ZipArchive::new(Cursor::new(sink.into_inner())).unwrap();
        let mut names = archive.file_names().map(str::to_string).collect::<Vec<_>>();
        names.sort();
        assert_eq!(names, vec!["board.gbl", "board.gko", "board.gtl"]);

        let mut copper = String::new();
        archive
            .by_name("board.gtl")
            .unwrap()
            .read_to_string(&mut copper)
            .unwrap();
        assert!(copper.contains("%ADD11C,2.00000*%\n"));
    }

    #[test]
    fn test_archive_sink_failure_is_reported() {
        // a sink that accepts nothing
        struct FullSink;

        impl Write for FullSink {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::StorageFull, "full"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        impl Seek for FullSink {
            fn seek(&mut self, _pos: std::io::SeekFrom) -> std::io::Result<u64> {
                Ok(0)
            }
        }

        let result = design().write_archive(FullSink);

        assert!(matches!(result, Err(GerberError::Archive(_)) | Err(GerberError::Write(_))));
    }

    #[test]
    fn test_empty_design_has_empty_bounding_box() {
        assert!(GerberDesign::new("empty").bounding_box().is_empty());
    }
}
