//! QR code extraction from images
//!
//! Decodes the node's bytes as an image and scans it for QR symbols. Every
//! successfully decoded symbol becomes a `QRCODE` data child carrying the
//! decoded text. An undecodable image or an image without symbols produces
//! no children and no error; only file nodes are scanned.

use crate::error::ExtractorError;
use crate::tree::node::{Node, NodeContent, NodeRef};
use tracing::debug;

/// Scan an image node for QR codes.
pub fn extract(node: &NodeRef) -> Result<Vec<NodeRef>, ExtractorError> {
    let bytes = {
        let n = node.borrow();
        match &n.content {
            NodeContent::File(file) => file.bytes.clone(),
            NodeContent::Data(_) => {
                debug!(id = n.id, "qrcode extraction skipping data node");
                return Ok(Vec::new());
            }
        }
    };

    let image = match image::load_from_memory(&bytes) {
        Ok(image) => image,
        Err(err) => {
            debug!(%err, "qrcode extraction could not decode image");
            return Ok(Vec::new());
        }
    };

    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
            gray.get_pixel(x as u32, y as u32)[0]
        });
    let mut children = Vec::new();
    for grid in prepared.detect_grids() {
        match grid.decode() {
            Ok((_, content)) => {
                children.push(Node::data("QRCODE", content.into_bytes()));
            }
            Err(err) => {
                debug!(%err, "qr symbol detected but not decoded");
            }
        }
    }

    debug!(symbols = children.len(), "qrcode extraction finished");
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_nodes_are_skipped() {
        let node = Node::data("TEXT", b"not an image".to_vec());
        assert!(extract(&node).unwrap().is_empty());
    }

    #[test]
    fn undecodable_image_produces_nothing() {
        let node = Node::file_entry("broken.png".into(), b"\x89PNG\r\n\x1a\nbroken".to_vec());
        assert!(extract(&node).unwrap().is_empty());
    }

    #[test]
    fn image_without_symbols_produces_nothing() {
        // A 4x4 all-white PNG rendered in memory
        let mut png = Vec::new();
        let white = image::RgbImage::from_pixel(4, 4, image::Rgb([255, 255, 255]));
        image::DynamicImage::ImageRgb8(white)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let node = Node::file_entry("white.png".into(), png);
        assert!(extract(&node).unwrap().is_empty());
    }
}
