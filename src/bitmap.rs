use std::{fs::File, io::BufWriter, path::Path};

pub const BITS_PER_COMPONENT: u32 = 8;
pub const BYTES_PER_PIXEL: u32 = 4;

/// Where alpha lives in a pixel and how the color channels relate to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaInfo {
    /// RGBA, with color channels already multiplied by alpha.
    PremultipliedLast,
}

/// Byte order of a 32-bit pixel word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Most significant byte first, so an RGBA pixel is stored as the bytes `R, G, B, A`.
    Big32,
}

/// A CPU-side RGBA8 image, row-major with no padding between rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wraps tightly packed premultiplied RGBA8 pixels.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not exactly `width * height * 4` bytes long.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            width as usize * height as usize * BYTES_PER_PIXEL as usize,
            "pixel buffer does not match a {width}x{height} bitmap",
        );
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bits_per_component(&self) -> u32 {
        BITS_PER_COMPONENT
    }

    pub fn bits_per_pixel(&self) -> u32 {
        BITS_PER_COMPONENT * BYTES_PER_PIXEL
    }

    pub fn bytes_per_row(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL as usize
    }

    pub fn alpha_info(&self) -> AlphaInfo {
        AlphaInfo::PremultipliedLast
    }

    pub fn byte_order(&self) -> ByteOrder {
        ByteOrder::Big32
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the premultiplied RGBA value at `(x, y)`, with `(0, 0)` at the top left.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "({x}, {y}) is out of bounds");
        let i = y as usize * self.bytes_per_row() + x as usize * BYTES_PER_PIXEL as usize;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Converts the pixels to straight (non-premultiplied) alpha, as most file formats expect.
    pub fn to_straight_alpha(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u32::from(*c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8;
            }
        }
        out
    }

    /// Writes the bitmap as an 8-bit RGBA PNG.
    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        self.write_png_impl(path.as_ref())
    }

    fn write_png_impl(&self, path: &Path) -> anyhow::Result<()> {
        let file = BufWriter::new(File::create(path)?);
        let mut encoder = png::Encoder::new(file, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.to_straight_alpha())?;
        writer.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    fn checker() -> Bitmap {
        #[rustfmt::skip]
        let data = vec![
            255, 0, 0, 255,   0, 0, 0, 0,
            64, 32, 0, 128,   0, 0, 255, 255,
        ];
        Bitmap::from_raw(2, 2, data)
    }

    #[test]
    fn metadata() {
        let bitmap = checker();
        assert_eq!(bitmap.bits_per_component(), 8);
        assert_eq!(bitmap.bits_per_pixel(), 32);
        assert_eq!(bitmap.bytes_per_row(), 8);
        assert_eq!(bitmap.alpha_info(), AlphaInfo::PremultipliedLast);
        assert_eq!(bitmap.byte_order(), ByteOrder::Big32);
    }

    #[test]
    fn pixel_lookup_is_row_major() {
        let bitmap = checker();
        assert_eq!(bitmap.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(bitmap.pixel(1, 0), [0, 0, 0, 0]);
        assert_eq!(bitmap.pixel(0, 1), [64, 32, 0, 128]);
        assert_eq!(bitmap.pixel(1, 1), [0, 0, 255, 255]);
    }

    #[test]
    fn unpremultiplies() {
        let straight = checker().to_straight_alpha();
        assert_eq!(&straight[0..4], &[255, 0, 0, 255]);
        assert_eq!(&straight[4..8], &[0, 0, 0, 0]);
        assert_eq!(&straight[8..12], &[128, 64, 0, 128]);
    }

    #[test]
    #[should_panic]
    fn rejects_padded_rows() {
        Bitmap::from_raw(2, 2, vec![0; 20]);
    }

    #[test]
    fn writes_png() {
        let path = env::temp_dir().join(format!("angular-gradient-{}.png", std::process::id()));
        checker().write_png(&path).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (2, 2));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        drop(reader);
        std::fs::remove_file(&path).unwrap();
    }
}
