//! CPU drawable surfaces
//!
//! A [`Surface`] is an RGBA8 pixel buffer that game objects draw with and the
//! renderer composites. Surfaces in opaque mode are copied verbatim by
//! [`Surface::blit`]; surfaces with per-pixel alpha (see
//! [`Surface::convert_alpha`]) are blended source-over onto the target.

use image::{Rgba, RgbaImage};

/// An RGBA colour with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl From<Rgba<u8>> for Color {
    fn from(px: Rgba<u8>) -> Self {
        Color::rgba(px[0], px[1], px[2], px[3])
    }
}

/// Placement rectangle: top-left position plus size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A zero-sized rect at the given position
    pub const fn at(x: i32, y: i32) -> Self {
        Self::new(x, y, 0, 0)
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Moves the rect, clamping at the `i32` range
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }
}

/// An RGBA8 pixel buffer with an alpha mode and a lock counter
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
    per_pixel_alpha: bool,
    locks: u32,
}

impl Surface {
    /// Creates an opaque black surface
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::BLACK)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, color.to_rgba()),
            per_pixel_alpha: false,
            locks: 0,
        }
    }

    /// Creates a fully transparent surface with per-pixel alpha enabled
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            per_pixel_alpha: true,
            locks: 0,
        }
    }

    pub fn from_image(pixels: RgbaImage, per_pixel_alpha: bool) -> Self {
        Self {
            pixels,
            per_pixel_alpha,
            locks: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn has_alpha(&self) -> bool {
        self.per_pixel_alpha
    }

    /// Switches the surface to per-pixel alpha so blits blend instead of copy
    pub fn convert_alpha(&mut self) {
        self.per_pixel_alpha = true;
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width() && y < self.height() {
            Some((*self.pixels.get_pixel(x, y)).into())
        } else {
            None
        }
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width() && y < self.height() {
            self.pixels.put_pixel(x, y, color.to_rgba());
        }
    }

    /// Raw RGBA8 bytes, row-major with no padding
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Marks the surface as being written to. Locks nest.
    pub fn lock(&mut self) {
        self.locks += 1;
    }

    pub fn unlock(&mut self) {
        self.locks = self.locks.saturating_sub(1);
    }

    pub fn is_locked(&self) -> bool {
        self.locks > 0
    }

    pub fn fill(&mut self, color: Color) {
        let px = color.to_rgba();
        for p in self.pixels.pixels_mut() {
            *p = px;
        }
    }

    /// Reallocates the buffer; the contents are reset to opaque black.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pixels = RgbaImage::from_pixel(width, height, Color::BLACK.to_rgba());
    }

    /// Copies `src` onto this surface with its top-left corner at `(x, y)`.
    ///
    /// The copy is clipped to this surface. Returns the number of pixels written.
    pub fn blit(&mut self, src: &Surface, x: i32, y: i32) -> usize {
        let (dw, dh) = (self.width() as i64, self.height() as i64);
        let (sw, sh) = (src.width() as i64, src.height() as i64);
        let (x, y) = (x as i64, y as i64);

        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + sw).min(dw);
        let y1 = (y + sh).min(dh);
        if x0 >= x1 || y0 >= y1 {
            return 0;
        }

        let span = ((x1 - x0) * 4) as usize;
        let dst_stride = (dw * 4) as usize;
        let src_stride = (sw * 4) as usize;
        let dst: &mut [u8] = &mut self.pixels;
        let source: &[u8] = &src.pixels;

        for row in y0..y1 {
            let d = row as usize * dst_stride + x0 as usize * 4;
            let s = (row - y) as usize * src_stride + (x0 - x) as usize * 4;
            let dst_row = &mut dst[d..d + span];
            let src_row = &source[s..s + span];

            if src.per_pixel_alpha {
                for (dp, sp) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                    let out = over([dp[0], dp[1], dp[2], dp[3]], [sp[0], sp[1], sp[2], sp[3]]);
                    dp.copy_from_slice(&out);
                }
            } else {
                dst_row.copy_from_slice(src_row);
            }
        }

        ((x1 - x0) * (y1 - y0)) as usize
    }
}

/// Straight-alpha source-over
fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    // out_a scaled by 255
    let oa = sa * 255 + da * inv;
    if oa == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da * inv;
        out[i] = ((c + oa / 2) / oa).min(255) as u8;
    }
    out[3] = ((oa + 127) / 255).min(255) as u8;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_blit_copies_pixels() {
        let mut dst = Surface::new(4, 4);
        let src = Surface::filled(2, 2, Color::rgba(200, 10, 10, 40));

        let written = dst.blit(&src, 1, 1);

        assert_eq!(written, 4);
        // opaque mode copies alpha verbatim
        assert_eq!(dst.pixel(1, 1), Some(Color::rgba(200, 10, 10, 40)));
        assert_eq!(dst.pixel(2, 2), Some(Color::rgba(200, 10, 10, 40)));
        assert_eq!(dst.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(dst.pixel(3, 3), Some(Color::BLACK));
    }

    #[test]
    fn alpha_blit_blends() {
        let mut dst = Surface::filled(1, 1, Color::rgb(0, 0, 255));
        let mut src = Surface::filled(1, 1, Color::rgba(255, 0, 0, 128));
        src.convert_alpha();

        dst.blit(&src, 0, 0);

        let px = dst.pixel(0, 0).unwrap();
        assert_eq!(px.a, 255);
        assert!((127..=129).contains(&px.r), "red was {}", px.r);
        assert!((126..=128).contains(&px.b), "blue was {}", px.b);
    }

    #[test]
    fn fully_transparent_pixels_leave_target_untouched() {
        let mut dst = Surface::filled(2, 1, Color::rgb(9, 9, 9));
        let mut src = Surface::transparent(2, 1);
        src.set_pixel(1, 0, Color::WHITE);
        src.convert_alpha();

        dst.blit(&src, 0, 0);

        assert_eq!(dst.pixel(0, 0), Some(Color::rgb(9, 9, 9)));
        assert_eq!(dst.pixel(1, 0), Some(Color::WHITE));
    }

    #[test]
    fn blit_is_clipped_to_target() {
        let mut dst = Surface::new(3, 3);
        let src = Surface::filled(2, 2, Color::WHITE);

        assert_eq!(dst.blit(&src, -1, -1), 1);
        assert_eq!(dst.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(dst.pixel(1, 0), Some(Color::BLACK));

        assert_eq!(dst.blit(&src, 2, 2), 1);
        assert_eq!(dst.pixel(2, 2), Some(Color::WHITE));

        assert_eq!(dst.blit(&src, 10, 0), 0);
        assert_eq!(dst.blit(&src, 0, -5), 0);
    }

    #[test]
    fn locks_nest() {
        let mut surface = Surface::new(1, 1);
        surface.lock();
        surface.lock();
        surface.unlock();
        assert!(surface.is_locked());
        surface.unlock();
        assert!(!surface.is_locked());
        surface.unlock();
        assert!(!surface.is_locked());
    }

    #[test]
    fn fill_and_resize() {
        let mut surface = Surface::new(2, 2);
        surface.fill(Color::rgb(1, 2, 3));
        assert_eq!(surface.pixel(1, 1), Some(Color::rgb(1, 2, 3)));

        surface.resize(5, 1);
        assert_eq!(surface.size(), (5, 1));
        assert_eq!(surface.pixel(4, 0), Some(Color::BLACK));
        assert_eq!(surface.pixel(0, 1), None);
    }

    #[test]
    fn rect_helpers() {
        let mut rect = Rect::new(1, 2, 10, 20);
        rect.translate(-3, 4);
        assert_eq!(rect.position(), (-2, 6));
        assert_eq!(rect.right(), 8);
        assert_eq!(rect.bottom(), 26);
        rect.move_to(0, 0);
        assert_eq!(rect, Rect::new(0, 0, 10, 20));
        assert_eq!(Rect::default(), Rect::at(0, 0));
    }

    #[test]
    fn translate_clamps_at_coordinate_limits() {
        let mut rect = Rect::new(i32::MAX - 1, i32::MIN + 1, 4, 4);
        rect.translate(10, -10);
        assert_eq!(rect.position(), (i32::MAX, i32::MIN));
        assert_eq!(rect.right(), i32::MAX as i64 + 4);

        rect.translate(-5, 5);
        assert_eq!(rect.position(), (i32::MAX - 5, i32::MIN + 5));
    }
}
